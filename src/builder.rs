use crate::{RapEngine, StructuredProblem};

pub struct RapEngineBuilder<P: StructuredProblem> {
    problem: P,
    validate: Option<bool>,
}

impl<P: StructuredProblem> RapEngineBuilder<P> {
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            validate: None,
        }
    }
    /// Toggle the precondition check run before every solve (on by default).
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }
    pub fn build(self) -> RapEngine<P> {
        match self.validate {
            Some(v) => RapEngine::with_validation(self.problem, v),
            None => RapEngine::new(self.problem),
        }
    }
}
