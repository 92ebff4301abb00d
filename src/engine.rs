//! Exact solver engine.
//!
//! The engine enumerates trunks, sweeps the cursor of each one with
//! [`TrunkSweep`], keeps the best `(partition, λ*)` pair and finally
//! reconstructs the allocation from it. The search is generic over
//! [`StructuredProblem`].

use crate::bounds::BoundAssignment;
use crate::error::AllocationError;
use crate::instance::Instance;
use crate::partition::{Partition, TrunkEnumerator};
use crate::sweep::{TrunkSweep, WindowOutcome};
use crate::tracker::{Incumbent, SolveStats};
use crate::traits::StructuredProblem;
use crate::validate::check_preconditions;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Optimal allocation together with the data that certifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// `x_i` for every variable.
    pub allocation: Vec<f64>,
    /// `Σ (x_i + b_i)²` as tracked by the sweep.
    pub objective: f64,
    /// Optimal Lagrange multiplier `λ*` of the winning partition.
    pub multiplier: f64,
    /// Winning segment assignment.
    pub partition: Partition,
    pub stats: SolveStats,
}

/// Solver for a given problem instance `P`.
///
/// Typical usage:
/// ```
/// use rap_dibc::{Instance, RapEngine};
///
/// // Each variable lives in [0, 5] ∪ [7, 10]; the three must sum to 17.
/// let instance = Instance::new(
///     17.0,
///     vec![0.0, 0.0, 0.0],
///     vec![7.0],
///     vec![5.0],
///     vec![0.0; 3],
///     vec![10.0; 3],
/// )
/// .unwrap();
/// let solution = RapEngine::new(instance).run().unwrap();
/// assert_eq!(solution.allocation, vec![5.0, 5.0, 7.0]);
/// assert_eq!(solution.objective, 99.0);
/// ```
pub struct RapEngine<P: StructuredProblem> {
    problem: P,
    validate: bool,
}

impl<P: StructuredProblem> RapEngine<P> {
    /// Create an engine that validates its input before searching.
    pub fn new(problem: P) -> Self {
        Self::with_validation(problem, true)
    }

    /// Create an engine with explicit control over input validation.
    ///
    /// Skipping validation on malformed input gives unspecified (but memory
    /// safe) results.
    pub fn with_validation(problem: P, validate: bool) -> Self {
        Self { problem, validate }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn into_problem(self) -> P {
        self.problem
    }

    pub fn validates(&self) -> bool {
        self.validate
    }

    /// Solve on the calling thread.
    ///
    /// # Errors
    /// [`AllocationError::PreconditionViolated`] if validation is enabled and
    /// fails, [`AllocationError::Infeasible`] if no partition can reach `R`.
    ///
    /// # Panics
    /// Panics if the sweep overshoots `R` with no free variable, which valid
    /// input cannot produce.
    pub fn run_serial(&self) -> Result<Solution, AllocationError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "rap_solve",
            n = self.problem.num_vars(),
            m = self.problem.num_segments(),
            parallel = false
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if let Some(done) = self.prepare()? {
            return Ok(done);
        }

        let mut incumbent = Incumbent::new();
        let mut stats = SolveStats::default();
        for partition in self.seeds() {
            let (trunk_best, trunk_stats) = sweep_trunk(&self.problem, partition);
            stats = stats.merge(trunk_stats);
            if let Some(best) = trunk_best.best() {
                incumbent.offer(best.objective, best.multiplier, &best.partition);
            }
        }
        self.finish(incumbent, stats)
    }

    /// Partitions the sweep starts from: one per trunk, or the flat partition
    /// for a single-segment problem.
    fn seeds(&self) -> Box<dyn Iterator<Item = Partition> + Send> {
        let n = self.problem.num_vars();
        let m = self.problem.num_segments();
        if m < 2 {
            Box::new(std::iter::once(Partition::flat()))
        } else {
            Box::new(TrunkEnumerator::new(n, m).map(Partition::seed))
        }
    }

    /// Validate, and settle the empty instance without searching.
    fn prepare(&self) -> Result<Option<Solution>, AllocationError> {
        if self.validate {
            check_preconditions(&self.problem)?;
        }
        if self.problem.num_vars() > 0 {
            return Ok(None);
        }
        if self.problem.resource() == 0.0 {
            Ok(Some(Solution {
                allocation: Vec::new(),
                objective: 0.0,
                multiplier: 0.0,
                partition: Partition::flat(),
                stats: SolveStats::default(),
            }))
        } else {
            Err(AllocationError::Infeasible)
        }
    }

    /// Materialize the allocation of the winning partition.
    fn finish(&self, incumbent: Incumbent, stats: SolveStats) -> Result<Solution, AllocationError> {
        let Some(best) = incumbent.into_best() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(?stats, "no feasible partition");
            return Err(AllocationError::Infeasible);
        };
        let bounds = BoundAssignment::from_partition(&self.problem, &best.partition);
        let allocation = bounds.allocate(&self.problem, best.multiplier);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            objective = best.objective,
            multiplier = best.multiplier,
            ends = ?best.partition.ends(),
            ?stats,
            "optimal partition"
        );

        Ok(Solution {
            allocation,
            objective: best.objective,
            multiplier: best.multiplier,
            partition: best.partition,
            stats,
        })
    }
}

#[cfg(not(feature = "parallel"))]
impl<P: StructuredProblem> RapEngine<P> {
    /// Solve the instance (serial execution).
    ///
    /// See [`run_serial`](Self::run_serial) for errors and panics.
    pub fn run(&self) -> Result<Solution, AllocationError> {
        self.run_serial()
    }
}

#[cfg(feature = "parallel")]
impl<P> RapEngine<P>
where
    P: StructuredProblem + Sync,
{
    /// Solve the instance, sweeping trunks on the rayon pool.
    ///
    /// Trunk results are reduced in enumeration order with the same
    /// strictly-smaller rule as the serial path, so the result is identical to
    /// [`run_serial`](Self::run_serial).
    pub fn run(&self) -> Result<Solution, AllocationError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "rap_solve",
            n = self.problem.num_vars(),
            m = self.problem.num_segments(),
            parallel = true
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if let Some(done) = self.prepare()? {
            return Ok(done);
        }

        let seeds: Vec<Partition> = self.seeds().collect();
        let (incumbent, stats) = seeds
            .into_par_iter()
            .map(|partition| sweep_trunk(&self.problem, partition))
            .reduce(
                || (Incumbent::new(), SolveStats::default()),
                |(left, left_stats), (right, right_stats)| {
                    (left.merge(right), left_stats.merge(right_stats))
                },
            );
        self.finish(incumbent, stats)
    }
}

/// Slide the cursor of one trunk from its seed to `n`, keeping the best
/// solved position.
fn sweep_trunk<P: StructuredProblem>(problem: &P, partition: Partition) -> (Incumbent, SolveStats) {
    #[cfg(feature = "tracing")]
    let span = tracing::trace_span!("sweep_trunk", trunk = ?partition.trunk());
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut best = Incumbent::new();
    let mut stats = SolveStats {
        trunks: 1,
        ..SolveStats::default()
    };
    let mut sweep = TrunkSweep::new(problem, partition);
    loop {
        stats.windows += 1;
        match sweep.solve_window() {
            WindowOutcome::Rejected => stats.rejected_windows += 1,
            WindowOutcome::Exhausted => {
                #[cfg(feature = "tracing")]
                tracing::trace!(cursor = ?sweep.partition().cursor(), "trunk exhausted");
                break;
            }
            WindowOutcome::Solved {
                multiplier,
                objective,
            } => {
                stats.solved_windows += 1;
                if best.offer(objective, multiplier, sweep.partition()) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(objective, multiplier, cursor = ?sweep.partition().cursor(), "trunk improved");
                }
            }
        }
        if !sweep.slide() {
            break;
        }
    }
    (best, stats)
}

/// Solve `min Σ (x_i + b_i)²` s.t. `Σ x_i = R` with structured disjoint
/// interval bounds, returning the optimal allocation.
///
/// `lower_fixed` holds the shared lower bounds of segments `1..m`,
/// `upper_fixed` the shared upper bounds of segments `0..m-1`; `lower_var`
/// and `upper_var` hold the per-variable outer bounds. `shifts` must be sorted
/// non-increasingly.
///
/// ```
/// // Single interval per variable: classic water-filling.
/// let x = rap_dibc::solve(4.0, &[3.0, 1.0], &[], &[], &[-5.0, -5.0], &[5.0, 5.0]).unwrap();
/// assert_eq!(x, vec![1.0, 3.0]);
/// ```
pub fn solve(
    resource: f64,
    shifts: &[f64],
    lower_fixed: &[f64],
    upper_fixed: &[f64],
    lower_var: &[f64],
    upper_var: &[f64],
) -> Result<Vec<f64>, AllocationError> {
    let instance = Instance::new(
        resource,
        shifts.to_vec(),
        lower_fixed.to_vec(),
        upper_fixed.to_vec(),
        lower_var.to_vec(),
        upper_var.to_vec(),
    )?;
    RapEngine::new(instance)
        .run_serial()
        .map(|solution| solution.allocation)
}
