//! Exact quadratic resource allocation with structured disjoint interval
//! bounds (RAP-DIBC).
//!
//! Solves
//!
//! ```text
//! minimize    Σ (x_i + b_i)²
//! subject to  Σ x_i = R
//!             x_i ∈ [l_i^0, u^0] ∪ [l^1, u^1] ∪ … ∪ [l^{m-1}, u_i^{m-1}]
//! ```
//!
//! where the inner interval endpoints are shared by every variable and only
//! the outermost lower and upper bounds vary per variable.
//!
//! ## Core idea
//! 1. With the shifts `b` sorted non-increasingly, some optimal solution
//!    assigns variables to intervals monotonically, so it suffices to search
//!    over *partitions* of `0..n` into `m` consecutive segments.
//! 2. Partitions that differ only in the last boundary form a *trunk*; the
//!    engine slides that boundary across the trunk and maintains the
//!    breakpoint search for the Lagrange multiplier incrementally.
//! 3. The cheapest feasible partition is reconstructed into an allocation.
//!
//! ## Quick start
//! ```
//! use rap_dibc::{Instance, RapEngine};
//!
//! // x_i ∈ [0, 5] ∪ [7, 10] for three variables, Σ x = 17.
//! let instance = Instance::new(
//!     17.0,
//!     vec![0.0, 0.0, 0.0],
//!     vec![7.0],
//!     vec![5.0],
//!     vec![0.0; 3],
//!     vec![10.0; 3],
//! )
//! .unwrap();
//! let solution = RapEngine::new(instance).run().unwrap();
//! assert_eq!(solution.allocation, vec![5.0, 5.0, 7.0]);
//! ```
//!
//! Custom problem types plug in through [`StructuredProblem`]; [`Instance`]
//! is the plain-vector implementation used by [`solve`].

pub mod bounds;
pub mod builder;
pub mod engine;
pub mod error;
pub mod heap;
pub mod instance;
pub mod partition;
pub mod sweep;
pub mod tracker;
pub mod traits;
pub mod utils;
pub mod validate;

pub use crate::builder::RapEngineBuilder;
pub use crate::engine::{solve, RapEngine, Solution};
pub use crate::error::{AllocationError, PreconditionViolation};
pub use crate::instance::Instance;
pub use crate::partition::{Partition, TrunkEnumerator};
pub use crate::tracker::SolveStats;
pub use crate::traits::StructuredProblem;
