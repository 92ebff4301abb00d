//! Example: allocating a budget across machines with three operating modes.
//!
//! Each machine is either idle-ish `[l_i, 1]`, at half load `[4, 5]` or at
//! full load `[8, u_i]`; loads in between are not allowed. The shifts `b_i`
//! encode a preference for loading the later machines.
//!
//! Run with:
//! `cargo run --example allocate`

use rap_dibc::{RapEngineBuilder, StructuredProblem};

/// Operating modes computed on the fly instead of stored per machine.
struct Machines {
    budget: f64,
    preference: Vec<f64>,
}

impl StructuredProblem for Machines {
    fn num_vars(&self) -> usize {
        self.preference.len()
    }

    fn num_segments(&self) -> usize {
        3
    }

    fn resource(&self) -> f64 {
        self.budget
    }

    fn shift(&self, var: usize) -> f64 {
        self.preference[var]
    }

    fn segment_bounds(&self, segment: usize, var: usize) -> (f64, f64) {
        match segment {
            0 => (0.1 * var as f64 - 0.5, 1.0),
            1 => (4.0, 5.0),
            _ => (8.0, 9.0 + 0.5 * var as f64),
        }
    }
}

fn main() {
    let machines = Machines {
        budget: 27.5,
        preference: vec![3.0, 2.0, 1.5, 0.0, -1.0, -2.5],
    };
    let engine = RapEngineBuilder::new(machines).build();

    match engine.run() {
        Ok(solution) => {
            let problem = engine.problem();
            println!("multiplier λ* = {:.4}", solution.multiplier);
            println!("objective     = {:.4}", solution.objective);
            println!("segment ends  = {:?}", solution.partition.ends());
            for (var, x) in solution.allocation.iter().enumerate() {
                println!(
                    "  machine {var}: load {x:>7.3} (mode {})",
                    solution.partition.segment_of(var)
                );
                debug_assert!(problem.contains(var, *x));
            }
            println!("total load    = {:.3}", solution.allocation.iter().sum::<f64>());
            println!("stats         = {:?}", solution.stats);
        }
        Err(err) => eprintln!("allocation failed: {err}"),
    }
}
