//! Example: classic water-filling as the single-interval special case.
//!
//! With one segment per variable the solver reduces to finding the water
//! level λ with `Σ clip(λ - b_i, l_i, u_i) = R`.
//!
//! Run with:
//! `cargo run --example water_filling`

fn main() {
    let floors = [3.0, 1.0, 0.5, -1.0];
    let lower = [0.0; 4];
    let upper = [2.0, 4.0, 4.0, 6.0];

    for budget in [1.0, 4.0, 8.0, 12.0, 16.0, 17.0] {
        match rap_dibc::solve(budget, &floors, &[], &[], &lower, &upper) {
            Ok(levels) => {
                let formatted: Vec<String> = levels.iter().map(|x| format!("{x:.3}")).collect();
                println!("R = {budget:>5}: x = [{}]", formatted.join(", "));
            }
            Err(err) => println!("R = {budget:>5}: {err}"),
        }
    }
}
