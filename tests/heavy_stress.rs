#![cfg(feature = "heavy")]
use rand::{rngs::StdRng, Rng, SeedableRng};
use rap_dibc::{Instance, RapEngine, StructuredProblem};

/// Random instance with `m` segments. Shared bounds are spaced so that every
/// segment is non-empty and consecutive segments leave a gap.
fn random_instance(rng: &mut StdRng, n: usize, m: usize) -> Instance {
    let mut shifts: Vec<f64> = (0..n).map(|_| rng.gen_range(-50.0..50.0)).collect();
    shifts.sort_by(|a, b| b.total_cmp(a));

    let mut lower_fixed = Vec::with_capacity(m - 1);
    let mut upper_fixed = Vec::with_capacity(m - 1);
    let mut edge = 0.0;
    for _ in 0..m - 1 {
        upper_fixed.push(edge);
        edge += rng.gen_range(0.5..5.0);
        lower_fixed.push(edge);
        edge += rng.gen_range(0.0..10.0);
    }

    let mut lower_var: Vec<f64> = (0..n).map(|_| -rng.gen_range(0.0..20.0)).collect();
    lower_var.sort_by(f64::total_cmp);
    let base = lower_fixed.last().copied().unwrap_or(0.0);
    let mut upper_var: Vec<f64> = (0..n).map(|_| base + rng.gen_range(0.0..20.0)).collect();
    upper_var.sort_by(f64::total_cmp);

    let min_sum: f64 = lower_var.iter().sum();
    let max_sum: f64 = upper_var.iter().sum();
    let resource = rng.gen_range(min_sum..max_sum);
    Instance::new(resource, shifts, lower_fixed, upper_fixed, lower_var, upper_var).unwrap()
}

fn assert_feasible(problem: &Instance, allocation: &[f64]) {
    let total: f64 = allocation.iter().sum();
    let scale = allocation.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
    assert!(
        (total - problem.resource()).abs() <= 1e-9 * scale,
        "Σx = {total}, R = {}",
        problem.resource()
    );
    for (var, &x) in allocation.iter().enumerate() {
        assert!(problem.contains(var, x), "x_{var} = {x} outside its intervals");
    }
}

#[test]
fn heavy_stress_two_segments() {
    let mut rng = StdRng::seed_from_u64(123);
    let problem = random_instance(&mut rng, 5_000, 2);
    let solution = RapEngine::new(problem.clone()).run().unwrap();
    assert_feasible(&problem, &solution.allocation);
    assert_eq!(solution.stats.trunks, 1);
}

#[test]
fn heavy_stress_three_segments() {
    let mut rng = StdRng::seed_from_u64(0xD1BC);
    let problem = random_instance(&mut rng, 1_500, 3);
    let solution = RapEngine::new(problem.clone()).run().unwrap();
    assert_feasible(&problem, &solution.allocation);
    assert_eq!(solution.stats.trunks, 1_501);
}

#[test]
fn heavy_stress_four_segments() {
    let mut rng = StdRng::seed_from_u64(7);
    let problem = random_instance(&mut rng, 150, 4);
    let solution = RapEngine::new(problem.clone()).run().unwrap();
    assert_feasible(&problem, &solution.allocation);
    assert_eq!(solution.stats.trunks, rap_dibc::utils::num_trunks(150, 4));
}
