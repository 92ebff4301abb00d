use proptest::prelude::*;
use rap_dibc::{AllocationError, Instance, Partition, RapEngine, StructuredProblem};

/// Small instance satisfying the nesting conditions: every value a multiple
/// of `unit`, shifts non-increasing, per-variable outer bounds non-decreasing.
#[allow(clippy::too_many_arguments)]
fn build_instance(
    unit: f64,
    n: usize,
    m: usize,
    shifts: &[i32],
    gaps: &[i32],
    widths: &[i32],
    low_reach: &[i32],
    high_reach: &[i32],
    resource_pick: u32,
) -> Instance {
    let mut shifts: Vec<f64> = shifts[..n].iter().map(|&b| b as f64 * unit).collect();
    shifts.sort_by(|a, b| b.total_cmp(a));

    let mut lower_fixed = Vec::with_capacity(m - 1);
    let mut upper_fixed = Vec::with_capacity(m - 1);
    let mut cursor = 0i32;
    for j in 0..m - 1 {
        upper_fixed.push(cursor as f64 * unit);
        cursor += gaps[j];
        lower_fixed.push(cursor as f64 * unit);
        cursor += widths[j];
    }

    let mut low: Vec<i32> = low_reach[..n].to_vec();
    low.sort_unstable_by(|a, b| b.cmp(a));
    let mut high: Vec<i32> = high_reach[..n].to_vec();
    high.sort_unstable();
    let (lower_var, upper_var): (Vec<f64>, Vec<f64>) = if m == 1 {
        low.iter()
            .zip(&high)
            .map(|(&l, &h)| ((-l) as f64 * unit, h as f64 * unit))
            .unzip()
    } else {
        let top = lower_fixed[m - 2];
        (
            low.iter().map(|&l| -(l as f64) * unit).collect(),
            high.iter().map(|&h| top + h as f64 * unit).collect(),
        )
    };

    let min_sum: f64 = lower_var.iter().sum();
    let max_sum: f64 = upper_var.iter().sum();
    let span = ((max_sum - min_sum) / unit).round() as u32 + 4;
    let resource = min_sum + ((resource_pick % (span + 1)) as f64 - 2.0) * unit;

    Instance::new(resource, shifts, lower_fixed, upper_fixed, lower_var, upper_var).unwrap()
}

/// Σ clip(λ - b_i, lo_i, up_i) = R by bisection.
fn bisect_box(problem: &Instance, lower: &[f64], upper: &[f64]) -> Vec<f64> {
    let shifts = problem.shifts();
    let alloc = |lambda: f64| -> Vec<f64> {
        (0..lower.len())
            .map(|i| upper[i].min(lower[i].max(lambda - shifts[i])))
            .collect()
    };
    let mut lo = (0..lower.len()).map(|i| lower[i] + shifts[i]).fold(f64::INFINITY, f64::min) - 1.0;
    let mut hi = (0..upper.len()).map(|i| upper[i] + shifts[i]).fold(f64::NEG_INFINITY, f64::max) + 1.0;
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if alloc(mid).iter().sum::<f64>() < problem.resource() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    alloc(hi)
}

/// Minimum objective over every assignment of variables to segments.
fn brute_force(problem: &Instance) -> Option<f64> {
    let n = problem.num_vars();
    let m = problem.num_segments();
    let mut best: Option<f64> = None;
    let mut assignment = vec![0usize; n];
    loop {
        let (lower, upper): (Vec<f64>, Vec<f64>) = assignment
            .iter()
            .enumerate()
            .map(|(var, &segment)| problem.segment_bounds(segment, var))
            .unzip();
        let r = problem.resource();
        if lower.iter().sum::<f64>() <= r && r <= upper.iter().sum::<f64>() {
            let x = bisect_box(problem, &lower, &upper);
            let obj = problem.objective(&x);
            best = Some(best.map_or(obj, |b| b.min(obj)));
        }

        // Next assignment in base m.
        let mut pos = 0;
        loop {
            if pos == n {
                return best;
            }
            assignment[pos] += 1;
            if assignment[pos] < m {
                break;
            }
            assignment[pos] = 0;
            pos += 1;
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn matches_brute_force(
        n in 1usize..=6,
        m in 1usize..=3,
        shifts in prop::collection::vec(-5i32..=5, 6),
        gaps in prop::collection::vec(0i32..=4, 2),
        widths in prop::collection::vec(0i32..=4, 2),
        low_reach in prop::collection::vec(0i32..=6, 6),
        high_reach in prop::collection::vec(0i32..=6, 6),
        resource_pick in any::<u32>(),
    ) {
        let problem = build_instance(1.0, n, m, &shifts, &gaps, &widths, &low_reach, &high_reach, resource_pick);
        let expected = brute_force(&problem);
        match (RapEngine::new(problem.clone()).run(), expected) {
            (Ok(solution), Some(best)) => {
                let x = &solution.allocation;
                prop_assert_eq!(x.len(), n);
                prop_assert!(close(x.iter().sum::<f64>(), problem.resource()));
                for (var, &value) in x.iter().enumerate() {
                    prop_assert!(problem.contains(var, value), "x_{} = {} outside its intervals", var, value);
                }
                let obj = problem.objective(x);
                prop_assert!(close(obj, best), "engine {} vs brute force {}", obj, best);
                prop_assert!(close(obj, solution.objective));
            }
            (Err(AllocationError::Infeasible), None) => {}
            (got, expected) => {
                prop_assert!(false, "engine {:?} vs brute force {:?}", got, expected);
            }
        }
    }

    #[test]
    fn reruns_are_bit_identical(
        n in 1usize..=6,
        m in 1usize..=3,
        shifts in prop::collection::vec(-5i32..=5, 6),
        gaps in prop::collection::vec(0i32..=4, 2),
        widths in prop::collection::vec(0i32..=4, 2),
        low_reach in prop::collection::vec(0i32..=6, 6),
        high_reach in prop::collection::vec(0i32..=6, 6),
        resource_pick in any::<u32>(),
    ) {
        let problem = build_instance(1.0, n, m, &shifts, &gaps, &widths, &low_reach, &high_reach, resource_pick);
        let engine = RapEngine::new(problem);
        let first = engine.run();
        let second = engine.run();
        let bits = |r: &Result<rap_dibc::Solution, AllocationError>| {
            r.as_ref().ok().map(|s| s.allocation.iter().map(|x| x.to_bits()).collect::<Vec<_>>())
        };
        prop_assert_eq!(bits(&first), bits(&second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn boundary_resources_with_inexact_data(
        n in 1usize..=6,
        m in 1usize..=3,
        shifts in prop::collection::vec(-5i32..=5, 6),
        gaps in prop::collection::vec(0i32..=4, 2),
        widths in prop::collection::vec(0i32..=4, 2),
        low_reach in prop::collection::vec(0i32..=6, 6),
        high_reach in prop::collection::vec(0i32..=6, 6),
        end_picks in prop::collection::vec(0usize..=6, 2),
        at_upper in any::<bool>(),
    ) {
        // Tenths are not representable, so running sums round.
        let base = build_instance(0.1, n, m, &shifts, &gaps, &widths, &low_reach, &high_reach, 0);
        let mut ends: Vec<usize> = end_picks[..m - 1].iter().map(|&e| e.min(n)).collect();
        ends.sort_unstable();
        let partition = Partition::from_ends(ends);
        let resource: f64 = (0..n)
            .map(|var| {
                let (lower, upper) = base.segment_bounds(partition.segment_of(var), var);
                if at_upper { upper } else { lower }
            })
            .sum();
        let problem = base.with_resource(resource);

        let solution = RapEngine::new(problem.clone()).run();
        prop_assert!(solution.is_ok(), "R = {} on {:?}: {:?}", resource, partition.ends(), solution);
        let x = solution.unwrap().allocation;
        let scale = 1.0 + x.iter().map(|v| v.abs()).sum::<f64>();
        prop_assert!((x.iter().sum::<f64>() - resource).abs() <= 1e-9 * scale);
        for (var, &value) in x.iter().enumerate() {
            prop_assert!(problem.contains(var, value), "x_{} = {} outside its intervals", var, value);
        }
        let best = brute_force(&problem);
        prop_assert!(best.is_some());
        if let Some(best) = best {
            let obj = problem.objective(&x);
            prop_assert!(obj <= best + 1e-6 * (1.0 + best.abs()), "engine {} vs brute force {}", obj, best);
        }
    }
}
