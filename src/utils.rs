//! Assorted numeric helpers.

/// Number of trunks the enumerator yields for `n` variables and `m` segments.
///
/// A trunk is a non-decreasing choice of `m - 2` boundaries from `0..=n`, so
/// the count is the multiset coefficient `C(n + m - 2, m - 2)`. With fewer
/// than two segments there is nothing to enumerate and the count is one.
/// Saturates at `usize::MAX`.
pub fn num_trunks(num_vars: usize, num_segments: usize) -> usize {
    if num_segments < 2 {
        return 1;
    }
    let k = num_segments - 2;
    binomial(num_vars + k, k)
}

/// Binomial coefficient `C(n, k)`, saturating on overflow.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = match acc.checked_mul((n - i) as u128) {
            Some(v) => v / (i + 1) as u128,
            None => return usize::MAX,
        };
        if acc > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    acc as usize
}

/// Clamp `value` into `[lower, upper]`.
///
/// Unlike [`f64::clamp`] this does not panic when the bounds are inverted;
/// `upper` wins.
#[inline]
pub fn clip(value: f64, lower: f64, upper: f64) -> f64 {
    upper.min(lower.max(value))
}
