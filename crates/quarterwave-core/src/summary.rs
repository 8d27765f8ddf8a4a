//! Summary statistics over a computed spectrum.
//!
//! All searches skip `NaN` entries left by degenerate samples. Ties resolve
//! to the lowest index, which is the shortest wavelength since samples are
//! stored in ascending order.

/// Index of the largest finite value.
pub fn argmax(values: &[f64]) -> Option<usize> {
    extremum_by(values, |candidate, best| candidate > best)
}

/// Index of the smallest finite value.
pub fn argmin(values: &[f64]) -> Option<usize> {
    extremum_by(values, |candidate, best| candidate < best)
}

fn extremum_by(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some(b) if !better(v, values[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index of the entry of `sorted` closest to `target`.
pub fn nearest_index(sorted: &[f64], target: f64) -> Option<usize> {
    if sorted.is_empty() || !target.is_finite() {
        return None;
    }
    let upper = sorted.partition_point(|&x| x < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == sorted.len() {
        return Some(sorted.len() - 1);
    }
    let lower = upper - 1;
    if (target - sorted[lower]) <= (sorted[upper] - target) {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Widest run of indices containing `center` with `values[i] >= threshold`.
///
/// Returns `None` if `values[center]` itself is below the threshold.
pub fn band_around(values: &[f64], center: usize, threshold: f64) -> Option<(usize, usize)> {
    if values.get(center).map_or(true, |&v| !(v >= threshold)) {
        return None;
    }
    let mut lo = center;
    while lo > 0 && values[lo - 1] >= threshold {
        lo -= 1;
    }
    let mut hi = center;
    while hi + 1 < values.len() && values[hi + 1] >= threshold {
        hi += 1;
    }
    Some((lo, hi))
}
