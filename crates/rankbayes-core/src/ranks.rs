//! Ranking utilities.
//!
//! Ranks are 1-based and ties receive the average of the positions they
//! span, so `[10, 20, 20, 30]` ranks as `[1, 2.5, 2.5, 4]`. Everything the
//! samplers and classical tests see of the data passes through here.

use core::cmp::Ordering;

/// Indices of `values` in ascending order (stable for ties).
fn argsort(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    order
}

/// Average ranks of `values`.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let order = argsort(values);
    let mut ranks = vec![0.0; n];

    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end (0-based) share rank mean(start+1 ..= end)
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }

    ranks
}

/// Sizes of the tie groups in `values` (groups of size 1 included).
pub fn tie_counts(values: &[f64]) -> Vec<usize> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut counts = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        counts.push(j - i);
        i = j;
    }
    counts
}

/// Whether any value occurs more than once.
pub fn has_ties(values: &[f64]) -> bool {
    tie_counts(values).iter().any(|&t| t > 1)
}

/// Sign of each value as -1, 0 or +1.
pub fn signs(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Signed ranks: `sign(d) * rank(|d|)`.
pub fn signed_ranks(differences: &[f64]) -> Vec<f64> {
    let abs: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    average_ranks(&abs)
        .into_iter()
        .zip(signs(differences))
        .map(|(r, s)| r * s)
        .collect()
}
