//! Decision metrics over a posterior sample matrix.
//!
//! For every draw (column) the best variant is the arg-max (or arg-min when
//! `min_is_best`), ties going to the lowest index. Both metrics are pure
//! functions of the matrix and are rounded to 7 decimal places.

use crate::matrix::SampleMatrix;
use ab_math::round7;

/// Index and value of the best variant in draw `j`.
fn best_in_column(matrix: &SampleMatrix, j: usize, min_is_best: bool) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best = matrix.get(0, j);
    for i in 1..matrix.n_variants() {
        let value = matrix.get(i, j);
        let better = if min_is_best {
            value < best
        } else {
            value > best
        };
        if better {
            best_idx = i;
            best = value;
        }
    }
    (best_idx, best)
}

/// Share of draws in which each variant is the best.
pub fn probabilities_of_being_best(matrix: &SampleMatrix, min_is_best: bool) -> Vec<f64> {
    let v = matrix.n_variants();
    let s = matrix.sim_count();
    if v == 0 || s == 0 {
        return vec![0.0; v];
    }
    let mut wins = vec![0usize; v];
    for j in 0..s {
        let (idx, _) = best_in_column(matrix, j, min_is_best);
        wins[idx] += 1;
    }
    wins.into_iter()
        .map(|w| round7(w as f64 / s as f64))
        .collect()
}

/// Mean shortfall `|best − value|` of each variant across draws.
pub fn expected_loss(matrix: &SampleMatrix, min_is_best: bool) -> Vec<f64> {
    let v = matrix.n_variants();
    let s = matrix.sim_count();
    if v == 0 || s == 0 {
        return vec![0.0; v];
    }
    let mut totals = vec![0.0; v];
    for j in 0..s {
        let (_, best) = best_in_column(matrix, j, min_is_best);
        for (i, total) in totals.iter_mut().enumerate() {
            *total += best - matrix.get(i, j);
        }
    }
    totals
        .into_iter()
        .map(|t| round7((t / s as f64).abs()))
        .collect()
}
