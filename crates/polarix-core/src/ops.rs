use crate::matrix::Matrix;
use polarix_error::{PolarixResult, polarix_bail};
use std::cmp::Ordering;

/// Entrywise 1-norm: the sum of the absolute values of all cells.
pub fn norm1(matrix: &Matrix) -> PolarixResult<f64> {
    if !matrix.is_well_formed() {
        polarix_bail!(
            InvalidInput: "matrix value buffer holds {} cells but {} labels require {}",
            matrix.values().len(),
            matrix.size(),
            matrix.size() * matrix.size(),
        );
    }

    Ok(matrix.values().iter().map(|v| v.abs()).sum())
}

/// Descending ranks: `r[i]` is the rank of `values[i]` with 0 for the
/// largest value. Ties go to the lower original index.
pub fn ranks_descending(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut ranks = vec![0; values.len()];
    for (rank, &index) in order.iter().enumerate() {
        ranks[index] = rank;
    }

    ranks
}
