use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense square matrix over one set of node labels, stamped with the time
/// window it was aggregated from.
///
/// Rows and columns share the same labels (the networks here are one-mode),
/// and values are stored row-major. The diagonal is zeroed by the matrix
/// builder before a matrix reaches an optimizer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    labels: Vec<String>,
    values: Vec<f64>,
    start: NaiveDateTime,
    midpoint: NaiveDateTime,
    stop: NaiveDateTime,
}

impl Matrix {
    pub fn zeros(
        labels: Vec<String>,
        start: NaiveDateTime,
        midpoint: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Self {
        let n = labels.len();
        Matrix {
            labels,
            values: vec![0.0; n * n],
            start,
            midpoint,
            stop,
        }
    }

    pub fn from_values(
        labels: Vec<String>,
        values: Vec<f64>,
        start: NaiveDateTime,
        midpoint: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Self {
        Matrix {
            labels,
            values,
            start,
            midpoint,
            stop,
        }
    }

    /// The dimension of the matrix (number of labels).
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.labels.len() + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.labels.len() + col] = value;
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn midpoint(&self) -> NaiveDateTime {
        self.midpoint
    }

    pub fn stop(&self) -> NaiveDateTime {
        self.stop
    }

    pub fn zero_diagonal(&mut self) {
        for i in 0..self.labels.len() {
            self.set(i, i, 0.0);
        }
    }

    /// Whether the value buffer matches the label count. A matrix that fails
    /// this check is treated as unset by the matrix operations.
    pub fn is_well_formed(&self) -> bool {
        self.values.len() == self.labels.len() * self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_zeros_shape() {
        let m = Matrix::zeros(vec!["a".into(), "b".into(), "c".into()], t(), t(), t());
        assert_eq!(m.size(), 3);
        assert_eq!(m.values().len(), 9);
        assert!(m.is_well_formed());
        assert!(m.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_get_set() {
        let mut m = Matrix::zeros(vec!["a".into(), "b".into()], t(), t(), t());
        m.set(0, 1, 2.5);
        m.set(1, 0, -2.5);
        assert_eq!(m.get(0, 1), 2.5);
        assert_eq!(m.get(1, 0), -2.5);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_zero_diagonal() {
        let labels = vec!["a".into(), "b".into()];
        let mut m = Matrix::from_values(labels, vec![1.0, 2.0, 3.0, 4.0], t(), t(), t());
        m.zero_diagonal();
        assert_eq!(m.values(), &[0.0, 2.0, 3.0, 0.0]);
    }
}
