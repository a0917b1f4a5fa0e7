use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The optimization outcome of one time slice.
///
/// The three trajectory vectors always have equal length: per iteration the
/// best quality in the population, the population mean, and the population
/// spread. `max_q` is the final best quality and `memberships` the best
/// partition observed in the final generation (empty for degenerate slices).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolarizationResult {
    max_q_history: Vec<f64>,
    avg_q_history: Vec<f64>,
    sd_q_history: Vec<f64>,
    max_q: f64,
    memberships: Vec<usize>,
    labels: Vec<String>,
    early_convergence: bool,
    start: NaiveDateTime,
    midpoint: NaiveDateTime,
    stop: NaiveDateTime,
}

impl PolarizationResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_q_history: Vec<f64>,
        avg_q_history: Vec<f64>,
        sd_q_history: Vec<f64>,
        max_q: f64,
        memberships: Vec<usize>,
        labels: Vec<String>,
        early_convergence: bool,
        start: NaiveDateTime,
        midpoint: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Self {
        PolarizationResult {
            max_q_history,
            avg_q_history,
            sd_q_history,
            max_q,
            memberships,
            labels,
            early_convergence,
            start,
            midpoint,
            stop,
        }
    }

    /// The result of a slice that cannot be optimized: an empty or too-small
    /// network, or one whose matrices could not be built.
    pub fn degenerate(start: NaiveDateTime, midpoint: NaiveDateTime, stop: NaiveDateTime) -> Self {
        PolarizationResult {
            max_q_history: vec![0.0],
            avg_q_history: vec![0.0],
            sd_q_history: vec![0.0],
            max_q: 0.0,
            memberships: Vec::new(),
            labels: Vec::new(),
            early_convergence: true,
            start,
            midpoint,
            stop,
        }
    }

    pub fn max_q_history(&self) -> &[f64] {
        &self.max_q_history
    }

    pub fn avg_q_history(&self) -> &[f64] {
        &self.avg_q_history
    }

    pub fn sd_q_history(&self) -> &[f64] {
        &self.sd_q_history
    }

    pub fn max_q(&self) -> f64 {
        self.max_q
    }

    pub fn memberships(&self) -> &[usize] {
        &self.memberships
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn early_convergence(&self) -> bool {
        self.early_convergence
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

    pub fn is_degenerate(&self) -> bool {
        self.memberships.is_empty()
    }
}

/// The chronologically ordered results of a full computation, one per slice.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolarizationResultTimeSeries {
    results: Vec<PolarizationResult>,
}

impl PolarizationResultTimeSeries {
    pub fn new(results: Vec<PolarizationResult>) -> Self {
        PolarizationResultTimeSeries { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PolarizationResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolarizationResult> {
        self.results.iter()
    }
}

impl std::ops::Index<usize> for PolarizationResultTimeSeries {
    type Output = PolarizationResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.results[index]
    }
}

impl IntoIterator for PolarizationResultTimeSeries {
    type Item = PolarizationResult;
    type IntoIter = std::vec::IntoIter<PolarizationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolarizationResultTimeSeries {
    type Item = &'a PolarizationResult;
    type IntoIter = std::slice::Iter<'a, PolarizationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shape() {
        let t = NaiveDateTime::default();
        let result = PolarizationResult::degenerate(t, t, t);

        assert_eq!(result.max_q_history(), &[0.0]);
        assert_eq!(result.avg_q_history(), &[0.0]);
        assert_eq!(result.sd_q_history(), &[0.0]);
        assert_eq!(result.max_q(), 0.0);
        assert!(result.memberships().is_empty());
        assert!(result.labels().is_empty());
        assert!(result.early_convergence());
        assert!(result.is_degenerate());
    }

    #[test]
    fn test_series_access() {
        let t = NaiveDateTime::default();
        let series = PolarizationResultTimeSeries::new(vec![
            PolarizationResult::degenerate(t, t, t),
            PolarizationResult::degenerate(t, t, t),
        ]);

        assert_eq!(series.len(), 2);
        assert!(series.get(1).is_some());
        assert!(series.get(2).is_none());
        assert_eq!(series.iter().count(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialization_round_trip() {
        let t = NaiveDateTime::default();
        let result = PolarizationResult::new(
            vec![0.1, 0.4],
            vec![0.05, 0.3],
            vec![0.2, 0.0],
            0.4,
            vec![0, 1, 0, 1],
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            false,
            t,
            t,
            t,
        );

        let json = serde_json::to_string(&result).unwrap();
        let back: PolarizationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
