#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use hashbrown::HashMap;
use polarix_core::{AttributeType, BucketArray, Matrix, Statement, StatementSource};
use polarix_engines::{Aggregator, Kernel, MatrixPair, NetworkRole};
use polarix_error::{PolarixResult, polarix_err};
use std::collections::BTreeSet;

pub fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn statement(time: NaiveDateTime, org: &str, concept: &str, agreement: i64) -> Statement {
    Statement::new(time)
        .with_entity("organization", org)
        .with_entity("concept", concept)
        .with_category("agreement", agreement)
}

/// An in-memory statement source for tests. Labels are extracted sorted and
/// unique; variable types default to short text with "agreement" boolean.
pub struct InMemorySource {
    statements: Vec<Statement>,
    types: HashMap<String, AttributeType>,
}

impl InMemorySource {
    pub fn new(mut statements: Vec<Statement>) -> Self {
        statements.sort_by_key(|s| s.time());
        let mut types = HashMap::new();
        types.insert("agreement".to_string(), AttributeType::Boolean);

        InMemorySource { statements, types }
    }

    pub fn with_type(mut self, variable: &str, data_type: AttributeType) -> Self {
        self.types.insert(variable.to_string(), data_type);
        self
    }
}

impl StatementSource for InMemorySource {
    fn load_and_filter(&self) -> PolarixResult<Vec<Statement>> {
        Ok(self.statements.clone())
    }

    fn extract_labels(
        &self,
        statements: &[Statement],
        variable: &str,
        _document_level: bool,
    ) -> Vec<String> {
        let labels: BTreeSet<String> = statements
            .iter()
            .filter_map(|s| s.label(variable))
            .collect();
        labels.into_iter().collect()
    }

    fn data_type(&self, variable: &str) -> AttributeType {
        self.types
            .get(variable)
            .copied()
            .unwrap_or(AttributeType::ShortText)
    }

    fn original_statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// A deterministic aggregator built on kernel-weighted bucket masses:
/// congruence weights pairs of nodes coding the same concept with the same
/// qualifier level, conflict weights the same concept with different levels.
/// Each statement contributes the kernel weight of its distance from the
/// window midpoint, with half the window span as bandwidth.
pub struct CoStatementAggregator {
    kernel: Kernel,
}

impl CoStatementAggregator {
    pub fn new(kernel: Kernel) -> Self {
        CoStatementAggregator { kernel }
    }

    fn mass(&self, statements: &[Statement], skeleton: &Matrix) -> f64 {
        let bandwidth = (skeleton.stop() - skeleton.start()).num_seconds() as f64 / 2.0;
        statements
            .iter()
            .map(|s| {
                let distance = (s.time() - skeleton.midpoint()).num_seconds() as f64;
                self.kernel.weight(distance, bandwidth)
            })
            .sum()
    }
}

impl Aggregator for CoStatementAggregator {
    fn build(
        &self,
        skeleton: &Matrix,
        buckets: &BucketArray,
        role: NetworkRole,
    ) -> PolarixResult<Matrix> {
        let n = skeleton.size();
        let (_, n2, nq) = buckets.dims();
        let mut matrix = skeleton.clone();

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }

                let mut weight = 0.0;
                for concept in 0..n2 {
                    for qi in 0..nq {
                        for qj in 0..nq {
                            let matches = match role {
                                NetworkRole::Congruence => qi == qj,
                                NetworkRole::Conflict => qi != qj,
                            };
                            if !matches {
                                continue;
                            }

                            let a = self.mass(buckets.get(i, concept, qi), skeleton);
                            let b = self.mass(buckets.get(j, concept, qj), skeleton);
                            weight += a.min(b);
                        }
                    }
                }

                matrix.set(i, j, weight);
            }
        }

        Ok(matrix)
    }
}

/// An aggregator that returns preset matrices whatever the buckets hold.
/// The skeleton must have as many labels as the preset values expect.
pub struct FixedAggregator {
    congruence: Vec<f64>,
    conflict: Vec<f64>,
}

impl FixedAggregator {
    pub fn new(congruence: Vec<f64>, conflict: Vec<f64>) -> Self {
        FixedAggregator {
            congruence,
            conflict,
        }
    }
}

impl Aggregator for FixedAggregator {
    fn build(
        &self,
        skeleton: &Matrix,
        _buckets: &BucketArray,
        role: NetworkRole,
    ) -> PolarixResult<Matrix> {
        let values = match role {
            NetworkRole::Congruence => self.congruence.clone(),
            NetworkRole::Conflict => self.conflict.clone(),
        };

        Ok(Matrix::from_values(
            skeleton.labels().to_vec(),
            values,
            skeleton.start(),
            skeleton.midpoint(),
            skeleton.stop(),
        ))
    }
}

/// An aggregator that always fails, for error-path tests.
pub struct FailingAggregator;

impl Aggregator for FailingAggregator {
    fn build(
        &self,
        _skeleton: &Matrix,
        _buckets: &BucketArray,
        _role: NetworkRole,
    ) -> PolarixResult<Matrix> {
        Err(polarix_err!(Engine: "aggregation backend unavailable"))
    }
}

/// A matrix pair assembled directly from raw values, for driver-level tests.
pub fn pair_from(labels: &[&str], congruence: Vec<f64>, conflict: Vec<f64>) -> MatrixPair {
    let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    let t = dt(2021, 1, 1);

    MatrixPair {
        congruence: Matrix::from_values(labels.clone(), congruence, t, t, t),
        conflict: Matrix::from_values(labels, conflict, t, t, t),
    }
}

/// Two congruent blocks: nodes (0, 1) tied with weight 2 and (2, 3) tied
/// with weight 3, no conflict anywhere.
pub fn block_congruence_pair() -> MatrixPair {
    pair_from(
        &["a", "b", "c", "d"],
        vec![
            0.0, 2.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 3.0, //
            0.0, 0.0, 3.0, 0.0,
        ],
        vec![0.0; 16],
    )
}

/// Two conflicting blocks: nodes (0, 1) clash with weight 3 and (2, 3) with
/// weight 2, no congruence anywhere.
pub fn block_conflict_pair() -> MatrixPair {
    pair_from(
        &["a", "b", "c", "d"],
        vec![0.0; 16],
        vec![
            0.0, 3.0, 0.0, 0.0, //
            3.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 2.0, //
            0.0, 0.0, 2.0, 0.0,
        ],
    )
}
