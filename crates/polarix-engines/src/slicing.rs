use crate::config::{Kernel, PolarizationConfig, TimeWindow};
use chrono::{Duration, Months, NaiveDateTime};
use hashbrown::HashMap;
use polarix_core::{AttributeType, BucketArray, Matrix, Statement, StatementSource};
use polarix_error::{PolarixResult, polarix_err};
use std::collections::BTreeSet;

/// One window over the statement stream: the zeroed skeleton matrix carrying
/// the slice's node labels and timestamps, and the statements bucketed by
/// `(variable 1, variable 2, qualifier level)`.
#[derive(Clone, Debug)]
pub struct TimeSlice {
    pub skeleton: Matrix,
    pub buckets: BucketArray,
}

/// Walks a midpoint through the configured date range, one calendar unit at
/// a time, and materializes a [TimeSlice] per midpoint.
///
/// Bounded kernels see only the statements inside the half-open band
/// `[midpoint - w/2, midpoint + w/2)` and get per-slice label sets; the
/// gaussian kernel has unbounded support, so every slice shares the global
/// label sets and the full statement stream.
pub struct TimeSlicer<'a> {
    source: &'a dyn StatementSource,
    config: &'a PolarizationConfig,
}

impl<'a> TimeSlicer<'a> {
    pub fn new(source: &'a dyn StatementSource, config: &'a PolarizationConfig) -> Self {
        TimeSlicer { source, config }
    }

    /// All slices for the given chronologically sorted statements. Empty
    /// input, or an indented range that collapses, yields no slices.
    pub fn slices(&self, statements: &[Statement]) -> PolarixResult<Vec<TimeSlice>> {
        let Some((first, last)) = data_range(statements) else {
            return Ok(Vec::new());
        };

        let begin = self.config.start.map_or(first, |s| s.max(first));
        let end = self.config.stop.map_or(last, |s| s.min(last));

        if self.config.time_window == TimeWindow::No {
            return Ok(vec![self.single_slice(statements, begin, end)?]);
        }

        let unit = self.config.time_window;
        let half = (self.config.window_size / 2) as i64;

        let (mut midpoint, last_midpoint) = if self.config.indent_time {
            (step(begin, unit, half)?, step(end, unit, -half)?)
        } else {
            (begin, end)
        };

        let mut slices = Vec::new();

        if self.config.kernel == Kernel::Gaussian {
            // unbounded support: every slice shares the global labels and
            // buckets, only the midpoint stamp differs
            let labels1 = self.labels1(statements);
            let labels2 = self.labels2(statements);
            let levels = self.qualifier_levels(statements)?;
            let buckets = self.fill_buckets(statements, &labels1, &labels2, &levels);

            while midpoint <= last_midpoint {
                slices.push(TimeSlice {
                    skeleton: Matrix::zeros(labels1.clone(), begin, midpoint, end),
                    buckets: buckets.clone(),
                });
                midpoint = step(midpoint, unit, 1)?;
            }
        } else {
            while midpoint <= last_midpoint {
                let band_lo = step(midpoint, unit, -half)?.max(begin);
                let band_hi = step(midpoint, unit, half)?.min(end);
                let subset: Vec<Statement> = statements
                    .iter()
                    .filter(|s| s.time() >= band_lo && s.time() < band_hi)
                    .cloned()
                    .collect();

                let labels1 = self.labels1(&subset);
                let labels2 = self.labels2(&subset);
                let levels = self.qualifier_levels(&subset)?;
                let buckets = self.fill_buckets(&subset, &labels1, &labels2, &levels);

                slices.push(TimeSlice {
                    skeleton: Matrix::zeros(labels1, band_lo, midpoint, band_hi),
                    buckets,
                });
                midpoint = step(midpoint, unit, 1)?;
            }
        }

        Ok(slices)
    }

    /// The windowless slice: all statements, global labels, the midpoint
    /// halfway through the date range.
    pub fn single_slice(
        &self,
        statements: &[Statement],
        begin: NaiveDateTime,
        end: NaiveDateTime,
    ) -> PolarixResult<TimeSlice> {
        let labels1 = self.labels1(statements);
        let labels2 = self.labels2(statements);
        let levels = self.qualifier_levels(statements)?;
        let buckets = self.fill_buckets(statements, &labels1, &labels2, &levels);
        let midpoint = begin + (end - begin) / 2;

        Ok(TimeSlice {
            skeleton: Matrix::zeros(labels1, begin, midpoint, end),
            buckets,
        })
    }

    fn labels1(&self, statements: &[Statement]) -> Vec<String> {
        self.source.extract_labels(
            statements,
            &self.config.variable1,
            self.config.variable1_document,
        )
    }

    fn labels2(&self, statements: &[Statement]) -> Vec<String> {
        self.source.extract_labels(
            statements,
            &self.config.variable2,
            self.config.variable2_document,
        )
    }

    /// The qualifier levels of a slice. Integer qualifiers are widened to
    /// the full `[min, max]` range observed anywhere in the unfiltered data,
    /// so sparsely used levels still get buckets; boolean and text
    /// qualifiers keep their observed levels.
    fn qualifier_levels(&self, statements: &[Statement]) -> PolarixResult<Vec<String>> {
        let Some(qualifier) = self.config.qualifier.as_deref() else {
            return Ok(vec![String::new()]);
        };

        match self.source.data_type(qualifier) {
            AttributeType::Integer => {
                let range = category_values(self.source.original_statements(), qualifier);
                let observed = category_values(statements, qualifier);

                let bounds = match (range.first(), range.last()) {
                    (Some(&min), Some(&max)) => Some((min, max)),
                    _ => match (observed.first(), observed.last()) {
                        (Some(&min), Some(&max)) => Some((min, max)),
                        _ => None,
                    },
                };

                match bounds {
                    Some((min, max)) => Ok((min..=max).map(|v| v.to_string()).collect()),
                    None => Ok(Vec::new()),
                }
            }
            AttributeType::Boolean => Ok(category_values(statements, qualifier)
                .iter()
                .map(|v| v.to_string())
                .collect()),
            AttributeType::ShortText => Ok(self.source.extract_labels(
                statements,
                qualifier,
                self.config.qualifier_document,
            )),
        }
    }

    fn fill_buckets(
        &self,
        statements: &[Statement],
        labels1: &[String],
        labels2: &[String],
        levels: &[String],
    ) -> BucketArray {
        let index1 = label_index(labels1);
        let index2 = label_index(labels2);
        let index_q = label_index(levels);

        let mut buckets = BucketArray::new(labels1.len(), labels2.len(), levels.len().max(1));

        for statement in statements {
            let Some(label1) = statement.label(&self.config.variable1) else {
                continue;
            };
            let Some(label2) = statement.label(&self.config.variable2) else {
                continue;
            };
            let Some(&i1) = index1.get(label1.as_str()) else {
                continue;
            };
            let Some(&i2) = index2.get(label2.as_str()) else {
                continue;
            };

            let q = match self.config.qualifier.as_deref() {
                None => 0,
                Some(qualifier) => {
                    let Some(level) = statement.label(qualifier) else {
                        continue;
                    };
                    match index_q.get(level.as_str()) {
                        Some(&q) => q,
                        None => continue,
                    }
                }
            };

            buckets.push(i1, i2, q, statement.clone());
        }

        buckets
    }
}

fn data_range(statements: &[Statement]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    match (statements.first(), statements.last()) {
        (Some(first), Some(last)) => Some((first.time(), last.time())),
        _ => None,
    }
}

fn label_index(labels: &[String]) -> HashMap<&str, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| (label.as_str(), index))
        .collect()
}

fn category_values(statements: &[Statement], variable: &str) -> Vec<i64> {
    let distinct: BTreeSet<i64> = statements
        .iter()
        .filter_map(|s| s.category(variable))
        .collect();
    distinct.into_iter().collect()
}

/// Advances a timestamp by `amount` units of the window granularity.
/// Month and year steps use calendar arithmetic; the rest are fixed spans.
fn step(t: NaiveDateTime, unit: TimeWindow, amount: i64) -> PolarixResult<NaiveDateTime> {
    let stepped = match unit {
        TimeWindow::No => Some(t),
        TimeWindow::Minutes => t.checked_add_signed(Duration::minutes(amount)),
        TimeWindow::Hours => t.checked_add_signed(Duration::hours(amount)),
        TimeWindow::Days => t.checked_add_signed(Duration::days(amount)),
        TimeWindow::Weeks => t.checked_add_signed(Duration::weeks(amount)),
        TimeWindow::Months => add_months(t, amount),
        TimeWindow::Years => add_months(t, amount.saturating_mul(12)),
    };

    stepped.ok_or_else(
        || polarix_err!(Engine: "time arithmetic overflow stepping {} by {} {}", t, amount, unit),
    )
}

fn add_months(t: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    if months >= 0 {
        t.checked_add_months(Months::new(months as u32))
    } else {
        t.checked_sub_months(Months::new(months.unsigned_abs() as u32))
    }
}
