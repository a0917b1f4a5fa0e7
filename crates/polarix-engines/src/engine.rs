use crate::aggregate::{Aggregator, MatrixPair, build_pair};
use crate::config::{Algorithm, PolarizationConfig, TimeWindow};
use crate::events::{EngineEvent, EventBus, EventHandler};
use crate::genetic::GeneticDriver;
use crate::greedy::GreedyDriver;
use crate::slicing::TimeSlicer;
use chrono::NaiveDateTime;
use polarix_core::{
    Executor, PolarizationResult, PolarizationResultTimeSeries, RandomSource, StatementSource,
};
use polarix_error::PolarixResult;
use std::sync::Arc;

/// Computes polarization time series over a statement source.
///
/// The engine wires the collaborators together: the [StatementSource]
/// delivers the filtered statement stream, the [TimeSlicer] cuts it into
/// kernel windows, the [Aggregator] turns each window into a congruence and
/// a conflict network, and one optimizer run per slice produces the result
/// series.
///
/// Slices are independent, so they are solved in parallel through the
/// configured [Executor]. Reproducibility with a fixed `random_seed` is
/// preserved by drawing one seed per slice from the master generator
/// *before* dispatch; each slice task owns a generator reseeded from its
/// assigned seed, and results are collected back in slice order.
pub struct PolarizationEngine {
    source: Arc<dyn StatementSource>,
    aggregator: Arc<dyn Aggregator>,
    executor: Executor,
    bus: EventBus,
    results: Option<PolarizationResultTimeSeries>,
}

impl PolarizationEngine {
    pub fn new(source: Arc<dyn StatementSource>, aggregator: Arc<dyn Aggregator>) -> Self {
        PolarizationEngine {
            source,
            aggregator,
            executor: Executor::WorkerPool,
            bus: EventBus::new(),
            results: None,
        }
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// Registers a handler for engine events (warnings, errors, slice
    /// progress). Handlers may be called from worker threads.
    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.bus.subscribe(handler);
    }

    /// The series of the most recent [compute](Self::compute) call.
    pub fn results(&self) -> Option<&PolarizationResultTimeSeries> {
        self.results.as_ref()
    }

    pub fn compute(
        &mut self,
        config: &PolarizationConfig,
    ) -> PolarixResult<PolarizationResultTimeSeries> {
        let config = config.validated(&self.bus);
        self.bus.publish(EngineEvent::Start);

        let statements = self.source.load_and_filter()?;

        let slices = if statements.is_empty() {
            Vec::new()
        } else {
            TimeSlicer::new(self.source.as_ref(), &config).slices(&statements)?
        };

        if slices.is_empty() {
            // nothing to aggregate; a windowless request still reports one
            // degenerate entry covering the configured range
            let series = if config.time_window == TimeWindow::No {
                let start = config.start.unwrap_or_default();
                let stop = config.stop.unwrap_or(start);
                let midpoint = start + (stop - start) / 2;
                PolarizationResultTimeSeries::new(vec![PolarizationResult::degenerate(
                    start, midpoint, stop,
                )])
            } else {
                PolarizationResultTimeSeries::default()
            };

            self.bus.publish(EngineEvent::Stop(series.len()));
            self.results = Some(series.clone());
            return Ok(series);
        }

        tracing::info!(
            "computing polarization over {} slices with the {} algorithm",
            slices.len(),
            config.algorithm
        );

        // matrices are built serially; only the optimization fans out
        let pairs: Vec<(TimeStamps, PolarixResult<MatrixPair>)> = slices
            .iter()
            .map(|slice| {
                let stamps = (
                    slice.skeleton.start(),
                    slice.skeleton.midpoint(),
                    slice.skeleton.stop(),
                );
                (stamps, build_pair(self.aggregator.as_ref(), slice))
            })
            .collect();

        // per-slice seeds come off the master generator before dispatch
        let mut master = if config.random_seed != 0 {
            RandomSource::seeded(config.random_seed)
        } else {
            RandomSource::from_entropy()
        };
        let seeds: Vec<u64> = (0..pairs.len()).map(|_| master.next_u64()).collect();

        let algorithm = config.algorithm;
        let genetic = GeneticDriver::from_config(&config);
        let greedy = GreedyDriver::from_config(&config);

        let jobs: Vec<_> = pairs
            .into_iter()
            .zip(seeds)
            .enumerate()
            .map(|(index, ((stamps, pair), seed))| {
                let bus = self.bus.clone();
                let genetic = genetic.clone();
                let greedy = greedy.clone();

                move || solve_slice(index, stamps, pair, seed, algorithm, &genetic, &greedy, &bus)
            })
            .collect();

        let results = self.executor.execute_batch(jobs);
        let series = PolarizationResultTimeSeries::new(results);

        self.bus.publish(EngineEvent::Stop(series.len()));
        self.results = Some(series.clone());
        Ok(series)
    }
}

type TimeStamps = (NaiveDateTime, NaiveDateTime, NaiveDateTime);

/// One slice task. Failures never abort the series: a slice whose matrices
/// or optimization fail is reported and recorded as degenerate.
#[allow(clippy::too_many_arguments)]
fn solve_slice(
    index: usize,
    stamps: TimeStamps,
    pair: PolarixResult<MatrixPair>,
    seed: u64,
    algorithm: Algorithm,
    genetic: &GeneticDriver,
    greedy: &GreedyDriver,
    bus: &EventBus,
) -> PolarizationResult {
    bus.publish(EngineEvent::SliceStart(index));
    let (start, midpoint, stop) = stamps;

    let solved = pair.and_then(|pair| match algorithm {
        Algorithm::Genetic => genetic.solve(&pair, seed, bus),
        Algorithm::Greedy => greedy.solve(&pair, seed, bus),
    });

    let result = match solved {
        Ok(result) => result,
        Err(error) => {
            let message = format!("slice {} failed: {}", index, error);
            tracing::error!("{}", message);
            bus.publish(EngineEvent::Error(message));
            PolarizationResult::degenerate(start, midpoint, stop)
        }
    };

    bus.publish(EngineEvent::SliceComplete {
        index,
        max_q: result.max_q(),
        early_convergence: result.early_convergence(),
    });

    result
}
