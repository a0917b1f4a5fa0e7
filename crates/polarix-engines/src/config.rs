use crate::events::{EngineEvent, EventBus};
use chrono::NaiveDateTime;
use polarix_error::{PolarixError, polarix_err};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which optimizer runs per time slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    Genetic,
    #[default]
    Greedy,
}

impl FromStr for Algorithm {
    type Err = PolarixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "genetic" => Ok(Algorithm::Genetic),
            "greedy" => Ok(Algorithm::Greedy),
            other => Err(polarix_err!(InvalidConfig: "unknown algorithm '{}'", other)),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Genetic => write!(f, "genetic"),
            Algorithm::Greedy => write!(f, "greedy"),
        }
    }
}

/// The calendar granularity of the sliding window. `No` disables slicing and
/// aggregates the whole statement stream into a single network pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeWindow {
    #[default]
    No,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl FromStr for TimeWindow {
    type Err = PolarixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(TimeWindow::No),
            "minutes" => Ok(TimeWindow::Minutes),
            "hours" => Ok(TimeWindow::Hours),
            "days" => Ok(TimeWindow::Days),
            "weeks" => Ok(TimeWindow::Weeks),
            "months" => Ok(TimeWindow::Months),
            "years" => Ok(TimeWindow::Years),
            other => Err(polarix_err!(InvalidConfig: "unknown time window '{}'", other)),
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeWindow::No => "no",
            TimeWindow::Minutes => "minutes",
            TimeWindow::Hours => "hours",
            TimeWindow::Days => "days",
            TimeWindow::Weeks => "weeks",
            TimeWindow::Months => "months",
            TimeWindow::Years => "years",
        };
        write!(f, "{}", name)
    }
}

/// The smoothing kernel weighting statements around a window midpoint.
///
/// Slicing only distinguishes `Gaussian` (unbounded support, shared label
/// sets across slices) from the bounded kernels; the weight functions
/// themselves are evaluated by the aggregation collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kernel {
    #[default]
    Uniform,
    Triangular,
    Epanechnikov,
    Gaussian,
}

impl Kernel {
    /// The kernel weight of an observation `distance` time units away from
    /// the midpoint, with the given bandwidth (half the window size).
    pub fn weight(&self, distance: f64, bandwidth: f64) -> f64 {
        let u = if bandwidth > 0.0 {
            distance / bandwidth
        } else {
            0.0
        };

        match self {
            Kernel::Uniform => {
                if u.abs() <= 1.0 {
                    0.5
                } else {
                    0.0
                }
            }
            Kernel::Triangular => {
                if u.abs() <= 1.0 {
                    1.0 - u.abs()
                } else {
                    0.0
                }
            }
            Kernel::Epanechnikov => {
                if u.abs() <= 1.0 {
                    0.75 * (1.0 - u * u)
                } else {
                    0.0
                }
            }
            Kernel::Gaussian => (-0.5 * u * u).exp() / (2.0 * std::f64::consts::PI).sqrt(),
        }
    }
}

impl FromStr for Kernel {
    type Err = PolarixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Kernel::Uniform),
            "triangular" => Ok(Kernel::Triangular),
            "epanechnikov" => Ok(Kernel::Epanechnikov),
            "gaussian" => Ok(Kernel::Gaussian),
            other => Err(polarix_err!(InvalidConfig: "unknown kernel '{}'", other)),
        }
    }
}

impl Display for Kernel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kernel::Uniform => "uniform",
            Kernel::Triangular => "triangular",
            Kernel::Epanechnikov => "epanechnikov",
            Kernel::Gaussian => "gaussian",
        };
        write!(f, "{}", name)
    }
}

/// Everything a computation needs to know.
///
/// Out-of-range values never abort a run: `validated` replaces them with the
/// documented defaults and reports a warning through the event bus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolarizationConfig {
    /// First variable of the one-mode projection (the network's nodes).
    pub variable1: String,
    pub variable1_document: bool,
    /// Second variable, connecting nodes through shared referents.
    pub variable2: String,
    pub variable2_document: bool,
    /// Optional qualifier splitting agreement from disagreement.
    pub qualifier: Option<String>,
    pub qualifier_document: bool,
    pub algorithm: Algorithm,
    pub num_clusters: usize,
    pub num_parents: usize,
    pub num_iterations: usize,
    pub elite_pct: f64,
    pub mut_pct: f64,
    pub time_window: TimeWindow,
    pub window_size: usize,
    pub kernel: Kernel,
    pub indent_time: bool,
    pub normalize_scores: bool,
    /// Master seed; 0 draws the seed from entropy.
    pub random_seed: u64,
    pub start: Option<NaiveDateTime>,
    pub stop: Option<NaiveDateTime>,
}

impl Default for PolarizationConfig {
    fn default() -> Self {
        PolarizationConfig {
            variable1: "organization".into(),
            variable1_document: false,
            variable2: "concept".into(),
            variable2_document: false,
            qualifier: Some("agreement".into()),
            qualifier_document: false,
            algorithm: Algorithm::Greedy,
            num_clusters: 2,
            num_parents: 50,
            num_iterations: 1000,
            elite_pct: 0.1,
            mut_pct: 0.1,
            time_window: TimeWindow::No,
            window_size: 0,
            kernel: Kernel::Uniform,
            indent_time: true,
            normalize_scores: true,
            random_seed: 0,
            start: None,
            stop: None,
        }
    }
}

impl PolarizationConfig {
    /// A copy with every out-of-range parameter replaced by its default.
    /// Each replacement is reported as a warning; nothing here is fatal.
    pub fn validated(&self, bus: &EventBus) -> PolarizationConfig {
        let mut config = self.clone();

        if config.num_clusters <= 1 {
            warn(
                bus,
                format!(
                    "num_clusters must be greater than 1, got {}; using 2",
                    config.num_clusters
                ),
            );
            config.num_clusters = 2;
        }

        if config.num_parents == 0 {
            warn(bus, "num_parents must be positive; using 50".into());
            config.num_parents = 50;
        }

        if config.num_iterations == 0 {
            warn(bus, "num_iterations must be positive; using 1000".into());
            config.num_iterations = 1000;
        }

        if !(0.0..=1.0).contains(&config.elite_pct) {
            warn(
                bus,
                format!(
                    "elite_pct must lie in [0, 1], got {}; using 0.1",
                    config.elite_pct
                ),
            );
            config.elite_pct = 0.1;
        }

        if !(0.0..=1.0).contains(&config.mut_pct) {
            warn(
                bus,
                format!(
                    "mut_pct must lie in [0, 1], got {}; using 0.1",
                    config.mut_pct
                ),
            );
            config.mut_pct = 0.1;
        }

        if config.time_window == TimeWindow::No {
            if config.window_size != 0 {
                warn(
                    bus,
                    format!(
                        "window_size {} is meaningless without a time window; using 0",
                        config.window_size
                    ),
                );
                config.window_size = 0;
            }
        } else {
            if config.window_size == 0 {
                warn(
                    bus,
                    "window_size must be positive with a time window; using 10".into(),
                );
                config.window_size = 10;
            }
            if config.window_size % 2 == 1 {
                warn(
                    bus,
                    format!(
                        "window_size must be even, got {}; using {}",
                        config.window_size,
                        config.window_size + 1
                    ),
                );
                config.window_size += 1;
            }
        }

        if let (Some(start), Some(stop)) = (config.start, config.stop) {
            if start > stop {
                warn(
                    bus,
                    format!("start {} is after stop {}; clamps dropped", start, stop),
                );
                config.start = None;
                config.stop = None;
            }
        }

        config
    }
}

fn warn(bus: &EventBus, message: String) {
    tracing::warn!("{}", message);
    bus.publish(EngineEvent::Warning(message));
}
