pub mod aggregate;
pub mod config;
pub mod engine;
mod events;
pub mod genetic;
pub mod greedy;
pub mod slicing;

pub use aggregate::{Aggregator, MatrixPair, NetworkRole, build_pair};
pub use config::{Algorithm, Kernel, PolarizationConfig, TimeWindow};
pub use engine::PolarizationEngine;
pub use events::{EngineEvent, EventBus, EventHandler};
pub use genetic::GeneticDriver;
pub use greedy::GreedyDriver;
pub use slicing::{TimeSlice, TimeSlicer};

pub use polarix_core::*;
pub use polarix_error::{PolarixError, PolarixResult, ensure, polarix_bail, polarix_err};

/// Installs a global tracing subscriber for hosts that do not bring their
/// own, honoring `RUST_LOG` and defaulting to info-level engine output.
/// Subsequent calls are no-ops.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("polarix=info,polarix_engines=info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    });
}
