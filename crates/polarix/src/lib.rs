//! Polarization time series over signed discourse networks.
//!
//! This crate re-exports the public surface of the polarix workspace: the
//! data model and optimization primitives from `polarix-core`, and the time
//! slicing, drivers and engine from `polarix-engines`.

pub use polarix_engines::*;

pub mod prelude {
    pub use polarix_core::{
        AttributeType, AttributeValue, BucketArray, ClusterSolution, Executor, Matrix,
        PolarizationResult, PolarizationResultTimeSeries, RandomSource, Statement,
        StatementSource, absdiff, norm1, ranks_descending,
    };
    pub use polarix_engines::{
        Aggregator, Algorithm, EngineEvent, EventBus, EventHandler, GeneticDriver, GreedyDriver,
        Kernel, MatrixPair, NetworkRole, PolarizationConfig, PolarizationEngine, TimeSlice,
        TimeSlicer, TimeWindow, build_pair,
    };
    pub use polarix_error::{PolarixError, PolarixResult};
}
