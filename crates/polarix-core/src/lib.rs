pub mod buckets;
pub mod domain;
pub mod matrix;
pub mod ops;
pub mod quality;
pub mod result;
pub mod solution;
pub mod statement;

pub use buckets::BucketArray;
pub use domain::executor::Executor;
pub use domain::random_source::RandomSource;
pub use domain::thread_pool::{ThreadPool, WaitGroup};
pub use matrix::Matrix;
pub use ops::{norm1, ranks_descending};
pub use quality::absdiff;
pub use result::{PolarizationResult, PolarizationResultTimeSeries};
pub use solution::ClusterSolution;
pub use statement::{AttributeType, AttributeValue, Statement, StatementSource};
