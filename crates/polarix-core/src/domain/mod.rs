pub mod executor;
pub mod random_source;
pub mod thread_pool;

pub use executor::Executor;
pub use random_source::RandomSource;
pub use thread_pool::{ThreadPool, WaitGroup};
