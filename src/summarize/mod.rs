pub mod chunker;
pub mod estimator;
pub mod pipeline;

pub use chunker::DiffChunker;
pub use estimator::TokenEstimator;
