use thiserror::Error;

/// Boxed error returned by fallible distance functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum SegmentIndexError {
    /// An argument was rejected before any work started.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller-supplied distance function failed or returned an unusable value.
    #[error("Distance function error: {0}")]
    DistanceFunction(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, SegmentIndexError>;
