// Domain errors shared across layers
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// The device id is not present in the loaded registry.
    #[error("unknown device: {0}")]
    UnresolvedDevice(String),

    #[error("unknown zone: {0}")]
    UnknownZone(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("malformed feed: {0}")]
    Feed(String),

    #[error("report request failed: {0}")]
    Report(String),

    #[error("configuration error: {0}")]
    Config(String),
}
