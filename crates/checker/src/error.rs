use thiserror::Error;

/// Errors returned by [`Checker`](crate::Checker) when no verdict could be reached.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The monitored node's own block source failed.
    #[error("could not fetch latest node block: {0}")]
    NodeUnavailable(eyre::Report),
}
