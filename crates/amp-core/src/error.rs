use thiserror::Error;

/// Failure reported by the platform layer. Platform error objects cannot
/// cross the host seam, so they arrive flattened to text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why an element could not be brought under management. Contained failures:
/// logged at debug level, never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The element's audio is already owned by another graph. Binding is
    /// forbidden for the rest of the page lifetime.
    #[error("source already captured: {0}")]
    SourceTaken(HostError),
    /// The shared output pipeline could not be created.
    #[error("no output pipeline: {0}")]
    NoPipeline(HostError),
    /// A downstream stage failed to build or connect after the source bind
    /// succeeded.
    #[error("stage failed: {0}")]
    StageFailed(HostError),
}
