use thiserror::Error;

/// Errors surfaced at the capture configuration boundary.
///
/// The completion path has no error channel by design: anything that would
/// go wrong there degrades to "swap buffers, skip the notification" and is
/// counted in [`CaptureDiagnostics`](super::diagnostics::CaptureDiagnostics).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Invalid channel set, depth, or width combination.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The sampling unit has no free transfer legs or completion signals.
    #[error("transfer resources exhausted: {0}")]
    ResourceExhaustion(String),

    /// Operation on an engine that has already been torn down.
    #[error("capture engine used after teardown")]
    PostTeardown,
}
