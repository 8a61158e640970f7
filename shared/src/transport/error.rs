use thiserror::Error;

/// Errors that can occur on the link to the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response arrived within the configured budget
    #[error("No response to {operation} within {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// The coordinator link is gone, or the responder was dropped
    #[error("Connection to the coordinator was lost")]
    Disconnected,

    /// The transport refused to carry the message
    #[error("Transport rejected the message: {reason}")]
    Rejected { reason: String },
}
