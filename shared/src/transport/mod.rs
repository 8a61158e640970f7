pub mod error;
mod response_channel;

pub use response_channel::{pending_response, PendingResponse, ResponseSender};

use crate::Request;
use error::TransportError;

/// Link to the coordinator.
///
/// Implementations hand the request to the wire and return a
/// [`PendingResponse`] that completes once the coordinator answers.
/// Inbound notifications travel the other way, through
/// `Federate::receive_notification`.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> Result<PendingResponse, TransportError>;
}
