use std::time::Duration;

use smol::{
    channel,
    channel::{Receiver, Sender, TrySendError},
    future, Timer,
};

use crate::{transport::error::TransportError, Response};

/// Creates a one-shot completion pair for a single request
pub fn pending_response() -> (ResponseSender, PendingResponse) {
    let (sender, receiver) = channel::bounded(1);
    (ResponseSender { sender }, PendingResponse { receiver })
}

/// Completion side, held by the transport until the coordinator answers
pub struct ResponseSender {
    sender: Sender<Response>,
}

impl ResponseSender {
    pub fn respond(self, response: Response) -> Result<(), TransportError> {
        match self.sender.try_send(response) {
            Ok(()) => Ok(()),
            // the requester gave up waiting
            Err(TrySendError::Closed(_)) => Err(TransportError::Disconnected),
            Err(TrySendError::Full(_)) => Err(TransportError::Rejected {
                reason: "response already delivered".to_string(),
            }),
        }
    }
}

/// Waiting side, held by the requester
pub struct PendingResponse {
    receiver: Receiver<Response>,
}

impl PendingResponse {
    /// Creates a response that is already complete
    pub fn ready(response: Response) -> Self {
        let (sender, pending) = pending_response();
        // a fresh bounded(1) channel always has room
        let _ = sender.respond(response);
        pending
    }

    /// Blocks the calling thread until the response arrives, the responder
    /// is dropped, or `timeout` elapses
    pub fn wait(
        self,
        operation: &'static str,
        timeout: Duration,
    ) -> Result<Response, TransportError> {
        let receiver = self.receiver;
        smol::block_on(future::or(
            async move {
                receiver
                    .recv()
                    .await
                    .map_err(|_| TransportError::Disconnected)
            },
            async move {
                Timer::after(timeout).await;
                Err(TransportError::Timeout {
                    operation,
                    timeout_ms: timeout.as_millis() as u64,
                })
            },
        ))
    }
}
