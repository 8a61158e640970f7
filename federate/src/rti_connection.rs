use std::{sync::Arc, time::Duration};

use log::trace;

use hla_shared::{Request, Response, RtiError, Transport};

/// Request/response wrapper around the [`Transport`] collaborator that
/// enforces the configured round-trip budget
pub(crate) struct RtiConnection {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl RtiConnection {
    pub(crate) fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Sends `request` and blocks until the coordinator answers. A typed
    /// refusal from the coordinator is returned as that failure.
    pub(crate) fn request(&self, request: Request) -> Result<Response, RtiError> {
        let operation = request.operation();
        trace!("-> {}", operation);

        let pending = self
            .transport
            .send(request)
            .map_err(|source| RtiError::CommunicationFailure { operation, source })?;

        match pending.wait(operation, self.timeout) {
            Ok(Response::Error(error)) => Err(error),
            Ok(response) => Ok(response),
            Err(source) => Err(RtiError::CommunicationFailure { operation, source }),
        }
    }

    /// Round-trip whose only valid answer is an acknowledgement
    pub(crate) fn acknowledge(&self, request: Request) -> Result<(), RtiError> {
        let operation = request.operation();
        match self.request(request)? {
            Response::Ack => Ok(()),
            _ => Err(RtiError::UnexpectedResponse { operation }),
        }
    }

    /// One-way notice; no confirmation is awaited
    pub(crate) fn post(&self, request: Request) -> Result<(), RtiError> {
        let operation = request.operation();
        trace!("-> {} (one-way)", operation);

        self.transport
            .send(request)
            .map(|_| ())
            .map_err(|source| RtiError::CommunicationFailure { operation, source })
    }
}
