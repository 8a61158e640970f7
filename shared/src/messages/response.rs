use crate::{AttributeSet, FederateHandle, LogicalTime, ObjectInstanceHandle, RtiError};

/// Coordinator answer to a [`Request`](crate::Request)
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Ack,
    Joined {
        federate: FederateHandle,
    },
    ObjectRegistered {
        object: ObjectInstanceHandle,
        name: String,
    },
    /// The federate's logical time after enabling regulation or constrained
    Time(LogicalTime),
    /// Attributes the coordinator reassigned during an if-wanted divestiture
    Attributes(AttributeSet),
    /// The coordinator refused the request with a typed failure
    Error(RtiError),
}
