use thiserror::Error;

use crate::{
    AttributeHandle, InteractionClassHandle, LogicalTime, MessageRetractionHandle,
    ObjectClassHandle, ObjectInstanceHandle, ParameterHandle, TransportError,
};

/// Failures raised by a [`SnapshotStore`](crate::SnapshotStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("No snapshot stored under label '{label}' for {federate}")]
    SnapshotNotFound { label: String, federate: String },

    #[error("Failed to write snapshot '{label}': {reason}")]
    WriteFailed { label: String, reason: String },
}

/// Returned by application callbacks to report that they could not process a
/// delivery. Logged by the delivery loop, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Federate internal error: {reason}")]
pub struct FederateInternalError {
    pub reason: String,
}

impl FederateInternalError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Typed failures of the federate request interface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtiError {
    // Membership / state machine
    /// The federate has not joined, or the join has not completed
    #[error("Federate is not an execution member")]
    FederateNotExecutionMember,

    /// The federate resigned; every further call is rejected
    #[error("Federate has resigned from the federation execution")]
    FederateResigned,

    #[error("Operation '{operation}' not allowed while a federation save is in progress")]
    SaveInProgress { operation: &'static str },

    #[error("Operation '{operation}' not allowed while a federation restore is in progress")]
    RestoreInProgress { operation: &'static str },

    #[error("Operation '{operation}' may not be called from within a callback")]
    CallNotAllowedFromWithinCallback { operation: &'static str },

    // Time management
    #[error("Invalid logical time {value}: {reason}")]
    InvalidLogicalTime { value: String, reason: &'static str },

    #[error("Invalid lookahead {value}")]
    InvalidLookahead { value: String },

    #[error("A {pending} request is already outstanding")]
    InTimeAdvancingState { pending: &'static str },

    #[error("Requested time {requested} is not after granted time {granted}")]
    LogicalTimeAlreadyPassed {
        requested: LogicalTime,
        granted: LogicalTime,
    },

    #[error("Time regulation is already enabled")]
    TimeRegulationAlreadyEnabled,

    #[error("Time regulation is not enabled")]
    TimeRegulationIsNotEnabled,

    #[error("Time constrained is already enabled")]
    TimeConstrainedAlreadyEnabled,

    #[error("Time constrained is not enabled")]
    TimeConstrainedIsNotEnabled,

    #[error("A request to enable time regulation is already pending")]
    RequestForTimeRegulationPending,

    #[error("A request to enable time constrained is already pending")]
    RequestForTimeConstrainedPending,

    #[error("Asynchronous delivery is already enabled")]
    AsynchronousDeliveryAlreadyEnabled,

    #[error("Asynchronous delivery is already disabled")]
    AsynchronousDeliveryAlreadyDisabled,

    // Retraction
    #[error("Unknown message retraction handle {handle}")]
    InvalidMessageRetractionHandle { handle: MessageRetractionHandle },

    #[error("Message {handle} can no longer be retracted")]
    MessageCanNoLongerBeRetracted { handle: MessageRetractionHandle },

    // Declarations / FDD lookups
    #[error("Object class {class} is not defined")]
    ObjectClassNotDefined { class: ObjectClassHandle },

    #[error("Object class {class} is not published")]
    ObjectClassNotPublished { class: ObjectClassHandle },

    #[error("Attribute {attribute} is not defined for {class}")]
    AttributeNotDefined {
        class: ObjectClassHandle,
        attribute: AttributeHandle,
    },

    #[error("Attribute {attribute} of {class} is not published")]
    AttributeNotPublished {
        class: ObjectClassHandle,
        attribute: AttributeHandle,
    },

    #[error("Interaction class {class} is not defined")]
    InteractionClassNotDefined { class: InteractionClassHandle },

    #[error("Interaction class {class} is not published")]
    InteractionClassNotPublished { class: InteractionClassHandle },

    #[error("Parameter {parameter} is not defined for {class}")]
    InteractionParameterNotDefined {
        class: InteractionClassHandle,
        parameter: ParameterHandle,
    },

    // Object management
    #[error("Object instance {object} is not known")]
    ObjectInstanceNotKnown { object: ObjectInstanceHandle },

    #[error("Object instance name '{name}' is already in use")]
    ObjectInstanceNameInUse { name: String },

    #[error("Privilege to delete {object} is not held")]
    DeletePrivilegeNotHeld { object: ObjectInstanceHandle },

    // Ownership management
    #[error("Attribute {attribute} of {object} is not owned")]
    AttributeNotOwned {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Attribute {attribute} of {object} is already being divested")]
    AttributeAlreadyBeingDivested {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Divestiture of attribute {attribute} of {object} was not requested")]
    AttributeDivestitureWasNotRequested {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Federate already owns attribute {attribute} of {object}")]
    FederateOwnsAttributes {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Attribute {attribute} of {object} is already being acquired")]
    AttributeAlreadyBeingAcquired {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Attribute {attribute} of {object} is already owned, too late to cancel")]
    AttributeAlreadyOwned {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Acquisition of attribute {attribute} of {object} was not requested")]
    AttributeAcquisitionWasNotRequested {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    #[error("Ownership acquisition pending on {object} of {class}")]
    OwnershipAcquisitionPending {
        class: ObjectClassHandle,
        object: ObjectInstanceHandle,
    },

    // Synchronization points
    #[error("Synchronization point '{label}' has not been announced")]
    SynchronizationPointLabelNotAnnounced { label: String },

    // Save / restore
    #[error("No federate save has been initiated")]
    SaveNotInitiated,

    #[error("Federate has not begun the save")]
    FederateHasNotBegunSave,

    #[error("No federate restore has been requested")]
    RestoreNotRequested,

    #[error("Federate save '{label}' failed: {reason}")]
    SaveFailed { label: String, reason: String },

    // Fatal internal
    /// A coordinator round-trip failed; the operation was abandoned
    #[error("Communication with the coordinator failed during {operation}")]
    CommunicationFailure {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    /// A subsystem lock was poisoned by a panicking thread
    #[error("Lock on {subsystem} is poisoned")]
    LockPoisoned { subsystem: &'static str },

    /// The coordinator answered with a response that does not fit the request
    #[error("Unexpected response to {operation}")]
    UnexpectedResponse { operation: &'static str },
}

impl RtiError {
    /// Whether this failure belongs to the fatal-internal family. Fatal
    /// failures leave the outcome of the operation unknown.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RtiError::FederateResigned
                | RtiError::CommunicationFailure { .. }
                | RtiError::LockPoisoned { .. }
                | RtiError::UnexpectedResponse { .. }
        )
    }
}
