use crate::{
    AttributeHandle, AttributeOwner, AttributeSet, AttributeValues, FederateHandle,
    InteractionClassHandle, LogicalTime, MessageRetractionHandle, ObjectClassHandle,
    ObjectInstanceHandle, OrderType, ParameterValues, RegionHandle, Tag,
};

/// Asynchronous inbound message from the coordinator. Notifications are
/// classified by the runtime and turned into [`Callback`](crate::Callback)s.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    // Synchronization points
    SynchronizationPointRegistrationSucceeded {
        label: String,
    },
    SynchronizationPointRegistrationFailed {
        label: String,
        reason: String,
    },
    AnnounceSynchronizationPoint {
        label: String,
        tag: Tag,
    },
    FederationSynchronized {
        label: String,
        failed: Vec<FederateHandle>,
    },

    // Save / restore
    InitiateFederateSave {
        label: String,
        time: Option<LogicalTime>,
    },
    FederationSaved,
    FederationNotSaved {
        reason: String,
    },
    RequestFederationRestoreSucceeded {
        label: String,
    },
    RequestFederationRestoreFailed {
        label: String,
    },
    FederationRestoreBegun,
    InitiateFederateRestore {
        label: String,
        federate_name: String,
        federate: FederateHandle,
    },
    FederationRestored,
    FederationNotRestored {
        reason: String,
    },

    // Objects
    DiscoverObjectInstance {
        object: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: String,
        producer: FederateHandle,
    },
    ReflectAttributeValues {
        object: ObjectInstanceHandle,
        attributes: AttributeValues,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
        producer: FederateHandle,
        regions: Vec<RegionHandle>,
    },
    ReceiveInteraction {
        class: InteractionClassHandle,
        parameters: ParameterValues,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
        producer: FederateHandle,
        regions: Vec<RegionHandle>,
    },
    RemoveObjectInstance {
        object: ObjectInstanceHandle,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
        producer: FederateHandle,
    },
    RequestRetraction {
        retraction: MessageRetractionHandle,
    },
    ProvideAttributeValueUpdate {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },

    // Ownership
    RequestAttributeOwnershipAssumption {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    RequestDivestitureConfirmation {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    AttributeOwnershipAcquisitionNotification {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    AttributeOwnershipUnavailable {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    RequestAttributeOwnershipRelease {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    ConfirmAttributeOwnershipAcquisitionCancellation {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    InformAttributeOwnership {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
        owner: AttributeOwner,
    },

    // Time
    TimeAdvanceGrant {
        time: LogicalTime,
    },
    /// New greatest available logical time; `None` while no federate regulates
    GaltUpdate {
        galt: Option<LogicalTime>,
    },
}
