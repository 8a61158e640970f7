use crate::{
    AttributeHandle, AttributeOwner, AttributeSet, AttributeValues, FederateHandle, InteractionClassHandle,
    LogicalTime, MessageRetractionHandle, ObjectClassHandle, ObjectInstanceHandle, OrderType,
    ParameterValues, Tag,
};

/// Ordering metadata attached to a received update, interaction or removal
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiveInfo {
    pub sent_order: OrderType,
    pub received_order: OrderType,
    pub time: Option<LogicalTime>,
    pub retraction: Option<MessageRetractionHandle>,
    pub producer: Option<FederateHandle>,
}

impl ReceiveInfo {
    pub fn receive_order(producer: Option<FederateHandle>) -> Self {
        Self {
            sent_order: OrderType::Receive,
            received_order: OrderType::Receive,
            time: None,
            retraction: None,
            producer,
        }
    }
}

/// One pending invocation of the [`FederateAmbassador`](crate::FederateAmbassador).
///
/// Each variant carries exactly what its delivery method needs. Callbacks
/// are immutable once queued.
#[derive(Clone, Debug, PartialEq)]
pub enum Callback {
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

    // Save
    InitiateFederateSave {
        label: String,
        time: Option<LogicalTime>,
    },
    FederationSaved,
    FederationNotSaved {
        reason: String,
    },

    // Restore
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
        info: ReceiveInfo,
    },
    ReceiveInteraction {
        class: InteractionClassHandle,
        parameters: ParameterValues,
        tag: Tag,
        info: ReceiveInfo,
    },
    RemoveObjectInstance {
        object: ObjectInstanceHandle,
        tag: Tag,
        info: ReceiveInfo,
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
    TimeRegulationEnabled {
        time: LogicalTime,
    },
    TimeConstrainedEnabled {
        time: LogicalTime,
    },
    TimeAdvanceGrant {
        time: LogicalTime,
    },
}

impl Callback {
    /// Save/restore callbacks keep flowing while the pipeline is holding
    pub fn is_save_restore(&self) -> bool {
        matches!(
            self,
            Callback::InitiateFederateSave { .. }
                | Callback::FederationSaved
                | Callback::FederationNotSaved { .. }
                | Callback::RequestFederationRestoreSucceeded { .. }
                | Callback::RequestFederationRestoreFailed { .. }
                | Callback::FederationRestoreBegun
                | Callback::InitiateFederateRestore { .. }
                | Callback::FederationRestored
                | Callback::FederationNotRestored { .. }
        )
    }

    /// Retraction handle of a timestamp-order delivery, if any
    pub fn retraction(&self) -> Option<MessageRetractionHandle> {
        match self {
            Callback::ReflectAttributeValues { info, .. }
            | Callback::ReceiveInteraction { info, .. }
            | Callback::RemoveObjectInstance { info, .. } => info.retraction,
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Callback::SynchronizationPointRegistrationSucceeded { .. } => {
                "synchronizationPointRegistrationSucceeded"
            }
            Callback::SynchronizationPointRegistrationFailed { .. } => {
                "synchronizationPointRegistrationFailed"
            }
            Callback::AnnounceSynchronizationPoint { .. } => "announceSynchronizationPoint",
            Callback::FederationSynchronized { .. } => "federationSynchronized",
            Callback::InitiateFederateSave { .. } => "initiateFederateSave",
            Callback::FederationSaved => "federationSaved",
            Callback::FederationNotSaved { .. } => "federationNotSaved",
            Callback::RequestFederationRestoreSucceeded { .. } => {
                "requestFederationRestoreSucceeded"
            }
            Callback::RequestFederationRestoreFailed { .. } => "requestFederationRestoreFailed",
            Callback::FederationRestoreBegun => "federationRestoreBegun",
            Callback::InitiateFederateRestore { .. } => "initiateFederateRestore",
            Callback::FederationRestored => "federationRestored",
            Callback::FederationNotRestored { .. } => "federationNotRestored",
            Callback::DiscoverObjectInstance { .. } => "discoverObjectInstance",
            Callback::ReflectAttributeValues { .. } => "reflectAttributeValues",
            Callback::ReceiveInteraction { .. } => "receiveInteraction",
            Callback::RemoveObjectInstance { .. } => "removeObjectInstance",
            Callback::RequestRetraction { .. } => "requestRetraction",
            Callback::ProvideAttributeValueUpdate { .. } => "provideAttributeValueUpdate",
            Callback::RequestAttributeOwnershipAssumption { .. } => {
                "requestAttributeOwnershipAssumption"
            }
            Callback::RequestDivestitureConfirmation { .. } => "requestDivestitureConfirmation",
            Callback::AttributeOwnershipAcquisitionNotification { .. } => {
                "attributeOwnershipAcquisitionNotification"
            }
            Callback::AttributeOwnershipUnavailable { .. } => "attributeOwnershipUnavailable",
            Callback::RequestAttributeOwnershipRelease { .. } => {
                "requestAttributeOwnershipRelease"
            }
            Callback::ConfirmAttributeOwnershipAcquisitionCancellation { .. } => {
                "confirmAttributeOwnershipAcquisitionCancellation"
            }
            Callback::InformAttributeOwnership { .. } => "informAttributeOwnership",
            Callback::TimeRegulationEnabled { .. } => "timeRegulationEnabled",
            Callback::TimeConstrainedEnabled { .. } => "timeConstrainedEnabled",
            Callback::TimeAdvanceGrant { .. } => "timeAdvanceGrant",
        }
    }
}
