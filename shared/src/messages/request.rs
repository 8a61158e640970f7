use std::collections::HashSet;

use crate::{
    AdvanceKind, AttributeHandle, AttributeSet, AttributeValues, FederateHandle,
    InteractionClassHandle, LogicalTime, LogicalTimeInterval, MessageRetractionHandle,
    ObjectClassHandle, ObjectInstanceHandle, OrderType, ParameterValues, RegionHandle,
    ResignAction, Tag,
};

/// Outbound message from a federate to the coordinator
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    // Membership
    JoinFederationExecution {
        federation: String,
        federate_name: String,
        federate_type: String,
    },
    ResignFederationExecution {
        action: ResignAction,
    },

    // Synchronization points
    RegisterSynchronizationPoint {
        label: String,
        tag: Tag,
        federates: Option<HashSet<FederateHandle>>,
    },
    SynchronizationPointAchieved {
        label: String,
        successfully: bool,
    },

    // Save / restore
    RequestFederationSave {
        label: String,
        time: Option<LogicalTime>,
    },
    FederateSaveBegun,
    FederateSaveComplete,
    FederateSaveNotComplete,
    RequestFederationRestore {
        label: String,
    },
    FederateRestoreComplete,
    FederateRestoreNotComplete,

    // Declarations
    PublishObjectClassAttributes {
        class: ObjectClassHandle,
        attributes: AttributeSet,
    },
    UnpublishObjectClassAttributes {
        class: ObjectClassHandle,
        attributes: AttributeSet,
    },
    SubscribeObjectClassAttributes {
        class: ObjectClassHandle,
        attributes: AttributeSet,
        regions: Vec<RegionHandle>,
    },
    UnsubscribeObjectClass {
        class: ObjectClassHandle,
    },
    PublishInteractionClass {
        class: InteractionClassHandle,
    },
    UnpublishInteractionClass {
        class: InteractionClassHandle,
    },
    SubscribeInteractionClass {
        class: InteractionClassHandle,
        regions: Vec<RegionHandle>,
    },
    UnsubscribeInteractionClass {
        class: InteractionClassHandle,
    },

    // Objects
    RegisterObjectInstance {
        class: ObjectClassHandle,
        name: Option<String>,
    },
    UpdateAttributeValues {
        object: ObjectInstanceHandle,
        attributes: AttributeValues,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
    },
    SendInteraction {
        class: InteractionClassHandle,
        parameters: ParameterValues,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
    },
    DeleteObjectInstance {
        object: ObjectInstanceHandle,
        tag: Tag,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
    },
    RequestAttributeValueUpdate {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    Retract {
        retraction: MessageRetractionHandle,
    },

    // Ownership
    UnconditionalAttributeOwnershipDivestiture {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    NegotiatedAttributeOwnershipDivestiture {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    ConfirmDivestiture {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    CancelNegotiatedAttributeOwnershipDivestiture {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    AttributeOwnershipDivestitureIfWanted {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    AttributeOwnershipAcquisition {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
        tag: Tag,
    },
    AttributeOwnershipAcquisitionIfAvailable {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    CancelAttributeOwnershipAcquisition {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    AttributeOwnershipReleaseDenied {
        object: ObjectInstanceHandle,
        attributes: AttributeSet,
    },
    QueryAttributeOwnership {
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    },

    // Time
    EnableTimeRegulation {
        lookahead: LogicalTimeInterval,
    },
    DisableTimeRegulation,
    EnableTimeConstrained,
    DisableTimeConstrained,
    ModifyLookahead {
        lookahead: LogicalTimeInterval,
    },
    TimeAdvance {
        kind: AdvanceKind,
        time: LogicalTime,
    },
}

impl Request {
    /// Name used in diagnostics and timeout errors
    pub fn operation(&self) -> &'static str {
        match self {
            Request::JoinFederationExecution { .. } => "joinFederationExecution",
            Request::ResignFederationExecution { .. } => "resignFederationExecution",
            Request::RegisterSynchronizationPoint { .. } => {
                "registerFederationSynchronizationPoint"
            }
            Request::SynchronizationPointAchieved { .. } => "synchronizationPointAchieved",
            Request::RequestFederationSave { .. } => "requestFederationSave",
            Request::FederateSaveBegun => "federateSaveBegun",
            Request::FederateSaveComplete => "federateSaveComplete",
            Request::FederateSaveNotComplete => "federateSaveNotComplete",
            Request::RequestFederationRestore { .. } => "requestFederationRestore",
            Request::FederateRestoreComplete => "federateRestoreComplete",
            Request::FederateRestoreNotComplete => "federateRestoreNotComplete",
            Request::PublishObjectClassAttributes { .. } => "publishObjectClassAttributes",
            Request::UnpublishObjectClassAttributes { .. } => "unpublishObjectClassAttributes",
            Request::SubscribeObjectClassAttributes { .. } => "subscribeObjectClassAttributes",
            Request::UnsubscribeObjectClass { .. } => "unsubscribeObjectClass",
            Request::PublishInteractionClass { .. } => "publishInteractionClass",
            Request::UnpublishInteractionClass { .. } => "unpublishInteractionClass",
            Request::SubscribeInteractionClass { .. } => "subscribeInteractionClass",
            Request::UnsubscribeInteractionClass { .. } => "unsubscribeInteractionClass",
            Request::RegisterObjectInstance { .. } => "registerObjectInstance",
            Request::UpdateAttributeValues { .. } => "updateAttributeValues",
            Request::SendInteraction { .. } => "sendInteraction",
            Request::DeleteObjectInstance { .. } => "deleteObjectInstance",
            Request::RequestAttributeValueUpdate { .. } => "requestAttributeValueUpdate",
            Request::Retract { .. } => "retract",
            Request::UnconditionalAttributeOwnershipDivestiture { .. } => {
                "unconditionalAttributeOwnershipDivestiture"
            }
            Request::NegotiatedAttributeOwnershipDivestiture { .. } => {
                "negotiatedAttributeOwnershipDivestiture"
            }
            Request::ConfirmDivestiture { .. } => "confirmDivestiture",
            Request::CancelNegotiatedAttributeOwnershipDivestiture { .. } => {
                "cancelNegotiatedAttributeOwnershipDivestiture"
            }
            Request::AttributeOwnershipDivestitureIfWanted { .. } => {
                "attributeOwnershipDivestitureIfWanted"
            }
            Request::AttributeOwnershipAcquisition { .. } => "attributeOwnershipAcquisition",
            Request::AttributeOwnershipAcquisitionIfAvailable { .. } => {
                "attributeOwnershipAcquisitionIfAvailable"
            }
            Request::CancelAttributeOwnershipAcquisition { .. } => {
                "cancelAttributeOwnershipAcquisition"
            }
            Request::AttributeOwnershipReleaseDenied { .. } => "attributeOwnershipReleaseDenied",
            Request::QueryAttributeOwnership { .. } => "queryAttributeOwnership",
            Request::EnableTimeRegulation { .. } => "enableTimeRegulation",
            Request::DisableTimeRegulation => "disableTimeRegulation",
            Request::EnableTimeConstrained => "enableTimeConstrained",
            Request::DisableTimeConstrained => "disableTimeConstrained",
            Request::ModifyLookahead { .. } => "modifyLookahead",
            Request::TimeAdvance { .. } => "timeAdvance",
        }
    }
}
