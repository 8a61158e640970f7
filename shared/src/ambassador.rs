use crate::{
    AttributeHandle, AttributeOwner, AttributeSet, AttributeValues, FederateHandle,
    FederateInternalError, InteractionClassHandle, LogicalTime, MessageRetractionHandle,
    ObjectClassHandle, ObjectInstanceHandle, ParameterValues, ReceiveInfo,
};

pub type CallbackResult = Result<(), FederateInternalError>;

/// Application-facing callback interface.
///
/// The runtime invokes these from a single thread at a time, so
/// implementations never need to guard against re-entry. Every method
/// defaults to doing nothing; an `Err` is logged by the runtime and never
/// interrupts delivery of the following callbacks.
#[allow(unused_variables)]
pub trait FederateAmbassador: Send {
    // Synchronization points

    fn synchronization_point_registration_succeeded(&mut self, label: &str) -> CallbackResult {
        Ok(())
    }

    fn synchronization_point_registration_failed(
        &mut self,
        label: &str,
        reason: &str,
    ) -> CallbackResult {
        Ok(())
    }

    fn announce_synchronization_point(&mut self, label: &str, tag: &[u8]) -> CallbackResult {
        Ok(())
    }

    fn federation_synchronized(
        &mut self,
        label: &str,
        failed: &[FederateHandle],
    ) -> CallbackResult {
        Ok(())
    }

    // Save

    fn initiate_federate_save(
        &mut self,
        label: &str,
        time: Option<LogicalTime>,
    ) -> CallbackResult {
        Ok(())
    }

    fn federation_saved(&mut self) -> CallbackResult {
        Ok(())
    }

    fn federation_not_saved(&mut self, reason: &str) -> CallbackResult {
        Ok(())
    }

    // Restore

    fn request_federation_restore_succeeded(&mut self, label: &str) -> CallbackResult {
        Ok(())
    }

    fn request_federation_restore_failed(&mut self, label: &str) -> CallbackResult {
        Ok(())
    }

    fn federation_restore_begun(&mut self) -> CallbackResult {
        Ok(())
    }

    fn initiate_federate_restore(
        &mut self,
        label: &str,
        federate_name: &str,
        federate: FederateHandle,
    ) -> CallbackResult {
        Ok(())
    }

    fn federation_restored(&mut self) -> CallbackResult {
        Ok(())
    }

    fn federation_not_restored(&mut self, reason: &str) -> CallbackResult {
        Ok(())
    }

    // Objects

    fn discover_object_instance(
        &mut self,
        object: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
        producer: FederateHandle,
    ) -> CallbackResult {
        Ok(())
    }

    fn reflect_attribute_values(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeValues,
        tag: &[u8],
        info: &ReceiveInfo,
    ) -> CallbackResult {
        Ok(())
    }

    fn receive_interaction(
        &mut self,
        class: InteractionClassHandle,
        parameters: &ParameterValues,
        tag: &[u8],
        info: &ReceiveInfo,
    ) -> CallbackResult {
        Ok(())
    }

    fn remove_object_instance(
        &mut self,
        object: ObjectInstanceHandle,
        tag: &[u8],
        info: &ReceiveInfo,
    ) -> CallbackResult {
        Ok(())
    }

    fn request_retraction(&mut self, retraction: MessageRetractionHandle) -> CallbackResult {
        Ok(())
    }

    fn provide_attribute_value_update(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: &[u8],
    ) -> CallbackResult {
        Ok(())
    }

    // Ownership

    fn request_attribute_ownership_assumption(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: &[u8],
    ) -> CallbackResult {
        Ok(())
    }

    fn request_divestiture_confirmation(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> CallbackResult {
        Ok(())
    }

    fn attribute_ownership_acquisition_notification(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: &[u8],
    ) -> CallbackResult {
        Ok(())
    }

    fn attribute_ownership_unavailable(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> CallbackResult {
        Ok(())
    }

    fn request_attribute_ownership_release(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: &[u8],
    ) -> CallbackResult {
        Ok(())
    }

    fn confirm_attribute_ownership_acquisition_cancellation(
        &mut self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> CallbackResult {
        Ok(())
    }

    fn inform_attribute_ownership(
        &mut self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
        owner: AttributeOwner,
    ) -> CallbackResult {
        Ok(())
    }

    // Time

    fn time_regulation_enabled(&mut self, time: LogicalTime) -> CallbackResult {
        Ok(())
    }

    fn time_constrained_enabled(&mut self, time: LogicalTime) -> CallbackResult {
        Ok(())
    }

    fn time_advance_grant(&mut self, time: LogicalTime) -> CallbackResult {
        Ok(())
    }
}

/// Ambassador that ignores every callback
#[derive(Default)]
pub struct NullFederateAmbassador;

impl FederateAmbassador for NullFederateAmbassador {}
