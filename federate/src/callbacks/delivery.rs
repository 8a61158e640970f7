use hla_shared::{Callback, CallbackResult, FederateAmbassador};

/// Invokes the one ambassador method that matches `callback`
pub fn deliver(ambassador: &mut dyn FederateAmbassador, callback: &Callback) -> CallbackResult {
    match callback {
        // Synchronization points
        Callback::SynchronizationPointRegistrationSucceeded { label } => {
            ambassador.synchronization_point_registration_succeeded(label)
        }
        Callback::SynchronizationPointRegistrationFailed { label, reason } => {
            ambassador.synchronization_point_registration_failed(label, reason)
        }
        Callback::AnnounceSynchronizationPoint { label, tag } => {
            ambassador.announce_synchronization_point(label, tag)
        }
        Callback::FederationSynchronized { label, failed } => {
            ambassador.federation_synchronized(label, failed)
        }

        // Save
        Callback::InitiateFederateSave { label, time } => {
            ambassador.initiate_federate_save(label, *time)
        }
        Callback::FederationSaved => ambassador.federation_saved(),
        Callback::FederationNotSaved { reason } => ambassador.federation_not_saved(reason),

        // Restore
        Callback::RequestFederationRestoreSucceeded { label } => {
            ambassador.request_federation_restore_succeeded(label)
        }
        Callback::RequestFederationRestoreFailed { label } => {
            ambassador.request_federation_restore_failed(label)
        }
        Callback::FederationRestoreBegun => ambassador.federation_restore_begun(),
        Callback::InitiateFederateRestore {
            label,
            federate_name,
            federate,
        } => ambassador.initiate_federate_restore(label, federate_name, *federate),
        Callback::FederationRestored => ambassador.federation_restored(),
        Callback::FederationNotRestored { reason } => ambassador.federation_not_restored(reason),

        // Objects
        Callback::DiscoverObjectInstance {
            object,
            class,
            name,
            producer,
        } => ambassador.discover_object_instance(*object, *class, name, *producer),
        Callback::ReflectAttributeValues {
            object,
            attributes,
            tag,
            info,
        } => ambassador.reflect_attribute_values(*object, attributes, tag, info),
        Callback::ReceiveInteraction {
            class,
            parameters,
            tag,
            info,
        } => ambassador.receive_interaction(*class, parameters, tag, info),
        Callback::RemoveObjectInstance { object, tag, info } => {
            ambassador.remove_object_instance(*object, tag, info)
        }
        Callback::RequestRetraction { retraction } => ambassador.request_retraction(*retraction),
        Callback::ProvideAttributeValueUpdate {
            object,
            attributes,
            tag,
        } => ambassador.provide_attribute_value_update(*object, attributes, tag),

        // Ownership
        Callback::RequestAttributeOwnershipAssumption {
            object,
            attributes,
            tag,
        } => ambassador.request_attribute_ownership_assumption(*object, attributes, tag),
        Callback::RequestDivestitureConfirmation { object, attributes } => {
            ambassador.request_divestiture_confirmation(*object, attributes)
        }
        Callback::AttributeOwnershipAcquisitionNotification {
            object,
            attributes,
            tag,
        } => ambassador.attribute_ownership_acquisition_notification(*object, attributes, tag),
        Callback::AttributeOwnershipUnavailable { object, attributes } => {
            ambassador.attribute_ownership_unavailable(*object, attributes)
        }
        Callback::RequestAttributeOwnershipRelease {
            object,
            attributes,
            tag,
        } => ambassador.request_attribute_ownership_release(*object, attributes, tag),
        Callback::ConfirmAttributeOwnershipAcquisitionCancellation { object, attributes } => {
            ambassador.confirm_attribute_ownership_acquisition_cancellation(*object, attributes)
        }
        Callback::InformAttributeOwnership {
            object,
            attribute,
            owner,
        } => ambassador.inform_attribute_ownership(*object, *attribute, *owner),

        // Time
        Callback::TimeRegulationEnabled { time } => ambassador.time_regulation_enabled(*time),
        Callback::TimeConstrainedEnabled { time } => ambassador.time_constrained_enabled(*time),
        Callback::TimeAdvanceGrant { time } => ambassador.time_advance_grant(*time),
    }
}
