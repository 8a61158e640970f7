use crate::{AttributeHandle, InteractionClassHandle, ObjectClassHandle, ParameterHandle};

/// Read-only lookups into the federation object model.
///
/// Parsing the FDD lives elsewhere; the runtime only asks whether handles
/// exist and what they are called.
pub trait ObjectModel: Send + Sync {
    fn is_object_class_defined(&self, class: ObjectClassHandle) -> bool;

    fn is_attribute_defined(&self, class: ObjectClassHandle, attribute: AttributeHandle) -> bool;

    fn is_interaction_class_defined(&self, class: InteractionClassHandle) -> bool;

    fn is_parameter_defined(
        &self,
        class: InteractionClassHandle,
        parameter: ParameterHandle,
    ) -> bool;

    fn object_class_name(&self, class: ObjectClassHandle) -> Option<String>;

    fn interaction_class_name(&self, class: InteractionClassHandle) -> Option<String>;
}
