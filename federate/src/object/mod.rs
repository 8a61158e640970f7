mod declarations;
mod object_instance;
mod object_manager;

pub use declarations::{Declarations, Subscription};
pub use object_instance::{AttributeOwnership, ObjectInstance, OwnershipUndo};
pub use object_manager::ObjectManager;
