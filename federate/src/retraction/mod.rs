mod retraction_registry;

pub use retraction_registry::RetractionRegistry;
