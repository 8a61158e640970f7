mod save_coordinator;
mod snapshot_store;

pub use save_coordinator::SaveCoordinator;
pub use snapshot_store::InMemorySnapshotStore;
