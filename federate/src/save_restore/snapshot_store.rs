use std::{collections::HashMap, sync::Mutex};

use hla_shared::{FederateSnapshot, PersistenceError, SnapshotStore};

/// [`SnapshotStore`] that keeps snapshots in process memory, keyed by save
/// label and federate name
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<(String, String), FederateSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &str, federate_name: &str) -> bool {
        match self.snapshots.lock() {
            Ok(snapshots) => {
                snapshots.contains_key(&(label.to_string(), federate_name.to_string()))
            }
            Err(_) => false,
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn write(
        &self,
        label: &str,
        federate_name: &str,
        snapshot: FederateSnapshot,
    ) -> Result<(), PersistenceError> {
        let mut snapshots = self
            .snapshots
            .lock()
            .map_err(|_| PersistenceError::WriteFailed {
                label: label.to_string(),
                reason: "snapshot store lock poisoned".to_string(),
            })?;
        snapshots.insert((label.to_string(), federate_name.to_string()), snapshot);
        Ok(())
    }

    fn read(&self, label: &str, federate_name: &str) -> Result<FederateSnapshot, PersistenceError> {
        let not_found = || PersistenceError::SnapshotNotFound {
            label: label.to_string(),
            federate: federate_name.to_string(),
        };
        let snapshots = self.snapshots.lock().map_err(|_| not_found())?;
        snapshots
            .get(&(label.to_string(), federate_name.to_string()))
            .cloned()
            .ok_or_else(not_found)
    }
}
