use std::collections::{HashMap, HashSet};

use crate::{
    AttributeSet, FederateHandle, InteractionClassHandle, LogicalTime, LogicalTimeInterval,
    MessageRetractionHandle, ObjectClassHandle, ObjectInstanceHandle, PersistenceError,
    RegionHandle,
};

/// Time manager state captured at save time
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSnapshot {
    pub regulating: bool,
    pub constrained: bool,
    pub asynchronous_delivery: bool,
    pub lookahead: LogicalTimeInterval,
    pub granted: LogicalTime,
}

/// Outstanding retraction records
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RetractionSnapshot {
    pub next_serial: u64,
    pub records: Vec<(MessageRetractionHandle, LogicalTime)>,
}

/// Publication and subscription interest
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DeclarationSnapshot {
    pub published_objects: HashMap<ObjectClassHandle, AttributeSet>,
    pub subscribed_objects: HashMap<ObjectClassHandle, (AttributeSet, Vec<RegionHandle>)>,
    pub published_interactions: HashSet<InteractionClassHandle>,
    pub subscribed_interactions: HashMap<InteractionClassHandle, Vec<RegionHandle>>,
}

/// A known object instance and the attributes this federate owns on it.
/// In-flight ownership negotiations are not captured.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSnapshot {
    pub object: ObjectInstanceHandle,
    pub class: ObjectClassHandle,
    pub name: String,
    pub producer: FederateHandle,
    pub owned: AttributeSet,
}

/// Everything the runtime needs to resume from a federation save
#[derive(Clone, Debug, PartialEq)]
pub struct FederateSnapshot {
    pub federate: FederateHandle,
    pub time: TimeSnapshot,
    pub retraction: RetractionSnapshot,
    pub declarations: DeclarationSnapshot,
    pub objects: Vec<ObjectSnapshot>,
}

/// Persistence collaborator used at the save/restore boundary. The storage
/// format is the implementor's business.
pub trait SnapshotStore: Send + Sync {
    fn write(
        &self,
        label: &str,
        federate_name: &str,
        snapshot: FederateSnapshot,
    ) -> Result<(), PersistenceError>;

    fn read(&self, label: &str, federate_name: &str) -> Result<FederateSnapshot, PersistenceError>;
}
