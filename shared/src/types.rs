use std::{
    collections::{HashMap, HashSet},
    fmt,
};

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle_type!(
    /// Federate handle assigned by the coordinator on join
    FederateHandle,
    "federate"
);
handle_type!(ObjectClassHandle, "object-class");
handle_type!(AttributeHandle, "attribute");
handle_type!(InteractionClassHandle, "interaction-class");
handle_type!(ParameterHandle, "parameter");
handle_type!(
    /// Object instance handle, unique across the federation
    ObjectInstanceHandle,
    "object"
);
handle_type!(RegionHandle, "region");

/// The implicit attribute every registered object instance carries. Whoever
/// owns it may delete the instance.
pub const PRIVILEGE_TO_DELETE: AttributeHandle = AttributeHandle::new(0);

pub type Tag = Vec<u8>;
pub type AttributeSet = HashSet<AttributeHandle>;
pub type AttributeValues = HashMap<AttributeHandle, Vec<u8>>;
pub type ParameterValues = HashMap<ParameterHandle, Vec<u8>>;

/// Delivery classification of an update, interaction or deletion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderType {
    Receive,
    Timestamp,
}

/// Kind of the outstanding time-advance request, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvanceKind {
    None,
    TimeAdvanceRequest,
    TimeAdvanceRequestAvailable,
    NextEventRequest,
    NextEventRequestAvailable,
    FlushQueueRequest,
}

impl AdvanceKind {
    pub fn is_pending(&self) -> bool {
        *self != AdvanceKind::None
    }
}

/// Federate-wide lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FederateState {
    Active,
    SaveInProgress,
    RestoreInProgress,
    Resigned,
}

/// What happens to owned state when the federate resigns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResignAction {
    UnconditionallyDivestAttributes,
    DeleteObjects,
    CancelPendingOwnershipAcquisitions,
    DeleteObjectsThenDivest,
    CancelThenDeleteThenDivest,
    NoAction,
}

impl ResignAction {
    pub fn cancels_acquisitions(&self) -> bool {
        matches!(
            self,
            ResignAction::CancelPendingOwnershipAcquisitions
                | ResignAction::CancelThenDeleteThenDivest
        )
    }

    pub fn deletes_objects(&self) -> bool {
        matches!(
            self,
            ResignAction::DeleteObjects
                | ResignAction::DeleteObjectsThenDivest
                | ResignAction::CancelThenDeleteThenDivest
        )
    }

    pub fn divests_attributes(&self) -> bool {
        matches!(
            self,
            ResignAction::UnconditionallyDivestAttributes
                | ResignAction::DeleteObjectsThenDivest
                | ResignAction::CancelThenDeleteThenDivest
        )
    }
}

/// Who currently owns an attribute, as reported by the coordinator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeOwner {
    Federate(FederateHandle),
    Unowned,
    Rti,
}

/// Federate-scoped, monotonically increasing identifier of a timestamp-order
/// send that may still be withdrawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageRetractionHandle {
    federate: FederateHandle,
    serial: u64,
}

impl MessageRetractionHandle {
    pub fn new(federate: FederateHandle, serial: u64) -> Self {
        Self { federate, serial }
    }

    pub fn federate(&self) -> FederateHandle {
        self.federate
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for MessageRetractionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "retraction#{}.{}", self.federate.value(), self.serial)
    }
}
