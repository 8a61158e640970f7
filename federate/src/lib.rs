//! # HLA Federate
//! The federate-side runtime of an HLA run-time infrastructure. Joins a
//! federation through a coordinator [`Transport`](shared::Transport),
//! advances logical time, delivers callbacks in timestamp or receive order,
//! tracks attribute ownership and takes part in federation save/restore.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use hla_shared::{
        pending_response, DeclarationSnapshot, DefaultRegion, FederateAmbassador,
        FederateSnapshot, Notification, NullFederateAmbassador, ObjectModel, ObjectSnapshot,
        PendingResponse, PersistenceError, RegionService, Request, Response, ResponseSender,
        RetractionSnapshot, SnapshotStore, TimeSnapshot, Transport, TransportError,
    };
}

mod callbacks;
mod config;
mod federate;
mod object;
mod retraction;
mod rti_connection;
mod save_restore;
mod state_machine;
mod sync_point;
mod time;

pub use callbacks::{
    deliver, CallbackDispatcher, CallbackPipeline, Released, ScheduledCallback, ScheduledCallbacks,
};
pub use config::FederateConfig;
pub use federate::{CallbackCounts, Federate};
pub use hla_shared::{
    AdvanceKind, AttributeHandle, AttributeOwner, AttributeSet, AttributeValues, Callback,
    CallbackResult, FederateHandle, FederateInternalError, FederateState, InteractionClassHandle,
    LogicalTime, LogicalTimeInterval, MessageRetractionHandle, ObjectClassHandle,
    ObjectInstanceHandle, OrderType, ParameterHandle, ParameterValues, ReceiveInfo, RegionHandle,
    ResignAction, RtiError, Tag, PRIVILEGE_TO_DELETE,
};
pub use object::{
    AttributeOwnership, Declarations, ObjectInstance, ObjectManager, OwnershipUndo, Subscription,
};
pub use retraction::RetractionRegistry;
pub use save_restore::{InMemorySnapshotStore, SaveCoordinator};
pub use state_machine::{ActiveGuard, FederateStateMachine, RestoreStatus, SaveStatus};
pub use sync_point::{SynchronizationPoint, SynchronizationPointState, SynchronizationPoints};
pub use time::{InboundRoute, TimeManager, TimeState};
