//! # HLA Shared
//! Common vocabulary shared between the hla-federate runtime and the
//! collaborators it talks to: handles, logical time, callbacks, coordinator
//! messages and the typed error taxonomy.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod ambassador;
mod callback;
mod error;
mod logical_time;
mod messages;
mod object_model;
mod region;
mod snapshot;
mod transport;
mod types;

pub use ambassador::{CallbackResult, FederateAmbassador, NullFederateAmbassador};
pub use callback::{Callback, ReceiveInfo};
pub use error::{FederateInternalError, PersistenceError, RtiError};
pub use logical_time::{LogicalTime, LogicalTimeInterval};
pub use messages::{Notification, Request, Response};
pub use object_model::ObjectModel;
pub use region::{DefaultRegion, RegionService};
pub use snapshot::{
    DeclarationSnapshot, FederateSnapshot, ObjectSnapshot, RetractionSnapshot, SnapshotStore,
    TimeSnapshot,
};
pub use transport::{
    error::TransportError, pending_response, PendingResponse, ResponseSender, Transport,
};
pub use types::{
    AdvanceKind, AttributeHandle, AttributeOwner, AttributeSet, AttributeValues, FederateHandle,
    FederateState, InteractionClassHandle, MessageRetractionHandle, ObjectClassHandle,
    ObjectInstanceHandle, OrderType, ParameterHandle, ParameterValues, RegionHandle, ResignAction,
    Tag, PRIVILEGE_TO_DELETE,
};
