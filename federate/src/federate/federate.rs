use std::{collections::HashSet, sync::Arc, time::Duration};

use log::info;

use hla_shared::{
    FederateAmbassador, FederateHandle, FederateState, ObjectModel, RegionService, Request,
    ResignAction, Response, RtiError, SnapshotStore, Tag, Transport,
};

use crate::{
    callbacks::{CallbackDispatcher, CallbackPipeline},
    config::FederateConfig,
    object::ObjectManager,
    retraction::RetractionRegistry,
    rti_connection::RtiConnection,
    save_restore::SaveCoordinator,
    state_machine::FederateStateMachine,
    sync_point::{SynchronizationPoint, SynchronizationPoints},
    time::TimeManager,
};

/// Number of callbacks waiting in each part of the pipeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallbackCounts {
    pub delivery: usize,
    pub held: usize,
    pub scheduled: usize,
}

/// A joined federate: the synchronous request interface used by the
/// application, plus [`Federate::receive_notification`] for the transport
/// to push coordinator notifications into.
///
/// `Federate` is `Sync`; share it behind an `Arc` between application
/// threads, the notification thread and the callback thread.
pub struct Federate {
    pub(crate) config: FederateConfig,
    pub(crate) handle: FederateHandle,
    pub(crate) connection: RtiConnection,
    pub(crate) snapshot_store: Arc<dyn SnapshotStore>,
    pub(crate) state: FederateStateMachine,
    pub(crate) time: TimeManager,
    pub(crate) pipeline: CallbackPipeline,
    pub(crate) retraction: RetractionRegistry,
    pub(crate) objects: ObjectManager,
    pub(crate) sync_points: SynchronizationPoints,
    pub(crate) dispatcher: CallbackDispatcher,
}

impl Federate {
    /// Joins the federation named in `config` and returns the ACTIVE
    /// federate
    pub fn join(
        config: FederateConfig,
        transport: Arc<dyn Transport>,
        object_model: Arc<dyn ObjectModel>,
        region_service: Arc<dyn RegionService>,
        snapshot_store: Arc<dyn SnapshotStore>,
        ambassador: Box<dyn FederateAmbassador>,
    ) -> Result<Self, RtiError> {
        let connection = RtiConnection::new(transport, config.response_timeout);
        let request = Request::JoinFederationExecution {
            federation: config.federation_name.clone(),
            federate_name: config.federate_name.clone(),
            federate_type: config.federate_type.clone(),
        };
        let handle = match connection.request(request)? {
            Response::Joined { federate } => federate,
            _ => {
                return Err(RtiError::UnexpectedResponse {
                    operation: "joinFederationExecution",
                })
            }
        };
        info!(
            "'{}' joined federation '{}' as {}",
            config.federate_name, config.federation_name, handle
        );

        Ok(Self {
            handle,
            connection,
            snapshot_store,
            state: FederateStateMachine::new(),
            time: TimeManager::new(config.asynchronous_delivery),
            pipeline: CallbackPipeline::new(config.callbacks_enabled),
            retraction: RetractionRegistry::new(handle),
            objects: ObjectManager::new(handle, object_model, region_service),
            sync_points: SynchronizationPoints::new(),
            dispatcher: CallbackDispatcher::new(ambassador),
            config,
        })
    }

    pub fn handle(&self) -> FederateHandle {
        self.handle
    }

    pub fn config(&self) -> &FederateConfig {
        &self.config
    }

    pub fn state(&self) -> Result<FederateState, RtiError> {
        self.state.state()
    }

    pub(crate) fn save_coordinator(&self) -> SaveCoordinator<'_> {
        SaveCoordinator {
            state: &self.state,
            pipeline: &self.pipeline,
            time: &self.time,
            retraction: &self.retraction,
            objects: &self.objects,
            sync_points: &self.sync_points,
        }
    }

    /// Applies `action` to the local tables, tells the coordinator and
    /// moves to RESIGNED. Every later call fails with `FederateResigned`.
    pub fn resign_federation_execution(&self, action: ResignAction) -> Result<(), RtiError> {
        self.state.resign(|| {
            self.connection
                .acknowledge(Request::ResignFederationExecution { action })?;
            self.objects.resign(action)
        })
    }

    // Synchronization points

    pub fn register_federation_synchronization_point(
        &self,
        label: &str,
        tag: Tag,
        federates: Option<HashSet<FederateHandle>>,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("registerFederationSynchronizationPoint")?;
        self.connection
            .acknowledge(Request::RegisterSynchronizationPoint {
                label: label.to_string(),
                tag,
                federates,
            })
    }

    pub fn synchronization_point_achieved(
        &self,
        label: &str,
        successfully: bool,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("synchronizationPointAchieved")?;
        self.sync_points.achieve(label, || {
            self.connection
                .acknowledge(Request::SynchronizationPointAchieved {
                    label: label.to_string(),
                    successfully,
                })
        })
    }

    pub fn synchronization_point(&self, label: &str) -> Result<Option<SynchronizationPoint>, RtiError> {
        self.state.check_joined()?;
        self.sync_points.get(label)
    }

    // Callback delivery

    /// Waits up to `wait` for a callback and delivers at most one. Returns
    /// whether more are ready.
    pub fn evoke_callback(&self, wait: Duration) -> Result<bool, RtiError> {
        self.state.check_joined()?;
        self.dispatcher.evoke_callback(&self.pipeline, wait)
    }

    pub fn evoke_multiple_callbacks(&self, min: Duration, max: Duration) -> Result<bool, RtiError> {
        self.state.check_joined()?;
        self.dispatcher
            .evoke_multiple_callbacks(&self.pipeline, min, max)
    }

    pub fn enable_callbacks(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        self.pipeline.enable()
    }

    pub fn disable_callbacks(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        self.pipeline.disable()
    }

    pub fn callback_counts(&self) -> Result<CallbackCounts, RtiError> {
        Ok(CallbackCounts {
            delivery: self.pipeline.delivery_len()?,
            held: self.pipeline.held_len()?,
            scheduled: self.pipeline.scheduled_len()?,
        })
    }
}
