use log::{debug, error, trace};

use hla_shared::{
    Callback, FederateHandle, FederateState, LogicalTime, MessageRetractionHandle, Notification,
    ObjectInstanceHandle, OrderType, ReceiveInfo, Request, RtiError,
};

use crate::time::InboundRoute;

use super::Federate;

impl Federate {
    /// Entry point for the transport's notification thread. Updates the
    /// local tables, classifies the event and queues the matching callback;
    /// application code is never invoked from here.
    pub fn receive_notification(&self, notification: Notification) -> Result<(), RtiError> {
        if self.state.state()? == FederateState::Resigned {
            debug!("notification after resign, dropping");
            return Ok(());
        }

        match notification {
            // Synchronization points
            Notification::SynchronizationPointRegistrationSucceeded { label } => self.queue(
                Callback::SynchronizationPointRegistrationSucceeded { label },
            ),
            Notification::SynchronizationPointRegistrationFailed { label, reason } => self.queue(
                Callback::SynchronizationPointRegistrationFailed { label, reason },
            ),
            Notification::AnnounceSynchronizationPoint { label, tag } => {
                self.sync_points.announced(&label, &tag)?;
                self.queue(Callback::AnnounceSynchronizationPoint { label, tag })
            }
            Notification::FederationSynchronized { label, failed } => {
                self.sync_points.synchronized(&label)?;
                self.queue(Callback::FederationSynchronized { label, failed })
            }

            // Save
            Notification::InitiateFederateSave { label, time } => {
                self.save_coordinator().initiate_save(label, time)
            }
            Notification::FederationSaved => {
                self.save_coordinator().conclude_save(Callback::FederationSaved)
            }
            Notification::FederationNotSaved { reason } => self
                .save_coordinator()
                .conclude_save(Callback::FederationNotSaved { reason }),

            // Restore
            Notification::RequestFederationRestoreSucceeded { label } => {
                self.queue(Callback::RequestFederationRestoreSucceeded { label })
            }
            Notification::RequestFederationRestoreFailed { label } => {
                self.queue(Callback::RequestFederationRestoreFailed { label })
            }
            Notification::FederationRestoreBegun => self.save_coordinator().restore_begun(),
            Notification::InitiateFederateRestore {
                label,
                federate_name,
                federate,
            } => self.initiate_restore(label, federate_name, federate),
            Notification::FederationRestored => self
                .save_coordinator()
                .conclude_restore(Callback::FederationRestored),
            Notification::FederationNotRestored { reason } => self
                .save_coordinator()
                .conclude_restore(Callback::FederationNotRestored { reason }),

            // Objects
            Notification::DiscoverObjectInstance {
                object,
                class,
                name,
                producer,
            } => {
                if !self.objects.discover(object, class, &name, producer)? {
                    return Ok(());
                }
                self.route(OrderType::Receive, None, None, producer, |_| {
                    Callback::DiscoverObjectInstance {
                        object,
                        class,
                        name,
                        producer,
                    }
                })?;
                Ok(())
            }
            Notification::ReflectAttributeValues {
                object,
                attributes,
                tag,
                sent_order,
                time,
                retraction,
                producer,
                regions,
            } => {
                let Some(attributes) = self.objects.reflect(object, attributes, &regions)? else {
                    return Ok(());
                };
                self.route(sent_order, time, retraction, producer, |info| {
                    Callback::ReflectAttributeValues {
                        object,
                        attributes,
                        tag,
                        info,
                    }
                })?;
                Ok(())
            }
            Notification::ReceiveInteraction {
                class,
                parameters,
                tag,
                sent_order,
                time,
                retraction,
                producer,
                regions,
            } => {
                if !self.objects.receive_interaction(class, &regions)? {
                    return Ok(());
                }
                self.route(sent_order, time, retraction, producer, |info| {
                    Callback::ReceiveInteraction {
                        class,
                        parameters,
                        tag,
                        info,
                    }
                })?;
                Ok(())
            }
            Notification::RemoveObjectInstance {
                object,
                tag,
                sent_order,
                time,
                retraction,
                producer,
            } => {
                if !self.objects.check_removal(object)? {
                    return Ok(());
                }
                let route = self.route(sent_order, time, retraction, producer, |info| {
                    Callback::RemoveObjectInstance { object, tag, info }
                })?;
                // a scheduled removal keeps the instance until it is released
                if !matches!(route, InboundRoute::Schedule(_)) {
                    self.objects.removed(&[object])?;
                }
                Ok(())
            }
            Notification::RequestRetraction { retraction } => {
                if self.pipeline.retract_scheduled(retraction)? {
                    debug!("{} withdrawn before release", retraction);
                    return Ok(());
                }
                let hold = self.time.should_hold_receive_order()?;
                self.pipeline
                    .add(Callback::RequestRetraction { retraction }, hold)
            }
            Notification::ProvideAttributeValueUpdate {
                object,
                attributes,
                tag,
            } => match self.objects.provide_update(object, &attributes)? {
                Some(attributes) => self.queue(Callback::ProvideAttributeValueUpdate {
                    object,
                    attributes,
                    tag,
                }),
                None => Ok(()),
            },

            // Ownership
            Notification::RequestAttributeOwnershipAssumption {
                object,
                attributes,
                tag,
            } => self.queue_if_known(
                object,
                Callback::RequestAttributeOwnershipAssumption {
                    object,
                    attributes,
                    tag,
                },
            ),
            Notification::RequestDivestitureConfirmation { object, attributes } => self
                .queue_if_known(
                    object,
                    Callback::RequestDivestitureConfirmation { object, attributes },
                ),
            Notification::AttributeOwnershipAcquisitionNotification {
                object,
                attributes,
                tag,
            } => {
                if !self.objects.acquisition_notification(object, &attributes)? {
                    return Ok(());
                }
                self.queue(Callback::AttributeOwnershipAcquisitionNotification {
                    object,
                    attributes,
                    tag,
                })
            }
            Notification::AttributeOwnershipUnavailable { object, attributes } => {
                if !self.objects.acquisition_ended(object, &attributes)? {
                    return Ok(());
                }
                self.queue(Callback::AttributeOwnershipUnavailable { object, attributes })
            }
            Notification::RequestAttributeOwnershipRelease {
                object,
                attributes,
                tag,
            } => self.queue_if_known(
                object,
                Callback::RequestAttributeOwnershipRelease {
                    object,
                    attributes,
                    tag,
                },
            ),
            Notification::ConfirmAttributeOwnershipAcquisitionCancellation {
                object,
                attributes,
            } => {
                if !self.objects.acquisition_ended(object, &attributes)? {
                    return Ok(());
                }
                self.queue(Callback::ConfirmAttributeOwnershipAcquisitionCancellation {
                    object,
                    attributes,
                })
            }
            Notification::InformAttributeOwnership {
                object,
                attribute,
                owner,
            } => self.queue_if_known(
                object,
                Callback::InformAttributeOwnership {
                    object,
                    attribute,
                    owner,
                },
            ),

            // Time
            Notification::TimeAdvanceGrant { time } => self.grant(time),
            Notification::GaltUpdate { galt } => self.time.set_galt(galt),
        }
    }

    fn queue(&self, callback: Callback) -> Result<(), RtiError> {
        trace!("queue {}", callback.name());
        self.pipeline.add(callback, false)
    }

    fn queue_if_known(
        &self,
        object: ObjectInstanceHandle,
        callback: Callback,
    ) -> Result<(), RtiError> {
        if !self.objects.is_known(object)? {
            return Ok(());
        }
        self.queue(callback)
    }

    /// Classifies an inbound event and places its callback. The time state
    /// stays read-locked until the callback is in the pipeline, so a grant
    /// cannot slip in between the decision and the placement.
    fn route<B>(
        &self,
        sent_order: OrderType,
        time: Option<LogicalTime>,
        retraction: Option<MessageRetractionHandle>,
        producer: FederateHandle,
        build: B,
    ) -> Result<InboundRoute, RtiError>
    where
        B: FnOnce(ReceiveInfo) -> Callback,
    {
        let time_state = self.time.read()?;
        let (received_order, route) = time_state.route_inbound(sent_order, time);
        let callback = build(ReceiveInfo {
            sent_order,
            received_order,
            time,
            retraction,
            producer: Some(producer),
        });

        match route {
            InboundRoute::Deliver => {
                trace!("deliver {}", callback.name());
                self.pipeline.add(callback, false)?;
            }
            InboundRoute::Hold => {
                trace!("hold {}", callback.name());
                self.pipeline.add(callback, true)?;
            }
            InboundRoute::Schedule(release_time) => {
                trace!("schedule {} at {}", callback.name(), release_time);
                self.pipeline.schedule(release_time, callback)?;
            }
        }
        Ok(route)
    }

    /// Moves granted time, releases every scheduled callback up to it in
    /// time order, expires retraction records it passed and carries out
    /// the timestamped deletions it reached
    fn grant(&self, time: LogicalTime) -> Result<(), RtiError> {
        let granted = self.time.grant(time, |time| {
            let released = self.pipeline.release_scheduled_up_to(time)?;
            self.objects.removed(&released.removed_objects)?;
            let deleted = self.objects.apply_deletions_up_to(time)?;
            let expired = self.retraction.expire_up_to(time)?;
            debug!(
                "grant to {} released {} callbacks, deleted {} instances, expired {} retractions",
                time, released.count, deleted, expired
            );
            Ok(())
        })?;
        if granted {
            self.queue(Callback::TimeAdvanceGrant { time })?;
        }
        Ok(())
    }

    fn initiate_restore(
        &self,
        label: String,
        federate_name: String,
        federate: FederateHandle,
    ) -> Result<(), RtiError> {
        let coordinator = self.save_coordinator();
        match self.snapshot_store.read(&label, &federate_name) {
            Ok(snapshot) => {
                coordinator.apply(&label, &snapshot)?;
                self.queue(Callback::InitiateFederateRestore {
                    label,
                    federate_name,
                    federate,
                })
            }
            Err(failure) => {
                error!("snapshot '{}' could not be read: {}", label, failure);
                // the application never sees this restore; the coordinator
                // is told it cannot complete
                self.state.begin_restore(&self.pipeline)?;
                self.state.restore_initiated(&label)?;
                self.state.restore_finished()?;
                self.connection.post(Request::FederateRestoreNotComplete)
            }
        }
    }
}
