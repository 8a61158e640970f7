use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{info, warn};

use hla_shared::{
    FederateHandle, LogicalTime, Notification, ObjectInstanceHandle, Response, RtiError,
};

use super::{
    state::{Member, ObjectRecord, RtiState},
    time::MemberTime,
};

/// Federation-side state captured when every member saved successfully
#[derive(Clone)]
struct SavedFederation {
    members: BTreeMap<FederateHandle, Member>,
    objects: BTreeMap<ObjectInstanceHandle, ObjectRecord>,
    next_object: u32,
}

struct Round {
    label: String,
    awaiting: BTreeSet<FederateHandle>,
    failed: Vec<FederateHandle>,
}

impl Round {
    fn new(label: String, awaiting: BTreeSet<FederateHandle>) -> Self {
        Self {
            label,
            awaiting,
            failed: Vec::new(),
        }
    }

    /// Records one member's outcome; returns true once everyone reported
    fn report(&mut self, federate: FederateHandle, success: bool) -> bool {
        self.awaiting.remove(&federate);
        if !success {
            self.failed.push(federate);
        }
        self.awaiting.is_empty()
    }
}

#[derive(Default)]
pub(crate) struct Persistence {
    save: Option<Round>,
    restore: Option<Round>,
    saved: HashMap<String, SavedFederation>,
}

impl Persistence {
    pub fn saved_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.saved.keys().cloned().collect();
        labels.sort();
        labels
    }
}

impl RtiState {
    fn broadcast(&mut self, notification: Notification) {
        let members: Vec<FederateHandle> = self.members.keys().copied().collect();
        for member in members {
            self.notify(member, notification.clone());
        }
    }

    pub(crate) fn request_save(
        &mut self,
        label: String,
        time: Option<LogicalTime>,
    ) -> Result<Response, RtiError> {
        if self.persistence.save.is_some() || self.persistence.restore.is_some() {
            return Err(RtiError::SaveInProgress {
                operation: "requestFederationSave",
            });
        }
        info!("federation save '{}' initiated", label);
        let awaiting = self.members.keys().copied().collect();
        self.persistence.save = Some(Round::new(label.clone(), awaiting));
        self.broadcast(Notification::InitiateFederateSave { label, time });
        Ok(Response::Ack)
    }

    pub(crate) fn save_reported(
        &mut self,
        federate: FederateHandle,
        success: bool,
    ) -> Result<Response, RtiError> {
        let round = self
            .persistence
            .save
            .as_mut()
            .ok_or(RtiError::SaveNotInitiated)?;
        if !round.report(federate, success) {
            return Ok(Response::Ack);
        }

        let Some(round) = self.persistence.save.take() else {
            return Ok(Response::Ack);
        };
        if round.failed.is_empty() {
            let saved = SavedFederation {
                members: self.members.clone(),
                objects: self.objects.clone(),
                next_object: self.next_object,
            };
            self.persistence.saved.insert(round.label.clone(), saved);
            info!("federation saved as '{}'", round.label);
            self.broadcast(Notification::FederationSaved);
        } else {
            warn!("federation save '{}' failed on {:?}", round.label, round.failed);
            self.broadcast(Notification::FederationNotSaved {
                reason: format!("{} federate(s) could not save", round.failed.len()),
            });
        }
        Ok(Response::Ack)
    }

    pub(crate) fn request_restore(
        &mut self,
        federate: FederateHandle,
        label: String,
    ) -> Result<Response, RtiError> {
        if self.persistence.save.is_some() || self.persistence.restore.is_some() {
            return Err(RtiError::RestoreInProgress {
                operation: "requestFederationRestore",
            });
        }
        if !self.persistence.saved.contains_key(&label) {
            self.notify(federate, Notification::RequestFederationRestoreFailed { label });
            return Ok(Response::Ack);
        }

        info!("federation restore '{}' initiated", label);
        self.notify(
            federate,
            Notification::RequestFederationRestoreSucceeded {
                label: label.clone(),
            },
        );
        self.broadcast(Notification::FederationRestoreBegun);
        let members: Vec<(FederateHandle, String)> = self
            .members
            .iter()
            .map(|(handle, member)| (*handle, member.name.clone()))
            .collect();
        for (handle, name) in &members {
            self.notify(
                *handle,
                Notification::InitiateFederateRestore {
                    label: label.clone(),
                    federate_name: name.clone(),
                    federate: *handle,
                },
            );
        }
        let awaiting = members.into_iter().map(|(handle, _)| handle).collect();
        self.persistence.restore = Some(Round::new(label, awaiting));
        Ok(Response::Ack)
    }

    pub(crate) fn restore_reported(
        &mut self,
        federate: FederateHandle,
        success: bool,
    ) -> Result<Response, RtiError> {
        let round = self
            .persistence
            .restore
            .as_mut()
            .ok_or(RtiError::RestoreNotRequested)?;
        if !round.report(federate, success) {
            return Ok(Response::Ack);
        }

        let Some(round) = self.persistence.restore.take() else {
            return Ok(Response::Ack);
        };
        if !round.failed.is_empty() {
            warn!("federation restore '{}' failed on {:?}", round.label, round.failed);
            self.broadcast(Notification::FederationNotRestored {
                reason: format!("{} federate(s) could not restore", round.failed.len()),
            });
            return Ok(Response::Ack);
        }

        if let Some(saved) = self.persistence.saved.get(&round.label).cloned() {
            self.apply_saved(saved);
        }
        info!("federation restored from '{}'", round.label);
        self.broadcast(Notification::FederationRestored);
        Ok(Response::Ack)
    }

    /// Rolls the federation tables back to a save. Members that joined
    /// after the save keep their current state.
    fn apply_saved(&mut self, saved: SavedFederation) {
        for (handle, member) in self.members.iter_mut() {
            if let Some(restored) = saved.members.get(handle) {
                member.interest = restored.interest.clone();
                member.time = MemberTime {
                    pending: None,
                    inbound: Vec::new(),
                    last_galt: None,
                    ..restored.time.clone()
                };
            }
        }
        self.objects = saved.objects;
        self.next_object = saved.next_object;
        self.retraction_recipients.clear();
        self.pending_deletions.clear();
    }
}
