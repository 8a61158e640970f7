use log::{debug, info};

use hla_shared::{Callback, FederateHandle, FederateSnapshot, LogicalTime, RtiError};

use crate::{
    callbacks::CallbackPipeline, object::ObjectManager, retraction::RetractionRegistry,
    state_machine::FederateStateMachine, sync_point::SynchronizationPoints, time::TimeManager,
};

/// Sequences state transitions and callback holding around a federation
/// save or restore. Borrowed views of the federate's subsystems; built per
/// call.
pub struct SaveCoordinator<'a> {
    pub state: &'a FederateStateMachine,
    pub pipeline: &'a CallbackPipeline,
    pub time: &'a TimeManager,
    pub retraction: &'a RetractionRegistry,
    pub objects: &'a ObjectManager,
    pub sync_points: &'a SynchronizationPoints,
}

impl SaveCoordinator<'_> {
    // Save

    /// The pipeline starts holding before the initiation callback is
    /// queued, so the application sees no new simulation event until the
    /// save ends
    pub fn initiate_save(&self, label: String, time: Option<LogicalTime>) -> Result<(), RtiError> {
        self.state.begin_save(&label, self.pipeline)?;
        self.pipeline
            .add(Callback::InitiateFederateSave { label, time }, false)
    }

    pub fn capture(&self, federate: FederateHandle) -> Result<FederateSnapshot, RtiError> {
        let (declarations, objects) = self.objects.snapshot()?;
        Ok(FederateSnapshot {
            federate,
            time: self.time.snapshot()?,
            retraction: self.retraction.snapshot()?,
            declarations,
            objects,
        })
    }

    /// Ends the save with `outcome` (saved or not saved). Held callbacks
    /// are released unless time management would go on holding them.
    pub fn conclude_save(&self, outcome: Callback) -> Result<(), RtiError> {
        self.state.end_save()?;
        self.pipeline.add(outcome, false)?;
        self.resume_delivery()
    }

    // Restore

    pub fn restore_begun(&self) -> Result<(), RtiError> {
        self.state.begin_restore(self.pipeline)?;
        self.pipeline.add(Callback::FederationRestoreBegun, false)
    }

    /// Puts the snapshot in place of the live state and drops the scheduled
    /// and held callbacks of the abandoned timeline
    pub fn apply(&self, label: &str, snapshot: &FederateSnapshot) -> Result<(), RtiError> {
        // a restore may be initiated without a separate begun notice
        self.state.begin_restore(self.pipeline)?;
        self.state.restore_initiated(label)?;

        self.time.restore(&snapshot.time)?;
        self.pipeline.discard_timeline()?;
        self.retraction.restore(&snapshot.retraction)?;
        self.objects
            .restore(&snapshot.declarations, &snapshot.objects)?;
        self.sync_points.clear()?;
        info!(
            "restored '{}': granted {}, {} objects",
            label,
            snapshot.time.granted,
            snapshot.objects.len()
        );
        Ok(())
    }

    pub fn conclude_restore(&self, outcome: Callback) -> Result<(), RtiError> {
        self.state.end_restore()?;
        self.pipeline.add(outcome, false)?;
        self.resume_delivery()
    }

    fn resume_delivery(&self) -> Result<(), RtiError> {
        if self.time.should_hold_receive_order()? {
            debug!("time management keeps held callbacks aside");
            self.pipeline.end_holding()
        } else {
            self.pipeline.release_held().map(|_| ())
        }
    }
}
