use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{info, warn};

use hla_shared::{FederateState, RtiError};

use crate::callbacks::CallbackPipeline;

/// Progress of the local part of a federation save
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Initiated { label: String },
    Begun { label: String },
    Completed { label: String },
}

/// Progress of the local part of a federation restore
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreStatus {
    Idle,
    Begun,
    Initiated { label: String },
    Completed { label: String },
}

struct StateData {
    state: FederateState,
    save: SaveStatus,
    restore: RestoreStatus,
}

/// Shared-lock proof that the federate was ACTIVE when the guard was taken.
/// State transitions wait until every guard is dropped.
pub struct ActiveGuard<'a> {
    _guard: RwLockReadGuard<'a, StateData>,
}

/// Federate-wide lifecycle gate.
///
/// Ordinary operations hold the shared side of the lock for their whole
/// critical section; save, restore and resign transitions take the
/// exclusive side.
pub struct FederateStateMachine {
    data: RwLock<StateData>,
}

impl FederateStateMachine {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StateData {
                state: FederateState::Active,
                save: SaveStatus::Idle,
                restore: RestoreStatus::Idle,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StateData>, RtiError> {
        self.data.read().map_err(|_| RtiError::LockPoisoned {
            subsystem: "federate state",
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StateData>, RtiError> {
        self.data.write().map_err(|_| RtiError::LockPoisoned {
            subsystem: "federate state",
        })
    }

    pub fn state(&self) -> Result<FederateState, RtiError> {
        Ok(self.read()?.state)
    }

    pub fn save_status(&self) -> Result<SaveStatus, RtiError> {
        Ok(self.read()?.save.clone())
    }

    pub fn restore_status(&self) -> Result<RestoreStatus, RtiError> {
        Ok(self.read()?.restore.clone())
    }

    /// Fails unless the federate is ACTIVE. The returned guard keeps state
    /// transitions out until it is dropped.
    pub fn check_active(&self, operation: &'static str) -> Result<ActiveGuard<'_>, RtiError> {
        let guard = self.read()?;
        match guard.state {
            FederateState::Active => Ok(ActiveGuard { _guard: guard }),
            FederateState::SaveInProgress => Err(RtiError::SaveInProgress { operation }),
            FederateState::RestoreInProgress => Err(RtiError::RestoreInProgress { operation }),
            FederateState::Resigned => Err(RtiError::FederateResigned),
        }
    }

    /// Fails only once the federate has resigned. Used by operations that
    /// stay legal during save and restore.
    pub fn check_joined(&self) -> Result<(), RtiError> {
        if self.read()?.state == FederateState::Resigned {
            return Err(RtiError::FederateResigned);
        }
        Ok(())
    }

    // Save

    /// ACTIVE → SAVE_IN_PROGRESS. The pipeline switches to holding inside
    /// the same exclusive section, so no simulation callback queued after
    /// this point reaches the application before the save ends.
    pub fn begin_save(&self, label: &str, pipeline: &CallbackPipeline) -> Result<(), RtiError> {
        let mut data = self.write()?;
        match data.state {
            FederateState::Active => {}
            FederateState::Resigned => return Err(RtiError::FederateResigned),
            other => {
                warn!("save '{}' initiated while federate is {:?}, ignoring", label, other);
                return Ok(());
            }
        }

        pipeline.hold_callbacks()?;
        data.state = FederateState::SaveInProgress;
        data.save = SaveStatus::Initiated {
            label: label.to_string(),
        };
        info!("federate save '{}' initiated", label);
        Ok(())
    }

    pub fn save_begun(&self) -> Result<String, RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::SaveInProgress {
            return Err(RtiError::SaveNotInitiated);
        }
        match data.save.clone() {
            SaveStatus::Initiated { label } => {
                data.save = SaveStatus::Begun {
                    label: label.clone(),
                };
                Ok(label)
            }
            SaveStatus::Begun { label } => Ok(label),
            SaveStatus::Idle | SaveStatus::Completed { .. } => Err(RtiError::SaveNotInitiated),
        }
    }

    /// Begun → Completed, for both the complete and the not-complete report
    pub fn save_finished(&self) -> Result<String, RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::SaveInProgress {
            return Err(RtiError::SaveNotInitiated);
        }
        match data.save.clone() {
            SaveStatus::Begun { label } => {
                data.save = SaveStatus::Completed {
                    label: label.clone(),
                };
                Ok(label)
            }
            SaveStatus::Initiated { .. } => Err(RtiError::FederateHasNotBegunSave),
            SaveStatus::Idle | SaveStatus::Completed { .. } => Err(RtiError::SaveNotInitiated),
        }
    }

    /// Rolls a failed complete report back so it may be retried
    pub fn save_unfinished(&self, label: &str) -> Result<(), RtiError> {
        let mut data = self.write()?;
        if data.state == FederateState::SaveInProgress {
            data.save = SaveStatus::Begun {
                label: label.to_string(),
            };
        }
        Ok(())
    }

    /// SAVE_IN_PROGRESS → ACTIVE. Held callbacks stay held; the caller
    /// decides when to release them.
    pub fn end_save(&self) -> Result<(), RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::SaveInProgress {
            warn!("save ended while federate is {:?}", data.state);
            return Ok(());
        }
        data.state = FederateState::Active;
        data.save = SaveStatus::Idle;
        info!("federate save ended");
        Ok(())
    }

    // Restore

    /// ACTIVE → RESTORE_IN_PROGRESS, holding callbacks like `begin_save`
    pub fn begin_restore(&self, pipeline: &CallbackPipeline) -> Result<(), RtiError> {
        let mut data = self.write()?;
        match data.state {
            FederateState::Active => {}
            FederateState::RestoreInProgress => return Ok(()),
            FederateState::Resigned => return Err(RtiError::FederateResigned),
            FederateState::SaveInProgress => {
                warn!("restore began while a save is in progress, ignoring");
                return Ok(());
            }
        }

        pipeline.hold_callbacks()?;
        data.state = FederateState::RestoreInProgress;
        data.restore = RestoreStatus::Begun;
        info!("federation restore begun");
        Ok(())
    }

    pub fn restore_initiated(&self, label: &str) -> Result<(), RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::RestoreInProgress {
            return Err(RtiError::RestoreNotRequested);
        }
        data.restore = RestoreStatus::Initiated {
            label: label.to_string(),
        };
        Ok(())
    }

    pub fn restore_finished(&self) -> Result<String, RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::RestoreInProgress {
            return Err(RtiError::RestoreNotRequested);
        }
        match data.restore.clone() {
            RestoreStatus::Initiated { label } => {
                data.restore = RestoreStatus::Completed {
                    label: label.clone(),
                };
                Ok(label)
            }
            _ => Err(RtiError::RestoreNotRequested),
        }
    }

    pub fn end_restore(&self) -> Result<(), RtiError> {
        let mut data = self.write()?;
        if data.state != FederateState::RestoreInProgress {
            warn!("restore ended while federate is {:?}", data.state);
            return Ok(());
        }
        data.state = FederateState::Active;
        data.restore = RestoreStatus::Idle;
        info!("federation restore ended");
        Ok(())
    }

    // Resign

    /// Runs `resign` under the exclusive lock and moves to RESIGNED if it
    /// succeeds. Terminal.
    pub fn resign<F>(&self, resign: F) -> Result<(), RtiError>
    where
        F: FnOnce() -> Result<(), RtiError>,
    {
        let mut data = self.write()?;
        match data.state {
            FederateState::Active => {}
            FederateState::SaveInProgress => {
                return Err(RtiError::SaveInProgress {
                    operation: "resignFederationExecution",
                })
            }
            FederateState::RestoreInProgress => {
                return Err(RtiError::RestoreInProgress {
                    operation: "resignFederationExecution",
                })
            }
            FederateState::Resigned => return Err(RtiError::FederateResigned),
        }

        resign()?;
        data.state = FederateState::Resigned;
        info!("federate resigned");
        Ok(())
    }
}

impl Default for FederateStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
