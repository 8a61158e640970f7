use log::{error, info};

use hla_shared::{LogicalTime, Request, RtiError};

use super::Federate;

impl Federate {
    // Save

    /// Asks the coordinator for a federation-wide save, immediately or at
    /// `time`
    pub fn request_federation_save(
        &self,
        label: &str,
        time: Option<LogicalTime>,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("requestFederationSave")?;
        if let Some(time) = time {
            let granted = self.time.query_logical_time()?;
            if time <= granted {
                return Err(RtiError::LogicalTimeAlreadyPassed {
                    requested: time,
                    granted,
                });
            }
        }
        self.connection.acknowledge(Request::RequestFederationSave {
            label: label.to_string(),
            time,
        })
    }

    pub fn federate_save_begun(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        let label = self.state.save_begun()?;
        info!("save '{}' begun", label);
        self.connection.acknowledge(Request::FederateSaveBegun)
    }

    /// Captures the local snapshot and hands it to the snapshot store. If
    /// the store refuses it the coordinator is told the save did not
    /// complete.
    pub fn federate_save_complete(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        let label = self.state.save_finished()?;

        let snapshot = self.save_coordinator().capture(self.handle)?;
        if let Err(failure) =
            self.snapshot_store
                .write(&label, &self.config.federate_name, snapshot)
        {
            error!("snapshot '{}' could not be stored: {}", label, failure);
            self.connection
                .acknowledge(Request::FederateSaveNotComplete)?;
            return Err(RtiError::SaveFailed {
                label,
                reason: failure.to_string(),
            });
        }

        if let Err(error) = self.connection.acknowledge(Request::FederateSaveComplete) {
            self.state.save_unfinished(&label)?;
            return Err(error);
        }
        Ok(())
    }

    pub fn federate_save_not_complete(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        let label = self.state.save_finished()?;
        if let Err(error) = self
            .connection
            .acknowledge(Request::FederateSaveNotComplete)
        {
            self.state.save_unfinished(&label)?;
            return Err(error);
        }
        Ok(())
    }

    // Restore

    pub fn request_federation_restore(&self, label: &str) -> Result<(), RtiError> {
        let _active = self.state.check_active("requestFederationRestore")?;
        self.connection
            .acknowledge(Request::RequestFederationRestore {
                label: label.to_string(),
            })
    }

    pub fn federate_restore_complete(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        let label = self.state.restore_finished()?;
        info!("restore '{}' complete", label);
        self.connection
            .acknowledge(Request::FederateRestoreComplete)
    }

    pub fn federate_restore_not_complete(&self) -> Result<(), RtiError> {
        self.state.check_joined()?;
        let label = self.state.restore_finished()?;
        info!("restore '{}' not complete", label);
        self.connection
            .acknowledge(Request::FederateRestoreNotComplete)
    }
}
