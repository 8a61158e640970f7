use std::{default::Default, time::Duration};

/// Settings a federate joins with
#[derive(Clone, Debug)]
pub struct FederateConfig {
    /// Name of the federation execution to join
    pub federation_name: String,
    /// Name this federate joins under. Snapshots are stored against it.
    pub federate_name: String,
    /// Federate type reported to the coordinator on join
    pub federate_type: String,
    /// Upper bound on every blocking round-trip to the coordinator. When it
    /// elapses the operation fails with a communication failure.
    pub response_timeout: Duration,
    /// Whether receive-order callbacks flow while the federate is
    /// constrained and not advancing
    pub asynchronous_delivery: bool,
    /// Whether callback delivery starts enabled
    pub callbacks_enabled: bool,
}

impl Default for FederateConfig {
    fn default() -> Self {
        Self {
            federation_name: "Federation".to_string(),
            federate_name: "Federate".to_string(),
            federate_type: "Federate".to_string(),
            response_timeout: Duration::from_secs(5),
            asynchronous_delivery: false,
            callbacks_enabled: true,
        }
    }
}
