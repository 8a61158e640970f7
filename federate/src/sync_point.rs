use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use log::{debug, warn};

use hla_shared::{RtiError, Tag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynchronizationPointState {
    Announced,
    Achieved,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SynchronizationPoint {
    pub label: String,
    pub tag: Tag,
    pub state: SynchronizationPointState,
}

/// Outstanding synchronization points, keyed by label. Entries exist from
/// announcement until the federation reports itself synchronized.
#[derive(Default)]
pub struct SynchronizationPoints {
    points: Mutex<HashMap<String, SynchronizationPoint>>,
}

impl SynchronizationPoints {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SynchronizationPoint>>, RtiError> {
        self.points.lock().map_err(|_| RtiError::LockPoisoned {
            subsystem: "synchronization points",
        })
    }

    pub fn announced(&self, label: &str, tag: &[u8]) -> Result<(), RtiError> {
        let mut points = self.lock()?;
        if points.contains_key(label) {
            warn!("synchronization point '{}' announced twice", label);
        }
        points.insert(
            label.to_string(),
            SynchronizationPoint {
                label: label.to_string(),
                tag: tag.to_vec(),
                state: SynchronizationPointState::Announced,
            },
        );
        debug!("synchronization point '{}' announced", label);
        Ok(())
    }

    /// Marks `label` achieved around `send`; the mark is reverted if
    /// `send` fails
    pub fn achieve<S>(&self, label: &str, send: S) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.set_state(label, SynchronizationPointState::Announced, SynchronizationPointState::Achieved)?;
        if let Err(error) = send() {
            self.set_state(label, SynchronizationPointState::Achieved, SynchronizationPointState::Announced)?;
            return Err(error);
        }
        Ok(())
    }

    fn set_state(
        &self,
        label: &str,
        from: SynchronizationPointState,
        to: SynchronizationPointState,
    ) -> Result<(), RtiError> {
        let mut points = self.lock()?;
        match points.get_mut(label) {
            Some(point) if point.state == from => {
                point.state = to;
                Ok(())
            }
            _ => Err(RtiError::SynchronizationPointLabelNotAnnounced {
                label: label.to_string(),
            }),
        }
    }

    pub fn synchronized(&self, label: &str) -> Result<(), RtiError> {
        if self.lock()?.remove(label).is_none() {
            warn!("federation synchronized on unknown point '{}'", label);
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Result<Option<SynchronizationPoint>, RtiError> {
        Ok(self.lock()?.get(label).cloned())
    }

    pub fn clear(&self) -> Result<(), RtiError> {
        self.lock()?.clear();
        Ok(())
    }
}
