use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    sync::{Mutex, MutexGuard},
};

use log::{debug, trace};

use hla_shared::{
    FederateHandle, LogicalTime, MessageRetractionHandle, RetractionSnapshot, RtiError,
};

struct RegistryData {
    federate: FederateHandle,
    next_serial: u64,
    records: HashMap<MessageRetractionHandle, LogicalTime>,
    /// Retracted or discarded handles whose expiration has not passed yet
    withdrawn: HashMap<MessageRetractionHandle, LogicalTime>,
    expirations: BinaryHeap<Reverse<(LogicalTime, MessageRetractionHandle)>>,
}

impl RegistryData {
    fn was_issued(&self, handle: MessageRetractionHandle) -> bool {
        handle.federate() == self.federate && handle.serial() < self.next_serial
    }
}

/// Tracks every timestamp-order send that may still be withdrawn.
///
/// A record exists exactly as long as its message is still retractable.
/// Expired entries in the expiration heap are skipped lazily.
pub struct RetractionRegistry {
    data: Mutex<RegistryData>,
}

impl RetractionRegistry {
    pub fn new(federate: FederateHandle) -> Self {
        Self {
            data: Mutex::new(RegistryData {
                federate,
                next_serial: 0,
                records: HashMap::new(),
                withdrawn: HashMap::new(),
                expirations: BinaryHeap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryData>, RtiError> {
        self.data.lock().map_err(|_| RtiError::LockPoisoned {
            subsystem: "retraction registry",
        })
    }

    /// Issues a new handle for a send that will be delivered at `expiration`
    pub fn add(&self, expiration: LogicalTime) -> Result<MessageRetractionHandle, RtiError> {
        let mut data = self.lock()?;
        let handle = MessageRetractionHandle::new(data.federate, data.next_serial);
        data.next_serial += 1;
        data.records.insert(handle, expiration);
        data.expirations.push(Reverse((expiration, handle)));
        trace!("issued {} expiring at {}", handle, expiration);
        Ok(handle)
    }

    /// Forgets a handle whose send never reached the coordinator
    pub fn discard(&self, handle: MessageRetractionHandle) -> Result<(), RtiError> {
        let mut data = self.lock()?;
        if let Some(expiration) = data.records.remove(&handle) {
            data.withdrawn.insert(handle, expiration);
        }
        Ok(())
    }

    /// Withdraws `handle` if it is still retractable at `granted` and hands
    /// it to `forward`. When `forward` fails the record is put back.
    ///
    /// A handle that was already withdrawn is invalid until its expiration
    /// passes; from then on every handle fails as no longer retractable.
    pub fn retract<F>(
        &self,
        handle: MessageRetractionHandle,
        granted: LogicalTime,
        forward: F,
    ) -> Result<(), RtiError>
    where
        F: FnOnce(MessageRetractionHandle) -> Result<(), RtiError>,
    {
        let expiration = {
            let mut data = self.lock()?;
            if !data.was_issued(handle) {
                return Err(RtiError::InvalidMessageRetractionHandle { handle });
            }
            if let Some(expiration) = data.withdrawn.get(&handle).copied() {
                return Err(if granted >= expiration {
                    RtiError::MessageCanNoLongerBeRetracted { handle }
                } else {
                    RtiError::InvalidMessageRetractionHandle { handle }
                });
            }
            let Some(expiration) = data.records.get(&handle).copied() else {
                return Err(RtiError::MessageCanNoLongerBeRetracted { handle });
            };
            if granted >= expiration {
                return Err(RtiError::MessageCanNoLongerBeRetracted { handle });
            }
            data.records.remove(&handle);
            data.withdrawn.insert(handle, expiration);
            expiration
        };

        // the forward is a coordinator round-trip, so no lock is held
        if let Err(error) = forward(handle) {
            let mut data = self.lock()?;
            data.withdrawn.remove(&handle);
            data.records.insert(handle, expiration);
            return Err(error);
        }
        debug!("retracted {}", handle);
        Ok(())
    }

    /// Drops every record whose expiration lies strictly before `time`
    pub fn expire_up_to(&self, time: LogicalTime) -> Result<usize, RtiError> {
        let mut data = self.lock()?;
        let mut expired = 0;
        while let Some(Reverse((expiration, handle))) = data.expirations.peek().copied() {
            if expiration >= time {
                break;
            }
            data.expirations.pop();
            // retracted or discarded handles are already gone from the map
            if data.records.get(&handle) == Some(&expiration) {
                data.records.remove(&handle);
                expired += 1;
            } else {
                data.withdrawn.remove(&handle);
            }
        }
        if expired > 0 {
            trace!("expired {} retraction records before {}", expired, time);
        }
        Ok(expired)
    }

    pub fn is_retractable(&self, handle: MessageRetractionHandle) -> Result<bool, RtiError> {
        Ok(self.lock()?.records.contains_key(&handle))
    }

    pub fn len(&self) -> Result<usize, RtiError> {
        Ok(self.lock()?.records.len())
    }

    pub fn snapshot(&self) -> Result<RetractionSnapshot, RtiError> {
        let data = self.lock()?;
        let mut records: Vec<(MessageRetractionHandle, LogicalTime)> = data
            .records
            .iter()
            .map(|(handle, expiration)| (*handle, *expiration))
            .collect();
        records.sort();
        Ok(RetractionSnapshot {
            next_serial: data.next_serial,
            records,
        })
    }

    pub fn restore(&self, snapshot: &RetractionSnapshot) -> Result<(), RtiError> {
        let mut data = self.lock()?;
        data.next_serial = snapshot.next_serial;
        data.records = snapshot.records.iter().copied().collect();
        data.withdrawn.clear();
        data.expirations = snapshot
            .records
            .iter()
            .map(|(handle, expiration)| Reverse((*expiration, *handle)))
            .collect();
        Ok(())
    }
}
