use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use log::{debug, trace};

use hla_shared::{Callback, LogicalTime, MessageRetractionHandle, ObjectInstanceHandle, RtiError};

use super::scheduled::{ScheduledCallback, ScheduledCallbacks};

struct PipelineQueues {
    enabled: bool,
    holding: bool,
    delivery: VecDeque<Callback>,
    held: VecDeque<Callback>,
    scheduled: ScheduledCallbacks,
}

impl PipelineQueues {
    fn push(&mut self, callback: Callback, hold: bool) -> bool {
        let hold = hold || (self.holding && !callback.is_save_restore());
        if hold {
            trace!("holding {}", callback.name());
            self.held.push_back(callback);
            false
        } else {
            trace!("queueing {}", callback.name());
            self.delivery.push_back(callback);
            true
        }
    }
}

/// What a release of scheduled callbacks moved into the delivery queue
#[derive(Debug, Default, PartialEq)]
pub struct Released {
    pub count: usize,
    /// Instances whose timestamped removal was among the released callbacks
    pub removed_objects: Vec<ObjectInstanceHandle>,
}

/// Ingress for everything the application will eventually be called back
/// with.
///
/// Callbacks land in one of three places: the delivery queue (drained by
/// `pop`), the hold-aside queue (waiting for an explicit release), or the
/// scheduled structure (waiting for a time grant).
pub struct CallbackPipeline {
    queues: Mutex<PipelineQueues>,
    available: Condvar,
}

impl CallbackPipeline {
    pub fn new(enabled: bool) -> Self {
        Self {
            queues: Mutex::new(PipelineQueues {
                enabled,
                holding: false,
                delivery: VecDeque::new(),
                held: VecDeque::new(),
                scheduled: ScheduledCallbacks::new(),
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, PipelineQueues>, RtiError> {
        self.queues.lock().map_err(|_| RtiError::LockPoisoned {
            subsystem: "callback pipeline",
        })
    }

    /// Queues `callback`, aside if `hold` is set or the pipeline is holding.
    /// Save and restore callbacks are never put aside by the holding mode.
    pub fn add(&self, callback: Callback, hold: bool) -> Result<(), RtiError> {
        let mut queues = self.lock()?;
        if queues.push(callback, hold) {
            self.available.notify_all();
        }
        Ok(())
    }

    // Scheduled

    pub fn schedule(&self, release_time: LogicalTime, callback: Callback) -> Result<(), RtiError> {
        trace!("scheduling {} for {}", callback.name(), release_time);
        let mut queues = self.lock()?;
        queues.scheduled.push(release_time, callback);
        Ok(())
    }

    /// Moves every scheduled callback with release time ≤ `time` into the
    /// delivery queue in non-decreasing time order
    pub fn release_scheduled_up_to(&self, time: LogicalTime) -> Result<Released, RtiError> {
        let mut queues = self.lock()?;
        let released = queues.scheduled.pop_up_to(time);
        Ok(self.enqueue_released(&mut queues, released))
    }

    pub fn release_all_scheduled(&self) -> Result<Released, RtiError> {
        let mut queues = self.lock()?;
        let released = queues.scheduled.pop_all();
        Ok(self.enqueue_released(&mut queues, released))
    }

    fn enqueue_released(
        &self,
        queues: &mut PipelineQueues,
        released: Vec<ScheduledCallback>,
    ) -> Released {
        let mut summary = Released {
            count: released.len(),
            removed_objects: Vec::new(),
        };
        let mut notify = false;
        for entry in released {
            if let Callback::RemoveObjectInstance { object, .. } = &entry.payload {
                summary.removed_objects.push(*object);
            }
            notify |= queues.push(entry.payload, false);
        }
        if summary.count > 0 {
            debug!("released {} scheduled callbacks", summary.count);
        }
        if notify {
            self.available.notify_all();
        }
        summary
    }

    /// Withdraws a scheduled callback by its retraction handle
    pub fn retract_scheduled(&self, retraction: MessageRetractionHandle) -> Result<bool, RtiError> {
        let mut queues = self.lock()?;
        Ok(queues.scheduled.remove(retraction))
    }

    pub fn earliest_scheduled(&self) -> Result<Option<LogicalTime>, RtiError> {
        Ok(self.lock()?.scheduled.earliest())
    }

    // Holding

    /// Switches into holding mode: callbacks already in the delivery queue
    /// keep draining, new arrivals accumulate aside
    pub fn hold_callbacks(&self) -> Result<(), RtiError> {
        let mut queues = self.lock()?;
        queues.holding = true;
        debug!("callback pipeline holding");
        Ok(())
    }

    /// Leaves holding mode and appends everything held to the delivery
    /// queue. A second call with nothing held in between is a no-op.
    pub fn release_held(&self) -> Result<usize, RtiError> {
        let mut queues = self.lock()?;
        queues.holding = false;
        let count = queues.held.len();
        if count == 0 {
            return Ok(0);
        }

        let held = std::mem::take(&mut queues.held);
        queues.delivery.extend(held);
        debug!("released {} held callbacks", count);
        self.available.notify_all();
        Ok(count)
    }

    /// Leaves holding mode without releasing what was held
    pub fn end_holding(&self) -> Result<(), RtiError> {
        self.lock()?.holding = false;
        Ok(())
    }

    pub fn is_holding(&self) -> Result<bool, RtiError> {
        Ok(self.lock()?.holding)
    }

    /// Drops the scheduled and held callbacks of an abandoned timeline
    pub fn discard_timeline(&self) -> Result<(), RtiError> {
        let mut queues = self.lock()?;
        let scheduled = queues.scheduled.len();
        queues.scheduled.clear();
        let held_before = queues.held.len();
        queues.held.retain(Callback::is_save_restore);
        debug!(
            "discarded {} scheduled and {} held callbacks",
            scheduled,
            held_before - queues.held.len()
        );
        Ok(())
    }

    // Enable / disable

    pub fn enable(&self) -> Result<(), RtiError> {
        let mut queues = self.lock()?;
        queues.enabled = true;
        if !queues.delivery.is_empty() {
            self.available.notify_all();
        }
        Ok(())
    }

    /// Queued entries are kept; `pop` behaves as if the queue were empty
    pub fn disable(&self) -> Result<(), RtiError> {
        self.lock()?.enabled = false;
        Ok(())
    }

    pub fn is_enabled(&self) -> Result<bool, RtiError> {
        Ok(self.lock()?.enabled)
    }

    // Drain

    /// Takes the next deliverable callback, waiting up to `wait` for one
    pub fn pop(&self, wait: Duration) -> Result<Option<Callback>, RtiError> {
        let deadline = Instant::now() + wait;
        let mut queues = self.lock()?;
        loop {
            if queues.enabled {
                if let Some(callback) = queues.delivery.pop_front() {
                    return Ok(Some(callback));
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let (next, _) = self
                .available
                .wait_timeout(queues, deadline - now)
                .map_err(|_| RtiError::LockPoisoned {
                    subsystem: "callback pipeline",
                })?;
            queues = next;
        }
    }

    pub fn has_pending(&self) -> Result<bool, RtiError> {
        let queues = self.lock()?;
        Ok(queues.enabled && !queues.delivery.is_empty())
    }

    pub fn delivery_len(&self) -> Result<usize, RtiError> {
        Ok(self.lock()?.delivery.len())
    }

    pub fn held_len(&self) -> Result<usize, RtiError> {
        Ok(self.lock()?.held.len())
    }

    pub fn scheduled_len(&self) -> Result<usize, RtiError> {
        Ok(self.lock()?.scheduled.len())
    }
}

impl Default for CallbackPipeline {
    fn default() -> Self {
        Self::new(true)
    }
}
