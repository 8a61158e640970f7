use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Condvar, Mutex, MutexGuard},
    thread::{self, ThreadId},
    time::{Duration, Instant},
};

use log::{error, trace};

use hla_shared::{Callback, FederateAmbassador, RtiError};

use super::{delivery::deliver, CallbackPipeline};

fn poisoned(subsystem: &'static str) -> RtiError {
    RtiError::LockPoisoned { subsystem }
}

// DeliveryToken
/// Counting token of capacity one. Whoever holds it is the only thread
/// allowed to call into the ambassador.
struct DeliveryToken {
    taken: Mutex<bool>,
    freed: Condvar,
}

impl DeliveryToken {
    fn new() -> Self {
        Self {
            taken: Mutex::new(false),
            freed: Condvar::new(),
        }
    }

    /// Waits until `deadline` for the token. `None` means the wait ran out.
    fn acquire(&self, deadline: Instant) -> Result<Option<TokenGuard<'_>>, RtiError> {
        let mut taken = self.taken.lock().map_err(|_| poisoned("delivery token"))?;
        while *taken {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let (next, _) = self
                .freed
                .wait_timeout(taken, deadline - now)
                .map_err(|_| poisoned("delivery token"))?;
            taken = next;
        }
        *taken = true;
        Ok(Some(TokenGuard { token: self }))
    }

    fn release(&self) {
        // a poisoned flag is still a flag
        let mut taken = match self.taken.lock() {
            Ok(taken) => taken,
            Err(poisoned) => poisoned.into_inner(),
        };
        *taken = false;
        self.freed.notify_one();
    }
}

struct TokenGuard<'a> {
    token: &'a DeliveryToken,
}

impl Drop for TokenGuard<'_> {
    fn drop(&mut self) {
        self.token.release();
    }
}

// CallbackDispatcher
/// Drains the [`CallbackPipeline`] into the application's
/// [`FederateAmbassador`], one callback and one thread at a time
pub struct CallbackDispatcher {
    token: DeliveryToken,
    ambassador: Mutex<Box<dyn FederateAmbassador>>,
    delivering: Mutex<Option<ThreadId>>,
}

impl CallbackDispatcher {
    pub fn new(ambassador: Box<dyn FederateAmbassador>) -> Self {
        Self {
            token: DeliveryToken::new(),
            ambassador: Mutex::new(ambassador),
            delivering: Mutex::new(None),
        }
    }

    fn delivering(&self) -> Result<MutexGuard<'_, Option<ThreadId>>, RtiError> {
        self.delivering
            .lock()
            .map_err(|_| poisoned("callback dispatcher"))
    }

    /// Whether the calling thread is currently inside an ambassador method
    pub fn is_delivering_on_current_thread(&self) -> Result<bool, RtiError> {
        Ok(*self.delivering()? == Some(thread::current().id()))
    }

    fn check_not_in_callback(&self, operation: &'static str) -> Result<(), RtiError> {
        if self.is_delivering_on_current_thread()? {
            return Err(RtiError::CallNotAllowedFromWithinCallback { operation });
        }
        Ok(())
    }

    /// Waits up to `wait` for a callback, delivers exactly one if any
    /// arrived, and reports whether more are pending
    pub fn evoke_callback(
        &self,
        pipeline: &CallbackPipeline,
        wait: Duration,
    ) -> Result<bool, RtiError> {
        self.check_not_in_callback("evokeCallback")?;
        self.evoke_once(pipeline, Instant::now() + wait)?;
        pipeline.has_pending()
    }

    /// Repeats single deliveries until `min` has elapsed with nothing
    /// pending, or until `max` has elapsed. Never waits past `max`.
    pub fn evoke_multiple_callbacks(
        &self,
        pipeline: &CallbackPipeline,
        min: Duration,
        max: Duration,
    ) -> Result<bool, RtiError> {
        self.check_not_in_callback("evokeMultipleCallbacks")?;

        let start = Instant::now();
        let max_deadline = start + max;
        let min_deadline = start + min.min(max);
        loop {
            let now = Instant::now();
            if now >= max_deadline {
                break;
            }
            // Before the minimum window closes, wait for work; after, only
            // take what is already there
            let deadline = if now < min_deadline { min_deadline } else { now };
            let delivered = self.evoke_once(pipeline, deadline)?;
            if !delivered && Instant::now() >= min_deadline {
                break;
            }
        }
        pipeline.has_pending()
    }

    fn evoke_once(&self, pipeline: &CallbackPipeline, deadline: Instant) -> Result<bool, RtiError> {
        let Some(_token) = self.token.acquire(deadline)? else {
            return Ok(false);
        };

        let wait = deadline.saturating_duration_since(Instant::now());
        let Some(callback) = pipeline.pop(wait)? else {
            return Ok(false);
        };

        self.dispatch(&callback)?;
        Ok(true)
    }

    fn dispatch(&self, callback: &Callback) -> Result<(), RtiError> {
        let mut ambassador = self
            .ambassador
            .lock()
            .map_err(|_| poisoned("federate ambassador"))?;

        *self.delivering()? = Some(thread::current().id());
        trace!("delivering {}", callback.name());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            deliver(ambassador.as_mut(), callback)
        }));
        *self.delivering()? = None;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(fault)) => {
                error!("{} callback failed: {}", callback.name(), fault);
            }
            Err(_) => {
                error!("{} callback panicked", callback.name());
            }
        }
        Ok(())
    }
}
