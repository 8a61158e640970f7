//! In-process coordinator used by the integration tests. Requests are
//! answered synchronously on the caller's thread; notifications are queued
//! and only reach the federates when the test calls [`TestRti::pump`], so a
//! test decides exactly when each federate sees them.

mod save_restore;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
};

use log::{debug, warn};

use hla_federate::{
    shared::{pending_response, PendingResponse, Request, Response, ResponseSender, Transport, TransportError},
    AttributeHandle, Federate, FederateHandle, LogicalTime, ObjectInstanceHandle, RtiError,
};

use state::RtiState;

/// One-shot misbehaviour armed for the next request with a given operation
/// name
#[derive(Clone, Debug)]
pub enum Fault {
    /// Answer with this error instead of processing the request
    Refuse(RtiError),
    /// Fail the send as if the link dropped
    Disconnect,
    /// Accept the request and never answer it
    Stall,
}

pub struct TestRti {
    state: Mutex<RtiState>,
    federates: Mutex<HashMap<FederateHandle, Weak<Federate>>>,
    faults: Mutex<HashMap<&'static str, Fault>>,
    stalled: Mutex<Vec<ResponseSender>>,
    next_federate: AtomicU32,
}

impl TestRti {
    pub fn new(federation: &str) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RtiState::new(federation)),
            federates: Mutex::new(HashMap::new()),
            faults: Mutex::new(HashMap::new()),
            stalled: Mutex::new(Vec::new()),
            next_federate: AtomicU32::new(1),
        })
    }

    /// Opens a link for one federate. The handle the federate will join
    /// under is fixed here.
    pub fn link(self: &Arc<Self>) -> Arc<RtiLink> {
        let federate = FederateHandle::new(self.next_federate.fetch_add(1, Ordering::SeqCst));
        Arc::new(RtiLink {
            rti: self.clone(),
            federate,
        })
    }

    /// Registers a joined federate as the target of its notifications
    pub fn attach(&self, federate: &Arc<Federate>) {
        lock(&self.federates).insert(federate.handle(), Arc::downgrade(federate));
    }

    /// Arms `fault` for the next request named `operation`
    pub fn inject(&self, operation: &'static str, fault: Fault) {
        lock(&self.faults).insert(operation, fault);
    }

    /// Delivers queued notifications, including any produced while
    /// delivering, and returns how many were handed over
    pub fn pump(&self) -> usize {
        let mut delivered = 0;
        loop {
            let Some((handle, notification)) = lock(&self.state).outbox.pop_front() else {
                return delivered;
            };
            let federate = lock(&self.federates).get(&handle).and_then(Weak::upgrade);
            let Some(federate) = federate else {
                debug!("no live federate for {}, dropping notification", handle);
                continue;
            };
            if let Err(error) = federate.receive_notification(notification) {
                warn!("{} rejected a notification: {}", handle, error);
            }
            delivered += 1;
        }
    }

    /// Number of notifications waiting for [`TestRti::pump`]
    pub fn queued(&self) -> usize {
        lock(&self.state).outbox.len()
    }

    /// Operation names of every request `federate` sent, in order
    pub fn operations(&self, federate: FederateHandle) -> Vec<&'static str> {
        lock(&self.state)
            .requests
            .iter()
            .filter(|(sender, _)| *sender == federate)
            .map(|(_, request)| request.operation())
            .collect()
    }

    pub fn requests(&self, federate: FederateHandle) -> Vec<Request> {
        lock(&self.state)
            .requests
            .iter()
            .filter(|(sender, _)| *sender == federate)
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn owner(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Option<FederateHandle> {
        lock(&self.state)
            .objects
            .get(&object)
            .and_then(|record| record.owners.get(&attribute).copied())
    }

    /// Federate waiting for `attribute`, and whether it asked only if
    /// available
    pub fn pending_acquirer(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Option<(FederateHandle, bool)> {
        lock(&self.state)
            .objects
            .get(&object)
            .and_then(|record| record.acquiring.get(&attribute).copied())
            .map(|acquirer| (acquirer.federate, acquirer.if_available))
    }

    pub fn object_exists(&self, object: ObjectInstanceHandle) -> bool {
        lock(&self.state).objects.contains_key(&object)
    }

    pub fn granted(&self, federate: FederateHandle) -> Option<LogicalTime> {
        lock(&self.state)
            .members
            .get(&federate)
            .map(|member| member.time.granted)
    }

    pub fn galt(&self, federate: FederateHandle) -> Option<LogicalTime> {
        lock(&self.state).galt(federate)
    }

    pub fn is_member(&self, federate: FederateHandle) -> bool {
        lock(&self.state).members.contains_key(&federate)
    }

    pub fn saved_labels(&self) -> Vec<String> {
        lock(&self.state).persistence.saved_labels()
    }

    fn handle(&self, federate: FederateHandle, request: Request) -> Result<PendingResponse, TransportError> {
        let operation = request.operation();
        match lock(&self.faults).remove(operation) {
            Some(Fault::Refuse(error)) => {
                debug!("refusing {} from {} on request", operation, federate);
                return Ok(PendingResponse::ready(Response::Error(error)));
            }
            Some(Fault::Disconnect) => {
                debug!("dropping link for {} from {}", operation, federate);
                return Err(TransportError::Disconnected);
            }
            Some(Fault::Stall) => {
                debug!("stalling {} from {}", operation, federate);
                let (sender, pending) = pending_response();
                lock(&self.stalled).push(sender);
                return Ok(pending);
            }
            None => {}
        }

        let response = lock(&self.state).process(federate, request);
        Ok(PendingResponse::ready(response))
    }
}

/// The [`Transport`] a single federate is joined through
pub struct RtiLink {
    rti: Arc<TestRti>,
    federate: FederateHandle,
}

impl RtiLink {
    pub fn federate(&self) -> FederateHandle {
        self.federate
    }
}

impl Transport for RtiLink {
    fn send(&self, request: Request) -> Result<PendingResponse, TransportError> {
        self.rti.handle(self.federate, request)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
