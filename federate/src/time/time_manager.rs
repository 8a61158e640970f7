use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};

use hla_shared::{
    AdvanceKind, LogicalTime, LogicalTimeInterval, OrderType, RtiError, TimeSnapshot,
};

use super::time_state::TimeState;

fn advance_name(kind: AdvanceKind) -> &'static str {
    match kind {
        AdvanceKind::None => "none",
        AdvanceKind::TimeAdvanceRequest => "timeAdvanceRequest",
        AdvanceKind::TimeAdvanceRequestAvailable => "timeAdvanceRequestAvailable",
        AdvanceKind::NextEventRequest => "nextEventRequest",
        AdvanceKind::NextEventRequestAvailable => "nextEventRequestAvailable",
        AdvanceKind::FlushQueueRequest => "flushQueueRequest",
    }
}

/// Owner of the federate's [`TimeState`].
///
/// Classification takes the shared side of the lock; only grants, enables
/// and the start of an advance take the exclusive side. Coordinator
/// round-trips are never made while the lock is held: mutations are split
/// into a `begin_*` check-and-mark step and a `complete_*`/`abort_*` step.
pub struct TimeManager {
    state: RwLock<TimeState>,
}

impl TimeManager {
    pub fn new(asynchronous_delivery: bool) -> Self {
        Self {
            state: RwLock::new(TimeState::new(asynchronous_delivery)),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, TimeState>, RtiError> {
        self.state.read().map_err(|_| RtiError::LockPoisoned {
            subsystem: "time manager",
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TimeState>, RtiError> {
        self.state.write().map_err(|_| RtiError::LockPoisoned {
            subsystem: "time manager",
        })
    }

    // Queries

    pub fn query_logical_time(&self) -> Result<LogicalTime, RtiError> {
        Ok(self.read()?.granted)
    }

    pub fn query_lookahead(&self) -> Result<LogicalTimeInterval, RtiError> {
        let state = self.read()?;
        if !state.regulating {
            return Err(RtiError::TimeRegulationIsNotEnabled);
        }
        Ok(state.lookahead)
    }

    pub fn query_galt(&self) -> Result<Option<LogicalTime>, RtiError> {
        Ok(self.read()?.galt)
    }

    /// Least of the published GALT and the earliest scheduled release
    pub fn query_lits(&self, earliest_scheduled: Option<LogicalTime>) -> Result<Option<LogicalTime>, RtiError> {
        let galt = self.read()?.galt;
        Ok(match (galt, earliest_scheduled) {
            (Some(galt), Some(earliest)) => Some(galt.min(earliest)),
            (galt, earliest) => galt.or(earliest),
        })
    }

    pub fn pending_advance(&self) -> Result<AdvanceKind, RtiError> {
        Ok(self.read()?.pending)
    }

    pub fn is_regulating(&self) -> Result<bool, RtiError> {
        Ok(self.read()?.regulating)
    }

    pub fn is_constrained(&self) -> Result<bool, RtiError> {
        Ok(self.read()?.constrained)
    }

    pub fn should_hold_receive_order(&self) -> Result<bool, RtiError> {
        Ok(self.read()?.should_hold_receive_order())
    }

    /// Sent order of an outbound event. A timestamp-order send must not be
    /// earlier than granted time plus lookahead.
    pub fn classify_send(&self, time: Option<LogicalTime>) -> Result<OrderType, RtiError> {
        let state = self.read()?;
        let order = state.sent_order(time);
        if let (OrderType::Timestamp, Some(time)) = (order, time) {
            let earliest = state.earliest_send_time();
            if time < earliest {
                return Err(RtiError::InvalidLogicalTime {
                    value: time.to_string(),
                    reason: "earlier than granted time plus lookahead",
                });
            }
        }
        Ok(order)
    }

    // Regulation

    pub fn begin_enable_regulation(&self) -> Result<(), RtiError> {
        let mut state = self.write()?;
        if state.regulating {
            return Err(RtiError::TimeRegulationAlreadyEnabled);
        }
        if state.regulation_pending {
            return Err(RtiError::RequestForTimeRegulationPending);
        }
        if state.is_advancing() {
            return Err(RtiError::InTimeAdvancingState {
                pending: advance_name(state.pending),
            });
        }
        state.regulation_pending = true;
        Ok(())
    }

    pub fn complete_enable_regulation(
        &self,
        lookahead: LogicalTimeInterval,
        time: LogicalTime,
    ) -> Result<LogicalTime, RtiError> {
        let mut state = self.write()?;
        state.regulation_pending = false;
        state.regulating = true;
        state.lookahead = lookahead;
        state.granted = state.granted.max(time);
        info!("time regulation enabled at {} with lookahead {}", state.granted, lookahead);
        Ok(state.granted)
    }

    pub fn abort_enable_regulation(&self) -> Result<(), RtiError> {
        self.write()?.regulation_pending = false;
        Ok(())
    }

    pub fn check_regulating(&self) -> Result<(), RtiError> {
        if !self.read()?.regulating {
            return Err(RtiError::TimeRegulationIsNotEnabled);
        }
        Ok(())
    }

    pub fn disable_regulation(&self) -> Result<(), RtiError> {
        let mut state = self.write()?;
        state.regulating = false;
        info!("time regulation disabled");
        Ok(())
    }

    pub fn check_modify_lookahead(&self) -> Result<(), RtiError> {
        let state = self.read()?;
        if !state.regulating {
            return Err(RtiError::TimeRegulationIsNotEnabled);
        }
        if state.is_advancing() {
            return Err(RtiError::InTimeAdvancingState {
                pending: advance_name(state.pending),
            });
        }
        Ok(())
    }

    pub fn set_lookahead(&self, lookahead: LogicalTimeInterval) -> Result<(), RtiError> {
        self.write()?.lookahead = lookahead;
        debug!("lookahead is now {}", lookahead);
        Ok(())
    }

    // Constrained

    pub fn begin_enable_constrained(&self) -> Result<(), RtiError> {
        let mut state = self.write()?;
        if state.constrained {
            return Err(RtiError::TimeConstrainedAlreadyEnabled);
        }
        if state.constrained_pending {
            return Err(RtiError::RequestForTimeConstrainedPending);
        }
        if state.is_advancing() {
            return Err(RtiError::InTimeAdvancingState {
                pending: advance_name(state.pending),
            });
        }
        state.constrained_pending = true;
        Ok(())
    }

    pub fn complete_enable_constrained(&self, time: LogicalTime) -> Result<LogicalTime, RtiError> {
        let mut state = self.write()?;
        state.constrained_pending = false;
        state.constrained = true;
        state.granted = state.granted.max(time);
        info!("time constrained enabled at {}", state.granted);
        Ok(state.granted)
    }

    pub fn abort_enable_constrained(&self) -> Result<(), RtiError> {
        self.write()?.constrained_pending = false;
        Ok(())
    }

    pub fn check_constrained(&self) -> Result<(), RtiError> {
        if !self.read()?.constrained {
            return Err(RtiError::TimeConstrainedIsNotEnabled);
        }
        Ok(())
    }

    pub fn disable_constrained(&self) -> Result<(), RtiError> {
        self.write()?.constrained = false;
        info!("time constrained disabled");
        Ok(())
    }

    // Asynchronous delivery

    pub fn set_asynchronous_delivery(&self, enabled: bool) -> Result<(), RtiError> {
        let mut state = self.write()?;
        match (state.asynchronous_delivery, enabled) {
            (true, true) => Err(RtiError::AsynchronousDeliveryAlreadyEnabled),
            (false, false) => Err(RtiError::AsynchronousDeliveryAlreadyDisabled),
            _ => {
                state.asynchronous_delivery = enabled;
                debug!("asynchronous delivery {}", if enabled { "enabled" } else { "disabled" });
                Ok(())
            }
        }
    }

    // Advance

    /// Claims the single outstanding-advance slot for `kind`
    pub fn begin_advance(&self, kind: AdvanceKind, time: LogicalTime) -> Result<(), RtiError> {
        let mut state = self.write()?;
        if state.is_advancing() {
            return Err(RtiError::InTimeAdvancingState {
                pending: advance_name(state.pending),
            });
        }
        if state.regulation_pending {
            return Err(RtiError::RequestForTimeRegulationPending);
        }
        if state.constrained_pending {
            return Err(RtiError::RequestForTimeConstrainedPending);
        }
        if time <= state.granted {
            return Err(RtiError::LogicalTimeAlreadyPassed {
                requested: time,
                granted: state.granted,
            });
        }
        state.pending = kind;
        state.requested = Some(time);
        debug!("{} to {}", advance_name(kind), time);
        Ok(())
    }

    pub fn abort_advance(&self) -> Result<(), RtiError> {
        let mut state = self.write()?;
        state.pending = AdvanceKind::None;
        state.requested = None;
        Ok(())
    }

    /// Applies a grant from the coordinator. `sweep` runs under the
    /// exclusive lock after the granted time moved and before the pending
    /// request is cleared. Returns `false` if the grant was stale.
    pub fn grant<F>(&self, time: LogicalTime, sweep: F) -> Result<bool, RtiError>
    where
        F: FnOnce(LogicalTime) -> Result<(), RtiError>,
    {
        let mut state = self.write()?;
        if !state.is_advancing() {
            warn!("grant to {} arrived with no advance outstanding, dropping", time);
            return Ok(false);
        }
        if time < state.granted {
            warn!("grant to {} is behind granted time {}, dropping", time, state.granted);
            return Ok(false);
        }

        state.granted = time;
        sweep(time)?;
        state.pending = AdvanceKind::None;
        state.requested = None;
        debug!("granted {}", time);
        Ok(true)
    }

    pub fn set_galt(&self, galt: Option<LogicalTime>) -> Result<(), RtiError> {
        self.write()?.galt = galt;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<TimeSnapshot, RtiError> {
        Ok(self.read()?.snapshot())
    }

    pub fn restore(&self, snapshot: &TimeSnapshot) -> Result<(), RtiError> {
        self.write()?.restore(snapshot);
        Ok(())
    }
}
