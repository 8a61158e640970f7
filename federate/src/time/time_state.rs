use hla_shared::{AdvanceKind, LogicalTime, LogicalTimeInterval, OrderType, TimeSnapshot};

/// Where an inbound update, interaction or removal goes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InboundRoute {
    /// Straight into the delivery queue
    Deliver,
    /// Into the hold-aside queue until the next release
    Hold,
    /// Into the scheduled structure until `0` is granted
    Schedule(LogicalTime),
}

/// Logical-time state of one federate
#[derive(Clone, Debug)]
pub struct TimeState {
    pub regulating: bool,
    pub constrained: bool,
    pub asynchronous_delivery: bool,
    pub lookahead: LogicalTimeInterval,
    pub granted: LogicalTime,
    pub pending: AdvanceKind,
    pub requested: Option<LogicalTime>,
    pub regulation_pending: bool,
    pub constrained_pending: bool,
    pub galt: Option<LogicalTime>,
}

impl TimeState {
    pub fn new(asynchronous_delivery: bool) -> Self {
        Self {
            regulating: false,
            constrained: false,
            asynchronous_delivery,
            lookahead: LogicalTimeInterval::ZERO,
            granted: LogicalTime::INITIAL,
            pending: AdvanceKind::None,
            requested: None,
            regulation_pending: false,
            constrained_pending: false,
            galt: None,
        }
    }

    pub fn is_advancing(&self) -> bool {
        self.pending.is_pending()
    }

    /// TIMESTAMP iff regulating and a time was supplied
    pub fn sent_order(&self, time: Option<LogicalTime>) -> OrderType {
        if self.regulating && time.is_some() {
            OrderType::Timestamp
        } else {
            OrderType::Receive
        }
    }

    /// An unconstrained federate cannot honor timestamp order, so it
    /// downgrades everything to RECEIVE
    pub fn received_order(&self, sent_order: OrderType) -> OrderType {
        if sent_order == OrderType::Timestamp && self.constrained {
            OrderType::Timestamp
        } else {
            OrderType::Receive
        }
    }

    /// Receive-order callbacks are held while constrained and sitting on a
    /// granted time, unless asynchronous delivery is on
    pub fn should_hold_receive_order(&self) -> bool {
        self.constrained && !self.is_advancing() && !self.asynchronous_delivery
    }

    /// Earliest time a timestamp-order send may carry
    pub fn earliest_send_time(&self) -> LogicalTime {
        self.granted.add(self.lookahead)
    }

    pub fn route_inbound(
        &self,
        sent_order: OrderType,
        time: Option<LogicalTime>,
    ) -> (OrderType, InboundRoute) {
        match (self.received_order(sent_order), time) {
            (OrderType::Timestamp, Some(time)) => {
                if time > self.granted {
                    (OrderType::Timestamp, InboundRoute::Schedule(time))
                } else {
                    (OrderType::Timestamp, InboundRoute::Deliver)
                }
            }
            _ => {
                if self.should_hold_receive_order() {
                    (OrderType::Receive, InboundRoute::Hold)
                } else {
                    (OrderType::Receive, InboundRoute::Deliver)
                }
            }
        }
    }

    pub fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot {
            regulating: self.regulating,
            constrained: self.constrained,
            asynchronous_delivery: self.asynchronous_delivery,
            lookahead: self.lookahead,
            granted: self.granted,
        }
    }

    pub fn restore(&mut self, snapshot: &TimeSnapshot) {
        self.regulating = snapshot.regulating;
        self.constrained = snapshot.constrained;
        self.asynchronous_delivery = snapshot.asynchronous_delivery;
        self.lookahead = snapshot.lookahead;
        self.granted = snapshot.granted;
        self.pending = AdvanceKind::None;
        self.requested = None;
        self.regulation_pending = false;
        self.constrained_pending = false;
    }
}
