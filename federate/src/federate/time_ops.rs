use hla_shared::{
    AdvanceKind, Callback, LogicalTime, LogicalTimeInterval, Request, Response, RtiError,
};

use super::Federate;

fn expect_time(response: Response, operation: &'static str) -> Result<LogicalTime, RtiError> {
    match response {
        Response::Time(time) => Ok(time),
        _ => Err(RtiError::UnexpectedResponse { operation }),
    }
}

impl Federate {
    // Regulation

    /// Confirmed by a coordinator round-trip carrying the federate's
    /// logical time; queues `TimeRegulationEnabled`
    pub fn enable_time_regulation(&self, lookahead: LogicalTimeInterval) -> Result<(), RtiError> {
        let _active = self.state.check_active("enableTimeRegulation")?;
        self.time.begin_enable_regulation()?;

        let time = match self
            .connection
            .request(Request::EnableTimeRegulation { lookahead })
            .and_then(|response| expect_time(response, "enableTimeRegulation"))
        {
            Ok(time) => time,
            Err(error) => {
                self.time.abort_enable_regulation()?;
                return Err(error);
            }
        };

        let time = self.time.complete_enable_regulation(lookahead, time)?;
        self.pipeline
            .add(Callback::TimeRegulationEnabled { time }, false)
    }

    pub fn disable_time_regulation(&self) -> Result<(), RtiError> {
        let _active = self.state.check_active("disableTimeRegulation")?;
        self.time.check_regulating()?;
        self.connection.acknowledge(Request::DisableTimeRegulation)?;
        self.time.disable_regulation()
    }

    pub fn modify_lookahead(&self, lookahead: LogicalTimeInterval) -> Result<(), RtiError> {
        let _active = self.state.check_active("modifyLookahead")?;
        self.time.check_modify_lookahead()?;
        self.connection
            .acknowledge(Request::ModifyLookahead { lookahead })?;
        self.time.set_lookahead(lookahead)
    }

    // Constrained

    pub fn enable_time_constrained(&self) -> Result<(), RtiError> {
        let _active = self.state.check_active("enableTimeConstrained")?;
        self.time.begin_enable_constrained()?;

        let time = match self
            .connection
            .request(Request::EnableTimeConstrained)
            .and_then(|response| expect_time(response, "enableTimeConstrained"))
        {
            Ok(time) => time,
            Err(error) => {
                self.time.abort_enable_constrained()?;
                return Err(error);
            }
        };

        let time = self.time.complete_enable_constrained(time)?;
        self.pipeline
            .add(Callback::TimeConstrainedEnabled { time }, false)
    }

    /// Everything scheduled or held becomes deliverable at once
    pub fn disable_time_constrained(&self) -> Result<(), RtiError> {
        let _active = self.state.check_active("disableTimeConstrained")?;
        self.time.check_constrained()?;
        self.connection.acknowledge(Request::DisableTimeConstrained)?;
        self.time.disable_constrained()?;
        self.release_all_scheduled()?;
        self.pipeline.release_held()?;
        Ok(())
    }

    // Asynchronous delivery

    pub fn enable_asynchronous_delivery(&self) -> Result<(), RtiError> {
        let _active = self.state.check_active("enableAsynchronousDelivery")?;
        self.time.set_asynchronous_delivery(true)?;
        self.pipeline.release_held()?;
        Ok(())
    }

    pub fn disable_asynchronous_delivery(&self) -> Result<(), RtiError> {
        let _active = self.state.check_active("disableAsynchronousDelivery")?;
        self.time.set_asynchronous_delivery(false)
    }

    // Advance

    pub fn time_advance_request(&self, time: LogicalTime) -> Result<(), RtiError> {
        self.advance(AdvanceKind::TimeAdvanceRequest, time, "timeAdvanceRequest")
    }

    pub fn time_advance_request_available(&self, time: LogicalTime) -> Result<(), RtiError> {
        self.advance(
            AdvanceKind::TimeAdvanceRequestAvailable,
            time,
            "timeAdvanceRequestAvailable",
        )
    }

    pub fn next_event_request(&self, time: LogicalTime) -> Result<(), RtiError> {
        self.advance(AdvanceKind::NextEventRequest, time, "nextEventRequest")
    }

    pub fn next_event_request_available(&self, time: LogicalTime) -> Result<(), RtiError> {
        self.advance(
            AdvanceKind::NextEventRequestAvailable,
            time,
            "nextEventRequestAvailable",
        )
    }

    /// Like a time-advance request, but every scheduled callback is
    /// released right away
    pub fn flush_queue_request(&self, time: LogicalTime) -> Result<(), RtiError> {
        self.advance(AdvanceKind::FlushQueueRequest, time, "flushQueueRequest")
    }

    fn advance(
        &self,
        kind: AdvanceKind,
        time: LogicalTime,
        operation: &'static str,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active(operation)?;
        self.time.begin_advance(kind, time)?;

        if let Err(error) = self
            .connection
            .acknowledge(Request::TimeAdvance { kind, time })
        {
            self.time.abort_advance()?;
            return Err(error);
        }

        // the federate is advancing now, so nothing needs holding
        self.pipeline.release_held()?;
        if kind == AdvanceKind::FlushQueueRequest {
            self.release_all_scheduled()?;
        }
        Ok(())
    }

    /// Flushes the scheduled structure and forgets the instances whose
    /// removal it released
    fn release_all_scheduled(&self) -> Result<(), RtiError> {
        let released = self.pipeline.release_all_scheduled()?;
        self.objects.removed(&released.removed_objects)
    }

    // Queries

    pub fn query_logical_time(&self) -> Result<LogicalTime, RtiError> {
        self.state.check_joined()?;
        self.time.query_logical_time()
    }

    pub fn query_lookahead(&self) -> Result<LogicalTimeInterval, RtiError> {
        self.state.check_joined()?;
        self.time.query_lookahead()
    }

    /// `None` while no federate in the federation is regulating
    pub fn query_galt(&self) -> Result<Option<LogicalTime>, RtiError> {
        self.state.check_joined()?;
        self.time.query_galt()
    }

    pub fn query_lits(&self) -> Result<Option<LogicalTime>, RtiError> {
        self.state.check_joined()?;
        let earliest = self.pipeline.earliest_scheduled()?;
        self.time.query_lits(earliest)
    }

    pub fn is_time_regulating(&self) -> Result<bool, RtiError> {
        self.time.is_regulating()
    }

    pub fn is_time_constrained(&self) -> Result<bool, RtiError> {
        self.time.is_constrained()
    }

    pub fn pending_time_advance(&self) -> Result<AdvanceKind, RtiError> {
        self.time.pending_advance()
    }
}
