use std::{cmp::Ordering, fmt};

use crate::RtiError;

/// A point on the federation's logical time axis.
///
/// Values are finite and non-negative by construction, which is what makes
/// the total order below sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalTime(f64);

impl LogicalTime {
    pub const INITIAL: LogicalTime = LogicalTime(0.0);
    pub const FINAL: LogicalTime = LogicalTime(f64::MAX);

    pub fn new(value: f64) -> Result<Self, RtiError> {
        if !value.is_finite() {
            return Err(RtiError::InvalidLogicalTime {
                value: format!("{value}"),
                reason: "logical time must be finite",
            });
        }
        if value < 0.0 {
            return Err(RtiError::InvalidLogicalTime {
                value: format!("{value}"),
                reason: "logical time must not be negative",
            });
        }
        // folds -0.0 into 0.0 so equality and ordering agree
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_initial(&self) -> bool {
        self.0 == 0.0
    }

    /// Time after advancing by `interval`, saturating at [`LogicalTime::FINAL`]
    pub fn add(&self, interval: LogicalTimeInterval) -> LogicalTime {
        let sum = self.0 + interval.0;
        if sum.is_finite() {
            LogicalTime(sum)
        } else {
            LogicalTime::FINAL
        }
    }
}

impl Eq for LogicalTime {}

impl PartialOrd for LogicalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogicalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative distance between two logical times, used for lookahead
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalTimeInterval(f64);

impl LogicalTimeInterval {
    pub const ZERO: LogicalTimeInterval = LogicalTimeInterval(0.0);

    pub fn new(value: f64) -> Result<Self, RtiError> {
        if !value.is_finite() || value < 0.0 {
            return Err(RtiError::InvalidLookahead {
                value: format!("{value}"),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Eq for LogicalTimeInterval {}

impl fmt::Display for LogicalTimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
