//! Rational time values and ranges.
//!
//! A timeline has no global frame rate: every time value carries its own
//! rate, and arithmetic between values at different rates happens at the
//! higher of the two.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A point in time expressed as `value` units at `rate` units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalTime {
    pub value: f64,
    pub rate: f64,
}

impl RationalTime {
    pub fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// The value of this time expressed at `new_rate`.
    pub fn value_rescaled_to(&self, new_rate: f64) -> f64 {
        if new_rate == self.rate {
            self.value
        } else {
            self.value * new_rate / self.rate
        }
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, other: RationalTime) -> RationalTime {
        if self.rate < other.rate {
            RationalTime::new(self.value_rescaled_to(other.rate) + other.value, other.rate)
        } else {
            RationalTime::new(self.value + other.value_rescaled_to(self.rate), self.rate)
        }
    }
}

/// A span of time: a start and a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// Convenience constructor for a range whose start and duration share a rate.
    pub fn from_frames(start: f64, duration: f64, rate: f64) -> Self {
        Self::new(RationalTime::new(start, rate), RationalTime::new(duration, rate))
    }

    /// The first time past the end of the range (`start_time + duration`).
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time + self.duration
    }
}
