//! Time-sampled series: a current sample plus its ascending history.
//!
//! Charts read decayed series through these helpers. A [`Timeline`] is an
//! immutable value received from upstream; every operation here returns a
//! new value.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// A value observed at a nanosecond instant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimedSample<T> {
    pub timestamp: u64,
    pub data: T,
}

impl<T> TimedSample<T> {
    pub fn new(timestamp: u64, data: T) -> Self {
        Self { timestamp, data }
    }
}

/// The latest sample of a series plus older samples in ascending order.
///
/// Every history timestamp is strictly less than its successor and than
/// `current.timestamp`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Timeline<T> {
    pub current: TimedSample<T>,
    pub history: Vec<TimedSample<T>>,
}

impl<T> Timeline<T> {
    /// Build a timeline, checking the ordering invariant.
    pub fn new(current: TimedSample<T>, history: Vec<TimedSample<T>>) -> Result<Self, TimelineError> {
        let timeline = Self { current, history };
        timeline.validate()?;
        Ok(timeline)
    }

    /// A timeline with no history.
    pub fn single(current: TimedSample<T>) -> Self {
        Self {
            current,
            history: Vec::new(),
        }
    }

    /// Check the ordering invariant on a timeline built elsewhere (e.g. deserialized).
    pub fn validate(&self) -> Result<(), TimelineError> {
        for (index, sample) in self.history.iter().enumerate() {
            let next = self
                .history
                .get(index + 1)
                .map_or(self.current.timestamp, |s| s.timestamp);
            if sample.timestamp >= next {
                return Err(TimelineError::Unordered {
                    index,
                    timestamp: sample.timestamp,
                });
            }
        }
        Ok(())
    }

    pub fn current(&self) -> &TimedSample<T> {
        &self.current
    }

    /// The oldest sample: the first history entry, or `current` when history is empty.
    pub fn first(&self) -> &TimedSample<T> {
        self.history.first().unwrap_or(&self.current)
    }

    /// Number of samples including `current`.
    pub fn len(&self) -> usize {
        self.history.len() + 1
    }

    /// A timeline always holds at least its current sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Samples from oldest to `current`.
    pub fn iter(&self) -> impl Iterator<Item = &TimedSample<T>> {
        self.history.iter().chain(std::iter::once(&self.current))
    }

    /// The newest sample taken at or before `timestamp`, if any.
    pub fn latest_at_or_before(&self, timestamp: u64) -> Option<&TimedSample<T>> {
        if self.current.timestamp <= timestamp {
            return Some(&self.current);
        }
        let idx = self.history.partition_point(|s| s.timestamp <= timestamp);
        idx.checked_sub(1).map(|i| &self.history[i])
    }

    /// Apply `f` to every sample.
    ///
    /// If `f` yields `None` for the current sample the whole series does not
    /// apply and the result is `None`. History samples mapping to `None` are
    /// dropped. Order and timestamps are preserved.
    pub fn map<U, F>(&self, mut f: F) -> Option<Timeline<U>>
    where
        F: FnMut(&T) -> Option<U>,
    {
        self.map_timed(|sample| f(&sample.data))
    }

    /// Like [`map`](Self::map), but `f` also sees each sample's timestamp.
    pub fn map_timed<U, F>(&self, mut f: F) -> Option<Timeline<U>>
    where
        F: FnMut(&TimedSample<T>) -> Option<U>,
    {
        let current = TimedSample::new(self.current.timestamp, f(&self.current)?);
        let history = self
            .history
            .iter()
            .filter_map(|s| f(s).map(|data| TimedSample::new(s.timestamp, data)))
            .collect();
        Some(Timeline { current, history })
    }
}

impl<T: ToPrimitive> Timeline<T> {
    /// Widen an integer series to `f64` for charting.
    ///
    /// Exact up to 2^53; larger values round to the nearest double. Returns
    /// `None` only if the current value has no `f64` representation, which
    /// cannot happen for primitive integers.
    pub fn to_number_timeline(&self) -> Option<Timeline<f64>> {
        self.map(|v| v.to_f64())
    }
}
