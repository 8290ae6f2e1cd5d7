//! Race outcome model.
//!
//! The upstream dataset encodes "did not finish" as a finish time of zero
//! seconds. That convention is kept on the wire, but internally the outcome is
//! a tagged value so a DNF can never leak a zero into a numeric aggregate.

use serde::{Deserialize, Serialize};

/// Outcome of a participant's race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceOutcome {
    /// Reached the finish line in the given number of elapsed seconds.
    Finished(u64),
    /// Did not reach the finish line.
    DidNotFinish,
}

impl RaceOutcome {
    /// Build an outcome from the dataset's seconds-with-zero-sentinel field.
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds > 0 {
            RaceOutcome::Finished(seconds)
        } else {
            RaceOutcome::DidNotFinish
        }
    }

    /// Finish time in seconds, if the participant finished.
    pub fn finish_seconds(&self) -> Option<u64> {
        match self {
            RaceOutcome::Finished(seconds) => Some(*seconds),
            RaceOutcome::DidNotFinish => None,
        }
    }

    /// Whether the participant finished the race.
    pub fn is_finisher(&self) -> bool {
        matches!(self, RaceOutcome::Finished(_))
    }

    /// The wire representation: finish seconds, with 0 meaning DNF.
    pub fn as_sentinel_seconds(&self) -> u64 {
        self.finish_seconds().unwrap_or(0)
    }
}

impl Default for RaceOutcome {
    fn default() -> Self {
        RaceOutcome::DidNotFinish
    }
}

impl Serialize for RaceOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.as_sentinel_seconds())
    }
}

impl<'de> Deserialize<'de> for RaceOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Ok(RaceOutcome::from_seconds(seconds))
    }
}
