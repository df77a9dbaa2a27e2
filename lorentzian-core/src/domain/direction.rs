//! Ternary direction used for training labels and the persistent signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market direction: short (-1), neutral (0) or long (+1).
///
/// Serialized as its integer value so output records read `-1 / 0 / 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Short,
    #[default]
    Neutral,
    Long,
}

/// Training label attached to a historical bar.
pub type Label = Direction;

impl Direction {
    /// Label from the sign of a price change.
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Long
        } else if change < 0.0 {
            Self::Short
        } else {
            Self::Neutral
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Self::Short => -1,
            Self::Neutral => 0,
            Self::Long => 1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> i8 {
        d.value()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Self::Short),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Long),
            other => Err(format!("direction must be -1, 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Neutral => write!(f, "neutral"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Position held by the caller, reported on every bar.
///
/// The engine never tracks positions itself; this only suppresses
/// duplicate entries in the held direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionState {
    #[default]
    Flat,
    Long,
    Short,
}
