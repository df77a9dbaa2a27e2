//! Domain types for the signal engine.

pub mod bar;
pub mod direction;

pub use bar::{Bar, BarError, MAX_PRICE};
pub use direction::{Direction, Label, PositionState};

/// Symbol type alias
pub type Symbol = String;
