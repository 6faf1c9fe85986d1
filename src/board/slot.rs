//! Tagged bench/board slot.

use super::unit::Unit;

/// Marker name for an occupant whose identity could not be read.
pub const UNREADABLE: &str = "?";

/// Contents of one bench or board slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    /// Occupied by a unit the engine does not track. The name is the last
    /// read, or [`UNREADABLE`].
    Unconfirmed(String),
    Tracked(Box<Unit>),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Slot::Tracked(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn unit_mut(&mut self) -> Option<&mut Unit> {
        match self {
            Slot::Tracked(unit) => Some(unit),
            _ => None,
        }
    }

    /// Name of the occupant, tracked or not.
    pub fn name(&self) -> Option<&str> {
        match self {
            Slot::Empty => None,
            Slot::Unconfirmed(name) => Some(name),
            Slot::Tracked(unit) => Some(&unit.name),
        }
    }

    /// Empties the slot and returns what was in it.
    pub fn take(&mut self) -> Slot {
        std::mem::take(self)
    }
}
