//! Roster representation.
//!
//! Contains the unit record, the tagged bench/board slot, the item bench and
//! the overall roster state.

pub mod inventory;
pub mod slot;
pub mod state;
pub mod unit;

/// Bench slots.
pub const BENCH_SIZE: usize = 9;
/// Board hexes.
pub const BOARD_SIZE: usize = 28;
/// Item bench slots.
pub const INVENTORY_SIZE: usize = 10;

pub use inventory::Inventory;
pub use slot::Slot;
pub use state::RosterState;
pub use unit::{Area, Location, PendingComponent, Unit, MAX_SLOT_UNITS};
