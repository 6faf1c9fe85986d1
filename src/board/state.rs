//! Roster state.
//!
//! Holds the engine's belief about the bench, the board and the item bench
//! for one session, together with the acquisition targets and the one-shot
//! flags that change policy as the match goes on.

use std::collections::{HashMap, HashSet};

use super::inventory::Inventory;
use super::slot::Slot;
use super::unit::Unit;
use super::{BENCH_SIZE, BOARD_SIZE};
use crate::catalog::Composition;

/// The engine's view of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterState {
    pub board: Vec<Slot>,
    pub bench: Vec<Slot>,
    /// Names of tracked units on the board.
    pub board_names: HashSet<String>,
    /// Board slots holding unconfirmed units, in placement order.
    pub unconfirmed_board: Vec<usize>,
    /// Reserved board slots for unconfirmed units, in fill order.
    pub unknown_slots: Vec<usize>,
    /// Copies still wanted per unit name.
    pub acquisition_targets: HashMap<String, i32>,
    pub inventory: Inventory,
    pub effective_level: u32,
    pub board_weight_used: u32,
    pub size_relic_held: bool,
    pub final_comp_locked: bool,
    pub low_health_mode: bool,
    pub lucky_gloves: bool,
}

impl RosterState {
    /// Fresh state seeded from the active composition.
    pub fn new(comp: &Composition) -> Self {
        RosterState {
            board: vec![Slot::Empty; BOARD_SIZE],
            bench: vec![Slot::Empty; BENCH_SIZE],
            board_names: HashSet::new(),
            unconfirmed_board: Vec::new(),
            unknown_slots: comp.unknown_slots(),
            acquisition_targets: comp.acquisition_targets(),
            inventory: Inventory::default(),
            effective_level: 1,
            board_weight_used: 0,
            size_relic_held: false,
            final_comp_locked: false,
            low_health_mode: false,
            lucky_gloves: false,
        }
    }

    /// Board weight the roster may field.
    pub fn capacity(&self) -> u32 {
        self.effective_level + u32::from(self.size_relic_held)
    }

    pub fn is_wanted(&self, name: &str) -> bool {
        self.acquisition_targets.get(name).is_some_and(|n| *n > 0)
    }

    pub fn first_empty_bench(&self) -> Option<usize> {
        self.bench.iter().position(Slot::is_empty)
    }

    pub fn free_bench_slots(&self) -> usize {
        self.bench.iter().filter(|s| s.is_empty()).count()
    }

    /// Bench occupancy as the engine believes it.
    pub fn bench_occupancy(&self) -> [bool; BENCH_SIZE] {
        let mut occupied = [false; BENCH_SIZE];
        for (o, slot) in occupied.iter_mut().zip(&self.bench) {
            *o = !slot.is_empty();
        }
        occupied
    }

    /// First tracked bench unit whose name is not on the board yet.
    pub fn owned_off_board(&self) -> Option<usize> {
        self.bench
            .iter()
            .position(|s| s.unit().is_some_and(|u| !self.board_names.contains(&u.name)))
    }

    pub fn first_unconfirmed_bench(&self) -> Option<usize> {
        self.bench.iter().position(|s| matches!(s, Slot::Unconfirmed(_)))
    }

    /// Whether an unconfirmed board occupant carries `name`.
    pub fn unconfirmed_on_board(&self, name: &str) -> bool {
        self.unconfirmed_board
            .iter()
            .any(|&i| matches!(&self.board[i], Slot::Unconfirmed(n) if n == name))
    }

    pub fn board_units(&self) -> impl Iterator<Item = &Unit> {
        self.board.iter().filter_map(Slot::unit)
    }

    pub fn bench_units(&self) -> impl Iterator<Item = &Unit> {
        self.bench.iter().filter_map(Slot::unit)
    }

    /// Board slot of the tracked unit called `name`.
    pub fn board_slot_of(&self, name: &str) -> Option<usize> {
        self.board.iter().position(|s| s.unit().is_some_and(|u| u.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::unit::Location;
    use crate::catalog::Catalog;

    fn state() -> RosterState {
        let catalog = Catalog::builtin().unwrap();
        RosterState::new(catalog.comp("Shurima Sorcerers").unwrap())
    }

    #[test]
    fn new_state_is_empty_and_seeded() {
        let s = state();
        assert_eq!(s.board.len(), BOARD_SIZE);
        assert_eq!(s.bench.len(), BENCH_SIZE);
        assert_eq!(s.free_bench_slots(), BENCH_SIZE);
        assert!(s.is_wanted("Zyra"));
        assert!(!s.is_wanted("Garen"));
        assert!(!s.unknown_slots.contains(&22));
    }

    #[test]
    fn relic_raises_capacity() {
        let mut s = state();
        s.effective_level = 7;
        assert_eq!(s.capacity(), 7);
        s.size_relic_held = true;
        assert_eq!(s.capacity(), 8);
    }

    #[test]
    fn bench_queries() {
        let mut s = state();
        s.bench[2] = Slot::Unconfirmed("Garen".into());
        s.bench[4] = Slot::Tracked(Box::new(Unit::new("Zyra", Location::bench(4))));
        assert_eq!(s.first_empty_bench(), Some(0));
        assert_eq!(s.first_unconfirmed_bench(), Some(2));
        assert_eq!(s.owned_off_board(), Some(4));
        s.board_names.insert("Zyra".into());
        assert_eq!(s.owned_off_board(), None);
        let occ = s.bench_occupancy();
        assert!(occ[2] && occ[4] && !occ[0]);
    }
}
