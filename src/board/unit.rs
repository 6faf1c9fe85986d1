//! Roster members.
//!
//! A [`Unit`] is the record the engine keeps for one tracked unit: where it
//! stands, what it should be given and what it already holds. Item capacity is
//! counted in slot-units: a finished item takes two, a lone component one, and
//! a unit holds at most [`MAX_SLOT_UNITS`].

use crate::client::screen::{Point, BENCH_LOC, BOARD_LOC};

/// Item capacity of a unit in slot-units (three finished items).
pub const MAX_SLOT_UNITS: u8 = 6;

/// Which side of the roster a slot is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Bench,
    Board,
}

/// A bench or board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub area: Area,
    pub index: usize,
}

impl Location {
    pub const fn bench(index: usize) -> Self {
        Location { area: Area::Bench, index }
    }

    pub const fn board(index: usize) -> Self {
        Location { area: Area::Board, index }
    }

    /// Screen point of the slot. Out-of-range indices clamp to the last slot.
    pub fn anchor(&self) -> Point {
        match self.area {
            Area::Bench => BENCH_LOC[self.index.min(BENCH_LOC.len() - 1)],
            Area::Board => BOARD_LOC[self.index.min(BOARD_LOC.len() - 1)],
        }
    }
}

/// A component held while waiting for its craft partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComponent {
    pub component: String,
    /// Finished item the component was started for, if any.
    pub target: Option<String>,
    pub partner: Option<String>,
}

/// A tracked roster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub location: Location,
    /// Best-in-slot items still to give, in priority order.
    pub desired_items: Vec<String>,
    pub secondary_items: Vec<String>,
    /// Every item physically given, components included.
    pub placed_items: Vec<String>,
    /// Finished items held.
    pub completed_items: Vec<String>,
    pub slot_units: u8,
    pub pending: Option<PendingComponent>,
    pub traits: Vec<String>,
    pub board_weight: u32,
    pub board_position: Option<usize>,
    pub is_core: bool,
    pub cost: u32,
}

impl Unit {
    /// A unit with neutral defaults: weight 1, cost 1, no build.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Unit {
            name: name.into(),
            location,
            desired_items: Vec::new(),
            secondary_items: Vec::new(),
            placed_items: Vec::new(),
            completed_items: Vec::new(),
            slot_units: 0,
            pending: None,
            traits: Vec::new(),
            board_weight: 1,
            board_position: None,
            is_core: false,
            cost: 1,
        }
    }

    pub fn anchor(&self) -> Point {
        self.location.anchor()
    }

    pub fn free_slot_units(&self) -> u8 {
        MAX_SLOT_UNITS.saturating_sub(self.slot_units)
    }

    pub fn holds_nothing(&self) -> bool {
        self.slot_units == 0
    }

    /// Whether the unit still has a build to work on.
    pub fn needs_items(&self) -> bool {
        self.free_slot_units() > 0 && (!self.desired_items.is_empty() || self.pending.is_some())
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    fn credit(&mut self, item: &str, fills: &str, full: bool) {
        self.completed_items.push(item.to_string());
        self.slot_units = if full { MAX_SLOT_UNITS } else { (self.slot_units + 2).min(MAX_SLOT_UNITS) };
        if let Some(i) = self.desired_items.iter().position(|d| d == fills) {
            self.desired_items.remove(i);
        } else if let Some(i) = self.secondary_items.iter().position(|d| d == fills) {
            self.secondary_items.remove(i);
        }
    }

    /// Gives a finished item that satisfies the build entry `fills`.
    pub fn give_finished(&mut self, item: &str, fills: &str) {
        self.placed_items.push(item.to_string());
        self.credit(item, fills, false);
    }

    /// Gives an item that occupies every item slot.
    pub fn give_full_completion(&mut self, item: &str, fills: &str) {
        self.placed_items.push(item.to_string());
        self.credit(item, fills, true);
    }

    /// Gives two components at once, which combine into `result`.
    pub fn craft(&mut self, a: &str, b: &str, result: &str, full: bool) {
        self.placed_items.push(a.to_string());
        self.placed_items.push(b.to_string());
        self.credit(result, result, full);
    }

    /// Gives one component towards `target`. The target leaves the build list
    /// until the component is completed or stripped.
    pub fn start_component(&mut self, component: &str, target: Option<&str>, partner: Option<&str>) {
        self.placed_items.push(component.to_string());
        self.slot_units = (self.slot_units + 1).min(MAX_SLOT_UNITS);
        if let Some(target) = target {
            if let Some(i) = self.desired_items.iter().position(|d| d == target) {
                self.desired_items.remove(i);
            } else if let Some(i) = self.secondary_items.iter().position(|d| d == target) {
                self.secondary_items.remove(i);
            }
        }
        self.pending = Some(PendingComponent {
            component: component.to_string(),
            target: target.map(str::to_string),
            partner: partner.map(str::to_string),
        });
    }

    /// Gives the partner of the pending component, finishing `result`.
    pub fn complete_component(&mut self, component: &str, result: &str) {
        if self.pending.take().is_some() {
            self.slot_units = self.slot_units.saturating_sub(1);
        }
        self.placed_items.push(component.to_string());
        self.credit(result, result, false);
    }

    /// Removes the pending component. A planned target goes back to the
    /// front of the build list.
    pub fn strip_component(&mut self) -> Option<PendingComponent> {
        let pending = self.pending.take()?;
        self.slot_units = self.slot_units.saturating_sub(1);
        if let Some(i) = self.placed_items.iter().rposition(|p| *p == pending.component) {
            self.placed_items.remove(i);
        }
        if let Some(target) = &pending.target {
            self.desired_items.insert(0, target.clone());
        }
        Some(pending)
    }

    /// Replaces a held finished item with its upgraded version.
    pub fn upgrade_item(&mut self, base: &str, upgraded: &str) -> bool {
        match self.completed_items.iter_mut().find(|c| *c == base) {
            Some(slot) => {
                *slot = upgraded.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Unit {
        let mut u = Unit::new("Zyra", Location::board(22));
        u.desired_items = vec!["BlueBuff".into(), "EdgeofNight".into()];
        u.secondary_items = vec!["Morellonomicon".into()];
        u.traits = vec!["Shurima".into(), "Sorcerer".into()];
        u
    }

    #[test]
    fn finished_items_take_two_units() {
        let mut u = unit();
        u.give_finished("BlueBuff", "BlueBuff");
        assert_eq!(u.slot_units, 2);
        assert_eq!(u.desired_items, vec!["EdgeofNight"]);
        assert_eq!(u.completed_items, vec!["BlueBuff"]);
        u.give_finished("Morellonomicon", "Morellonomicon");
        assert!(u.secondary_items.is_empty());
        assert_eq!(u.free_slot_units(), 2);
    }

    #[test]
    fn component_lifecycle() {
        let mut u = unit();
        u.start_component("BFSword", Some("EdgeofNight"), Some("ChainVest"));
        assert_eq!(u.slot_units, 1);
        assert_eq!(u.desired_items, vec!["BlueBuff"]);
        assert_eq!(u.placed_items, vec!["BFSword"]);

        let stripped = u.strip_component().unwrap();
        assert_eq!(stripped.component, "BFSword");
        assert_eq!(u.slot_units, 0);
        assert!(u.placed_items.is_empty());
        assert_eq!(u.desired_items[0], "EdgeofNight");

        u.start_component("BFSword", Some("EdgeofNight"), Some("ChainVest"));
        u.complete_component("ChainVest", "EdgeofNight");
        assert_eq!(u.slot_units, 2);
        assert!(u.pending.is_none());
        assert_eq!(u.completed_items, vec!["EdgeofNight"]);
        assert_eq!(u.placed_items, vec!["BFSword", "ChainVest"]);
    }

    #[test]
    fn full_completion_and_upgrade() {
        let mut u = unit();
        u.give_full_completion("ThiefsGloves", "ThiefsGloves");
        assert_eq!(u.slot_units, MAX_SLOT_UNITS);
        assert!(!u.needs_items());
        assert!(u.upgrade_item("ThiefsGloves", "RascalsGloves"));
        assert!(!u.upgrade_item("BlueBuff", "BlueBlessing"));
        assert_eq!(u.completed_items, vec!["RascalsGloves"]);
    }

    #[test]
    fn traits_match_case_insensitively() {
        let u = unit();
        assert!(u.has_trait("sorcerer"));
        assert!(!u.has_trait("Noxus"));
        assert_eq!(u.anchor(), BOARD_LOC[22]);
    }
}
