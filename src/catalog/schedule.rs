//! Round identifiers and the per-session round schedule.
//!
//! The schedule starts from the fixed tables below and is rewritten stage by
//! stage when encounter rounds shuffle what a round is. It is owned by the
//! round driver and only changed through its methods.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when parsing a round label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundIdError {
    #[error("round label '{0}' is not of the form <stage>-<round>")]
    Malformed(String),
}

/// A `stage-round` label such as `3-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct RoundId {
    pub stage: u8,
    pub round: u8,
}

impl RoundId {
    pub const fn new(stage: u8, round: u8) -> Self {
        RoundId { stage, round }
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stage, self.round)
    }
}

impl FromStr for RoundId {
    type Err = RoundIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RoundIdError::Malformed(s.to_string());
        let (stage, round) = s.trim().split_once('-').ok_or_else(malformed)?;
        let stage = stage.parse::<u8>().map_err(|_| malformed())?;
        let round = round.parse::<u8>().map_err(|_| malformed())?;
        Ok(RoundId { stage, round })
    }
}

impl TryFrom<String> for RoundId {
    type Error = RoundIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// What the driver does in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundKind {
    Portal,
    Carousel,
    Pve,
    Pvp,
    /// One-time bootstrap after the opening carousel.
    SecondRound,
    Encounter,
}

/// Side jobs that are tied to specific rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundFeature {
    Pickup,
    Anvil,
    Augment,
    ItemPlacement,
}

const PORTAL: &[&str] = &["1-1"];
const SECOND: &[&str] = &["1-2"];
const CAROUSEL: &[&str] = &["2-4", "3-4", "4-4", "5-4", "6-4", "7-4"];
const PVE: &[&str] = &["1-3", "1-4", "2-7", "3-7", "4-7", "5-7", "6-7", "7-7"];
const PVP: &[&str] = &[
    "2-1", "2-2", "2-3", "2-5", "2-6", "3-1", "3-2", "3-3", "3-5", "3-6", "4-1", "4-2", "4-3",
    "4-5", "4-6", "5-1", "5-2", "5-3", "5-5", "5-6", "6-1", "6-2", "6-3", "6-5", "6-6", "7-1",
    "7-2", "7-3", "7-5", "7-6",
];
const PICKUP: &[&str] = &["2-1", "3-1", "4-1", "5-1", "6-1", "7-1"];
const ANVIL: &[&str] = &["2-1", "2-5", "3-1", "3-2", "3-5", "4-1", "4-2", "5-1", "6-1", "7-1"];
const AUGMENT: &[&str] = &["2-1", "3-2", "4-2"];
const ITEM_PLACEMENT: &[&str] = &[
    "2-1", "2-5", "2-7", "3-2", "3-5", "4-2", "4-5", "5-2", "5-5", "5-7", "6-2", "6-5", "7-2",
    "7-5", "7-7",
];

const NORMAL_LEVELS: &[(&str, u32)] = &[("2-1", 4), ("2-5", 5), ("3-2", 6), ("4-1", 7), ("5-1", 8)];
const FAST8_LEVELS: &[(&str, u32)] = &[("2-1", 4), ("2-5", 5), ("3-2", 6), ("3-5", 7), ("4-1", 8)];

fn ids(labels: &[&str]) -> BTreeSet<RoundId> {
    labels.iter().filter_map(|l| l.parse::<RoundId>().ok()).collect()
}

fn levels(table: &[(&str, u32)]) -> BTreeMap<RoundId, u32> {
    table
        .iter()
        .filter_map(|(l, lvl)| l.parse::<RoundId>().ok().map(|id| (id, *lvl)))
        .collect()
}

/// Mutable per-session round tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSchedule {
    portal: BTreeSet<RoundId>,
    second: BTreeSet<RoundId>,
    carousel: BTreeSet<RoundId>,
    pve: BTreeSet<RoundId>,
    pvp: BTreeSet<RoundId>,
    encounter: BTreeSet<RoundId>,
    pickup: BTreeSet<RoundId>,
    anvil: BTreeSet<RoundId>,
    augment: BTreeSet<RoundId>,
    item_placement: BTreeSet<RoundId>,
    level_targets: BTreeMap<RoundId, u32>,
}

impl RoundSchedule {
    /// Builds the standard schedule. `fast8` selects the aggressive level table.
    pub fn standard(fast8: bool) -> Self {
        RoundSchedule {
            portal: ids(PORTAL),
            second: ids(SECOND),
            carousel: ids(CAROUSEL),
            pve: ids(PVE),
            pvp: ids(PVP),
            encounter: BTreeSet::new(),
            pickup: ids(PICKUP),
            anvil: ids(ANVIL),
            augment: ids(AUGMENT),
            item_placement: ids(ITEM_PLACEMENT),
            level_targets: if fast8 { levels(FAST8_LEVELS) } else { levels(NORMAL_LEVELS) },
        }
    }

    /// Classifies a round. Portal wins over PvP, PvP over PvE, and so on.
    pub fn classify(&self, id: RoundId) -> Option<RoundKind> {
        if self.portal.contains(&id) {
            Some(RoundKind::Portal)
        } else if self.pvp.contains(&id) {
            Some(RoundKind::Pvp)
        } else if self.pve.contains(&id) {
            Some(RoundKind::Pve)
        } else if self.carousel.contains(&id) {
            Some(RoundKind::Carousel)
        } else if self.second.contains(&id) {
            Some(RoundKind::SecondRound)
        } else if self.encounter.contains(&id) {
            Some(RoundKind::Encounter)
        } else {
            None
        }
    }

    pub fn has(&self, feature: RoundFeature, id: RoundId) -> bool {
        let set = match feature {
            RoundFeature::Pickup => &self.pickup,
            RoundFeature::Anvil => &self.anvil,
            RoundFeature::Augment => &self.augment,
            RoundFeature::ItemPlacement => &self.item_placement,
        };
        set.contains(&id)
    }

    /// Level the driver should buy up to in this round, if any.
    pub fn level_target(&self, id: RoundId) -> Option<u32> {
        self.level_targets.get(&id).copied()
    }

    /// Rewrites the tables for `stage` from the encounter icon strip.
    ///
    /// `icons[i]` describes round `stage-(i+1)`. The first icon is the round
    /// being played and is left alone. A carousel moves the following round's
    /// anvil and item placement along with it, and an encounter in the second
    /// slot of stages 3 and 4 pushes the augment one round back.
    pub fn apply_encounters(&mut self, stage: u8, icons: &[String]) {
        let other_stage = |id: &RoundId| id.stage != stage;
        self.carousel.retain(other_stage);
        self.pve.retain(other_stage);
        self.pvp.retain(other_stage);
        self.anvil.retain(other_stage);
        self.item_placement.retain(other_stage);

        for (index, icon) in icons.iter().enumerate().skip(1) {
            let round = RoundId::new(stage, index as u8 + 1);
            let next = RoundId::new(stage, index as u8 + 2);
            match icon.trim().to_lowercase().as_str() {
                "carousel" => {
                    self.carousel.insert(round);
                    self.anvil.insert(next);
                    self.item_placement.insert(next);
                }
                "pve" => {
                    self.pve.insert(round);
                }
                "pvp" => {
                    self.pvp.insert(round);
                }
                "encounter" => {
                    self.encounter.insert(round);
                    if index + 1 == 2 && (3..=4).contains(&stage) {
                        self.augment.insert(next);
                    }
                }
                other => {
                    tracing::warn!(%round, icon = other, "unrecognized round icon");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RoundId {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_round_labels() {
        assert_eq!(id("3-2"), RoundId::new(3, 2));
        assert_eq!(RoundId::new(4, 7).to_string(), "4-7");
        assert!("32".parse::<RoundId>().is_err());
        assert!("a-b".parse::<RoundId>().is_err());
    }

    #[test]
    fn standard_classification() {
        let s = RoundSchedule::standard(false);
        assert_eq!(s.classify(id("1-1")), Some(RoundKind::Portal));
        assert_eq!(s.classify(id("1-2")), Some(RoundKind::SecondRound));
        assert_eq!(s.classify(id("1-3")), Some(RoundKind::Pve));
        assert_eq!(s.classify(id("2-1")), Some(RoundKind::Pvp));
        assert_eq!(s.classify(id("3-4")), Some(RoundKind::Carousel));
        assert_eq!(s.classify(id("9-9")), None);
        assert!(s.has(RoundFeature::Augment, id("3-2")));
        assert_eq!(s.level_target(id("4-1")), Some(7));
        assert_eq!(RoundSchedule::standard(true).level_target(id("4-1")), Some(8));
    }

    #[test]
    fn encounter_strip_rewrites_stage() {
        let mut s = RoundSchedule::standard(false);
        let icons: Vec<String> = ["pvp", "encounter", "pvp", "carousel", "pvp", "pvp", "pve"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        s.apply_encounters(3, &icons);
        assert_eq!(s.classify(id("3-2")), Some(RoundKind::Encounter));
        assert_eq!(s.classify(id("3-4")), Some(RoundKind::Carousel));
        assert_eq!(s.classify(id("3-7")), Some(RoundKind::Pve));
        assert!(s.has(RoundFeature::Augment, id("3-3")));
        assert!(s.has(RoundFeature::Anvil, id("3-5")));
        // Slot one is the current round and is not re-added.
        assert_eq!(s.classify(id("3-1")), None);
        // Other stages untouched.
        assert_eq!(s.classify(id("4-1")), Some(RoundKind::Pvp));
    }
}
