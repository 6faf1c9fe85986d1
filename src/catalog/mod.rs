//! Composition catalog.
//!
//! Loads the unit table and the target compositions from JSON and answers
//! read-only lookups against them. A catalog is built once at session start
//! and never changes afterwards.

pub mod items;
pub mod schedule;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::board::BOARD_SIZE;

/// Catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/comps.json");

/// Errors that can occur while loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown composition: '{0}'")]
    UnknownComposition(String),

    #[error("composition '{comp}' lists '{unit}', which is not in the unit table")]
    UnknownUnit { comp: String, unit: String },

    #[error("composition '{comp}' places '{unit}' at board slot {position}, outside the board")]
    BadBoardPosition { comp: String, unit: String, position: usize },

    #[error("composition '{comp}' places two units at board slot {position}")]
    DuplicatePosition { comp: String, position: usize },

    #[error("composition '{comp}' reserves board slot {slot} for unconfirmed units, but it is off the board, repeated or taken by a member")]
    BadUnknownSlot { comp: String, slot: usize },
}

fn default_board_size() -> u32 {
    1
}

fn default_copies() -> i32 {
    3
}

/// Static per-unit data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitInfo {
    pub cost: u32,
    #[serde(default = "default_board_size")]
    pub board_size: u32,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl Default for UnitInfo {
    fn default() -> Self {
        UnitInfo { cost: 1, board_size: 1, traits: Vec::new() }
    }
}

/// One unit in a target composition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompMember {
    pub name: String,
    /// Best-in-slot items, in priority order.
    #[serde(default)]
    pub items: Vec<String>,
    /// Acceptable items once the best-in-slot list is done.
    #[serde(default)]
    pub recommended: Vec<String>,
    #[serde(default)]
    pub board_position: Option<usize>,
    /// Whether the unit belongs in the final roster.
    #[serde(default)]
    pub core: bool,
    /// Copies to buy over the session.
    #[serde(default = "default_copies")]
    pub copies: i32,
}

/// A named target composition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Composition {
    pub name: String,
    pub members: Vec<CompMember>,
    #[serde(default)]
    pub augments: Vec<String>,
    #[serde(default)]
    pub portals: Vec<String>,
    #[serde(default)]
    unknown_slots: Option<Vec<usize>>,
    /// Level aggressively to 8.
    #[serde(default)]
    pub fast8: bool,
}

impl Composition {
    pub fn member(&self, name: &str) -> Option<&CompMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Board slots reserved for unconfirmed units, in fill order.
    ///
    /// Defaults to every board slot that no member claims, ascending.
    pub fn unknown_slots(&self) -> Vec<usize> {
        if let Some(slots) = &self.unknown_slots {
            return slots.clone();
        }
        let claimed: BTreeSet<usize> = self.members.iter().filter_map(|m| m.board_position).collect();
        (0..BOARD_SIZE).filter(|i| !claimed.contains(i)).collect()
    }

    /// Initial acquisition targets: member name to copies wanted.
    pub fn acquisition_targets(&self) -> HashMap<String, i32> {
        self.members.iter().map(|m| (m.name.clone(), m.copies)).collect()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    units: BTreeMap<String, UnitInfo>,
    comps: Vec<Composition>,
}

/// Unit table plus the available compositions.
#[derive(Debug, Clone)]
pub struct Catalog {
    units: BTreeMap<String, UnitInfo>,
    comps: Vec<Composition>,
}

impl Catalog {
    /// Loads a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&data)
    }

    /// Parses and validates a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = Catalog { units: file.units, comps: file.comps };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for comp in &self.comps {
            let mut seen = BTreeSet::new();
            for m in &comp.members {
                if !self.units.contains_key(&m.name) {
                    return Err(CatalogError::UnknownUnit {
                        comp: comp.name.clone(),
                        unit: m.name.clone(),
                    });
                }
                if let Some(position) = m.board_position {
                    if position >= BOARD_SIZE {
                        return Err(CatalogError::BadBoardPosition {
                            comp: comp.name.clone(),
                            unit: m.name.clone(),
                            position,
                        });
                    }
                    if !seen.insert(position) {
                        return Err(CatalogError::DuplicatePosition {
                            comp: comp.name.clone(),
                            position,
                        });
                    }
                }
            }
            let mut reserved = BTreeSet::new();
            for &slot in comp.unknown_slots.iter().flatten() {
                if slot >= BOARD_SIZE || seen.contains(&slot) || !reserved.insert(slot) {
                    return Err(CatalogError::BadUnknownSlot { comp: comp.name.clone(), slot });
                }
            }
        }
        Ok(())
    }

    pub fn comp(&self, name: &str) -> Result<&Composition, CatalogError> {
        self.comps
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CatalogError::UnknownComposition(name.to_string()))
    }

    pub fn comps(&self) -> &[Composition] {
        &self.comps
    }

    pub fn unit(&self, name: &str) -> Option<&UnitInfo> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}
