//! Per-game data bundle.
//!
//! A [`Session`] owns everything that stays fixed for one match: the catalog,
//! the active composition, the item table and the configuration. Components
//! borrow it through the `Copy` view [`SessionData`]; a new match builds a new
//! session instead of editing this one.

use crate::board::unit::{Location, Unit};
use crate::catalog::items::ItemTable;
use crate::catalog::{Catalog, CatalogError, Composition, UnitInfo};
use crate::config::BotConfig;

/// Immutable data for one match.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    comp_index: usize,
    items: ItemTable,
    config: BotConfig,
}

impl Session {
    /// Selects `comp` from the catalog, or the configured / first composition
    /// when `comp` is `None`.
    pub fn new(
        catalog: Catalog,
        items: ItemTable,
        config: BotConfig,
        comp: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let comp_index = match comp.or(config.comp.as_deref()) {
            Some(name) => catalog
                .comps()
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| CatalogError::UnknownComposition(name.to_string()))?,
            None if catalog.comps().is_empty() => {
                return Err(CatalogError::UnknownComposition(String::new()))
            }
            None => 0,
        };
        Ok(Session { catalog, comp_index, items, config })
    }

    pub fn data(&self) -> SessionData<'_> {
        SessionData {
            catalog: &self.catalog,
            comp: &self.catalog.comps()[self.comp_index],
            items: &self.items,
            config: &self.config,
        }
    }
}

/// Borrowed view of a [`Session`].
#[derive(Debug, Clone, Copy)]
pub struct SessionData<'a> {
    pub catalog: &'a Catalog,
    pub comp: &'a Composition,
    pub items: &'a ItemTable,
    pub config: &'a BotConfig,
}

impl<'a> SessionData<'a> {
    /// Unit table entry, or neutral defaults for names the catalog lacks.
    pub fn unit_info(&self, name: &str) -> UnitInfo {
        self.catalog.unit(name).cloned().unwrap_or_default()
    }

    pub fn unit_cost(&self, name: &str) -> Option<u32> {
        self.catalog.unit(name).map(|u| u.cost)
    }

    /// Builds a tracked unit from the catalog and the composition entry.
    pub fn make_unit(&self, name: &str, location: Location) -> Unit {
        let info = self.unit_info(name);
        let mut unit = Unit::new(name, location);
        unit.cost = info.cost;
        unit.board_weight = info.board_size;
        unit.traits = info.traits;
        if let Some(member) = self.comp.member(name) {
            unit.desired_items = member.items.clone();
            unit.secondary_items = member.recommended.clone();
            unit.board_position = member.board_position;
            unit.is_core = member.core;
        }
        unit
    }
}
