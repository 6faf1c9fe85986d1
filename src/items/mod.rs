//! Item resolution rules.
//!
//! Given an inventory snapshot and the tracked board units, decides which item
//! goes on which unit. The resolver is pure with respect to the outside world:
//! it mutates the unit records and the inventory snapshot and returns the
//! placements for the caller to click through.
//!
//! Units are served in descending order of remaining build size. For each unit
//! the rules below are tried in order, and the unit is revisited until no rule
//! fires. Whole sweeps repeat until a sweep places nothing, so running the
//! resolver again on its own output does nothing.
//!
//!  1. artifacts on the build, or glove-like artifacts on an empty core unit
//!  2. radiant items whose base is on the build
//!  3. finished items on the build
//!  4. emblems for a trait the unit lacks
//!  5. crafting: finish a pending build, craft from two components, start a
//!     build, then secondary items once the build is done
//!  6. filler finished items for units with no build left
//!  7. two generic components made into full-completion gloves
//!  8. component removers on stray components
//!  9. duplicators on still-wanted units
//! 10. radiant upgrades on held finished items

pub mod dump;

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::board::inventory::Inventory;
use crate::board::unit::Unit;
use crate::catalog::items::{Consumable, ItemKind, ItemTable, CRAFTED_GLOVES, GLOVE_COMPONENT};
use crate::client::screen::Point;

/// Which rule produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Artifact,
    Radiant,
    Finished,
    Emblem,
    CompleteBuild,
    Craft,
    StartBuild,
    Secondary,
    Fallback,
    Gloves,
    Remover,
    Duplicator,
    Masterwork,
    Dump,
}

/// One decision: drag the items in `item_slots` onto `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub kind: PlacementKind,
    pub item_slots: Vec<usize>,
    /// What the unit ends up with (the crafted result for component pairs).
    pub item: String,
    pub unit: String,
    pub anchor: Point,
}

impl Placement {
    fn new(kind: PlacementKind, item_slots: Vec<usize>, item: &str, unit: &Unit) -> Self {
        Placement {
            kind,
            item_slots,
            item: item.to_string(),
            unit: unit.name.clone(),
            anchor: unit.anchor(),
        }
    }
}

/// Inputs to a resolver pass beyond the units and the inventory.
#[derive(Debug, Clone)]
pub struct ResolveContext<'a> {
    pub items: &'a ItemTable,
    /// Finished items below which two-component crafting is allowed.
    pub craft_slack: usize,
    pub lucky_gloves: bool,
    pub low_health: bool,
    /// Items on the builds of units that are not on the board.
    pub reserved: HashSet<String>,
    /// Copies still wanted per unit name.
    pub wanted: HashMap<String, i32>,
    pub free_bench: usize,
}

impl<'a> ResolveContext<'a> {
    pub fn new(items: &'a ItemTable) -> Self {
        ResolveContext {
            items,
            craft_slack: 3,
            lucky_gloves: false,
            low_health: false,
            reserved: HashSet::new(),
            wanted: HashMap::new(),
            free_bench: 0,
        }
    }
}

/// Whether `unit` has room for `item`. Gloves need an empty unit.
pub(crate) fn fits(unit: &Unit, item: &str, t: &ItemTable) -> bool {
    if t.is_glove(item) {
        unit.holds_nothing()
    } else {
        unit.free_slot_units() >= 2
    }
}

pub(crate) fn give(unit: &mut Unit, item: &str, fills: &str, t: &ItemTable) {
    if t.is_glove(item) {
        unit.give_full_completion(item, fills);
    } else {
        unit.give_finished(item, fills);
    }
}

/// Units in service order: longest remaining build first, ties in input order.
pub(crate) fn service_order(units: &[&mut Unit]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by_key(|&i| Reverse(units[i].desired_items.len()));
    order
}

/// Runs the rule cascade to a fixpoint.
pub fn resolve(units: &mut [&mut Unit], inventory: &mut Inventory, ctx: &ResolveContext<'_>) -> Vec<Placement> {
    let order = service_order(units);
    let mut pass = Pass { ctx, free_bench: ctx.free_bench, duplicated: HashSet::new() };
    let mut placements = Vec::new();
    loop {
        let before = placements.len();
        for &i in &order {
            while let Some(p) = pass.place_one(units, i, inventory) {
                tracing::debug!(unit = %p.unit, item = %p.item, kind = ?p.kind, "placed item");
                placements.push(p);
            }
        }
        if placements.len() == before {
            break;
        }
    }
    placements
}

struct Pass<'c, 'a> {
    ctx: &'c ResolveContext<'a>,
    free_bench: usize,
    duplicated: HashSet<String>,
}

impl Pass<'_, '_> {
    fn place_one(&mut self, units: &mut [&mut Unit], i: usize, inv: &mut Inventory) -> Option<Placement> {
        let elsewhere: HashSet<String> = units
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .flat_map(|(_, u)| u.desired_items.iter().cloned())
            .chain(self.ctx.reserved.iter().cloned())
            .collect();
        let unit = &mut *units[i];

        if let Some(p) = self.artifact(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.radiant(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.finished(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.emblem(unit, inv, &elsewhere) {
            return Some(p);
        }
        if let Some(p) = self.crafting(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.fallback(unit, inv, &elsewhere) {
            return Some(p);
        }
        if let Some(p) = self.gloves(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.remover(unit, inv) {
            return Some(p);
        }
        if let Some(p) = self.duplicator(unit, inv) {
            return Some(p);
        }
        self.masterwork(unit, inv)
    }

    fn artifact(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        let (slot, item) = inv
            .iter()
            .filter(|(_, item)| t.is_artifact(item) && fits(unit, item, t))
            .find(|(_, item)| {
                unit.desired_items.iter().any(|d| d == item)
                    || (t.is_glove(item) && unit.is_core && unit.holds_nothing())
            })
            .map(|(s, i)| (s, i.to_string()))?;
        inv.take(slot);
        give(unit, &item, &item, t);
        Some(Placement::new(PlacementKind::Artifact, vec![slot], &item, unit))
    }

    fn radiant(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        let (slot, item, base) = inv
            .iter()
            .filter(|(_, item)| fits(unit, item, t))
            .find_map(|(s, item)| {
                let base = t.radiant_base(item)?;
                unit.desired_items
                    .iter()
                    .any(|d| d == base)
                    .then(|| (s, item.to_string(), base.to_string()))
            })?;
        inv.take(slot);
        give(unit, &item, &base, t);
        Some(Placement::new(PlacementKind::Radiant, vec![slot], &item, unit))
    }

    fn finished(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        let (slot, item) = unit.desired_items.iter().find_map(|d| {
            let slot = inv.find(d)?;
            (t.is_finished(d) && fits(unit, d, t)).then(|| (slot, d.clone()))
        })?;
        inv.take(slot);
        give(unit, &item, &item, t);
        Some(Placement::new(PlacementKind::Finished, vec![slot], &item, unit))
    }

    fn emblem(&self, unit: &mut Unit, inv: &mut Inventory, elsewhere: &HashSet<String>) -> Option<Placement> {
        let t = self.ctx.items;
        if unit.free_slot_units() < 2 {
            return None;
        }
        let (slot, item) = inv
            .iter()
            .find(|(_, item)| {
                t.is_emblem(item)
                    && !elsewhere.contains(*item)
                    && item.strip_suffix("Emblem").is_some_and(|tr| !tr.is_empty() && !unit.has_trait(tr))
            })
            .map(|(s, i)| (s, i.to_string()))?;
        inv.take(slot);
        unit.give_finished(&item, &item);
        Some(Placement::new(PlacementKind::Emblem, vec![slot], &item, unit))
    }

    fn crafting(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;

        // Finish the pending build.
        if let Some(pending) = unit.pending.clone() {
            let hit = match &pending.partner {
                Some(partner) => inv.find(partner).map(|slot| {
                    let result = pending
                        .target
                        .clone()
                        .or_else(|| t.combine(&pending.component, partner).map(str::to_string));
                    (slot, partner.clone(), result)
                }),
                None => inv.iter().find_map(|(slot, c)| {
                    let result = t.combine(&pending.component, c)?;
                    let useful = unit.desired_items.iter().chain(&unit.secondary_items).any(|d| d == result);
                    (useful && t.is_component(c)).then(|| (slot, c.to_string(), Some(result.to_string())))
                }),
            };
            if let Some((slot, component, Some(result))) = hit {
                inv.take(slot);
                unit.complete_component(&component, &result);
                return Some(Placement::new(PlacementKind::CompleteBuild, vec![slot], &result, unit));
            }
        }

        if unit.free_slot_units() < 2 {
            return None;
        }

        // Both components of a build item at once.
        if unit.completed_items.len() < self.ctx.craft_slack {
            if let Some(p) = self.craft_from(unit, inv, PlacementKind::Craft, false) {
                return Some(p);
            }
        }

        // Start a build with one component.
        if unit.pending.is_none() {
            let start = unit.desired_items.iter().find_map(|d| {
                let (a, b) = t.recipe(d)?;
                if t.is_glove(d) {
                    return None;
                }
                match (inv.find(a), inv.find(b)) {
                    (Some(slot), _) => Some((slot, a.to_string(), b.to_string(), d.clone())),
                    (None, Some(slot)) => Some((slot, b.to_string(), a.to_string(), d.clone())),
                    _ => None,
                }
            });
            if let Some((slot, component, partner, target)) = start {
                inv.take(slot);
                unit.start_component(&component, Some(&target), Some(&partner));
                return Some(Placement::new(PlacementKind::StartBuild, vec![slot], &component, unit));
            }
        }

        // Secondary items once the build list is done.
        if unit.desired_items.is_empty() {
            let exact = unit.secondary_items.iter().find_map(|s| {
                let slot = inv.find(s)?;
                (t.is_finished(s) && fits(unit, s, t)).then(|| (slot, s.clone()))
            });
            if let Some((slot, item)) = exact {
                inv.take(slot);
                give(unit, &item, &item, t);
                return Some(Placement::new(PlacementKind::Secondary, vec![slot], &item, unit));
            }
            return self.craft_from(unit, inv, PlacementKind::Secondary, true);
        }
        None
    }

    /// Crafts the first item of the build list (or secondary list) whose two
    /// components are both in the inventory.
    fn craft_from(&self, unit: &mut Unit, inv: &mut Inventory, kind: PlacementKind, secondary: bool) -> Option<Placement> {
        let t = self.ctx.items;
        let list = if secondary { &unit.secondary_items } else { &unit.desired_items };
        let (sa, sb, a, b, result) = list.iter().find_map(|d| {
            let (a, b) = t.recipe(d)?;
            if t.is_glove(d) && !unit.holds_nothing() {
                return None;
            }
            let sa = inv.find(a)?;
            let sb = inv.find_other(b, sa)?;
            Some((sa, sb, a.to_string(), b.to_string(), d.clone()))
        })?;
        inv.take(sa);
        inv.take(sb);
        unit.craft(&a, &b, &result, t.is_glove(&result));
        Some(Placement::new(kind, vec![sa, sb], &result, unit))
    }

    fn fallback(&self, unit: &mut Unit, inv: &mut Inventory, elsewhere: &HashSet<String>) -> Option<Placement> {
        let t = self.ctx.items;
        if !unit.desired_items.is_empty() {
            return None;
        }
        let (slot, item) = inv
            .iter()
            .find(|(_, item)| t.is_fallback_eligible(item) && !elsewhere.contains(*item) && fits(unit, item, t))
            .map(|(s, i)| (s, i.to_string()))?;
        inv.take(slot);
        give(unit, &item, &item, t);
        Some(Placement::new(PlacementKind::Fallback, vec![slot], &item, unit))
    }

    fn gloves(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        if !unit.holds_nothing() {
            return None;
        }
        let idle = unit.desired_items.is_empty() && unit.pending.is_none();
        if !(idle || self.ctx.lucky_gloves || self.ctx.low_health) {
            return None;
        }
        let sa = inv.find(GLOVE_COMPONENT)?;
        let sb = inv.find_other(GLOVE_COMPONENT, sa)?;
        if !idle {
            tracing::debug!(
                unit = %unit.name,
                lucky = self.ctx.lucky_gloves,
                low_health = self.ctx.low_health,
                "making gloves for a unit with a build"
            );
        }
        inv.take(sa);
        inv.take(sb);
        unit.craft(GLOVE_COMPONENT, GLOVE_COMPONENT, CRAFTED_GLOVES, true);
        Some(Placement::new(PlacementKind::Gloves, vec![sa, sb], CRAFTED_GLOVES, unit))
    }

    fn remover(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        if self.ctx.low_health || unit.slot_units != 1 {
            return None;
        }
        if !unit.pending.as_ref().is_some_and(|p| p.target.is_none()) {
            return None;
        }
        let (slot, item) = inv
            .iter()
            .find(|(_, item)| t.consumable(item) == Some(Consumable::ComponentRemover))
            .map(|(s, i)| (s, i.to_string()))?;
        inv.take(slot);
        unit.strip_component();
        Some(Placement::new(PlacementKind::Remover, vec![slot], &item, unit))
    }

    fn duplicator(&mut self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        let wanted = self.ctx.wanted.get(&unit.name).is_some_and(|n| *n > 0);
        if !wanted || self.free_bench == 0 || self.duplicated.contains(&unit.name) {
            return None;
        }
        let (slot, item) = inv
            .iter()
            .filter_map(|(s, item)| match t.kind(item) {
                ItemKind::Consumable(Consumable::Duplicator { max_cost }) if unit.cost <= max_cost => {
                    Some((max_cost, s, item.to_string()))
                }
                _ => None,
            })
            .min_by_key(|(max_cost, s, _)| (*max_cost, *s))
            .map(|(_, s, item)| (s, item))?;
        inv.take(slot);
        self.free_bench -= 1;
        self.duplicated.insert(unit.name.clone());
        Some(Placement::new(PlacementKind::Duplicator, vec![slot], &item, unit))
    }

    fn masterwork(&self, unit: &mut Unit, inv: &mut Inventory) -> Option<Placement> {
        let t = self.ctx.items;
        let (base, upgraded) = unit
            .completed_items
            .iter()
            .find_map(|c| t.radiant_of(c).map(|r| (c.clone(), r.to_string())))?;
        let slot = inv.iter().find(|(_, item)| t.consumable(item) == Some(Consumable::RadiantUpgrade))?.0;
        inv.take(slot);
        unit.upgrade_item(&base, &upgraded);
        Some(Placement::new(PlacementKind::Masterwork, vec![slot], &upgraded, unit))
    }
}
