//! End-game inventory dump.
//!
//! Once health is low, unused items are worth nothing. The dump ignores the
//! build lists: finished items go to the neediest units with room, then
//! components go onto units that are mid-build (crafting whatever the pair
//! makes) or start new untargeted builds.

use std::cmp::Reverse;

use super::{fits, give, Placement, PlacementKind};
use crate::board::inventory::Inventory;
use crate::board::unit::Unit;
use crate::catalog::items::ItemTable;

/// Places every remaining finished item and component somewhere.
pub fn dump(units: &mut [&mut Unit], inventory: &mut Inventory, t: &ItemTable) -> Vec<Placement> {
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by_key(|&i| Reverse(units[i].desired_items.len() + usize::from(units[i].pending.is_some())));
    let mut placements = Vec::new();

    let finished: Vec<(usize, String)> = inventory
        .iter()
        .filter(|(_, item)| t.is_finished(item))
        .map(|(s, i)| (s, i.to_string()))
        .collect();
    for (slot, item) in finished {
        let Some(&i) = order.iter().find(|&&i| fits(&*units[i], &item, t)) else {
            continue;
        };
        let unit = &mut *units[i];
        inventory.take(slot);
        give(unit, &item, &item, t);
        placements.push(Placement::new(PlacementKind::Dump, vec![slot], &item, unit));
    }

    let components: Vec<(usize, String)> = inventory
        .iter()
        .filter(|(_, item)| t.is_component(item))
        .map(|(s, i)| (s, i.to_string()))
        .collect();
    for (slot, component) in components {
        let mid_build = order.iter().find_map(|&i| {
            let pending = units[i].pending.as_ref()?;
            let result = t.combine(&pending.component, &component)?;
            (!t.is_glove(result)).then(|| (i, result.to_string()))
        });
        if let Some((i, result)) = mid_build {
            let unit = &mut *units[i];
            inventory.take(slot);
            unit.complete_component(&component, &result);
            placements.push(Placement::new(PlacementKind::Dump, vec![slot], &result, unit));
            continue;
        }
        let Some(&i) = order
            .iter()
            .find(|&&i| units[i].pending.is_none() && units[i].free_slot_units() >= 2)
        else {
            continue;
        };
        let unit = &mut *units[i];
        inventory.take(slot);
        unit.start_component(&component, None, None);
        placements.push(Placement::new(PlacementKind::Dump, vec![slot], &component, unit));
    }

    if !placements.is_empty() {
        tracing::info!(count = placements.len(), "dumped inventory");
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::unit::{Location, MAX_SLOT_UNITS};

    #[test]
    fn dump_spends_everything_that_fits() {
        let t = ItemTable::standard();
        let mut full = Unit::new("Sion", Location::board(10));
        full.slot_units = MAX_SLOT_UNITS;
        let mut needy = Unit::new("Ahri", Location::board(24));
        needy.desired_items = vec!["BlueBuff".into(), "Morellonomicon".into()];
        let idle = Unit::new("Poppy", Location::board(2));
        let mut units = [full, needy, idle];

        let mut inv = Inventory::default();
        inv.set(0, "Zephyr");
        inv.set(1, "BFSword");
        inv.set(2, "ChainVest");
        inv.set(3, "Spatula");
        inv.set(4, "MagneticRemover");

        let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
        let placed = dump(&mut refs, &mut inv, &t);

        // Finished item to the neediest unit, then BFSword starts a build,
        // ChainVest completes it and Spatula starts the next one.
        assert_eq!(placed[0].unit, "Ahri");
        assert_eq!(placed[0].item, "Zephyr");
        assert_eq!(placed[2].item, "EdgeofNight");
        assert_eq!(placed.len(), 4);
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.get(4), Some("MagneticRemover"));
        assert_eq!(units[0].slot_units, MAX_SLOT_UNITS);
        assert!(units.iter().all(|u| u.slot_units <= MAX_SLOT_UNITS));
    }
}
