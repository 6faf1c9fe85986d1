//! Property-based tests for the item rules and bench reconciliation.

use proptest::prelude::*;

use rosterkeeper::board::{Inventory, Location, Slot, Unit, BENCH_SIZE, INVENTORY_SIZE, MAX_SLOT_UNITS};
use rosterkeeper::catalog::items::ItemTable;
use rosterkeeper::catalog::Catalog;
use rosterkeeper::client::sim::SimGame;
use rosterkeeper::config::BotConfig;
use rosterkeeper::items::{resolve, PlacementKind, ResolveContext};
use rosterkeeper::roster::Roster;
use rosterkeeper::session::Session;

const ITEMS: &[&str] = &[
    "BFSword",
    "ChainVest",
    "GiantsBelt",
    "NeedlesslyLargeRod",
    "NegatronCloak",
    "RecurveBow",
    "SparringGloves",
    "Spatula",
    "TearoftheGoddess",
    "EdgeofNight",
    "BlueBuff",
    "ThiefsGloves",
    "ArchangelsStaff",
    "MagneticRemover",
    "ChainswordBloodthirster",
];

const BUILDS: &[&str] = &[
    "EdgeofNight",
    "Bloodthirster",
    "TitansResolve",
    "BlueBuff",
    "ArchangelsStaff",
    "Guardbreaker",
    "WarmogsArmor",
    "ThiefsGloves",
];

const BENCH_NAMES: &[&str] = &["Zyra", "Garen", "Taliyah", "Kayle", "Nasus", "Ekko", "Ilaoi"];

/// Strategy: an inventory with each slot empty or holding a known item.
fn inventory_strategy() -> impl Strategy<Value = Vec<Option<&'static str>>> {
    prop::collection::vec(prop::option::of(prop::sample::select(ITEMS)), INVENTORY_SIZE)
}

/// Strategy: up to four board units, each with a short build list.
fn units_strategy() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(prop::collection::vec(prop::sample::select(BUILDS), 0..4), 1..4)
}

fn make_units(builds: &[Vec<&str>]) -> Vec<Unit> {
    builds
        .iter()
        .enumerate()
        .map(|(i, build)| {
            let mut unit = Unit::new(format!("Unit{i}"), Location::board(i));
            unit.desired_items = build.iter().map(|s| s.to_string()).collect();
            unit
        })
        .collect()
}

fn make_inventory(slots: &[Option<&str>]) -> Inventory {
    Inventory::from_observed(slots.iter().map(|s| s.map(str::to_string)).collect())
}

fn session() -> Session {
    let catalog = Catalog::builtin().expect("builtin catalog parses");
    Session::new(catalog, ItemTable::standard(), BotConfig::default(), Some("Shurima Sorcerers"))
        .expect("composition exists")
}

proptest! {
    // 1. Item capacity is never exceeded
    #[test]
    fn slot_units_stay_within_capacity(builds in units_strategy(), slots in inventory_strategy()) {
        let t = ItemTable::standard();
        let ctx = ResolveContext::new(&t);
        let mut units = make_units(&builds);
        let mut inv = make_inventory(&slots);
        let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
        resolve(&mut refs, &mut inv, &ctx);
        for unit in &units {
            prop_assert!(unit.slot_units <= MAX_SLOT_UNITS, "{} holds {}", unit.name, unit.slot_units);
        }
    }

    // 2. A resolved state has nothing left to place
    #[test]
    fn resolve_reaches_a_fixpoint(builds in units_strategy(), slots in inventory_strategy()) {
        let t = ItemTable::standard();
        let ctx = ResolveContext::new(&t);
        let mut units = make_units(&builds);
        let mut inv = make_inventory(&slots);
        {
            let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
            resolve(&mut refs, &mut inv, &ctx);
        }
        let (units_once, inv_once) = (units.clone(), inv.clone());
        let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
        prop_assert!(resolve(&mut refs, &mut inv, &ctx).is_empty());
        prop_assert_eq!(units, units_once);
        prop_assert_eq!(inv, inv_once);
    }

    // 3. Two-component crafts only consume a matching pair that was on hand
    #[test]
    fn crafts_consume_both_components(builds in units_strategy(), slots in inventory_strategy()) {
        let t = ItemTable::standard();
        let ctx = ResolveContext::new(&t);
        let mut units = make_units(&builds);
        let before = make_inventory(&slots);
        let mut inv = before.clone();
        let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
        let placed = resolve(&mut refs, &mut inv, &ctx);

        for p in placed.iter().filter(|p| p.kind == PlacementKind::Craft) {
            prop_assert_eq!(p.item_slots.len(), 2);
            let (a, b) = (p.item_slots[0], p.item_slots[1]);
            prop_assert_ne!(a, b);
            let (Some(first), Some(second)) = (before.get(a), before.get(b)) else {
                return Err(TestCaseError::fail(format!("craft used an empty slot: {p:?}")));
            };
            prop_assert_eq!(t.combine(first, second), Some(p.item.as_str()));
            prop_assert!(inv.get(a).is_none() && inv.get(b).is_none());
        }
    }

    // 4. Reconciling against an unchanged screen is idempotent
    #[test]
    fn reconcile_is_idempotent(
        screen in prop::collection::vec(prop::option::of(prop::sample::select(BENCH_NAMES)), BENCH_SIZE),
        belief in prop::collection::vec(prop::option::of(prop::sample::select(BENCH_NAMES)), BENCH_SIZE),
    ) {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        for (i, name) in screen.iter().enumerate() {
            if let Some(name) = name {
                game.set_bench(i, name);
            }
        }
        for (i, name) in belief.iter().enumerate() {
            if let Some(name) = name {
                roster.state.bench[i] = Slot::Unconfirmed(name.to_string());
            }
        }

        roster.reconcile_bench_now(&mut game);
        let once = roster.state.clone();
        roster.reconcile_bench_now(&mut game);
        prop_assert_eq!(roster.state, once);
    }
}
