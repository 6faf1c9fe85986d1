use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rosterkeeper::board::{Inventory, Location, Unit};
use rosterkeeper::catalog::items::ItemTable;
use rosterkeeper::catalog::Catalog;
use rosterkeeper::client::sim::SimGame;
use rosterkeeper::config::BotConfig;
use rosterkeeper::items::dump::dump;
use rosterkeeper::items::{resolve, ResolveContext};
use rosterkeeper::roster::Roster;
use rosterkeeper::session::Session;

const INVENTORY: &[&str] = &[
    "BFSword",
    "ChainVest",
    "TearoftheGoddess",
    "NeedlesslyLargeRod",
    "SparringGloves",
    "SparringGloves",
    "NegatronCloak",
    "GiantsBelt",
    "BlueBuff",
    "RecurveBow",
];

fn full_inventory() -> Inventory {
    Inventory::from_observed(INVENTORY.iter().map(|s| Some(s.to_string())).collect())
}

fn late_game_board() -> Vec<Unit> {
    let builds: &[(&str, usize, &[&str])] = &[
        ("Aatrox", 4, &["Bloodthirster", "TitansResolve", "EdgeofNight"]),
        ("Ahri", 24, &["BlueBuff", "JeweledGauntlet", "Morellonomicon"]),
        ("Sion", 10, &["WarmogsArmor", "SunfireCape", "BrambleVest"]),
        ("Kai'Sa", 27, &["GuinsoosRageblade", "InfinityEdge", "LastWhisper"]),
        ("Poppy", 2, &[]),
        ("Galio", 3, &[]),
        ("Jarvan IV", 1, &["ProtectorsVow", "Redemption"]),
    ];
    builds
        .iter()
        .map(|(name, slot, items)| {
            let mut unit = Unit::new(*name, Location::board(*slot));
            unit.desired_items = items.iter().map(|s| s.to_string()).collect();
            unit
        })
        .collect()
}

fn bench_resolve_full_inventory(c: &mut Criterion) {
    let t = ItemTable::standard();
    let ctx = ResolveContext::new(&t);
    let board = late_game_board();
    let inventory = full_inventory();
    c.bench_function("resolve_7_units_10_items", |b| {
        b.iter(|| {
            let mut units = board.clone();
            let mut inv = inventory.clone();
            let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
            resolve(black_box(&mut refs), black_box(&mut inv), &ctx)
        })
    });
}

fn bench_resolve_then_dump(c: &mut Criterion) {
    let t = ItemTable::standard();
    let mut ctx = ResolveContext::new(&t);
    ctx.low_health = true;
    let board = late_game_board();
    let inventory = full_inventory();
    c.bench_function("resolve_then_dump_low_health", |b| {
        b.iter(|| {
            let mut units = board.clone();
            let mut inv = inventory.clone();
            let mut refs: Vec<&mut Unit> = units.iter_mut().collect();
            let mut placed = resolve(&mut refs, &mut inv, &ctx);
            placed.extend(dump(&mut refs, &mut inv, &t));
            black_box(placed)
        })
    });
}

fn bench_reconcile_full_bench(c: &mut Criterion) {
    let catalog = Catalog::builtin().unwrap();
    let session = Session::new(catalog, ItemTable::standard(), BotConfig::default(), Some("High Value")).unwrap();
    let names = ["Poppy", "Galio", "Sion", "Ahri", "Garen", "Ekko", "Jinx", "Aatrox", "Kai'Sa"];
    let mut game = SimGame::new();
    for (i, name) in names.iter().enumerate() {
        game.set_bench(i, name);
    }
    c.bench_function("reconcile_9_slot_bench", |b| {
        b.iter(|| {
            let mut roster = Roster::new(session.data());
            roster.reconcile_bench_now(black_box(&mut game));
            black_box(roster.state.bench.len())
        })
    });
}

criterion_group!(
    benches,
    bench_resolve_full_inventory,
    bench_resolve_then_dump,
    bench_reconcile_full_bench,
);
criterion_main!(benches);
