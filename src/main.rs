//! Rosterkeeper dry run.
//!
//! Loads a catalog and configuration, then plays a short scripted match
//! against the in-memory game and prints the final roster as JSON.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use rosterkeeper::catalog::items::ItemTable;
use rosterkeeper::catalog::schedule::RoundId;
use rosterkeeper::catalog::Catalog;
use rosterkeeper::client::sim::SimGame;
use rosterkeeper::config::BotConfig;
use rosterkeeper::driver::RoundDriver;
use rosterkeeper::logging;
use rosterkeeper::session::Session;

/// Plays a scripted match against the simulated client.
#[derive(Parser, Debug)]
#[command(name = "rosterkeeper")]
#[command(about = "Dry-run the roster engine against a simulated match")]
struct Args {
    /// Catalog JSON file (built-in catalog when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Bot configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Composition to play, overriding the configuration
    #[arg(long)]
    comp: Option<String>,

    /// Log level for this crate when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seed for the surrender jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Planning rounds to simulate after the opening
    #[arg(long, default_value_t = 6)]
    rounds: u32,
}

#[derive(Serialize)]
struct Summary {
    comp: String,
    outcome: String,
    board: Vec<String>,
    bench: Vec<String>,
    board_weight: u32,
    level: u32,
}

/// Scripts the opening stage and a run of stage 2 rounds, then a win.
fn scripted_game(catalog: &Catalog, comp_units: &[String], rounds: u32) -> SimGame {
    let costs = catalog
        .unit_names()
        .filter_map(|n| catalog.unit(n).map(|u| (n.to_string(), u.cost)))
        .collect::<Vec<_>>();
    let mut game = SimGame::new().with_costs(costs);
    game.set_gold(60);
    game.set_level(3);
    game.set_portals(["Scuttle Puddle", "Completed Anvil", "Training Dummy"]);
    game.set_augments(["Pandora's Items", "Tiny Titans", "Blank Slate"]);
    game.set_region_text("Completed Anvil");
    game.set_icons(&["pvp", "pvp", "pvp", "carousel", "pvp", "pvp", "pve"]);
    game.set_bench(0, comp_units.first().map_or("Garen", String::as_str));

    let shop: Vec<&str> = comp_units.iter().take(5).map(String::as_str).collect();
    game.set_shop(&shop);
    for _ in 0..rounds {
        game.queue_roll(&shop);
    }

    let round_len = Duration::from_secs(30);
    let mut at = Duration::ZERO;
    let mut labels = vec![RoundId::new(1, 1), RoundId::new(1, 2), RoundId::new(1, 3), RoundId::new(1, 4)];
    labels.extend((1..=rounds.min(7) as u8).map(|r| RoundId::new(2, r)));
    for (i, round) in labels.iter().enumerate() {
        game.push_frame(at, *round, 1, 100 - 5 * i as i32);
        at += round_len;
    }
    game.push_frame(at, RoundId::new(2, 7), 1, -1);
    game
}

fn run(args: Args) -> Result<Summary, Box<dyn std::error::Error>> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    let config = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    let session = Session::new(catalog.clone(), ItemTable::standard(), config, args.comp.as_deref())?;
    let data = session.data();
    let comp_units: Vec<String> = data.comp.members.iter().map(|m| m.name.clone()).collect();

    let mut game = scripted_game(&catalog, &comp_units, args.rounds);
    let mut driver = RoundDriver::new(data, args.seed);
    let outcome = driver.run(&mut game);

    let state = &driver.roster.state;
    let names = |slots: &[rosterkeeper::board::Slot]| {
        slots.iter().filter_map(|s| s.name().map(str::to_string)).collect::<Vec<_>>()
    };
    Ok(Summary {
        comp: data.comp.name.clone(),
        outcome: format!("{outcome:?}"),
        board: names(&state.board),
        bench: names(&state.bench),
        board_weight: state.board_weight_used,
        level: state.effective_level,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level);

    match run(args) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "could not serialize summary");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "dry run failed");
            ExitCode::FAILURE
        }
    }
}
