//! Rosterkeeper engine library.
//!
//! Keeps a believed roster of bench and board units in step with a live
//! auto-battler match and decides what to buy, where to move units and which
//! items to give them. The live game is reached only through the collaborator
//! traits in [`client`]; [`client::sim::SimGame`] stands in for it in tests
//! and dry runs.

pub mod board;
pub mod catalog;
pub mod client;
pub mod config;
pub mod driver;
pub mod items;
pub mod logging;
pub mod roster;
pub mod session;

#[cfg(test)]
pub(crate) fn test_session(comp: &str) -> session::Session {
    session::Session::new(
        catalog::Catalog::builtin().expect("builtin catalog parses"),
        catalog::items::ItemTable::standard(),
        config::BotConfig::default(),
        Some(comp),
    )
    .expect("composition exists")
}
