//! Collaborator interfaces.
//!
//! The engine never captures the screen or synthesizes input itself. It talks
//! to the live game through the narrow traits below, all of which are
//! fire-and-forget or best-effort: a click has no success signal and a text
//! read returns an empty string when nothing could be recognized.

pub mod display;
pub mod screen;
pub mod sim;
pub mod text;

use std::time::Duration;

use crate::catalog::schedule::RoundId;
use screen::{Point, Region};

/// Characters the recognizer is allowed to emit for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSet {
    /// No restriction.
    Any,
    Letters,
    LettersSpace,
    /// Letters, space, `&` and `'` (unit names such as "Xayah & Rakan").
    LettersSpaceSymbols,
    /// Digits and `-` (round labels).
    Round,
}

impl CharSet {
    /// Returns the whitelist string handed to the recognizer.
    pub fn whitelist(self) -> &'static str {
        const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        match self {
            CharSet::Any => "",
            CharSet::Letters => LETTERS,
            CharSet::LettersSpace => {
                "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz "
            }
            CharSet::LettersSpaceSymbols => {
                "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz &'"
            }
            CharSet::Round => "0123456789-",
        }
    }
}

/// Options for a single text read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    pub scale: u32,
    /// Page segmentation mode passed through to the recognizer.
    pub segmentation: u32,
    pub charset: CharSet,
}

impl TextOptions {
    /// Single line of free text at 3x scale.
    pub const fn line() -> Self {
        TextOptions { scale: 3, segmentation: 7, charset: CharSet::Any }
    }

    /// Single line restricted to `charset`.
    pub const fn line_with(charset: CharSet) -> Self {
        TextOptions { scale: 3, segmentation: 7, charset }
    }
}

/// Screen text recognition.
pub trait Perception {
    /// Reads the text inside `region`. Returns an empty string on failure.
    fn read_text(&mut self, region: Region, options: TextOptions) -> String;

    /// Reads an integer inside `region`, or -1 when unreadable.
    fn read_number(&mut self, region: Region) -> i32;
}

/// Input synthesis. Every call is fire-and-forget.
pub trait Input {
    fn click(&mut self, point: Point);
    fn secondary_click(&mut self, point: Point);
    fn move_cursor(&mut self, point: Point);
    /// Hovers `point` and presses the sell/action key.
    fn press_action_key(&mut self, point: Point);
}

/// One shop offer: slot index and unit name (empty when the slot is blank).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopOffer {
    pub slot: usize,
    pub name: String,
}

impl ShopOffer {
    pub fn new(slot: usize, name: impl Into<String>) -> Self {
        ShopOffer { slot, name: name.into() }
    }
}

/// Structured game-state queries.
pub trait GameQuery {
    fn level(&mut self) -> u32;
    fn gold(&mut self) -> u32;
    /// Remaining health; 0 means dead and -1 means the match was won.
    fn health(&mut self) -> i32;
    /// Current round label and phase iteration.
    fn round(&mut self) -> (RoundId, u32);
    fn shop(&mut self) -> Vec<ShopOffer>;
    /// The ten item bench slots, `None` where empty.
    fn inventory(&mut self) -> Vec<Option<String>>;
    fn bench_occupancy(&mut self) -> [bool; 9];
    /// Whether the player is still in the match after health hit zero.
    fn is_alive(&mut self) -> bool;
    /// Whether a connection-failure dialog is showing.
    fn disconnected(&mut self) -> bool;
    /// Round kinds shown in the stage strip ("pvp", "pve", "carousel", "encounter").
    fn encounter_icons(&mut self) -> Vec<String>;
}

/// Time source with blocking waits.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

/// Everything the engine needs from the outside world.
pub trait GameClient: Perception + Input + GameQuery + Clock {}

impl<T: Perception + Input + GameQuery + Clock> GameClient for T {}

/// Blocks for `ms` milliseconds on the client clock.
pub fn pause<C: Clock + ?Sized>(client: &mut C, ms: u64) {
    client.sleep(Duration::from_millis(ms));
}

/// Reads text until a non-empty result comes back or `attempts` run out.
pub fn read_until_stable<C: Perception + Clock + ?Sized>(
    client: &mut C,
    region: Region,
    options: TextOptions,
    attempts: u32,
    retry_ms: u64,
) -> Option<String> {
    for attempt in 0..attempts.max(1) {
        let text = client.read_text(region, options);
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
        tracing::debug!(attempt, "empty read, retrying");
        pause(client, retry_ms);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelists_match_charsets() {
        assert_eq!(CharSet::Round.whitelist(), "0123456789-");
        assert!(CharSet::LettersSpaceSymbols.whitelist().ends_with("&'"));
        assert!(CharSet::Any.whitelist().is_empty());
    }
}
