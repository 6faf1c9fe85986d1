//! Augment and portal selection.
//!
//! Options are matched by substring, since the recognizer often picks up
//! decorations around the name. Preference lists are tried in order, each
//! against every option, so list order wins over screen order.

use tracing::{info, warn};

use crate::client::screen::{
    Region, AUGMENT_LOC, AUGMENT_POS, AUGMENT_ROLL, PORTALS_LOC, PORTALS_POS, PORTALS_VOTES,
};
use crate::client::{pause, GameClient, TextOptions};

/// How an option was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Matched an entry of the preference list.
    Priority(usize),
    /// First option not on the avoid list.
    Fallback(usize),
    /// Everything readable was avoided; the first readable option is taken.
    First(usize),
}

impl Choice {
    pub fn index(self) -> usize {
        match self {
            Choice::Priority(i) | Choice::Fallback(i) | Choice::First(i) => i,
        }
    }
}

/// Index of the first option matching the earliest preference. Blank
/// options never match.
pub fn pick_priority(options: &[String], priority: &[String]) -> Option<usize> {
    priority.iter().find_map(|wanted| {
        options
            .iter()
            .position(|o| !o.is_empty() && o.contains(wanted.as_str()))
    })
}

/// First readable option that matches no entry of `avoid`.
pub fn pick_fallback(options: &[String], avoid: &[String]) -> Choice {
    let mut readable = options.iter().enumerate().filter(|(_, o)| !o.is_empty());
    let first = readable.clone().next().map_or(0, |(i, _)| i);
    readable
        .find(|(_, o)| !avoid.iter().any(|a| o.contains(a.as_str())))
        .map_or(Choice::First(first), |(i, _)| Choice::Fallback(i))
}

pub fn pick(options: &[String], priority: &[String], avoid: &[String]) -> Choice {
    pick_priority(options, priority).map_or_else(|| pick_fallback(options, avoid), Choice::Priority)
}

/// Reads three option labels, waiting a little while any reads blank.
fn read_options<C: GameClient + ?Sized>(client: &mut C, regions: &[Region; 3], attempts: u32) -> Vec<String> {
    let mut options = Vec::new();
    for _ in 0..attempts.max(1) {
        pause(client, 1000);
        options = regions
            .iter()
            .map(|&r| client.read_text(r, TextOptions::line()).trim().to_string())
            .collect();
        if options.iter().all(|o| !o.is_empty()) {
            break;
        }
    }
    options
}

/// Picks an augment, rerolling the offer once when `reroll` is set and
/// nothing on the preference list shows up. Returns the chosen label.
pub fn pick_augment<C: GameClient + ?Sized>(
    client: &mut C,
    priority: &[String],
    avoid: &[String],
    mut reroll: bool,
    attempts: u32,
) -> Option<String> {
    loop {
        let options = read_options(client, &AUGMENT_POS, attempts);
        if options.iter().all(String::is_empty) {
            warn!("no augments could be read");
            return None;
        }
        let choice = match pick_priority(&options, priority) {
            Some(i) => Choice::Priority(i),
            None if reroll => {
                info!("rerolling augments");
                for point in AUGMENT_ROLL {
                    client.click(point);
                }
                reroll = false;
                continue;
            }
            None => {
                warn!(?options, "no preferred augment offered");
                pick_fallback(&options, avoid)
            }
        };
        let index = choice.index();
        info!(augment = %options[index], ?choice, "choosing augment");
        client.click(AUGMENT_LOC[index]);
        return options.into_iter().nth(index);
    }
}

/// Votes for a portal. Returns the chosen label.
pub fn vote_portal<C: GameClient + ?Sized>(
    client: &mut C,
    priority: &[String],
    avoid: &[String],
    attempts: u32,
) -> Option<String> {
    let options = read_options(client, &PORTALS_POS, attempts);
    if options.iter().all(String::is_empty) {
        warn!("no portals could be read");
        return None;
    }
    let choice = pick(&options, priority, avoid);
    let index = choice.index();
    client.click(PORTALS_LOC[index]);
    if let Choice::First(_) = choice {
        warn!(?options, "every portal is on the avoid list");
    } else {
        pause(client, 700);
        client.click(PORTALS_VOTES[index]);
        info!(portal = %options[index], "voted for portal");
    }
    options.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sim::SimGame;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn priority_order_beats_screen_order() {
        let options = strings(&["Pandora's Items II", "Jeweled Lotus", "Tiny Titans"]);
        let priority = strings(&["Jeweled Lotus", "Pandora's Items"]);
        assert_eq!(pick(&options, &priority, &[]), Choice::Priority(1));
    }

    #[test]
    fn fallback_skips_avoided_options() {
        let options = strings(&["Blank Slate", "Cybernetic Implants II", "Lategame Specialist"]);
        let avoid = strings(&["Blank Slate", "Cybernetic Implants"]);
        assert_eq!(pick(&options, &[], &avoid), Choice::Fallback(2));
        let all = strings(&["Blank Slate", "Blank Slate", "Blank Slate"]);
        assert_eq!(pick(&all, &[], &avoid), Choice::First(0));
        assert_eq!(Choice::First(2).index(), 2);
    }

    #[test]
    fn blank_reads_are_never_chosen() {
        let avoid = strings(&["Blank Slate"]);
        let partial = strings(&["", "Blank Slate", "Think Fast"]);
        assert_eq!(pick(&partial, &strings(&["Jeweled Lotus"]), &avoid), Choice::Fallback(2));
        let avoided = strings(&["", "Blank Slate", ""]);
        assert_eq!(pick(&avoided, &[], &avoid), Choice::First(1));
    }

    #[test]
    fn portal_vote_skips_unread_labels() {
        let mut game = SimGame::new();
        game.set_portals(["", "Scuttle Puddle", "Treasure Trove"]);
        let voted = vote_portal(&mut game, &[], &strings(&["Scuttle Puddle"]), 2);
        assert_eq!(voted.as_deref(), Some("Treasure Trove"));
        assert_eq!(game.clicks(), &[PORTALS_LOC[2], PORTALS_VOTES[2]]);
    }

    #[test]
    fn augment_rerolls_once_then_falls_back() {
        let mut game = SimGame::new();
        game.set_augments(["Blank Slate", "Best Friends", "Think Fast"]);
        let picked = pick_augment(&mut game, &strings(&["Jeweled Lotus"]), &strings(&["Blank Slate"]), true, 3);
        assert_eq!(picked.as_deref(), Some("Best Friends"));
        let rolls = game.clicks().iter().filter(|&&p| AUGMENT_ROLL.contains(&p)).count();
        assert_eq!(rolls, 3);
        assert_eq!(game.clicks().last(), Some(&AUGMENT_LOC[1]));
    }

    #[test]
    fn portal_vote_clicks_portal_then_vote() {
        let mut game = SimGame::new();
        game.set_portals(["Scuttle Puddle", "Treasure Trove", "Completed Anvil"]);
        let voted = vote_portal(&mut game, &strings(&["Completed Anvil"]), &[], 3);
        assert_eq!(voted.as_deref(), Some("Completed Anvil"));
        assert_eq!(game.clicks(), &[PORTALS_LOC[2], PORTALS_VOTES[2]]);
    }
}
