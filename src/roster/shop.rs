use std::time::Duration;

use tracing::{debug, info, warn};

use super::Roster;
use crate::client::screen::{ANVIL_MSG_POS, BUY_LOC, BUY_XP_LOC, REFRESH_LOC};
use crate::client::{pause, CharSet, GameClient, ShopOffer, TextOptions};

/// Prompts of the item choice that replaces the shop after an anvil opens.
const ANVIL_PROMPTS: &[&str] = &["Choose One", "Choose Your Path", "Feeling lucky"];

const MAX_LEVEL: u32 = 10;

impl<'a> Roster<'a> {
    /// Buys wanted units, then keeps rolling while gold stays above the floor.
    ///
    /// The floor is high on speedy rounds and low once health is low. XP is
    /// bought alongside each roll until max level.
    pub fn spend_gold<C: GameClient + ?Sized>(&mut self, client: &mut C, speedy: bool) {
        let data = self.data;
        let policy = &data.config.policy;
        let floor = if speedy {
            policy.gold_floor_speedy
        } else if self.state.low_health_mode {
            policy.gold_floor_spam
        } else {
            policy.gold_floor
        };

        let mut rerolls = 0;
        loop {
            let mut shop = client.shop();
            if !speedy {
                shop = self.wait_for_shop(client, shop);
            }
            self.buy_wanted(client, &shop);

            if client.gold() < floor || rerolls >= policy.max_rerolls {
                break;
            }
            if client.level() < MAX_LEVEL {
                client.click(BUY_XP_LOC);
            }
            client.click(REFRESH_LOC);
            rerolls += 1;
            pause(client, 100);
        }
        if rerolls > 0 {
            debug!(rerolls, gold = client.gold(), "done rolling");
        }
    }

    fn buy_wanted<C: GameClient + ?Sized>(&mut self, client: &mut C, shop: &[ShopOffer]) {
        for offer in shop {
            if !self.state.is_wanted(&offer.name) {
                continue;
            }
            let cost = self.data.unit_cost(&offer.name).unwrap_or(1);
            if client.gold() < cost {
                continue;
            }
            if let Err(e) = self.acquire(client, offer) {
                warn!(error = %e, "purchase failed");
            }
        }
    }

    /// Waits while the shop reads blank, which happens during encounter
    /// animations and while an anvil item choice covers it.
    fn wait_for_shop<C: GameClient + ?Sized>(&mut self, client: &mut C, mut shop: Vec<ShopOffer>) -> Vec<ShopOffer> {
        for _ in 0..self.timing().shop_empty_retries {
            if shop.iter().any(|o| !o.name.is_empty()) {
                break;
            }
            pause(client, 1000);
            let prompt = client.read_text(ANVIL_MSG_POS, TextOptions::line_with(CharSet::LettersSpace));
            if ANVIL_PROMPTS.contains(&prompt.trim()) {
                info!("choosing an anvil item");
                pause(client, 2000);
                client.click(BUY_LOC[2]);
                pause(client, 200);
                client.click(BUY_LOC[1]);
                pause(client, 1500);
                return client.shop();
            }
            shop = client.shop();
        }
        shop
    }

    /// Buys one round of XP if affordable.
    pub fn buy_xp_round<C: GameClient + ?Sized>(&mut self, client: &mut C) -> bool {
        if client.gold() >= self.data.config.policy.xp_cost {
            client.click(BUY_XP_LOC);
            true
        } else {
            false
        }
    }

    /// Buys XP until `target` level, the gold runs out, or `deadline` on the
    /// client clock passes.
    pub fn level_up<C: GameClient + ?Sized>(&mut self, client: &mut C, target: u32, deadline: Duration) -> u32 {
        let start = client.level();
        let mut level = start;
        while level < target && client.now() < deadline {
            if !self.buy_xp_round(client) {
                break;
            }
            pause(client, 50);
            level = client.level();
        }
        if level > start {
            info!(from = start, to = level, "leveled up");
        }
        self.state.effective_level = level;
        level
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::client::screen::{BUY_LOC, BUY_XP_LOC, REFRESH_LOC};
    use crate::client::sim::SimGame;
    use crate::client::GameQuery;
    use crate::roster::Roster;

    #[test]
    fn buys_wanted_and_stops_at_floor() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_gold(10);
        game.set_shop(&["Zyra", "Garen", "Zyra", "", ""]);
        roster.spend_gold(&mut game, false);
        assert_eq!(roster.state.acquisition_targets["Zyra"], 1);
        assert_eq!(roster.state.bench_units().count(), 2);
        assert!(!game.clicks().contains(&REFRESH_LOC));
    }

    #[test]
    fn rolls_down_to_the_low_health_floor() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut roster = Roster::new(session.data());
        roster.state.low_health_mode = true;
        let mut game = SimGame::new();
        game.set_gold(30);
        game.set_level(10);
        game.set_shop(&["Garen", "", "", "", ""]);
        roster.spend_gold(&mut game, false);
        // Each roll costs 2 gold: 30 -> 18 takes 6 rolls.
        let rolls = game.clicks().iter().filter(|p| **p == REFRESH_LOC).count();
        assert_eq!(rolls, 6);
        assert!(!game.clicks().contains(&BUY_XP_LOC));
    }

    #[test]
    fn level_up_stops_without_gold() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_level(3);
        game.set_gold(8);
        let level = roster.level_up(&mut game, 6, Duration::from_secs(3600));
        assert_eq!(game.gold(), 0);
        assert!(level < 6);
        assert_eq!(roster.state.effective_level, level);
    }

    #[test]
    fn anvil_prompt_is_answered_before_buying() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_shop(&["", "", "", "", ""]);
        game.set_anvil_prompt("Choose One");
        roster.spend_gold(&mut game, false);
        assert_eq!(game.clicks(), &[BUY_LOC[2], BUY_LOC[1]]);
    }
}
