//! In-memory game used by the dry-run binary and the tests.
//!
//! [`SimGame`] implements every collaborator trait against a small model of
//! the match: a shop, a bench, a board and an item bench. Clicks act on the
//! model the way the live client reacts to them, including two-click moves.
//! Round label, phase and health follow a timeline driven by the simulated
//! clock, which only advances when the engine sleeps.
//!
//! Clicks can be dropped on purpose to exercise drift recovery.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use super::screen::{
    bench_index, board_index, item_index, shop_index, Point, Region, ANVIL_MSG_POS, AUGMENT_LOC,
    AUGMENT_POS, BUY_XP_LOC, EXIT_NOW_LOC, ITEM_POS, PANEL_NAME_POS, PORTALS_POS,
    PORTAL_AUGMENT_POS, REFRESH_LOC, SECONDS_REMAINING_POS, SURRENDER_LOC, SURRENDER_TWO_LOC,
};
use super::{Clock, GameQuery, Input, Perception, ShopOffer, TextOptions};
use crate::board::{BENCH_SIZE, BOARD_SIZE, INVENTORY_SIZE};
use crate::catalog::schedule::RoundId;

const ROLL_COST: u32 = 2;
const XP_COST: u32 = 4;
const MAX_LEVEL: u32 = 10;

/// One point on the scripted timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub at: Duration,
    pub round: RoundId,
    pub phase: u32,
    pub health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Bench(usize),
    Board(usize),
    Item(usize),
}

/// Simulated game client.
#[derive(Debug, Clone)]
pub struct SimGame {
    bench: [Option<String>; BENCH_SIZE],
    board: Vec<Option<String>>,
    inventory: [Option<String>; INVENTORY_SIZE],
    shop: Vec<String>,
    rolls: VecDeque<Vec<String>>,
    costs: HashMap<String, u32>,
    panel: String,
    held: Option<Held>,
    level: u32,
    gold: u32,
    health: i32,
    round: (RoundId, u32),
    timeline: Vec<Frame>,
    alive_polls: u32,
    disconnect_at: Option<Duration>,
    icons: Vec<String>,
    augments: [String; 3],
    portals: [String; 3],
    region_text: String,
    anvil_prompt: String,
    now: Duration,
    drop_clicks: usize,
    dropped: usize,
    clicks: Vec<Point>,
    secondary: Vec<Point>,
    actions: Vec<Point>,
    cursor: Option<Point>,
    surrender_armed: bool,
    surrendered: bool,
    exited: bool,
}

impl Default for SimGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGame {
    pub fn new() -> Self {
        SimGame {
            bench: Default::default(),
            board: vec![None; BOARD_SIZE],
            inventory: Default::default(),
            shop: vec![String::new(); 5],
            rolls: VecDeque::new(),
            costs: HashMap::new(),
            panel: String::new(),
            held: None,
            level: 1,
            gold: 0,
            health: 100,
            round: (RoundId::new(1, 1), 1),
            timeline: Vec::new(),
            alive_polls: 0,
            disconnect_at: None,
            icons: Vec::new(),
            augments: Default::default(),
            portals: Default::default(),
            region_text: String::new(),
            anvil_prompt: String::new(),
            now: Duration::ZERO,
            drop_clicks: 0,
            dropped: 0,
            clicks: Vec::new(),
            secondary: Vec::new(),
            actions: Vec::new(),
            cursor: None,
            surrender_armed: false,
            surrendered: false,
            exited: false,
        }
    }

    /// Unit prices used for purchases and sales. Unlisted units cost 1.
    pub fn with_costs<I, S>(mut self, costs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        self.costs = costs.into_iter().map(|(n, c)| (n.into(), c)).collect();
        self
    }

    fn cost(&self, name: &str) -> u32 {
        self.costs.get(name).copied().unwrap_or(1)
    }

    pub fn set_bench(&mut self, index: usize, name: &str) {
        self.bench[index] = Some(name.to_string());
    }

    pub fn clear_bench(&mut self, index: usize) {
        self.bench[index] = None;
    }

    pub fn bench_name(&self, index: usize) -> Option<&str> {
        self.bench.get(index).and_then(|s| s.as_deref())
    }

    pub fn board_name(&self, index: usize) -> Option<&str> {
        self.board.get(index).and_then(|s| s.as_deref())
    }

    /// Sets the five shop slots; an empty string is a blank slot.
    pub fn set_shop(&mut self, names: &[&str]) {
        self.shop = names.iter().map(|s| s.to_string()).collect();
        self.shop.resize(5, String::new());
    }

    /// Queues the shop shown after the next roll.
    pub fn queue_roll(&mut self, names: &[&str]) {
        let mut shop: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        shop.resize(5, String::new());
        self.rolls.push_back(shop);
    }

    pub fn set_inventory(&mut self, items: &[(usize, &str)]) {
        self.inventory = Default::default();
        for &(slot, item) in items {
            self.inventory[slot] = Some(item.to_string());
        }
    }

    pub fn inventory_len(&self) -> usize {
        self.inventory.iter().flatten().count()
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn set_gold(&mut self, gold: u32) {
        self.gold = gold;
    }

    /// Health reported when no timeline frame applies.
    pub fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    pub fn set_round(&mut self, round: RoundId, phase: u32) {
        self.round = (round, phase);
    }

    /// Appends a timeline frame. Frames must be added in time order.
    pub fn push_frame(&mut self, at: Duration, round: RoundId, phase: u32, health: i32) {
        self.timeline.push(Frame { at, round, phase, health });
    }

    /// Number of alive checks that still report the player in the match.
    pub fn set_alive_polls(&mut self, polls: u32) {
        self.alive_polls = polls;
    }

    pub fn disconnect_at(&mut self, at: Duration) {
        self.disconnect_at = Some(at);
    }

    pub fn set_icons(&mut self, icons: &[&str]) {
        self.icons = icons.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_augments(&mut self, augments: [&str; 3]) {
        self.augments = augments.map(str::to_string);
    }

    pub fn set_portals(&mut self, portals: [&str; 3]) {
        self.portals = portals.map(str::to_string);
    }

    pub fn set_region_text(&mut self, text: &str) {
        self.region_text = text.to_string();
    }

    pub fn set_anvil_prompt(&mut self, text: &str) {
        self.anvil_prompt = text.to_string();
    }

    /// Silently ignores the next `n` primary clicks.
    pub fn drop_next_clicks(&mut self, n: usize) {
        self.drop_clicks = n;
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Primary clicks that reached the game, in order.
    pub fn clicks(&self) -> &[Point] {
        &self.clicks
    }

    pub fn secondary_clicks(&self) -> &[Point] {
        &self.secondary
    }

    /// Points the action key was pressed over.
    pub fn actions(&self) -> &[Point] {
        &self.actions
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn exited(&self) -> bool {
        self.exited
    }

    pub fn surrendered(&self) -> bool {
        self.surrendered
    }

    fn frame(&self) -> Option<&Frame> {
        self.timeline.iter().take_while(|f| f.at <= self.now).last()
    }

    fn buy(&mut self, slot: usize) {
        let name = self.shop[slot].clone();
        if name.is_empty() || self.gold < self.cost(&name) {
            return;
        }
        let Some(free) = self.bench.iter().position(Option::is_none) else {
            return;
        };
        self.gold -= self.cost(&name);
        self.bench[free] = Some(name);
        self.shop[slot].clear();
    }

    fn take_unit(&mut self, from: Held) -> Option<String> {
        match from {
            Held::Bench(i) => self.bench[i].take(),
            Held::Board(i) => self.board[i].take(),
            Held::Item(_) => None,
        }
    }

    fn put_unit(&mut self, to: Held, name: Option<String>) -> Option<String> {
        let slot = match to {
            Held::Bench(i) => &mut self.bench[i],
            Held::Board(i) => &mut self.board[i],
            Held::Item(_) => return name,
        };
        std::mem::replace(slot, name)
    }

    /// Second click of a drag: swaps units or drops an item on a unit.
    fn drop_onto(&mut self, from: Held, to: Held) {
        match from {
            Held::Item(slot) => {
                let has_unit = match to {
                    Held::Bench(i) => self.bench[i].is_some(),
                    Held::Board(i) => self.board[i].is_some(),
                    Held::Item(_) => false,
                };
                if has_unit {
                    self.inventory[slot] = None;
                }
            }
            _ => {
                let moving = self.take_unit(from);
                let displaced = self.put_unit(to, moving);
                self.put_unit(from, displaced);
            }
        }
    }
}

impl Perception for SimGame {
    fn read_text(&mut self, region: Region, _options: TextOptions) -> String {
        if region == PANEL_NAME_POS {
            return self.panel.clone();
        }
        if region == PORTAL_AUGMENT_POS {
            return self.region_text.clone();
        }
        if region == ANVIL_MSG_POS {
            return self.anvil_prompt.clone();
        }
        if let Some(i) = ITEM_POS.iter().position(|(_, r)| *r == region) {
            return self.inventory[i].clone().unwrap_or_default();
        }
        if let Some(i) = AUGMENT_POS.iter().position(|r| *r == region) {
            return self.augments[i].clone();
        }
        if let Some(i) = PORTALS_POS.iter().position(|r| *r == region) {
            return self.portals[i].clone();
        }
        String::new()
    }

    fn read_number(&mut self, region: Region) -> i32 {
        if region == SECONDS_REMAINING_POS {
            let since = self.frame().map_or(self.now, |f| self.now.saturating_sub(f.at));
            return 30 - since.as_secs().min(30) as i32;
        }
        -1
    }
}

impl Input for SimGame {
    fn click(&mut self, point: Point) {
        if self.drop_clicks > 0 {
            self.drop_clicks -= 1;
            self.dropped += 1;
            return;
        }
        self.clicks.push(point);

        let target = if let Some(i) = bench_index(point) {
            Some(Held::Bench(i))
        } else if let Some(i) = board_index(point) {
            Some(Held::Board(i))
        } else if let Some(i) = item_index(point) {
            Some(Held::Item(i))
        } else {
            None
        };
        if let Some(target) = target {
            match self.held.take() {
                Some(from) if !matches!(target, Held::Item(_)) => self.drop_onto(from, target),
                _ => self.held = Some(target),
            }
            return;
        }
        self.held = None;

        if let Some(slot) = shop_index(point) {
            self.buy(slot);
        } else if point == BUY_XP_LOC {
            if self.gold >= XP_COST {
                self.gold -= XP_COST;
                self.level = (self.level + 1).min(MAX_LEVEL);
            }
        } else if point == REFRESH_LOC {
            if self.gold >= ROLL_COST {
                self.gold -= ROLL_COST;
                if let Some(shop) = self.rolls.pop_front() {
                    self.shop = shop;
                }
            }
        } else if point == EXIT_NOW_LOC {
            self.exited = true;
        } else if point == SURRENDER_LOC {
            self.surrender_armed = true;
        } else if point == SURRENDER_TWO_LOC && self.surrender_armed {
            self.surrendered = true;
        } else if AUGMENT_LOC.contains(&point) {
            self.augments = Default::default();
        }
    }

    fn secondary_click(&mut self, point: Point) {
        self.secondary.push(point);
        if let Some(i) = bench_index(point) {
            self.panel = self.bench[i].clone().unwrap_or_default();
        } else if let Some(i) = board_index(point) {
            self.panel = self.board[i].clone().unwrap_or_default();
        }
    }

    fn move_cursor(&mut self, point: Point) {
        self.cursor = Some(point);
    }

    fn press_action_key(&mut self, point: Point) {
        self.actions.push(point);
        let sold = if let Some(i) = bench_index(point) {
            self.bench[i].take()
        } else if let Some(i) = board_index(point) {
            self.board[i].take()
        } else {
            None
        };
        if let Some(name) = sold {
            self.gold += self.cost(&name);
        }
    }
}

impl GameQuery for SimGame {
    fn level(&mut self) -> u32 {
        self.level
    }

    fn gold(&mut self) -> u32 {
        self.gold
    }

    fn health(&mut self) -> i32 {
        self.frame().map_or(self.health, |f| f.health)
    }

    fn round(&mut self) -> (RoundId, u32) {
        self.frame().map_or(self.round, |f| (f.round, f.phase))
    }

    fn shop(&mut self) -> Vec<ShopOffer> {
        self.shop.iter().enumerate().map(|(i, n)| ShopOffer::new(i, n.clone())).collect()
    }

    fn inventory(&mut self) -> Vec<Option<String>> {
        self.inventory.to_vec()
    }

    fn bench_occupancy(&mut self) -> [bool; BENCH_SIZE] {
        std::array::from_fn(|i| self.bench[i].is_some())
    }

    fn is_alive(&mut self) -> bool {
        if self.alive_polls > 0 {
            self.alive_polls -= 1;
            true
        } else {
            false
        }
    }

    fn disconnected(&mut self) -> bool {
        self.disconnect_at.is_some_and(|at| self.now >= at)
    }

    fn encounter_icons(&mut self) -> Vec<String> {
        self.icons.clone()
    }
}

impl Clock for SimGame {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::screen::{BENCH_LOC, BOARD_LOC, BUY_LOC};

    #[test]
    fn two_clicks_move_a_unit() {
        let mut game = SimGame::new();
        game.set_bench(0, "Zyra");
        game.click(BENCH_LOC[0]);
        game.click(BOARD_LOC[22]);
        assert_eq!(game.board_name(22), Some("Zyra"));
        assert_eq!(game.bench_name(0), None);
    }

    #[test]
    fn dropped_clicks_leave_the_model_alone() {
        let mut game = SimGame::new().with_costs([("Zyra", 1)]);
        game.set_gold(5);
        game.set_shop(&["Zyra"]);
        game.drop_next_clicks(1);
        game.click(BUY_LOC[0]);
        assert_eq!(game.dropped(), 1);
        assert!(game.bench_occupancy().iter().all(|o| !o));
        game.click(BUY_LOC[0]);
        assert_eq!(game.bench_name(0), Some("Zyra"));
        assert_eq!(game.gold(), 4);
    }

    #[test]
    fn timeline_follows_the_clock() {
        let mut game = SimGame::new();
        game.push_frame(Duration::ZERO, RoundId::new(2, 1), 1, 80);
        game.push_frame(Duration::from_secs(30), RoundId::new(2, 2), 1, 0);
        assert_eq!(game.round(), (RoundId::new(2, 1), 1));
        game.sleep(Duration::from_secs(31));
        assert_eq!(game.round().0, RoundId::new(2, 2));
        assert_eq!(game.health(), 0);
    }
}
