//! Roster state engine.
//!
//! [`Roster`] keeps the engine's belief about the bench and board in step with
//! the game. Every action is a handful of fire-and-forget clicks followed by a
//! local bookkeeping update; nothing waits for confirmation. When a click is
//! lost the belief drifts, and the next [`Roster::reconcile_bench`] pulls it
//! back to what the screen shows.

mod final_comp;
mod placing;
mod shop;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::slot::UNREADABLE;
use crate::board::unit::{Location, Unit};
use crate::board::{RosterState, Slot, BENCH_SIZE, BOARD_SIZE};
use crate::client::display::Label;
use crate::client::screen::{BENCH_LOC, BOARD_LOC, BUY_LOC, DEFAULT_LOC, PANEL_NAME_POS};
use crate::client::text::normalize_unit_name;
use crate::client::{pause, read_until_stable, CharSet, GameClient, ShopOffer, TextOptions};
use crate::config::TimingConfig;
use crate::session::SessionData;

/// Recoverable roster failures. None of them ends a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no room for {0}: bench still full after re-reading it")]
    BoardFull(String),
    #[error("shop slot {0} does not exist")]
    NoShopSlot(usize),
    #[error("bench slot {0} holds no tracked unit")]
    NotTracked(usize),
    #[error("{0} has no board position")]
    NoBoardPosition(String),
    #[error("board slot {slot} is occupied, cannot place {name}")]
    SlotOccupied { slot: usize, name: String },
    #[error("no unconfirmed unit on the bench")]
    NoUnconfirmedBench,
    #[error("reserved slots for unconfirmed units are exhausted")]
    NoUnknownSlot,
    #[error("{0} is not on the board")]
    NotOnBoard(String),
}

/// Where a purchase ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    Benched(usize),
    /// Bought onto a full bench; the copy merged into a star-up.
    Merged,
}

/// Result of [`Roster::fill_to_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Filled,
    /// Nothing left to field; the bench was sold instead.
    SoldBench,
}

enum BenchFix {
    Identify,
    Materialize(String),
    Clear,
}

/// Mutable roster state plus the session data it is interpreted against.
#[derive(Debug, Clone)]
pub struct Roster<'a> {
    pub state: RosterState,
    data: SessionData<'a>,
}

impl<'a> Roster<'a> {
    pub fn new(data: SessionData<'a>) -> Self {
        Roster { state: RosterState::new(data.comp), data }
    }

    pub fn data(&self) -> SessionData<'a> {
        self.data
    }

    fn timing(&self) -> &'a TimingConfig {
        &self.data.config.timing
    }

    /// Brings the bench belief in line with `observed` occupancy.
    ///
    /// Newly occupied slots are identified through the info panel. Wanted
    /// names become tracked units; anything else is kept as unconfirmed.
    /// Slots believed occupied but seen empty are cleared. Running it twice
    /// against the same screen changes nothing the second time.
    pub fn reconcile_bench<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        observed: [bool; BENCH_SIZE],
    ) {
        for (index, &occupied) in observed.iter().enumerate() {
            let fix = match (&self.state.bench[index], occupied) {
                (Slot::Empty, true) => BenchFix::Identify,
                (Slot::Unconfirmed(name), true) if name == UNREADABLE => BenchFix::Identify,
                (Slot::Unconfirmed(name), true) if self.state.is_wanted(name) => {
                    BenchFix::Materialize(name.clone())
                }
                (Slot::Unconfirmed(_) | Slot::Tracked(_), false) => BenchFix::Clear,
                _ => continue,
            };
            match fix {
                BenchFix::Identify => {
                    let name = self.identify(client, index);
                    self.materialize(index, name);
                }
                BenchFix::Materialize(name) => self.materialize(index, name),
                BenchFix::Clear => {
                    debug!(slot = index, name = ?self.state.bench[index].name(), "bench slot seen empty");
                    self.state.bench[index] = Slot::Empty;
                }
            }
        }
    }

    /// [`Roster::reconcile_bench`] against a fresh occupancy read.
    pub fn reconcile_bench_now<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        let observed = client.bench_occupancy();
        self.reconcile_bench(client, observed);
    }

    fn identify<C: GameClient + ?Sized>(&self, client: &mut C, index: usize) -> String {
        let t = self.timing();
        client.secondary_click(BENCH_LOC[index]);
        let read = read_until_stable(
            client,
            PANEL_NAME_POS,
            TextOptions::line_with(CharSet::LettersSpaceSymbols),
            t.perception_retries,
            t.perception_retry_ms,
        );
        match read {
            Some(raw) => normalize_unit_name(&raw, self.data.catalog.unit_names()),
            None => {
                debug!(slot = index, "unit name unreadable");
                UNREADABLE.to_string()
            }
        }
    }

    fn materialize(&mut self, index: usize, name: String) {
        if self.state.is_wanted(&name) {
            self.decrement_target(&name);
            info!(slot = index, unit = %name, "tracking bench unit");
            let unit = self.data.make_unit(&name, Location::bench(index));
            self.state.bench[index] = Slot::Tracked(Box::new(unit));
        } else {
            debug!(slot = index, unit = %name, "unconfirmed bench unit");
            self.state.bench[index] = Slot::Unconfirmed(name);
        }
    }

    fn decrement_target(&mut self, name: &str) {
        if let Some(count) = self.state.acquisition_targets.get_mut(name) {
            *count -= 1;
        }
    }

    /// Buys `offer` onto the bench.
    pub fn acquire<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        offer: &ShopOffer,
    ) -> Result<AcquireOutcome, RosterError> {
        let buy = *BUY_LOC.get(offer.slot).ok_or(RosterError::NoShopSlot(offer.slot))?;
        let settle = self.timing().settle_ms;

        let Some(index) = self.state.first_empty_bench() else {
            client.click(buy);
            client.move_cursor(DEFAULT_LOC);
            pause(client, settle);
            self.reconcile_bench_now(client);
            if self.state.first_empty_bench().is_none() {
                return Err(RosterError::BoardFull(offer.name.clone()));
            }
            self.decrement_target(&offer.name);
            info!(unit = %offer.name, "bought onto a full bench");
            return Ok(AcquireOutcome::Merged);
        };

        client.click(buy);
        let unit = self.data.make_unit(&offer.name, Location::bench(index));
        self.state.bench[index] = Slot::Tracked(Box::new(unit));
        self.decrement_target(&offer.name);
        info!(unit = %offer.name, slot = index, "bought");
        client.move_cursor(DEFAULT_LOC);
        pause(client, settle);
        self.reconcile_bench_now(client);
        Ok(AcquireOutcome::Benched(index))
    }

    /// Moves the tracked unit on `bench_index` to its board position.
    pub fn promote<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        bench_index: usize,
    ) -> Result<usize, RosterError> {
        let unit = self
            .state
            .bench
            .get(bench_index)
            .and_then(Slot::unit)
            .ok_or(RosterError::NotTracked(bench_index))?;
        let dest = unit
            .board_position
            .filter(|&p| p < BOARD_SIZE)
            .ok_or_else(|| RosterError::NoBoardPosition(unit.name.clone()))?;
        self.promote_to(client, bench_index, dest)?;
        Ok(dest)
    }

    fn promote_to<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        bench_index: usize,
        dest: usize,
    ) -> Result<(), RosterError> {
        if let Some(name) = self.state.board[dest].name() {
            return Err(RosterError::SlotOccupied { slot: dest, name: name.to_string() });
        }
        let mut unit = match self.state.bench[bench_index].take() {
            Slot::Tracked(unit) => unit,
            other => {
                self.state.bench[bench_index] = other;
                return Err(RosterError::NotTracked(bench_index));
            }
        };
        client.click(BENCH_LOC[bench_index]);
        pause(client, self.timing().move_sync_ms);
        client.click(BOARD_LOC[dest]);

        info!(unit = %unit.name, from = bench_index, to = dest, "promoted");
        unit.location = Location::board(dest);
        self.state.board_names.insert(unit.name.clone());
        self.state.board_weight_used += unit.board_weight;
        self.state.board[dest] = Slot::Tracked(unit);
        Ok(())
    }

    /// Moves the first unconfirmed bench unit to the next reserved slot.
    pub fn promote_unknown<C: GameClient + ?Sized>(&mut self, client: &mut C) -> Result<usize, RosterError> {
        let index = self.state.first_unconfirmed_bench().ok_or(RosterError::NoUnconfirmedBench)?;
        let dest = self
            .state
            .unknown_slots
            .get(self.state.unconfirmed_board.len())
            .copied()
            .filter(|&d| d < BOARD_SIZE)
            .ok_or(RosterError::NoUnknownSlot)?;
        if let Some(name) = self.state.board[dest].name() {
            return Err(RosterError::SlotOccupied { slot: dest, name: name.to_string() });
        }
        client.click(BENCH_LOC[index]);
        pause(client, self.timing().unknown_sync_ms);
        client.click(BOARD_LOC[dest]);

        let slot = self.state.bench[index].take();
        info!(unit = ?slot.name(), from = index, to = dest, "promoted unconfirmed unit");
        self.state.board[dest] = slot;
        self.state.unconfirmed_board.push(dest);
        self.state.board_weight_used += 1;
        Ok(dest)
    }

    fn has_unknown_slot(&self) -> bool {
        self.state.unknown_slots.len() > self.state.unconfirmed_board.len()
    }

    /// First tracked bench unit off the board whose board position is free.
    fn promotable(&self) -> Option<usize> {
        self.state.bench.iter().position(|s| {
            s.unit().is_some_and(|u| {
                !self.state.board_names.contains(&u.name)
                    && u.board_position
                        .is_some_and(|p| p < BOARD_SIZE && self.state.board[p].is_empty())
            })
        })
    }

    /// Cheapest way to put one more weight-1 body on the board from the shop.
    fn filler_offer<C: GameClient + ?Sized>(&self, client: &mut C) -> Option<ShopOffer> {
        self.state.first_empty_bench()?;
        let gold = client.gold();
        client.shop().into_iter().find(|offer| {
            let Some(info) = self.data.catalog.unit(&offer.name) else {
                return false;
            };
            info.board_size == 1
                && info.cost <= gold
                && offer.slot < BUY_LOC.len()
                && self.state.acquisition_targets.get(&offer.name).map_or(true, |n| *n < 0)
                && !self.state.unconfirmed_on_board(&offer.name)
        })
    }

    /// Fields units until the board weight matches the player level.
    ///
    /// Owned composition units go first, then unconfirmed bench units, then a
    /// cheap shop filler. When none of those is available the whole bench is
    /// sold for gold.
    pub fn fill_to_level<C: GameClient + ?Sized>(&mut self, client: &mut C) -> FillOutcome {
        self.state.effective_level = client.level();
        for _ in 0..BOARD_SIZE {
            if self.state.capacity() <= self.state.board_weight_used {
                return FillOutcome::Filled;
            }
            if !self.field_one(client) {
                break;
            }
        }
        if self.state.capacity() <= self.state.board_weight_used {
            return FillOutcome::Filled;
        }
        info!(
            level = self.state.effective_level,
            weight = self.state.board_weight_used,
            "nothing left to field, selling the bench"
        );
        self.sell_bench(client);
        FillOutcome::SoldBench
    }

    /// Puts one more body on the board. A failed option counts as
    /// unavailable and the next one is tried. Returns whether anything moved.
    fn field_one<C: GameClient + ?Sized>(&mut self, client: &mut C) -> bool {
        if let Some(index) = self.promotable() {
            match self.promote(client, index) {
                Ok(_) => return true,
                Err(e) => warn!(error = %e, "promotion failed while filling"),
            }
        }
        if !self.has_unknown_slot() {
            return false;
        }
        if self.state.first_unconfirmed_bench().is_some() {
            match self.promote_unknown(client) {
                Ok(_) => return true,
                Err(e) => {
                    warn!(error = %e, "unconfirmed promotion failed while filling");
                    return false;
                }
            }
        }
        let Some(offer) = self.filler_offer(client) else {
            return false;
        };
        let Some(index) = self.state.first_empty_bench() else {
            return false;
        };
        client.click(BUY_LOC[offer.slot]);
        pause(client, self.timing().buy_ms);
        info!(unit = %offer.name, "bought filler");
        self.state.bench[index] = Slot::Unconfirmed(offer.name);
        match self.promote_unknown(client) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "filler promotion failed");
                false
            }
        }
    }

    /// Sells the latest unconfirmed board occupant and fields an owned
    /// composition unit instead. Returns whether a swap happened.
    pub fn replace_unknown<C: GameClient + ?Sized>(&mut self, client: &mut C) -> bool {
        let Some(&slot) = self.state.unconfirmed_board.last() else {
            return false;
        };
        let Some(index) = self.promotable() else {
            return false;
        };
        client.press_action_key(BOARD_LOC[slot]);
        let sold = self.state.board[slot].take();
        self.state.unconfirmed_board.pop();
        self.state.board_weight_used = self.state.board_weight_used.saturating_sub(1);
        info!(slot, unit = ?sold.name(), "sold unconfirmed board unit");
        match self.promote(client, index) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "replacement promotion failed");
                false
            }
        }
    }

    /// Sells every copy of `name` and stops buying it.
    pub fn remove<C: GameClient + ?Sized>(&mut self, client: &mut C, name: &str) -> Result<usize, RosterError> {
        let board_slot = self
            .state
            .board_slot_of(name)
            .ok_or_else(|| RosterError::NotOnBoard(name.to_string()))?;
        for index in 0..BENCH_SIZE {
            if self.state.bench[index].unit().is_some_and(|u| u.name == name) {
                client.press_action_key(BENCH_LOC[index]);
                self.state.bench[index] = Slot::Empty;
            }
        }
        self.state.acquisition_targets.remove(name);
        client.press_action_key(BOARD_LOC[board_slot]);
        if let Some(unit) = self.state.board[board_slot].take().unit() {
            self.state.board_weight_used = self.state.board_weight_used.saturating_sub(unit.board_weight);
        }
        self.state.board_names.remove(name);
        info!(unit = name, slot = board_slot, "removed");
        Ok(board_slot)
    }

    /// Sells unconfirmed bench units and spare copies of fielded units that
    /// are no longer wanted. Returns the slots it freed.
    pub fn bench_cleanup<C: GameClient + ?Sized>(&mut self, client: &mut C) -> Vec<usize> {
        let mut freed = Vec::new();
        for index in 0..BENCH_SIZE {
            let sell = match &self.state.bench[index] {
                Slot::Empty => false,
                Slot::Unconfirmed(_) => true,
                Slot::Tracked(unit) => {
                    self.state.board_names.contains(&unit.name)
                        && self.state.acquisition_targets.get(&unit.name).map_or(true, |n| *n < 0)
                }
            };
            if sell {
                client.press_action_key(BENCH_LOC[index]);
                debug!(slot = index, unit = ?self.state.bench[index].name(), "sold bench unit");
                self.state.bench[index] = Slot::Empty;
                freed.push(index);
            }
        }
        freed
    }

    /// Presses the sell key over every bench slot believed empty except
    /// `skip`. Anvils sit on slots the engine does not track.
    pub fn clear_anvils<C: GameClient + ?Sized>(&mut self, client: &mut C, skip: &[usize]) {
        for index in 0..BENCH_SIZE {
            if self.state.bench[index].is_empty() && !skip.contains(&index) {
                client.press_action_key(BENCH_LOC[index]);
            }
        }
    }

    pub fn sell_bench<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        for (index, slot) in self.state.bench.iter_mut().enumerate() {
            client.press_action_key(BENCH_LOC[index]);
            *slot = Slot::Empty;
        }
    }

    /// Reads health and switches to low-health rolling once it drops far
    /// enough. Returns the reading.
    pub fn check_health<C: GameClient + ?Sized>(&mut self, client: &mut C) -> i32 {
        let health = client.health();
        let threshold = self.data.config.policy.spam_roll_health;
        if health > 0 && health <= threshold && !self.state.low_health_mode {
            info!(health, "health is low, rolling down");
            self.state.low_health_mode = true;
        }
        health
    }

    /// Overlay labels for every known unit.
    pub fn labels(&self) -> Vec<Label> {
        let tracked = self
            .state
            .bench
            .iter()
            .chain(&self.state.board)
            .filter_map(Slot::unit)
            .map(|u: &Unit| Label::new(u.name.clone(), u.anchor()));
        let unconfirmed = self.state.unconfirmed_board.iter().filter_map(|&i| match &self.state.board[i] {
            Slot::Unconfirmed(name) => Some(Label::new(name.clone(), BOARD_LOC[i])),
            _ => None,
        });
        tracked.chain(unconfirmed).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sim::SimGame;
    use crate::session::Session;

    fn session() -> Session {
        crate::test_session("Shurima Sorcerers")
    }

    #[test]
    fn reconcile_tracks_wanted_and_clears_missing() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(3, "Zyra");
        game.set_bench(5, "Garen");
        roster.state.bench[7] = Slot::Unconfirmed("Ahri".into());

        roster.reconcile_bench_now(&mut game);
        assert_eq!(roster.state.bench[3].unit().map(|u| u.name.as_str()), Some("Zyra"));
        assert_eq!(roster.state.bench[5], Slot::Unconfirmed("Garen".into()));
        assert!(roster.state.bench[7].is_empty());
        assert_eq!(roster.state.acquisition_targets["Zyra"], 2);

        let before = roster.state.clone();
        roster.reconcile_bench_now(&mut game);
        assert_eq!(roster.state, before);
    }

    #[test]
    fn unreadable_names_are_read_again() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Ilaoi");
        roster.state.bench[0] = Slot::Unconfirmed(UNREADABLE.into());
        roster.reconcile_bench_now(&mut game);
        assert_eq!(roster.state.bench[0].unit().map(|u| u.name.as_str()), Some("Illaoi"));
    }

    #[test]
    fn acquire_benches_and_decrements() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_gold(5);
        game.set_shop(&["Zyra", "Garen", "", "", ""]);
        let outcome = roster.acquire(&mut game, &ShopOffer::new(0, "Zyra")).unwrap();
        assert_eq!(outcome, AcquireOutcome::Benched(0));
        assert_eq!(roster.state.acquisition_targets["Zyra"], 2);
        assert!(roster.state.bench[0].unit().is_some());
    }

    #[test]
    fn acquire_on_full_bench_fails_without_space() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        for i in 0..BENCH_SIZE {
            game.set_bench(i, "Garen");
        }
        game.set_shop(&["Zyra", "", "", "", ""]);
        roster.reconcile_bench_now(&mut game);
        let err = roster.acquire(&mut game, &ShopOffer::new(0, "Zyra")).unwrap_err();
        assert_eq!(err, RosterError::BoardFull("Zyra".into()));
        assert_eq!(roster.state.acquisition_targets["Zyra"], 3);
    }

    #[test]
    fn promote_and_remove_keep_weight() {
        let session = crate::test_session("High Value");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Sion");
        roster.reconcile_bench_now(&mut game);

        assert_eq!(roster.promote(&mut game, 0), Ok(10));
        assert_eq!(roster.state.board_weight_used, 2);
        assert!(roster.state.board_names.contains("Sion"));
        assert_eq!(game.board_name(10), Some("Sion"));
        assert_eq!(roster.promote(&mut game, 0), Err(RosterError::NotTracked(0)));

        assert_eq!(roster.remove(&mut game, "Sion"), Ok(10));
        assert_eq!(roster.state.board_weight_used, 0);
        assert!(!roster.state.acquisition_targets.contains_key("Sion"));
        assert_eq!(roster.remove(&mut game, "Sion"), Err(RosterError::NotOnBoard("Sion".into())));
    }

    #[test]
    fn promote_unknown_uses_reserved_slots_in_order() {
        let session = crate::test_session("High Value");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Garen");
        game.set_bench(1, "Lux");
        roster.reconcile_bench_now(&mut game);
        assert_eq!(roster.promote_unknown(&mut game), Ok(21));
        assert_eq!(roster.promote_unknown(&mut game), Ok(22));
        assert_eq!(roster.promote_unknown(&mut game), Err(RosterError::NoUnconfirmedBench));
        assert_eq!(roster.state.board_weight_used, 2);
        assert_eq!(roster.labels().len(), 2);
    }

    #[test]
    fn reserved_slot_off_the_board_is_refused() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Garen");
        roster.reconcile_bench_now(&mut game);
        roster.state.unknown_slots = vec![30];
        assert_eq!(roster.promote_unknown(&mut game), Err(RosterError::NoUnknownSlot));
        assert_eq!(roster.state.board_weight_used, 0);
    }

    #[test]
    fn fill_sells_bench_when_reserved_slot_is_taken() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Zyra");
        roster.reconcile_bench_now(&mut game);
        assert_eq!(roster.promote(&mut game, 0), Ok(22));
        game.set_bench(1, "Garen");
        roster.reconcile_bench_now(&mut game);
        roster.state.unknown_slots = vec![22];
        game.set_level(2);

        assert_eq!(roster.fill_to_level(&mut game), FillOutcome::SoldBench);
        assert!(roster.state.bench.iter().all(Slot::is_empty));
        assert_eq!(game.bench_name(1), None);
        assert_eq!(roster.state.board_weight_used, 1);
    }

    #[test]
    fn replace_unknown_swaps_in_owned_unit() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Garen");
        roster.reconcile_bench_now(&mut game);
        let slot = roster.promote_unknown(&mut game).unwrap();
        game.set_bench(1, "Zyra");
        roster.reconcile_bench_now(&mut game);

        assert!(roster.replace_unknown(&mut game));
        assert!(roster.state.board[slot].is_empty());
        assert!(roster.state.unconfirmed_board.is_empty());
        assert!(roster.state.board_names.contains("Zyra"));
        assert_eq!(roster.state.board_weight_used, 1);
        assert!(!roster.replace_unknown(&mut game));
    }

    #[test]
    fn bench_cleanup_sells_spares() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Zyra");
        game.set_bench(1, "Garen");
        roster.reconcile_bench_now(&mut game);
        roster.promote(&mut game, 0).unwrap();
        game.set_bench(2, "Zyra");
        roster.reconcile_bench_now(&mut game);

        // Zyra is still wanted, so the spare copy stays for the star-up.
        assert_eq!(roster.bench_cleanup(&mut game), vec![1]);
        roster.state.acquisition_targets.insert("Zyra".into(), -1);
        assert_eq!(roster.bench_cleanup(&mut game), vec![2]);
    }

    #[test]
    fn low_health_flips_once() {
        let session = session();
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_health(31);
        roster.check_health(&mut game);
        assert!(!roster.state.low_health_mode);
        game.set_health(30);
        assert_eq!(roster.check_health(&mut game), 30);
        assert!(roster.state.low_health_mode);
    }
}
