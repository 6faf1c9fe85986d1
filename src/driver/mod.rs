//! Round policy driver.
//!
//! [`RoundDriver`] polls the round label and runs one handler per round kind
//! the first time a new label shows up. Handlers are straight-line sequences
//! of roster operations separated by fixed waits; the later, optional steps
//! are skipped when the planning phase is about to run out.
//!
//! The session ends only on external signals: defeat, victory, a dropped
//! connection or a planned surrender. Roster errors are logged and ignored.

pub mod choice;

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::board::slot::UNREADABLE;
use crate::board::{Slot, BENCH_SIZE};
use crate::catalog::schedule::{RoundFeature, RoundId, RoundKind, RoundSchedule};
use crate::client::display::{DisplayChannel, Label};
use crate::client::screen::{
    CAROUSEL_LOC, DEFAULT_LOC, DEFAULT_TACTICIAN_LOC, EXIT_NOW_LOC, ITEM_PICKUP_LOC,
    PORTAL_AUGMENT_LOC, PORTAL_AUGMENT_POS, SECONDS_REMAINING_LOC, SECONDS_REMAINING_POS,
    SURRENDER_LOC, SURRENDER_TWO_LOC,
};
use crate::client::{pause, GameClient, TextOptions};
use crate::config::TimingConfig;
use crate::roster::Roster;
use crate::session::SessionData;

/// Reads of a three-option chooser before giving up.
const OPTION_READ_ATTEMPTS: u32 = 10;
/// Polls for the carousel unit to land on the bench in the second round.
const BENCH_WAIT_POLLS: u32 = 20;
/// Augment that lets glove-making ignore build lists.
const LUCKY_GLOVES: &str = "Lucky Gloves";
const RADIANT_REGION: &str = "Radiant Item";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Victory,
    /// `exited` is false when the player never left the match after health
    /// read zero.
    Defeat { exited: bool },
    Forfeit,
    Disconnected,
}

/// Per-session round state machine.
#[derive(Debug)]
pub struct RoundDriver<'a> {
    pub roster: Roster<'a>,
    schedule: RoundSchedule,
    display: DisplayChannel,
    rng: SmallRng,
    last_round: Option<RoundId>,
    active_portal: String,
    radiant_shop: bool,
    round_start: Duration,
    forfeit_at: Option<Duration>,
}

impl<'a> RoundDriver<'a> {
    /// A driver for a fresh match. `seed` fixes the surrender jitter.
    pub fn new(data: SessionData<'a>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        RoundDriver {
            roster: Roster::new(data),
            schedule: RoundSchedule::standard(data.comp.fast8),
            display: DisplayChannel::new(),
            rng,
            last_round: None,
            active_portal: String::new(),
            radiant_shop: false,
            round_start: Duration::ZERO,
            forfeit_at: None,
        }
    }

    pub fn display(&self) -> &DisplayChannel {
        &self.display
    }

    pub fn schedule(&self) -> &RoundSchedule {
        &self.schedule
    }

    pub fn active_portal(&self) -> &str {
        &self.active_portal
    }

    fn data(&self) -> SessionData<'a> {
        self.roster.data()
    }

    fn timing(&self) -> &'a TimingConfig {
        let config = self.roster.data().config;
        &config.timing
    }

    /// Runs the session until the match is over for this player.
    pub fn run<C: GameClient + ?Sized>(&mut self, client: &mut C) -> SessionOutcome {
        let t = self.timing();
        self.forfeit_at = self.plan_forfeit(client.now());
        let mut last_health = 100;
        loop {
            if client.disconnected() {
                warn!("connection lost, ending session");
                self.display.clear();
                return SessionOutcome::Disconnected;
            }
            let health = client.health();
            if health == 0 && last_health > 0 {
                return self.confirm_death(client);
            }
            if health == -1 && last_health > 0 {
                info!("match won");
                self.display.clear();
                pause(client, t.victory_wait_ms);
                return SessionOutcome::Victory;
            }
            last_health = health;

            let (round, phase) = client.round();
            self.round_start = client.now();
            self.publish_countdown(client);
            if self.forfeit_at.is_some_and(|at| client.now() >= at) {
                self.forfeit(client);
                return SessionOutcome::Forfeit;
            }

            if self.last_round != Some(round) {
                if self.handle_round(client, round) {
                    self.last_round = Some(round);
                }
                if phase == 1 && round.round == 1 {
                    self.setup_encounters(client, round.stage);
                }
            }
            pause(client, t.loop_sleep_ms);
        }
    }

    fn plan_forfeit(&mut self, now: Duration) -> Option<Duration> {
        let config = self.data().config;
        let forfeit = &config.forfeit;
        if !forfeit.enabled {
            return None;
        }
        let jitter = self.rng.gen_range(forfeit.jitter_min_secs..=forfeit.jitter_max_secs);
        let at = now + Duration::from_secs(forfeit.after_secs + jitter);
        info!(after_secs = at.saturating_sub(now).as_secs(), "surrender planned");
        Some(at)
    }

    fn confirm_death<C: GameClient + ?Sized>(&mut self, client: &mut C) -> SessionOutcome {
        let t = self.timing();
        for _ in 0..t.death_polls {
            if !client.is_alive() {
                info!("eliminated, leaving the match");
                self.display.clear();
                client.click(EXIT_NOW_LOC);
                return SessionOutcome::Defeat { exited: true };
            }
            pause(client, t.death_poll_ms);
        }
        warn!("health read zero but the player is still in the match");
        SessionOutcome::Defeat { exited: false }
    }

    fn forfeit<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        info!("surrendering");
        self.display.clear();
        client.click(SURRENDER_LOC);
        pause(client, 1000);
        client.click(SURRENDER_TWO_LOC);
    }

    fn publish_countdown<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        let seconds = client.read_number(SECONDS_REMAINING_POS);
        let mut labels = self.roster.labels();
        labels.push(Label::new(seconds.to_string(), SECONDS_REMAINING_LOC).with_offset(-40, -10));
        self.display.labels(labels);
    }

    /// Dispatches on the round kind. Returns false for rounds the schedule
    /// does not know, so they are looked at again on the next poll.
    fn handle_round<C: GameClient + ?Sized>(&mut self, client: &mut C, round: RoundId) -> bool {
        let Some(kind) = self.schedule.classify(round) else {
            debug!(%round, "round not in the schedule");
            return false;
        };
        info!(%round, ?kind, comp = %self.data().comp.name, "new round");
        match kind {
            RoundKind::Portal => self.portal_round(client),
            RoundKind::SecondRound => self.second_round(client),
            RoundKind::Carousel => self.carousel_round(client, round),
            RoundKind::Pve => {
                client.move_cursor(DEFAULT_LOC);
                self.pve_round(client, round);
            }
            RoundKind::Pvp => {
                client.move_cursor(DEFAULT_LOC);
                self.pvp_round(client, round);
            }
            RoundKind::Encounter => {
                self.display.clear();
                self.roster.check_health(client);
            }
        }
        true
    }

    /// Rebuilds this stage's tables from the icon strip.
    fn setup_encounters<C: GameClient + ?Sized>(&mut self, client: &mut C, stage: u8) {
        let icons = client.encounter_icons();
        if icons.is_empty() {
            warn!(stage, "round icons unreadable, keeping the schedule");
            return;
        }
        info!(stage, ?icons, "rebuilding stage schedule");
        self.schedule.apply_encounters(stage, &icons);
    }

    fn start_round_tasks<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        self.display.clear();
        client.move_cursor(DEFAULT_LOC);
        client.secondary_click(DEFAULT_TACTICIAN_LOC);
        self.roster.check_health(client);
    }

    fn end_round_tasks<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        self.roster.check_health(client);
        self.display.labels(self.roster.labels());
        client.secondary_click(DEFAULT_TACTICIAN_LOC);
        client.move_cursor(DEFAULT_LOC);
    }

    /// Whether at least `margin` of `budget` is left in this round.
    fn has_time<C: GameClient + ?Sized>(&self, client: &C, budget: Duration, margin: Duration) -> bool {
        let elapsed = client.now().saturating_sub(self.round_start);
        budget.saturating_sub(elapsed) >= margin
    }

    fn anvil_portal_active(&self) -> bool {
        self.data()
            .config
            .choices
            .anvil_portals
            .iter()
            .any(|p| self.active_portal.contains(p.as_str()))
    }

    fn portal_round<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        let data = self.data();
        self.start_round_tasks(client);
        pause(client, 2500);
        let priority: Vec<String> =
            data.comp.portals.iter().chain(&data.config.choices.portals).cloned().collect();
        choice::vote_portal(client, &priority, &data.config.choices.avoid_portals, OPTION_READ_ATTEMPTS);
    }

    fn pick_augment<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        let data = self.data();
        pause(client, 1000);
        let priority: Vec<String> =
            data.comp.augments.iter().chain(&data.config.choices.augments).cloned().collect();
        let picked = choice::pick_augment(
            client,
            &priority,
            &data.config.choices.avoid_augments,
            true,
            OPTION_READ_ATTEMPTS,
        );
        if picked.is_some_and(|a| a.contains(LUCKY_GLOVES)) {
            info!("lucky gloves taken, gloves may go on any empty unit");
            self.roster.state.lucky_gloves = true;
        }
        pause(client, 2500);
    }

    /// First round after the opening carousel: field the carousel unit and
    /// read the region portal.
    fn second_round<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        self.start_round_tasks(client);
        let mut landed = None;
        for _ in 0..BENCH_WAIT_POLLS {
            landed = client.bench_occupancy().iter().position(|&o| o);
            if landed.is_some() {
                break;
            }
            pause(client, 500);
        }
        match landed {
            Some(index) => {
                self.roster.state.bench[index] = Slot::Unconfirmed(UNREADABLE.to_string());
                for _ in 0..client.level() {
                    if let Err(e) = self.roster.promote_unknown(client) {
                        debug!(error = %e, "no more units to field");
                        break;
                    }
                }
            }
            None => warn!("carousel unit never reached the bench"),
        }
        pause(client, 2500);
        self.read_region_portal(client);
        self.end_round_tasks(client);
    }

    fn read_region_portal<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        client.secondary_click(PORTAL_AUGMENT_LOC);
        pause(client, 1000);
        let region = client.read_text(PORTAL_AUGMENT_POS, TextOptions::line()).trim().to_string();
        if region.contains(RADIANT_REGION) {
            self.radiant_shop = true;
        }
        self.active_portal = region;
        info!(
            portal = %self.active_portal,
            anvils = self.anvil_portal_active(),
            radiant_shop = self.radiant_shop,
            "region portal"
        );
    }

    fn carousel_round<C: GameClient + ?Sized>(&mut self, client: &mut C, round: RoundId) {
        self.start_round_tasks(client);
        if round >= self.data().config.policy.final_comp_round && !self.roster.state.final_comp_locked {
            info!(%round, "final composition locked in");
            self.roster.state.final_comp_locked = true;
        }
        pause(client, 9700);
        for point in CAROUSEL_LOC {
            client.secondary_click(point);
            pause(client, 1500);
        }
    }

    fn pickup_items<C: GameClient + ?Sized>(&mut self, client: &mut C) {
        for point in ITEM_PICKUP_LOC {
            client.secondary_click(point);
            pause(client, 1200);
        }
    }

    /// Board filling and unknown replacement, each skipped when the round is
    /// nearly over.
    fn field_units<C: GameClient + ?Sized>(&mut self, client: &mut C, budget: Duration, margin: Duration) {
        if self.has_time(client, budget, margin) {
            self.roster.fill_to_level(client);
        } else {
            info!("no time left to fill the board");
        }
        if self.has_time(client, budget, margin) {
            self.roster.replace_unknown(client);
        } else {
            info!("no time left to replace unconfirmed units");
        }
        if self.roster.state.final_comp_locked {
            self.roster.enforce_final(client);
        }
        self.roster.bench_cleanup(client);
    }

    fn pve_round<C: GameClient + ?Sized>(&mut self, client: &mut C, round: RoundId) {
        let t = self.timing();
        self.start_round_tasks(client);
        pause(client, 800);
        let budget = t.planning_budget(false);
        if self.schedule.has(RoundFeature::Augment, round) {
            self.pick_augment(client);
        }
        if round == RoundId::new(1, 3) {
            pause(client, 1500);
            if self.anvil_portal_active() {
                let skip: Vec<usize> = (2..BENCH_SIZE).collect();
                self.roster.clear_anvils(client, &skip);
            }
            self.roster.check_size_relic(client);
        }
        if round == RoundId::new(3, 7) && self.radiant_shop {
            pause(client, 1500);
            self.roster.clear_anvils(client, &[]);
        }
        self.roster.reconcile_bench_now(client);
        self.roster.spend_gold(client, false);
        self.field_units(client, budget, Duration::from_secs(t.pve_margin_secs));
        self.end_round_tasks(client);
    }

    fn pvp_round<C: GameClient + ?Sized>(&mut self, client: &mut C, round: RoundId) {
        let t = self.timing();
        let config = self.data().config;
        let policy = &config.policy;
        self.start_round_tasks(client);
        pause(client, 800);
        let augment = self.schedule.has(RoundFeature::Augment, round);
        let budget = t.planning_budget(augment);
        if augment {
            self.pick_augment(client);
        }

        if let Some(target) = self.schedule.level_target(round) {
            if target >= client.level() {
                let deadline = self.round_start + Duration::from_secs(t.level_up_stop_secs);
                self.roster.level_up(client, target, deadline);
            }
        }

        let pickup = self.schedule.has(RoundFeature::Pickup, round);
        if pickup {
            self.pickup_items(client);
        }
        self.roster.reconcile_bench_now(client);
        let freed = self.roster.bench_cleanup(client);
        if self.schedule.has(RoundFeature::Anvil, round) {
            self.roster.clear_anvils(client, &freed);
        }
        self.roster.spend_gold(client, pickup);

        let margin = Duration::from_secs(t.pvp_margin_secs);
        self.field_units(client, budget, margin);

        let health = client.health();
        let held = client.inventory().iter().flatten().count();
        let dump = health <= policy.dump_health;
        let wants_items =
            self.schedule.has(RoundFeature::ItemPlacement, round) || dump || held >= policy.item_flood;
        if wants_items && self.has_time(client, budget, margin) {
            self.roster.place_items(client, dump);
        } else if wants_items {
            info!("no time left to give items");
        }
        self.end_round_tasks(client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::display::DisplayMessage;
    use crate::client::sim::SimGame;
    use crate::client::Clock;

    #[test]
    fn carousel_locks_final_comp_from_configured_round() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut driver = RoundDriver::new(session.data(), Some(7));
        let mut game = SimGame::new();
        driver.carousel_round(&mut game, RoundId::new(2, 4));
        assert!(!driver.roster.state.final_comp_locked);
        driver.carousel_round(&mut game, RoundId::new(3, 4));
        assert!(driver.roster.state.final_comp_locked);
    }

    #[test]
    fn planning_margin_gates_late_steps() {
        let session = crate::test_session("Shurima Sorcerers");
        let driver = RoundDriver::new(session.data(), Some(7));
        let mut game = SimGame::new();
        let budget = Duration::from_secs(30);
        let margin = Duration::from_secs(5);
        game.sleep(Duration::from_secs(25));
        assert!(driver.has_time(&game, budget, margin));
        game.sleep(Duration::from_secs(1));
        assert!(!driver.has_time(&game, budget, margin));
    }

    #[test]
    fn second_round_fields_carousel_unit_and_reads_region() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut driver = RoundDriver::new(session.data(), Some(7));
        let mut game = SimGame::new();
        game.set_bench(4, "Garen");
        game.set_region_text("Radiant Item Shop");
        driver.second_round(&mut game);
        assert_eq!(driver.roster.state.unconfirmed_board.len(), 1);
        assert_eq!(game.board_name(0), Some("Garen"));
        assert!(driver.radiant_shop);
        assert!(matches!(driver.display().latest(), DisplayMessage::Labels(_)));
    }

    #[test]
    fn unreadable_icon_strip_keeps_schedule() {
        let session = crate::test_session("Shurima Sorcerers");
        let mut driver = RoundDriver::new(session.data(), Some(7));
        let mut game = SimGame::new();
        let before = driver.schedule().clone();
        driver.setup_encounters(&mut game, 3);
        assert_eq!(driver.schedule(), &before);
        game.set_icons(&["pvp", "pvp", "encounter", "carousel", "pvp", "pvp", "pve"]);
        driver.setup_encounters(&mut game, 3);
        assert_eq!(driver.schedule.classify(RoundId::new(3, 3)), Some(RoundKind::Encounter));
        assert_eq!(driver.schedule.classify(RoundId::new(3, 4)), Some(RoundKind::Carousel));
    }
}
