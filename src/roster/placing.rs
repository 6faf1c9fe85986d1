use std::collections::HashSet;

use tracing::{debug, info};

use super::Roster;
use crate::board::inventory::Inventory;
use crate::board::unit::Unit;
use crate::board::Slot;
use crate::catalog::items::SIZE_RELIC;
use crate::client::screen::ITEM_POS;
use crate::client::text::match_known;
use crate::client::{pause, CharSet, GameClient, TextOptions};
use crate::items::dump::dump;
use crate::items::{resolve, Placement, ResolveContext};

impl<'a> Roster<'a> {
    /// Items that units off the board will want: bench builds and the builds
    /// of composition members not owned yet.
    fn reserved_items(&self) -> HashSet<String> {
        let bench = self.state.bench_units().flat_map(|u| u.desired_items.iter().cloned());
        let unowned = self
            .data
            .comp
            .members
            .iter()
            .filter(|m| {
                !self.state.board_names.contains(&m.name)
                    && !self.state.bench_units().any(|u| u.name == m.name)
            })
            .flat_map(|m| m.items.iter().cloned());
        bench.chain(unowned).collect()
    }

    fn note_size_relic(&mut self) {
        if !self.state.size_relic_held && self.state.inventory.contains(SIZE_RELIC) {
            info!("size relic held, board capacity +1");
            self.state.size_relic_held = true;
        }
    }

    /// Hovers the first item slot and checks whether it holds the size relic.
    pub fn check_size_relic<C: GameClient + ?Sized>(&mut self, client: &mut C) -> bool {
        let (anchor, region) = ITEM_POS[0];
        client.move_cursor(anchor);
        pause(client, self.timing().settle_ms);
        let read = client.read_text(region, TextOptions::line_with(CharSet::Letters));
        let item = match_known(read.trim(), self.data.items.names());
        if item == SIZE_RELIC {
            self.state.inventory.set(0, item);
            self.note_size_relic();
        } else {
            debug!(item = %item, "first item slot is not the size relic");
        }
        self.state.size_relic_held
    }

    /// Reads the item bench, runs the resolver over the board and performs
    /// the resulting drags. With `dump` set, whatever the rules leave over is
    /// spread across the board as well.
    pub fn place_items<C: GameClient + ?Sized>(&mut self, client: &mut C, dump_rest: bool) -> Vec<Placement> {
        self.state.inventory = Inventory::from_observed(client.inventory());
        self.note_size_relic();

        let t = self.data.items;
        let mut ctx = ResolveContext::new(t);
        ctx.craft_slack = self.data.config.policy.craft_slack;
        ctx.lucky_gloves = self.state.lucky_gloves;
        ctx.low_health = self.state.low_health_mode;
        ctx.reserved = self.reserved_items();
        ctx.wanted = self.state.acquisition_targets.clone();
        ctx.free_bench = self.state.free_bench_slots();

        let mut units: Vec<&mut Unit> = self.state.board.iter_mut().filter_map(Slot::unit_mut).collect();
        let mut placements = resolve(&mut units, &mut self.state.inventory, &ctx);
        if dump_rest {
            placements.extend(dump(&mut units, &mut self.state.inventory, t));
        }

        for placement in &placements {
            for &slot in &placement.item_slots {
                client.click(ITEM_POS[slot].0);
                client.click(placement.anchor);
            }
        }
        if !placements.is_empty() {
            info!(count = placements.len(), left = self.state.inventory.len(), "placed items");
        }
        placements
    }
}
