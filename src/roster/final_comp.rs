use tracing::{info, warn};

use super::Roster;
use crate::board::BENCH_SIZE;
use crate::client::GameClient;

impl<'a> Roster<'a> {
    /// Swaps benched core units onto the board once the final composition is
    /// locked in.
    ///
    /// For each core unit on the bench whose name is not fielded yet, the
    /// first non-core board unit of the same weight is sold and the core unit
    /// takes its board position (or the freed slot when that position is
    /// taken). Returns `(removed, promoted)` pairs.
    pub fn enforce_final<C: GameClient + ?Sized>(&mut self, client: &mut C) -> Vec<(String, String)> {
        let mut swaps = Vec::new();
        if !self.state.final_comp_locked {
            return swaps;
        }
        for index in 0..BENCH_SIZE {
            let Some(incoming) = self.state.bench[index].unit() else {
                continue;
            };
            if !incoming.is_core || self.state.board_names.contains(&incoming.name) {
                continue;
            }
            let (name, weight, position) = (incoming.name.clone(), incoming.board_weight, incoming.board_position);
            let Some(outgoing) = self
                .state
                .board_units()
                .find(|u| !u.is_core && u.board_weight == weight)
                .map(|u| u.name.clone())
            else {
                continue;
            };

            let freed = match self.remove(client, &outgoing) {
                Ok(slot) => slot,
                Err(e) => {
                    warn!(error = %e, "could not make room for core unit");
                    continue;
                }
            };
            let dest = position
                .filter(|&p| self.state.board.get(p).is_some_and(|s| s.is_empty()))
                .unwrap_or(freed);
            match self.promote_to(client, index, dest) {
                Ok(()) => {
                    info!(removed = %outgoing, promoted = %name, "final composition swap");
                    swaps.push((outgoing, name));
                }
                Err(e) => warn!(error = %e, "core unit promotion failed"),
            }
        }
        swaps
    }
}

#[cfg(test)]
mod tests {
    use crate::client::sim::SimGame;
    use crate::roster::Roster;

    #[test]
    fn nothing_happens_before_the_lock() {
        let session = crate::test_session("High Value");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        assert!(roster.enforce_final(&mut game).is_empty());
    }

    #[test]
    fn swaps_match_weight() {
        let session = crate::test_session("High Value");
        let mut roster = Roster::new(session.data());
        let mut game = SimGame::new();
        game.set_bench(0, "Poppy");
        game.set_bench(1, "Xayah & Rakan");
        roster.reconcile_bench_now(&mut game);
        roster.promote(&mut game, 0).unwrap();
        roster.promote(&mut game, 1).unwrap();
        game.set_bench(2, "Sion");
        roster.reconcile_bench_now(&mut game);
        roster.state.final_comp_locked = true;

        let swaps = roster.enforce_final(&mut game);
        assert_eq!(swaps, vec![("Xayah & Rakan".to_string(), "Sion".to_string())]);
        assert!(roster.state.board_names.contains("Poppy"));
        assert!(roster.state.board_names.contains("Sion"));
        assert_eq!(roster.state.board_weight_used, 3);
        assert!(roster.state.board[10].unit().is_some_and(|u| u.name == "Sion"));
    }
}
