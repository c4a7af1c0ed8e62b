use rand::RngCore;
use rand::seq::SliceRandom;

use crate::engine::{BoardSnapshot, PlayerView};
use crate::game::resources::ResourceBundle;
use crate::types::{HexId, PlayerId, Resource};

/// Choices made during a seven. Every method defaults to a uniform random
/// pick; implementors override only what they care about.
pub trait DisruptionPolicy {
    /// Cards `player` gives up. The engine tops up a short answer itself.
    fn choose_discard(
        &mut self,
        player: &PlayerView,
        count: u32,
        rng: &mut dyn RngCore,
    ) -> ResourceBundle {
        let mut hand = player.resources;
        hand.remove_random(count, rng)
    }

    /// New hex for the block marker.
    fn choose_target(
        &mut self,
        board: &BoardSnapshot,
        _active: PlayerId,
        rng: &mut dyn RngCore,
    ) -> HexId {
        let open: Vec<HexId> = board
            .tiles
            .iter()
            .map(|tile| tile.id)
            .filter(|&id| id != board.blocked)
            .collect();
        open.choose(rng).copied().unwrap_or(board.blocked)
    }

    /// One of `candidates`, or `None` to skip the steal.
    fn choose_victim(
        &mut self,
        candidates: &[&PlayerView],
        rng: &mut dyn RngCore,
    ) -> Option<PlayerId> {
        candidates.choose(rng).map(|view| view.id)
    }

    fn choose_steal(&mut self, victim: &PlayerView, rng: &mut dyn RngCore) -> Option<Resource> {
        victim.resources.random_card(rng)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl DisruptionPolicy for RandomPolicy {}
