//! Block-marker choices for automated seats.
//!
//! The dice engine only sees a [`BoardSnapshot`], so the policy carries a
//! copy of the standings taken before the roll and scores moves through a
//! robber-only [`RulesAdapter`].

use std::collections::BTreeSet;

use rand::RngCore;
use tracing::debug;

use crate::engine::{BoardSnapshot, DisruptionPolicy, PlayerView};
use crate::game::action::ActionPayload;
use crate::game::resources::ResourceBundle;
use crate::game::state::GameState;
use crate::players::adapter::{BankTradeOption, BlockMove, ResourceProfile, RulesAdapter, Stage};
use crate::players::cpu::CpuPlayer;
use crate::players::live::stage_for;
use crate::players::weights::CpuWeights;
use crate::types::{EdgeId, HexId, PlayerId, Resource, VertexId};

pub struct CpuRobberPolicy {
    weights: CpuWeights,
    /// Public points per player at the start of the roll.
    points: Vec<u32>,
    planned_victim: Option<PlayerId>,
}

impl CpuRobberPolicy {
    pub fn new(state: &GameState, weights: &CpuWeights) -> Self {
        Self {
            weights: weights.clone(),
            points: state
                .players
                .iter()
                .map(|p| p.public_points() as u32)
                .collect(),
            planned_victim: None,
        }
    }

    fn leader_among(&self, players: impl IntoIterator<Item = PlayerId>) -> Option<PlayerId> {
        let mut best: Option<(u32, PlayerId)> = None;
        for player in players {
            let points = self.points.get(player).copied().unwrap_or(0);
            if best.is_none_or(|(top, _)| points > top) {
                best = Some((points, player));
            }
        }
        best.map(|(_, player)| player)
    }
}

impl DisruptionPolicy for CpuRobberPolicy {
    fn choose_target(
        &mut self,
        board: &BoardSnapshot,
        active: PlayerId,
        _rng: &mut dyn RngCore,
    ) -> HexId {
        let adapter = BlockAdapter {
            board,
            active,
            policy: self,
        };
        let choice = CpuPlayer::new(&adapter, &self.weights).choose_action();
        match choice.action.payload {
            ActionPayload::Block { hex, victim } => {
                debug!(hex, ?victim, score = choice.score, "block marker target chosen");
                self.planned_victim = victim;
                hex
            }
            _ => {
                self.planned_victim = None;
                board.blocked
            }
        }
    }

    fn choose_victim(
        &mut self,
        candidates: &[&PlayerView],
        _rng: &mut dyn RngCore,
    ) -> Option<PlayerId> {
        let ids: Vec<PlayerId> = candidates.iter().map(|view| view.id).collect();
        match self.planned_victim.take() {
            Some(planned) if ids.contains(&planned) => Some(planned),
            _ => self.leader_among(ids),
        }
    }
}

/// Exposes only block moves: hexes touching the leading opponent first,
/// then any other opponent, then empty hexes.
struct BlockAdapter<'a> {
    board: &'a BoardSnapshot,
    active: PlayerId,
    policy: &'a CpuRobberPolicy,
}

impl RulesAdapter for BlockAdapter<'_> {
    fn current_player(&self) -> PlayerId {
        self.active
    }

    fn opponents(&self) -> Vec<PlayerId> {
        (0..self.policy.points.len())
            .filter(|&p| p != self.active)
            .collect()
    }

    fn visible_victory_points(&self, player: PlayerId) -> u32 {
        self.policy.points.get(player).copied().unwrap_or(0)
    }

    fn estimated_hidden_vp(&self, _player: PlayerId) -> f64 {
        0.0
    }

    fn game_stage(&self) -> Stage {
        stage_for(self.visible_victory_points(self.active), &self.policy.weights)
    }

    fn player_resources(&self, _player: PlayerId) -> ResourceBundle {
        ResourceBundle::zero()
    }

    fn resource_production_profile(&self, _player: PlayerId) -> ResourceProfile {
        ResourceProfile::default()
    }

    fn board_resource_scarcity(&self) -> ResourceProfile {
        ResourceProfile::default()
    }

    fn legal_settlement_vertices(&self, _player: PlayerId) -> Vec<VertexId> {
        Vec::new()
    }

    fn legal_road_edges(&self, _player: PlayerId) -> Vec<EdgeId> {
        Vec::new()
    }

    fn upgradeable_vertices(&self, _player: PlayerId) -> Vec<VertexId> {
        Vec::new()
    }

    fn can_buy_dev_card(&self, _player: PlayerId) -> bool {
        false
    }

    fn bank_trade_options(&self, _player: PlayerId) -> Vec<BankTradeOption> {
        Vec::new()
    }

    fn block_moves(&self, player: PlayerId) -> Vec<BlockMove> {
        let leader = self.policy.leader_among(self.opponents());
        let mut moves: Vec<(u8, BlockMove)> = self
            .board
            .tiles
            .iter()
            .filter(|tile| tile.id != self.board.blocked)
            .map(|tile| {
                let owners = self.board.owners_around(tile.id, player);
                let victim = match leader {
                    Some(top) if owners.contains(&top) => Some(top),
                    _ => self.policy.leader_among(owners.iter().copied()),
                };
                let rank = match victim {
                    Some(v) if Some(v) == leader => 0,
                    Some(_) => 1,
                    None => 2,
                };
                (rank, BlockMove { hex: tile.id, victim })
            })
            .collect();
        moves.sort_by_key(|(rank, choice)| (*rank, choice.hex));
        moves.into_iter().map(|(_, choice)| choice).collect()
    }

    fn vertex_pip(&self, _vertex: VertexId) -> f64 {
        0.0
    }

    fn vertex_resource_set(&self, _vertex: VertexId) -> BTreeSet<Resource> {
        BTreeSet::new()
    }

    fn road_expands_towards_value(&self, _edge: EdgeId) -> f64 {
        0.0
    }

    fn road_contributes_longest(&self, _player: PlayerId, _edge: EdgeId) -> f64 {
        0.0
    }

    fn settlement_blocks_opponent_value(&self, _vertex: VertexId) -> f64 {
        0.0
    }

    fn block_touches_player(&self, player: PlayerId, hex: HexId) -> bool {
        self.board.tile(hex).is_some_and(|tile| {
            tile.vertices
                .iter()
                .any(|v| self.board.vertex_owners.get(v).is_some_and(|s| s.owner == player))
        })
    }

    fn would_trade_enable_opponent_win(&self, _: PlayerId, _: Resource, _: Resource, _: u8) -> bool {
        false
    }
}
