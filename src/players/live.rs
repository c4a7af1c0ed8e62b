//! [`RulesAdapter`] over a live [`GameState`].

use std::collections::BTreeSet;

use crate::game::longest_road::{longest_road, longest_road_if_built};
use crate::game::resources::{COST_CITY, COST_DEVELOPMENT, COST_SETTLEMENT, ResourceBundle};
use crate::game::state::GameState;
use crate::players::adapter::{BankTradeOption, BlockMove, ResourceProfile, RulesAdapter, Stage};
use crate::players::weights::CpuWeights;
use crate::rules;
use crate::search;
use crate::types::{EdgeId, HexId, PlayerId, Resource, VertexId};

/// Equally likely outcomes of two dice.
const ROLLS_PER_CYCLE: f64 = 36.0;
const HIDDEN_VP_PER_CARD: f64 = 0.2;

pub fn stage_for(points: u32, weights: &CpuWeights) -> Stage {
    if points >= weights.late_game_points {
        Stage::Late
    } else if points >= weights.mid_game_points {
        Stage::Mid
    } else {
        Stage::Early
    }
}

pub struct GameAdapter<'a> {
    state: &'a GameState,
    weights: &'a CpuWeights,
}

impl<'a> GameAdapter<'a> {
    pub fn new(state: &'a GameState, weights: &'a CpuWeights) -> Self {
        Self { state, weights }
    }

    fn hand(&self, player: PlayerId) -> ResourceBundle {
        self.state
            .players
            .get(player)
            .map(|p| p.resources)
            .unwrap_or_default()
    }
}

impl RulesAdapter for GameAdapter<'_> {
    fn current_player(&self) -> PlayerId {
        self.state.current_player()
    }

    fn opponents(&self) -> Vec<PlayerId> {
        let me = self.current_player();
        (0..self.state.players.len()).filter(|&p| p != me).collect()
    }

    fn visible_victory_points(&self, player: PlayerId) -> u32 {
        self.state
            .players
            .get(player)
            .map_or(0, |p| p.public_points() as u32)
    }

    fn estimated_hidden_vp(&self, player: PlayerId) -> f64 {
        self.state
            .players
            .get(player)
            .map_or(0.0, |p| p.dev_cards.len() as f64 * HIDDEN_VP_PER_CARD)
    }

    fn game_stage(&self) -> Stage {
        stage_for(self.visible_victory_points(self.current_player()), self.weights)
    }

    fn player_resources(&self, player: PlayerId) -> ResourceBundle {
        self.hand(player)
    }

    /// Expected cards per full round of turns.
    fn resource_production_profile(&self, player: PlayerId) -> ResourceProfile {
        let board = &self.state.board;
        let seats = self.state.players.len() as f64;
        let mut profile = ResourceProfile::default();
        for (vertex, tier) in board.structures_of(player) {
            for &hex in board.hexes_of(vertex) {
                let tile = board.hex(hex);
                if tile.has_block {
                    continue;
                }
                let (Some(resource), Some(number)) = (tile.resource, tile.number) else {
                    continue;
                };
                let pips = crate::board::pip_weight(number) as f64;
                let gain = pips * tier.yield_multiplier() as f64 * seats / ROLLS_PER_CYCLE;
                profile.set(resource, profile.get(resource) + gain);
            }
        }
        profile
    }

    fn board_resource_scarcity(&self) -> ResourceProfile {
        let mut pips = [0.0f64; 5];
        for hex in self.state.board.hexes() {
            if let (Some(resource), Some(number)) = (hex.resource, hex.number) {
                pips[resource.index()] += crate::board::pip_weight(number) as f64;
            }
        }
        let most = pips.iter().copied().fold(0.0, f64::max);
        if most == 0.0 {
            return ResourceProfile::default();
        }
        ResourceProfile::new(pips.map(|p| 1.0 - p / most))
    }

    fn legal_settlement_vertices(&self, player: PlayerId) -> Vec<VertexId> {
        self.state.legal_settlement_vertices(player)
    }

    fn legal_road_edges(&self, player: PlayerId) -> Vec<EdgeId> {
        self.state.legal_road_edges(player)
    }

    fn upgradeable_vertices(&self, player: PlayerId) -> Vec<VertexId> {
        self.state.upgradeable_vertices(player)
    }

    fn can_buy_dev_card(&self, player: PlayerId) -> bool {
        self.hand(player).can_afford(&COST_DEVELOPMENT) && self.state.bank.development_deck_len() > 0
    }

    fn bank_trade_options(&self, player: PlayerId) -> Vec<BankTradeOption> {
        let hand = self.hand(player);
        let rate = self.state.config.bank_trade_rate;
        let mut options = Vec::new();
        for give in Resource::ALL {
            if hand.get(give) < rate {
                continue;
            }
            for get in Resource::ALL {
                if get != give && self.state.bank.available(get) > 0 {
                    options.push(BankTradeOption { give, get, rate });
                }
            }
        }
        options
    }

    /// The marker only moves during dice resolution.
    fn block_moves(&self, _player: PlayerId) -> Vec<BlockMove> {
        Vec::new()
    }

    fn vertex_pip(&self, vertex: VertexId) -> f64 {
        self.state.board.vertex_pip_score(vertex) as f64
    }

    fn vertex_resource_set(&self, vertex: VertexId) -> BTreeSet<Resource> {
        self.state.board.vertex_resources(vertex)
    }

    /// Best pip-over-distance among open sites the road leads toward.
    fn road_expands_towards_value(&self, edge: EdgeId) -> f64 {
        let board = &self.state.board;
        let player = self.current_player();
        let network = search::connected_vertices(board, player);
        let ends = board.edge(edge).ends;
        let far = ends
            .iter()
            .copied()
            .find(|v| !network.contains(v))
            .unwrap_or(ends[1]);

        let start: BTreeSet<VertexId> = [far].into_iter().collect();
        let distances = search::distances(board, player, &start);
        distances
            .iter()
            .filter(|&(&target, _)| {
                !network.contains(&target) && rules::can_place_initial_settlement(board, target).is_ok()
            })
            .map(|(&target, &d)| board.vertex_pip_score(target) as f64 / (1.0 + d as f64) / 2.0)
            .fold(0.0, f64::max)
    }

    fn road_contributes_longest(&self, player: PlayerId, edge: EdgeId) -> f64 {
        let board = &self.state.board;
        let gained = longest_road_if_built(board, player, edge)
            .saturating_sub(longest_road(board, player));
        gained as f64
    }

    fn settlement_blocks_opponent_value(&self, vertex: VertexId) -> f64 {
        let board = &self.state.board;
        let me = self.current_player();
        let owners: BTreeSet<PlayerId> = board
            .edges_of(vertex)
            .iter()
            .filter_map(|&edge| board.road_owner(edge))
            .filter(|&owner| owner != me)
            .collect();
        owners.len() as f64
    }

    fn block_touches_player(&self, player: PlayerId, hex: HexId) -> bool {
        let board = &self.state.board;
        board.contains_hex(hex)
            && board
                .hex(hex)
                .vertices
                .iter()
                .any(|&v| board.owns_vertex(player, v))
    }

    fn would_trade_enable_opponent_win(
        &self,
        opponent: PlayerId,
        give: Resource,
        _get: Resource,
        rate: u8,
    ) -> bool {
        let Some(rival) = self.state.players.get(opponent) else {
            return false;
        };
        if (rival.total_points() as u32) + 1 < self.state.config.vps_to_win as u32 {
            return false;
        }
        let in_bank = self.state.bank.available(give);
        [COST_SETTLEMENT, COST_CITY].iter().any(|cost| {
            let missing = rival.resources.shortfall(cost);
            let gap = missing.get(give);
            gap > 0
                && missing.total() == gap as u32
                && in_bank < gap
                && in_bank.saturating_add(rate) >= gap
        })
    }
}
