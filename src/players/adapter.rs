//! What the decision engine may ask about the game.
//!
//! [`CpuPlayer`](super::CpuPlayer) only sees the world through
//! [`RulesAdapter`], so tests can hand it a synthetic board.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::game::resources::{
    COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceBundle,
};
use crate::types::{EdgeId, HexId, PlayerId, Resource, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Early,
    Mid,
    Late,
}

/// A per-resource real-valued metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceProfile([f64; 5]);

impl ResourceProfile {
    pub const fn new(values: [f64; 5]) -> Self {
        Self(values)
    }

    pub fn get(&self, resource: Resource) -> f64 {
        self.0[resource.index()]
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        self.0[resource.index()] = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTradeOption {
    pub give: Resource,
    pub get: Resource,
    pub rate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMove {
    pub hex: HexId,
    pub victim: Option<PlayerId>,
}

pub trait RulesAdapter {
    fn current_player(&self) -> PlayerId;
    fn opponents(&self) -> Vec<PlayerId>;

    fn visible_victory_points(&self, player: PlayerId) -> u32;
    fn estimated_hidden_vp(&self, player: PlayerId) -> f64;
    fn total_victory_points_estimate(&self, player: PlayerId) -> f64 {
        self.visible_victory_points(player) as f64 + self.estimated_hidden_vp(player)
    }
    fn game_stage(&self) -> Stage;

    fn player_resources(&self, player: PlayerId) -> ResourceBundle;
    fn resource_production_profile(&self, player: PlayerId) -> ResourceProfile;
    fn board_resource_scarcity(&self) -> ResourceProfile;

    fn cost_settlement(&self) -> ResourceBundle {
        COST_SETTLEMENT
    }
    fn cost_road(&self) -> ResourceBundle {
        COST_ROAD
    }
    fn cost_city(&self) -> ResourceBundle {
        COST_CITY
    }
    fn cost_development(&self) -> ResourceBundle {
        COST_DEVELOPMENT
    }

    fn legal_settlement_vertices(&self, player: PlayerId) -> Vec<VertexId>;
    fn legal_road_edges(&self, player: PlayerId) -> Vec<EdgeId>;
    fn upgradeable_vertices(&self, player: PlayerId) -> Vec<VertexId>;
    fn can_buy_dev_card(&self, player: PlayerId) -> bool;
    fn bank_trade_options(&self, player: PlayerId) -> Vec<BankTradeOption>;
    fn block_moves(&self, player: PlayerId) -> Vec<BlockMove>;

    fn vertex_pip(&self, vertex: VertexId) -> f64;
    fn vertex_resource_set(&self, vertex: VertexId) -> BTreeSet<Resource>;
    fn road_expands_towards_value(&self, edge: EdgeId) -> f64;
    fn road_contributes_longest(&self, player: PlayerId, edge: EdgeId) -> f64;
    fn settlement_blocks_opponent_value(&self, vertex: VertexId) -> f64;
    /// True when `player` has a structure on `hex`.
    fn block_touches_player(&self, _player: PlayerId, _hex: HexId) -> bool {
        false
    }

    /// Whether handing `rate` of `give` to the bank for one `get` would let
    /// `opponent` complete a winning build.
    fn would_trade_enable_opponent_win(
        &self,
        opponent: PlayerId,
        give: Resource,
        get: Resource,
        rate: u8,
    ) -> bool;
}
