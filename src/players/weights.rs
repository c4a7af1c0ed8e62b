use serde::{Deserialize, Serialize};

/// Every constant the CPU scoring uses. Loaded from JSON with missing
/// fields falling back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuWeights {
    pub early_weight_settlement: f64,
    pub early_weight_road: f64,
    pub mid_weight_city: f64,
    pub mid_weight_dev: f64,
    pub late_weight_city: f64,
    pub late_weight_dev: f64,
    /// Roads, settlements and block moves in the late game.
    pub late_weight_blocking: f64,

    pub base_value_settlement: f64,
    pub base_value_road: f64,
    pub base_value_city: f64,
    pub base_value_dev: f64,
    pub base_value_robber_block: f64,

    pub pip_value_per_point: f64,
    pub resource_diversity_bonus: f64,
    pub city_on_high_pip_bonus_factor: f64,
    pub longest_road_push: f64,
    pub largest_army_push: f64,

    pub trade_enable_opponent_win_penalty: f64,
    pub block_leader_bonus: f64,
    pub avoid_self_harm_penalty: f64,

    pub bank_trade_progress_weight: f64,
    pub bank_trade_scarcity_penalty: f64,
    pub bank_trade_excess_bonus: f64,

    pub pass_small_penalty: f64,

    pub mid_game_points: u32,
    pub late_game_points: u32,
}

impl Default for CpuWeights {
    fn default() -> Self {
        Self {
            early_weight_settlement: 2.0,
            early_weight_road: 1.2,
            mid_weight_city: 2.0,
            mid_weight_dev: 1.4,
            late_weight_city: 2.2,
            late_weight_dev: 1.8,
            late_weight_blocking: 2.3,

            base_value_settlement: 8.0,
            base_value_road: 2.5,
            base_value_city: 10.0,
            base_value_dev: 4.0,
            base_value_robber_block: 3.0,

            pip_value_per_point: 0.6,
            resource_diversity_bonus: 1.5,
            city_on_high_pip_bonus_factor: 0.25,
            longest_road_push: 1.6,
            largest_army_push: 1.6,

            trade_enable_opponent_win_penalty: 1000.0,
            block_leader_bonus: 3.5,
            avoid_self_harm_penalty: 6.0,

            bank_trade_progress_weight: 3.5,
            bank_trade_scarcity_penalty: 2.0,
            bank_trade_excess_bonus: 1.2,

            pass_small_penalty: 0.8,

            mid_game_points: 4,
            late_game_points: 7,
        }
    }
}
