//! Heuristic action scoring for automated seats.
//!
//! Candidates are generated in a fixed order (settlements, roads, cities,
//! development card, bank trades, block moves, pass) and the first one
//! reaching the top score wins, so equal scores always resolve the same way.

use tracing::debug;

use crate::game::action::{ActionPayload, GameAction};
use crate::game::resources::ResourceBundle;
use crate::players::adapter::{RulesAdapter, Stage};
use crate::players::weights::CpuWeights;
use crate::types::{ActionKind, Resource};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAction {
    pub action: GameAction,
    pub score: f64,
}

pub struct CpuPlayer<'a, R: RulesAdapter + ?Sized> {
    rules: &'a R,
    weights: &'a CpuWeights,
}

impl<'a, R: RulesAdapter + ?Sized> CpuPlayer<'a, R> {
    pub fn new(rules: &'a R, weights: &'a CpuWeights) -> Self {
        Self { rules, weights }
    }

    pub fn generate_candidates(&self) -> Vec<GameAction> {
        let rules = self.rules;
        let player = rules.current_player();
        let mut actions = Vec::new();

        actions.extend(
            rules
                .legal_settlement_vertices(player)
                .into_iter()
                .map(|vertex| GameAction::settlement(player, vertex)),
        );
        actions.extend(
            rules
                .legal_road_edges(player)
                .into_iter()
                .map(|edge| GameAction::road(player, edge)),
        );
        actions.extend(
            rules
                .upgradeable_vertices(player)
                .into_iter()
                .map(|vertex| GameAction::city(player, vertex)),
        );
        if rules.can_buy_dev_card(player) {
            actions.push(GameAction::new(player, ActionKind::BuyDevelopmentCard));
        }
        actions.extend(
            rules
                .bank_trade_options(player)
                .into_iter()
                .map(|option| GameAction::bank_trade(player, option.give, option.get, option.rate)),
        );
        actions.extend(
            rules
                .block_moves(player)
                .into_iter()
                .map(|choice| GameAction::move_block(player, choice.hex, choice.victim)),
        );
        actions.push(GameAction::new(player, ActionKind::Pass));
        actions
    }

    fn stage_multiplier(&self, stage: Stage, kind: ActionKind) -> f64 {
        let w = self.weights;
        match (stage, kind) {
            (Stage::Early, ActionKind::BuildSettlement) => w.early_weight_settlement,
            (Stage::Early, ActionKind::BuildRoad) => w.early_weight_road,
            (Stage::Mid, ActionKind::BuildCity) => w.mid_weight_city,
            (Stage::Mid, ActionKind::BuyDevelopmentCard) => w.mid_weight_dev,
            (Stage::Late, ActionKind::BuildCity) => w.late_weight_city,
            (Stage::Late, ActionKind::BuyDevelopmentCard) => w.late_weight_dev,
            (
                Stage::Late,
                ActionKind::MoveBlock | ActionKind::BuildRoad | ActionKind::BuildSettlement,
            ) => w.late_weight_blocking,
            _ => 1.0,
        }
    }

    pub fn score_action(&self, action: &GameAction) -> f64 {
        let rules = self.rules;
        let w = self.weights;
        let player = rules.current_player();
        let pm = self.stage_multiplier(rules.game_stage(), action.kind);

        match (action.kind, action.payload) {
            (ActionKind::BuildSettlement, ActionPayload::Vertex(vertex)) => {
                let diversity = if rules.vertex_resource_set(vertex).len() >= 2 {
                    w.resource_diversity_bonus
                } else {
                    0.0
                };
                let block = rules.settlement_blocks_opponent_value(vertex) * w.block_leader_bonus;
                (w.base_value_settlement
                    + rules.vertex_pip(vertex) * w.pip_value_per_point
                    + diversity
                    + block)
                    * pm
            }
            (ActionKind::BuildCity, ActionPayload::Vertex(vertex)) => {
                (w.base_value_city + rules.vertex_pip(vertex) * w.city_on_high_pip_bonus_factor)
                    * pm
            }
            (ActionKind::BuildRoad, ActionPayload::Edge(edge)) => {
                let towards = rules.road_expands_towards_value(edge);
                let longest = rules.road_contributes_longest(player, edge) * w.longest_road_push;
                (w.base_value_road + towards + longest) * pm
            }
            (ActionKind::BuyDevelopmentCard, _) => (w.base_value_dev + w.largest_army_push) * pm,
            (ActionKind::BankTrade, ActionPayload::BankTrade { give, get, rate }) => {
                // Handing an opponent the win outweighs everything else.
                if rules
                    .opponents()
                    .into_iter()
                    .any(|opp| rules.would_trade_enable_opponent_win(opp, give, get, rate))
                {
                    return -w.trade_enable_opponent_win_penalty;
                }
                let profile = rules.resource_production_profile(player);
                let scarcity = rules.board_resource_scarcity();
                let excess = (profile.get(give) - 1.0).max(0.0);
                let need = 1.0 + scarcity.get(get);
                let progress = self.trade_progress(give, get, rate);
                (progress * w.bank_trade_progress_weight + excess * w.bank_trade_excess_bonus
                    - scarcity.get(give) * w.bank_trade_scarcity_penalty
                    + need)
                    * pm
            }
            (ActionKind::MoveBlock, ActionPayload::Block { hex, victim }) => {
                let steal = if victim.is_some() {
                    w.block_leader_bonus
                } else {
                    0.0
                };
                let self_harm = if rules.block_touches_player(player, hex) {
                    w.avoid_self_harm_penalty
                } else {
                    0.0
                };
                (w.base_value_robber_block + steal - self_harm) * pm
            }
            (ActionKind::Pass, _) => -w.pass_small_penalty,
            // Never generated; anything else scores below pass.
            _ => -w.pass_small_penalty - 1.0,
        }
    }

    /// How much closer the trade brings the player to the four standard
    /// builds, summed as have/need ratios. Never negative.
    pub fn trade_progress(&self, give: Resource, get: Resource, rate: u8) -> f64 {
        let rules = self.rules;
        let hand = rules.player_resources(rules.current_player());
        let before: [i32; 5] = Resource::ALL.map(|r| hand.get(r) as i32);
        let mut after = before;
        after[give.index()] -= rate as i32;
        after[get.index()] += 1;

        let costs = [
            rules.cost_settlement(),
            rules.cost_city(),
            rules.cost_road(),
            rules.cost_development(),
        ];
        let total = |hand: &[i32; 5]| -> f64 { costs.iter().map(|cost| afford_ratio(hand, cost)).sum() };
        (total(&after) - total(&before)).max(0.0)
    }

    pub fn score_all(&self) -> Vec<ScoredAction> {
        self.generate_candidates()
            .into_iter()
            .map(|action| {
                let score = self.score_action(&action);
                debug!(%action, score, "candidate scored");
                ScoredAction { action, score }
            })
            .collect()
    }

    /// The highest-scoring candidate; the earliest generated wins ties.
    /// Candidates without a comparable score are never chosen.
    pub fn choose_action(&self) -> ScoredAction {
        let mut best: Option<ScoredAction> = None;
        for candidate in self.score_all() {
            if candidate.score.is_nan() {
                continue;
            }
            match &best {
                None => best = Some(candidate),
                Some(current) if candidate.score > current.score => best = Some(candidate),
                Some(_) => {}
            }
        }
        best.unwrap_or_else(|| ScoredAction {
            action: GameAction::new(self.rules.current_player(), ActionKind::Pass),
            score: -self.weights.pass_small_penalty,
        })
    }
}

fn afford_ratio(hand: &[i32; 5], cost: &ResourceBundle) -> f64 {
    let need: i32 = cost.iter().map(|(_, n)| n as i32).sum();
    if need == 0 {
        return 0.0;
    }
    let have: i32 = cost
        .iter()
        .filter(|&(_, n)| n > 0)
        .map(|(r, n)| hand[r.index()].min(n as i32))
        .sum();
    have as f64 / need as f64
}
