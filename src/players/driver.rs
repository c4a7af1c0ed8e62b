//! Runs automated seats against a [`GameState`].

use serde::Serialize;
use tracing::{debug, info};

use crate::engine::DiceReport;
use crate::game::action::{ActionPayload, GameAction};
use crate::game::phase::TurnPhase;
use crate::game::state::{GameError, GameState, Outcome};
use crate::players::cpu::CpuPlayer;
use crate::players::live::GameAdapter;
use crate::players::robber::CpuRobberPolicy;
use crate::players::weights::CpuWeights;
use crate::rules::Violation;
use crate::types::{ActionKind, EdgeId, PlayerId, VertexId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnSummary {
    pub player: PlayerId,
    pub roll: Option<u8>,
    /// Actions that were applied, in order. A closing pass is not listed.
    pub actions: Vec<GameAction>,
}

/// Routes a decoded action to the matching state command.
pub fn apply_action(state: &mut GameState, action: &GameAction) -> Result<Outcome, GameError> {
    if action.player != state.current_player() {
        debug!(player = action.player, %action, "action out of turn");
        return Ok(Outcome::Rejected(Violation::NotYourTurn));
    }
    match (action.kind, action.payload) {
        (ActionKind::BuildSettlement, ActionPayload::Vertex(vertex)) => {
            state.attempt_build_settlement(vertex)
        }
        (ActionKind::BuildCity, ActionPayload::Vertex(vertex)) => state.attempt_upgrade_city(vertex),
        (ActionKind::BuildRoad, ActionPayload::Edge(edge)) => state.attempt_build_road(edge),
        (ActionKind::BuyDevelopmentCard, ActionPayload::None) => {
            state.attempt_buy_development_card()
        }
        (ActionKind::BankTrade, ActionPayload::BankTrade { give, get, .. }) => {
            state.attempt_bank_trade(give, get)
        }
        (ActionKind::MoveBlock, ActionPayload::Block { .. }) => {
            Ok(Outcome::Rejected(Violation::BlockMoveOutsideSeven))
        }
        (ActionKind::PlayerTrade, _) => Ok(Outcome::Rejected(Violation::PlayerTradeUnsupported)),
        (ActionKind::Pass, ActionPayload::None) => Ok(Outcome::Applied("pass".to_string())),
        (kind, _) => Err(GameError::InvalidPayload(kind)),
    }
}

/// Picks the richest open vertex and the road toward the richest
/// neighbour, then places both. Lowest ids win ties.
pub fn place_initial(state: &mut GameState) -> Result<Outcome, GameError> {
    let board = &state.board;
    let mut vertex: Option<(u32, VertexId)> = None;
    for candidate in state.legal_initial_vertices() {
        let pips = board.vertex_pip_score(candidate);
        if vertex.is_none_or(|(best, _)| pips > best) {
            vertex = Some((pips, candidate));
        }
    }
    let Some((_, vertex)) = vertex else {
        return Err(GameError::InvalidSetup(
            "no vertex left for an initial settlement".into(),
        ));
    };

    let mut edge: Option<(u32, EdgeId)> = None;
    for &candidate in board.edges_of(vertex) {
        if board.road_owner(candidate).is_some() {
            continue;
        }
        let pips = board.vertex_pip_score(board.other_end(candidate, vertex));
        let better = match edge {
            None => true,
            Some((best, best_id)) => pips > best || (pips == best && candidate < best_id),
        };
        if better {
            edge = Some((pips, candidate));
        }
    }
    let Some((_, edge)) = edge else {
        return Err(GameError::InvalidSetup(format!(
            "vertex {vertex} has no open edge"
        )));
    };
    state.attempt_initial_placement(vertex, edge)
}

/// One full turn for the current seat: dice, then up to
/// `max_cpu_actions_per_turn` choices, then the hand-off.
pub fn play_cpu_turn(state: &mut GameState, weights: &CpuWeights) -> Result<TurnSummary, GameError> {
    let player = state.current_player();
    let mut summary = TurnSummary {
        player,
        roll: None,
        actions: Vec::new(),
    };
    if state.phase != TurnPhase::MainPlay {
        return Ok(summary);
    }

    let mut policy = CpuRobberPolicy::new(state, weights);
    if let Outcome::Applied(report) = state.resolve_dice(None, &mut policy)? {
        summary.roll = Some(report.roll());
        if let DiceReport::Disruption { moved_to, .. } = &report {
            debug!(player, hex = moved_to, "block marker moved");
        }
    }

    for _ in 0..state.config.max_cpu_actions_per_turn {
        if state.is_over() {
            break;
        }
        let choice = {
            let adapter = GameAdapter::new(state, weights);
            CpuPlayer::new(&adapter, weights).choose_action()
        };
        if choice.action.kind == ActionKind::Pass {
            break;
        }
        match apply_action(state, &choice.action)? {
            Outcome::Applied(message) => {
                debug!(player, score = choice.score, %message, "cpu action applied");
                summary.actions.push(choice.action);
            }
            Outcome::Rejected(violation) => {
                debug!(player, action = %choice.action, reason = %violation, "cpu action rejected");
                break;
            }
        }
    }

    if !state.is_over() {
        state.advance_turn();
    }
    info!(
        player,
        roll = ?summary.roll,
        actions = summary.actions.len(),
        "cpu turn finished"
    );
    Ok(summary)
}
