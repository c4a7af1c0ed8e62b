use tracing::{info, warn};
use uuid::Uuid;

use crate::game::phase::TurnPhase;
use crate::game::players::PlayerSpec;
use crate::game::state::{GameConfig, GameError, GameState, Outcome};
use crate::players::{CpuWeights, place_initial, play_cpu_turn};
use crate::types::PlayerId;

/// A self-playing match between automated seats.
pub struct Game {
    pub id: Uuid,
    pub state: GameState,
    pub weights: CpuWeights,
}

impl Game {
    pub fn new(config: GameConfig, specs: Vec<PlayerSpec>) -> Result<Self, GameError> {
        Ok(Self {
            id: Uuid::new_v4(),
            state: GameState::new(config, specs)?,
            weights: CpuWeights::default(),
        })
    }

    pub fn with_weights(mut self, weights: CpuWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Plays until someone wins or the turn limit runs out.
    pub fn play(&mut self) -> Result<Option<PlayerId>, GameError> {
        if let Some(seat) = self.state.players.iter().find(|player| !player.is_cpu) {
            return Err(GameError::InvalidSetup(format!(
                "{} is not an automated seat",
                seat.name
            )));
        }
        if self.state.phase == TurnPhase::DeterminingOrder {
            if let Outcome::Rejected(violation) = self.state.determine_turn_order() {
                return Err(GameError::InvalidSetup(violation.to_string()));
            }
        }
        while self.state.phase.is_placement() {
            if let Outcome::Rejected(violation) = place_initial(&mut self.state)? {
                return Err(GameError::InvalidSetup(violation.to_string()));
            }
        }

        let limit = self.state.config.turn_limit;
        while !self.state.is_over() && self.state.turn < limit {
            play_cpu_turn(&mut self.state, &self.weights)?;
        }
        match self.winner() {
            Some(winner) => info!(game = %self.id, winner, turns = self.state.turn, "game finished"),
            None => warn!(game = %self.id, turns = self.state.turn, "turn limit reached"),
        }
        Ok(self.winner())
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }
}
