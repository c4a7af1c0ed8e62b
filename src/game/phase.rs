use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::types::{EdgeId, PlayerId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TurnPhase {
    DeterminingOrder,
    FirstRound,
    SecondRound,
    MainPlay,
    GameOver { winner: PlayerId },
}

impl TurnPhase {
    pub fn is_placement(self) -> bool {
        matches!(self, TurnPhase::FirstRound | TurnPhase::SecondRound)
    }
}

/// One initial settlement and its road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: PlayerId,
    pub vertex: VertexId,
    pub edge: EdgeId,
}

/// Position in the turn order. Placement runs forward then backward
/// (snake order); main play cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    order: Vec<PlayerId>,
    index: usize,
}

impl TurnCursor {
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self { order, index: 0 }
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> PlayerId {
        self.order[self.index]
    }

    /// Moves to the next seat and returns the phase that applies there.
    pub fn advance(&mut self, phase: TurnPhase) -> TurnPhase {
        let last = self.order.len().saturating_sub(1);
        match phase {
            TurnPhase::FirstRound if self.index < last => {
                self.index += 1;
                TurnPhase::FirstRound
            }
            // The last seat places twice in a row.
            TurnPhase::FirstRound => TurnPhase::SecondRound,
            TurnPhase::SecondRound if self.index > 0 => {
                self.index -= 1;
                TurnPhase::SecondRound
            }
            TurnPhase::SecondRound => {
                self.index = 0;
                TurnPhase::MainPlay
            }
            TurnPhase::MainPlay => {
                self.index = (self.index + 1) % self.order.len();
                TurnPhase::MainPlay
            }
            other => other,
        }
    }
}

fn roll_two(rng: &mut impl Rng) -> u8 {
    rng.gen_range(1..=6) + rng.gen_range(1..=6)
}

/// Everyone rolls two dice; players tied on the highest total re-roll
/// among themselves until one leader remains. The rest follow by their
/// first roll, highest first, seat order breaking ties.
pub fn roll_turn_order(players: usize, rng: &mut impl Rng) -> Vec<PlayerId> {
    let first: Vec<u8> = (0..players).map(|_| roll_two(rng)).collect();

    let mut contenders: Vec<PlayerId> = (0..players).collect();
    let mut rolls = first.clone();
    let leader = loop {
        let top = contenders.iter().map(|&p| rolls[p]).max().unwrap_or(0);
        contenders.retain(|&p| rolls[p] == top);
        match contenders.as_slice() {
            [only] => break *only,
            [] => break 0,
            _ => {
                for &p in &contenders {
                    rolls[p] = roll_two(rng);
                }
            }
        }
    };

    let mut rest: Vec<PlayerId> = (0..players).filter(|&p| p != leader).collect();
    rest.sort_by(|a, b| first[*b].cmp(&first[*a]));
    std::iter::once(leader).chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn snake_order_over_three_players() {
        let mut cursor = TurnCursor::new(vec![2, 0, 1]);
        let mut phase = TurnPhase::FirstRound;
        let mut seen = vec![(cursor.current(), phase)];
        for _ in 0..6 {
            phase = cursor.advance(phase);
            seen.push((cursor.current(), phase));
        }
        assert_eq!(
            seen,
            vec![
                (2, TurnPhase::FirstRound),
                (0, TurnPhase::FirstRound),
                (1, TurnPhase::FirstRound),
                (1, TurnPhase::SecondRound),
                (0, TurnPhase::SecondRound),
                (2, TurnPhase::SecondRound),
                (2, TurnPhase::MainPlay),
            ]
        );
        assert_eq!(cursor.advance(TurnPhase::MainPlay), TurnPhase::MainPlay);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn main_play_wraps() {
        let mut cursor = TurnCursor::new(vec![0, 1, 2]);
        for _ in 0..3 {
            cursor.advance(TurnPhase::MainPlay);
        }
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn game_over_is_terminal() {
        let mut cursor = TurnCursor::new(vec![0, 1, 2]);
        let over = TurnPhase::GameOver { winner: 1 };
        assert_eq!(cursor.advance(over), over);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn rolled_order_is_a_permutation() {
        for seed in 0..20 {
            let mut order = roll_turn_order(4, &mut StdRng::seed_from_u64(seed));
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn phase_names_are_kebab_case() {
        assert_eq!(TurnPhase::MainPlay.to_string(), "main-play");
        assert_eq!(TurnPhase::DeterminingOrder.to_string(), "determining-order");
    }
}
