#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod coords;
pub mod engine;
pub mod game;
pub mod players;
pub mod rules;
pub mod search;
pub mod types;

pub use board::{BoardGraph, Structure};
pub use game::{Game, GameConfig, GameError, GameState, Outcome};
pub use players::{CpuPlayer, CpuWeights, RulesAdapter};
pub use rules::Violation;
pub use types::{Color, PlayerId, Resource};
