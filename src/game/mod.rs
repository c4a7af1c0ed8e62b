pub mod action;
pub mod bank;
pub mod game;
pub mod longest_road;
pub mod phase;
pub mod players;
pub mod resources;
pub mod state;

pub use action::{ActionPayload, GameAction};
pub use bank::Bank;
pub use game::Game;
pub use longest_road::{HolderChange, LONGEST_ROAD_BONUS, MIN_LONGEST_ROAD};
pub use phase::{Placement, TurnCursor, TurnPhase};
pub use players::{PlayerSpec, PlayerState};
pub use resources::{
    COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceBundle, ResourceError,
};
pub use state::{GameConfig, GameError, GameState, MAX_PLAYERS, MIN_PLAYERS, Outcome};
