pub mod adapter;
pub mod cpu;
pub mod driver;
pub mod live;
pub mod robber;
pub mod weights;

pub use adapter::{BankTradeOption, BlockMove, ResourceProfile, RulesAdapter, Stage};
pub use cpu::{CpuPlayer, ScoredAction};
pub use driver::{TurnSummary, apply_action, place_initial, play_cpu_turn};
pub use live::{GameAdapter, stage_for};
pub use robber::CpuRobberPolicy;
pub use weights::CpuWeights;
