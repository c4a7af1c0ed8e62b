//! Dice resolution over a detached snapshot of the table.
//!
//! The engine never touches [`BoardGraph`] or the player ledger directly.
//! The caller captures a [`Table`], lets the engine mutate it, and copies
//! the result back only when resolution succeeded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{BoardGraph, Structure};
use crate::game::bank::Bank;
use crate::game::players::PlayerState;
use crate::game::resources::ResourceBundle;
use crate::types::{HexId, PlayerId, Resource, VertexId};

pub mod policy;
pub mod turn;

pub use policy::{DisruptionPolicy, RandomPolicy};
pub use turn::{DiceReport, Theft, TurnEngine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: HexId,
    pub number: Option<u8>,
    pub resource: Option<Resource>,
    pub vertices: SmallVec<[VertexId; 6]>,
    pub has_block: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tiles: Vec<TileView>,
    pub vertex_owners: BTreeMap<VertexId, Structure>,
    pub blocked: HexId,
}

impl BoardSnapshot {
    pub fn capture(board: &BoardGraph) -> Self {
        let tiles = board
            .hexes()
            .iter()
            .map(|hex| TileView {
                id: hex.id,
                number: hex.number,
                resource: hex.resource,
                vertices: hex.vertices.clone(),
                has_block: hex.has_block,
            })
            .collect();
        let vertex_owners = board
            .vertices()
            .iter()
            .filter_map(|vertex| vertex.structure.map(|s| (vertex.id, s)))
            .collect();
        Self {
            tiles,
            vertex_owners,
            blocked: board.blocked_hex(),
        }
    }

    pub fn tile(&self, hex: HexId) -> Option<&TileView> {
        self.tiles.get(hex as usize)
    }

    /// Players other than `active` with a structure on `hex`, ascending.
    pub fn owners_around(&self, hex: HexId, active: PlayerId) -> Vec<PlayerId> {
        let Some(tile) = self.tile(hex) else {
            return Vec::new();
        };
        let mut owners: Vec<PlayerId> = tile
            .vertices
            .iter()
            .filter_map(|v| self.vertex_owners.get(v).map(|s| s.owner))
            .filter(|&owner| owner != active)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub resources: ResourceBundle,
}

impl PlayerView {
    pub fn total_cards(&self) -> u32 {
        self.resources.total()
    }
}

/// Everything a dice resolution reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub board: BoardSnapshot,
    pub players: Vec<PlayerView>,
    pub bank: ResourceBundle,
}

impl Table {
    pub fn capture(board: &BoardGraph, players: &[PlayerState], bank: &Bank) -> Self {
        Self {
            board: BoardSnapshot::capture(board),
            players: players
                .iter()
                .map(|player| PlayerView {
                    id: player.id,
                    name: player.name.clone(),
                    resources: player.resources,
                })
                .collect(),
            bank: *bank.resources(),
        }
    }
}
