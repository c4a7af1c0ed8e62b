use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ActionKind, EdgeId, HexId, PlayerId, Resource, VertexId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameAction {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub payload: ActionPayload,
}

impl GameAction {
    pub fn new(player: PlayerId, kind: ActionKind) -> Self {
        Self {
            player,
            kind,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn settlement(player: PlayerId, vertex: VertexId) -> Self {
        Self::new(player, ActionKind::BuildSettlement).with_payload(ActionPayload::Vertex(vertex))
    }

    pub fn road(player: PlayerId, edge: EdgeId) -> Self {
        Self::new(player, ActionKind::BuildRoad).with_payload(ActionPayload::Edge(edge))
    }

    pub fn city(player: PlayerId, vertex: VertexId) -> Self {
        Self::new(player, ActionKind::BuildCity).with_payload(ActionPayload::Vertex(vertex))
    }

    pub fn bank_trade(player: PlayerId, give: Resource, get: Resource, rate: u8) -> Self {
        Self::new(player, ActionKind::BankTrade)
            .with_payload(ActionPayload::BankTrade { give, get, rate })
    }

    pub fn move_block(player: PlayerId, hex: HexId, victim: Option<PlayerId>) -> Self {
        Self::new(player, ActionKind::MoveBlock).with_payload(ActionPayload::Block { hex, victim })
    }

    pub fn vertex(&self) -> Option<VertexId> {
        match self.payload {
            ActionPayload::Vertex(vertex) => Some(vertex),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<EdgeId> {
        match self.payload {
            ActionPayload::Edge(edge) => Some(edge),
            _ => None,
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload {
            ActionPayload::None => write!(f, "{}", self.kind),
            ActionPayload::Vertex(vertex) => write!(f, "{} @{vertex}", self.kind),
            ActionPayload::Edge(edge) => write!(f, "{} #{edge}", self.kind),
            ActionPayload::BankTrade { give, get, rate } => {
                write!(f, "{} {rate}x{give}->{get}", self.kind)
            }
            ActionPayload::Block { hex, victim } => match victim {
                Some(victim) => write!(f, "{} hex {hex} steal from {victim}", self.kind),
                None => write!(f, "{} hex {hex}", self.kind),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionPayload {
    None,
    Vertex(VertexId),
    Edge(EdgeId),
    BankTrade {
        give: Resource,
        get: Resource,
        rate: u8,
    },
    Block {
        hex: HexId,
        victim: Option<PlayerId>,
    },
}
