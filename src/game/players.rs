use serde::{Deserialize, Serialize};

use crate::game::resources::{ResourceBundle, ResourceError};
use crate::types::{Color, DevelopmentCard, PlayerId};

pub const MAX_ROADS: u8 = 15;
pub const MAX_SETTLEMENTS: u8 = 5;
pub const MAX_CITIES: u8 = 4;

/// Identity supplied by the caller when a game is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub color: Color,
    pub is_cpu: bool,
}

impl PlayerSpec {
    pub fn new(name: impl Into<String>, color: Color, is_cpu: bool) -> Self {
        Self {
            name: name.into(),
            color,
            is_cpu,
        }
    }

    pub fn cpu(name: impl Into<String>, color: Color) -> Self {
        Self::new(name, color, true)
    }
}

/// Pieces a player still has in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub settlements: u8,
    pub cities: u8,
    pub roads: u8,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            settlements: MAX_SETTLEMENTS,
            cities: MAX_CITIES,
            roads: MAX_ROADS,
        }
    }
}

/// One entry of the player ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub color: Color,
    pub is_cpu: bool,
    pub resources: ResourceBundle,
    pub inventory: Inventory,
    /// Points from structures and the longest-road bonus.
    pub victory_points: u8,
    pub has_longest_road: bool,
    pub dev_cards: Vec<DevelopmentCard>,
}

impl PlayerState {
    pub fn new(id: PlayerId, spec: PlayerSpec) -> Self {
        Self {
            id,
            name: spec.name,
            color: spec.color,
            is_cpu: spec.is_cpu,
            resources: ResourceBundle::zero(),
            inventory: Inventory::default(),
            victory_points: 0,
            has_longest_road: false,
            dev_cards: Vec::new(),
        }
    }

    pub fn add_resources(&mut self, bundle: &ResourceBundle) {
        self.resources.add_bundle(bundle);
    }

    pub fn remove_resources(&mut self, bundle: &ResourceBundle) -> Result<(), ResourceError> {
        self.resources.subtract_bundle(bundle)
    }

    /// Victory-point cards held face down.
    pub fn hidden_points(&self) -> u8 {
        self.dev_cards
            .iter()
            .filter(|card| matches!(card, DevelopmentCard::VictoryPoint))
            .count() as u8
    }

    pub fn public_points(&self) -> u8 {
        self.victory_points
    }

    pub fn total_points(&self) -> u8 {
        self.victory_points + self.hidden_points()
    }
}
