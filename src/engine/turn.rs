use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::policy::DisruptionPolicy;
use crate::engine::{PlayerView, Table};
use crate::game::resources::ResourceBundle;
use crate::game::state::GameError;
use crate::types::{HexId, PlayerId, Resource};

pub const DISRUPTION_ROLL: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theft {
    pub thief: PlayerId,
    pub victim: PlayerId,
    pub resource: Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceReport {
    Production {
        roll: u8,
        gains: BTreeMap<PlayerId, ResourceBundle>,
    },
    Disruption {
        discards: BTreeMap<PlayerId, ResourceBundle>,
        moved_from: HexId,
        moved_to: HexId,
        steal: Option<Theft>,
    },
}

impl DiceReport {
    pub fn roll(&self) -> u8 {
        match self {
            DiceReport::Production { roll, .. } => *roll,
            DiceReport::Disruption { .. } => DISRUPTION_ROLL,
        }
    }
}

pub struct TurnEngine<'p> {
    policy: &'p mut dyn DisruptionPolicy,
    discard_threshold: u32,
}

impl<'p> TurnEngine<'p> {
    pub fn new(policy: &'p mut dyn DisruptionPolicy, discard_threshold: u32) -> Self {
        Self {
            policy,
            discard_threshold,
        }
    }

    pub fn roll_dice(rng: &mut (impl Rng + ?Sized)) -> u8 {
        rng.gen_range(1..=6) + rng.gen_range(1..=6)
    }

    /// Resolves one roll against `table`. On error the table may be partly
    /// updated and must be discarded.
    pub fn dice_phase(
        &mut self,
        table: &mut Table,
        active: PlayerId,
        roll: u8,
        rng: &mut dyn RngCore,
    ) -> Result<DiceReport, GameError> {
        if active >= table.players.len() {
            return Err(GameError::UnknownPlayer(active));
        }
        if !(2..=12).contains(&roll) {
            return Err(GameError::InvalidRoll(roll));
        }
        if roll == DISRUPTION_ROLL {
            self.disrupt(table, active, rng)
        } else {
            let gains = produce(table, roll)?;
            Ok(DiceReport::Production { roll, gains })
        }
    }

    fn disrupt(
        &mut self,
        table: &mut Table,
        active: PlayerId,
        rng: &mut dyn RngCore,
    ) -> Result<DiceReport, GameError> {
        let mut discards = BTreeMap::new();
        for idx in 0..table.players.len() {
            let total = table.players[idx].total_cards();
            if total <= self.discard_threshold {
                continue;
            }
            let owed = total / 2;
            let chosen = self.policy.choose_discard(&table.players[idx], owed, rng);
            let removed = apply_discard(&mut table.players[idx], chosen, owed, rng);
            table.bank.add_bundle(&removed);
            discards.insert(table.players[idx].id, removed);
        }

        let moved_from = table.board.blocked;
        let moved_to = self.policy.choose_target(&table.board, active, rng);
        if table.board.tile(moved_to).is_none() {
            return Err(GameError::UnknownHex(moved_to));
        }
        for tile in &mut table.board.tiles {
            tile.has_block = tile.id == moved_to;
        }
        table.board.blocked = moved_to;
        info!(from = moved_from, to = moved_to, "block marker moved");

        let owners = table.board.owners_around(moved_to, active);
        let candidates: Vec<&PlayerView> = table
            .players
            .iter()
            .filter(|view| owners.contains(&view.id) && view.total_cards() > 0)
            .collect();
        let eligible: Vec<PlayerId> = candidates.iter().map(|view| view.id).collect();
        let choice = if candidates.is_empty() {
            None
        } else {
            self.policy.choose_victim(&candidates, rng)
        };

        let steal = match choice {
            None => None,
            Some(victim) if !eligible.contains(&victim) => {
                return Err(GameError::InvalidVictim(victim));
            }
            Some(victim) => self.steal(table, active, victim, rng),
        };

        Ok(DiceReport::Disruption {
            discards,
            moved_from,
            moved_to,
            steal,
        })
    }

    fn steal(
        &mut self,
        table: &mut Table,
        thief: PlayerId,
        victim: PlayerId,
        rng: &mut dyn RngCore,
    ) -> Option<Theft> {
        let view = &table.players[victim];
        let resource = self
            .policy
            .choose_steal(view, rng)
            .filter(|&r| view.resources.get(r) > 0)
            .or_else(|| view.resources.random_card(rng))?;

        table.players[victim].resources.subtract(resource, 1).ok()?;
        table.players[thief].resources.add(resource, 1);
        info!(thief, victim, %resource, "resource stolen");
        Some(Theft {
            thief,
            victim,
            resource,
        })
    }
}

/// Takes what the policy chose, capped at what is owed and held, then makes
/// up any shortfall at random.
fn apply_discard(
    view: &mut PlayerView,
    chosen: ResourceBundle,
    owed: u32,
    rng: &mut dyn RngCore,
) -> ResourceBundle {
    let mut removed = ResourceBundle::zero();
    let mut remaining = owed;
    for (resource, amount) in chosen.iter() {
        let take = (amount as u32)
            .min(remaining)
            .min(view.resources.get(resource) as u32) as u8;
        if take == 0 {
            continue;
        }
        // Capped by the holding above, so this cannot fail.
        if view.resources.subtract(resource, take).is_ok() {
            removed.add(resource, take);
            remaining -= take as u32;
        }
    }
    if remaining > 0 {
        warn!(
            player = view.id,
            owed,
            short = remaining,
            "discard policy under-removed; topping up at random"
        );
        removed.add_bundle(&view.resources.remove_random(remaining, rng));
    }
    debug!(player = view.id, %removed, "discarded");
    removed
}

fn produce(table: &mut Table, roll: u8) -> Result<BTreeMap<PlayerId, ResourceBundle>, GameError> {
    let mut gains: BTreeMap<PlayerId, ResourceBundle> = BTreeMap::new();
    let blocked = table.board.blocked;
    for tile in &table.board.tiles {
        if tile.number != Some(roll) || tile.id == blocked || tile.has_block {
            continue;
        }
        let Some(resource) = tile.resource else {
            continue;
        };
        for vertex in &tile.vertices {
            let Some(structure) = table.board.vertex_owners.get(vertex) else {
                continue;
            };
            let Some(player) = table.players.get_mut(structure.owner) else {
                return Err(GameError::UnknownPlayer(structure.owner));
            };
            let amount = structure.tier.yield_multiplier();
            if table.bank.subtract(resource, amount).is_err() {
                warn!(
                    player = structure.owner,
                    %resource,
                    amount,
                    "bank short; credit skipped"
                );
                continue;
            }
            player.resources.add(resource, amount);
            gains
                .entry(structure.owner)
                .or_default()
                .add(resource, amount);
        }
    }
    info!(roll, players = gains.len(), "production resolved");
    Ok(gains)
}
