use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// Resource counts indexed by [`Resource::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    counts: [u8; Resource::ALL.len()],
}

impl ResourceBundle {
    pub const fn from_counts(counts: [u8; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn single(resource: Resource, amount: u8) -> Self {
        let mut bundle = Self::zero();
        bundle.add(resource, amount);
        bundle
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&v| v as u32).sum()
    }

    pub fn get(&self, resource: Resource) -> u8 {
        self.counts[resource.index()]
    }

    pub fn add(&mut self, resource: Resource, amount: u8) {
        let slot = &mut self.counts[resource.index()];
        *slot = slot.saturating_add(amount);
    }

    pub fn add_bundle(&mut self, other: &ResourceBundle) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    pub fn subtract(&mut self, resource: Resource, amount: u8) -> Result<(), ResourceError> {
        let available = self.get(resource);
        if available < amount {
            return Err(ResourceError::InsufficientResource {
                resource,
                available,
                requested: amount,
            });
        }
        self.counts[resource.index()] -= amount;
        Ok(())
    }

    pub fn subtract_bundle(&mut self, other: &ResourceBundle) -> Result<(), ResourceError> {
        if !self.can_afford(other) {
            return Err(ResourceError::InsufficientBundle);
        }
        for resource in Resource::ALL {
            self.counts[resource.index()] -= other.get(resource);
        }
        Ok(())
    }

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        Resource::ALL
            .into_iter()
            .all(|resource| self.get(resource) >= cost.get(resource))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&value| value == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Resources that `cost` needs beyond what this bundle holds.
    pub fn shortfall(&self, cost: &ResourceBundle) -> ResourceBundle {
        let mut missing = ResourceBundle::zero();
        for resource in Resource::ALL {
            missing.add(resource, cost.get(resource).saturating_sub(self.get(resource)));
        }
        missing
    }

    /// Picks one card uniformly at random, weighting each resource by its count.
    pub fn random_card(&self, rng: &mut (impl Rng + ?Sized)) -> Option<Resource> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for (resource, amount) in self.iter() {
            if pick < amount as u32 {
                return Some(resource);
            }
            pick -= amount as u32;
        }
        None
    }

    /// Removes up to `count` cards uniformly at random and returns them.
    pub fn remove_random(&mut self, count: u32, rng: &mut (impl Rng + ?Sized)) -> ResourceBundle {
        let mut removed = ResourceBundle::zero();
        for _ in 0..count {
            let Some(resource) = self.random_card(rng) else {
                break;
            };
            self.counts[resource.index()] -= 1;
            removed.add(resource, 1);
        }
        removed
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(resource, amount)| format!("{amount}x{resource}"))
            .collect();
        if parts.is_empty() {
            write!(f, "nothing")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("insufficient {resource}: have {available}, need {requested}")]
    InsufficientResource {
        resource: Resource,
        available: u8,
        requested: u8,
    },
    #[error("insufficient resources to cover bundle")]
    InsufficientBundle,
}

pub const COST_ROAD: ResourceBundle = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
pub const COST_SETTLEMENT: ResourceBundle = ResourceBundle::from_counts([1, 1, 1, 1, 0]);
pub const COST_CITY: ResourceBundle = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
pub const COST_DEVELOPMENT: ResourceBundle = ResourceBundle::from_counts([0, 0, 1, 1, 1]);
