use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::resources::{ResourceBundle, ResourceError};
use crate::types::{DevelopmentCard, Resource};

/// Finite resource supply and the face-down development deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    resources: ResourceBundle,
    development_deck: Vec<DevelopmentCard>,
}

impl Bank {
    pub const STARTING_STOCK: u8 = 19;

    pub fn standard(rng: &mut impl rand::Rng) -> Self {
        let mut deck = build_development_deck();
        deck.shuffle(rng);
        Self {
            resources: ResourceBundle::from_counts([Self::STARTING_STOCK; 5]),
            development_deck: deck,
        }
    }

    pub fn resources(&self) -> &ResourceBundle {
        &self.resources
    }

    pub fn available(&self, resource: Resource) -> u8 {
        self.resources.get(resource)
    }

    pub fn receive(&mut self, bundle: &ResourceBundle) {
        self.resources.add_bundle(bundle);
    }

    pub fn dispense(&mut self, bundle: &ResourceBundle) -> Result<(), ResourceError> {
        self.resources.subtract_bundle(bundle)
    }

    pub fn development_deck_len(&self) -> usize {
        self.development_deck.len()
    }

    pub fn draw_development_card(&mut self) -> Option<DevelopmentCard> {
        self.development_deck.pop()
    }

    /// Replaces the resource stock; used when syncing back a resolved table.
    pub(crate) fn set_resources(&mut self, resources: ResourceBundle) {
        self.resources = resources;
    }
}

fn build_development_deck() -> Vec<DevelopmentCard> {
    use DevelopmentCard::*;
    const DISTRIBUTION: &[(DevelopmentCard, usize)] = &[
        (Knight, 14),
        (VictoryPoint, 5),
        (RoadBuilding, 2),
        (YearOfPlenty, 2),
        (Monopoly, 2),
    ];

    DISTRIBUTION
        .iter()
        .flat_map(|&(card, count)| std::iter::repeat(card).take(count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn standard_bank_stock() {
        let bank = Bank::standard(&mut StdRng::seed_from_u64(1));
        assert_eq!(bank.development_deck_len(), 25);
        assert!(Resource::ALL.iter().all(|&r| bank.available(r) == 19));
    }

    #[test]
    fn dispense_fails_without_stock() {
        let mut bank = Bank::standard(&mut StdRng::seed_from_u64(1));
        let too_much = ResourceBundle::single(Resource::Ore, 20);
        assert!(bank.dispense(&too_much).is_err());
        assert_eq!(bank.available(Resource::Ore), 19);
    }
}
