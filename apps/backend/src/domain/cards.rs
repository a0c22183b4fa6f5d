//! Card and tag types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The nine animal tags a regular card can show. `Cat` appears in every
/// environment; the other eight are exclusive to one environment each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalType {
    Pig,
    Rooster,
    Zebra,
    Giraffe,
    Dolphin,
    Octopus,
    Bear,
    Rabbit,
    Cat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Farm,
    Savanna,
    Ocean,
    Forest,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Farm,
        Environment::Savanna,
        Environment::Ocean,
        Environment::Forest,
    ];

    /// The three tags native to this environment, wildcard last.
    pub fn animals(self) -> [AnimalType; 3] {
        match self {
            Environment::Farm => [AnimalType::Pig, AnimalType::Rooster, AnimalType::Cat],
            Environment::Savanna => [AnimalType::Zebra, AnimalType::Giraffe, AnimalType::Cat],
            Environment::Ocean => [AnimalType::Dolphin, AnimalType::Octopus, AnimalType::Cat],
            Environment::Forest => [AnimalType::Bear, AnimalType::Rabbit, AnimalType::Cat],
        }
    }
}

/// One card instance in a generated deck. Regular cards carry an environment
/// and one to three animal tags; the single Foxy card carries neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub is_foxy: bool,
    pub environment: Option<Environment>,
    pub animals: Vec<AnimalType>,
}

impl Card {
    pub fn regular(environment: Environment, animals: Vec<AnimalType>) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_foxy: false,
            environment: Some(environment),
            animals,
        }
    }

    pub fn foxy() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_foxy: true,
            environment: None,
            animals: Vec::new(),
        }
    }
}
