//! Character - commanders, governors and social actors
//!
//! Skills and traits are on a 0-100 scale. Only the values the economy
//! reads are modelled here; lifecycle and social state belong to the
//! phases that own them.

use serde::{Deserialize, Serialize};

use crate::core::types::{CharacterId, FactionId};
use crate::world::repository::Aggregate;

/// Upper bound of every skill and trait
pub const SKILL_MAX: u8 = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub faction: Option<FactionId>,
    pub alive: bool,
    pub military: u8,
    pub economic: u8,
    pub conscientiousness: u8,
    /// Personal purse, used when a character borrows
    pub gold: i64,
}

impl Character {
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            faction: None,
            alive: true,
            military: 0,
            economic: 0,
            conscientiousness: 0,
            gold: 0,
        }
    }

    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_skills(mut self, military: u8, economic: u8, conscientiousness: u8) -> Self {
        self.military = military.min(SKILL_MAX);
        self.economic = economic.min(SKILL_MAX);
        self.conscientiousness = conscientiousness.min(SKILL_MAX);
        self
    }

    pub fn with_gold(mut self, gold: i64) -> Self {
        self.gold = gold;
        self
    }
}

/// Normalize a 0-100 skill to 0.0-1.0
pub fn skill_fraction(value: u8) -> f64 {
    f64::from(value.min(SKILL_MAX)) / f64::from(SKILL_MAX)
}

impl Aggregate for Character {
    type Id = CharacterId;

    fn id(&self) -> CharacterId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_are_clamped() {
        let c = Character::new(CharacterId(1), "Ilse").with_skills(250, 40, 101);
        assert_eq!(c.military, 100);
        assert_eq!(c.economic, 40);
        assert_eq!(c.conscientiousness, 100);
    }

    #[test]
    fn test_skill_fraction() {
        assert_eq!(skill_fraction(0), 0.0);
        assert_eq!(skill_fraction(50), 0.5);
        assert_eq!(skill_fraction(100), 1.0);
    }
}
