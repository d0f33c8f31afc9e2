use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{CelestialMark, Class, Deity, Race};

/// A fully assembled character. Built once per generation call and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCharacter {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub gender: GenderView,
    pub age: AgeView,
    pub body: BodyMetrics,
    pub race: Race,
    pub celestial_mark: CelestialMark,
    pub follower: Deity,
    pub origin: Origin,
    pub class: Class,
    pub faction: FactionView,
    pub fighting_style: String,
    pub favorite_dish: String,
    pub quote: String,
    pub backstory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderView {
    pub label: String,
    pub pronouns: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeView {
    pub value: u32,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub height_cm: i32,
    pub weight_kg: i32,
}

impl BodyMetrics {
    /// Body mass index: kg / m².
    pub fn bmi(&self) -> f64 {
        let meters = f64::from(self.height_cm) / 100.0;
        f64::from(self.weight_kg) / (meters * meters)
    }
}

/// Where a character hails from: a region and a place within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    pub name: String,
    pub place: String,
    pub description: String,
    pub region_type: Option<String>,
    pub environment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionView {
    pub name: String,
    pub description: String,
    pub allies: Vec<String>,
    pub rivals: Vec<String>,
    pub alignment: Option<String>,
}

/// The terminal error shape returned in place of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}
