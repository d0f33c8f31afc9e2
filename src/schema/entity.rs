use serde::{Deserialize, Serialize};

/// Anything that can be picked out of a lore table by display name.
///
/// Override matching and rule lookups are keyed on this name.
pub trait Named {
    fn name(&self) -> &str;

    /// Case-insensitive comparison against a caller-supplied value.
    fn is_named(&self, other: &str) -> bool {
        self.name().eq_ignore_ascii_case(other.trim())
    }
}

/// Inclusive integer range used for height (cm) and weight (kg).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRange {
    pub min: i32,
    pub max: i32,
}

impl BodyRange {
    /// Height range for races without their own metrics.
    pub const DEFAULT_HEIGHT: BodyRange = BodyRange { min: 160, max: 180 };
    /// Weight range for races without their own metrics.
    pub const DEFAULT_WEIGHT: BodyRange = BodyRange { min: 60, max: 80 };

    /// Shift both bounds by the same signed offset.
    pub fn shifted(self, offset: i32) -> BodyRange {
        BodyRange {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Signed offsets applied to both bounds of the height and weight ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyModifier {
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
}

impl BodyModifier {
    pub const ZERO: BodyModifier = BodyModifier {
        height: 0,
        weight: 0,
    };
}

impl std::ops::Add for BodyModifier {
    type Output = BodyModifier;

    fn add(self, rhs: BodyModifier) -> BodyModifier {
        BodyModifier {
            height: self.height + rhs.height,
            weight: self.weight + rhs.weight,
        }
    }
}

/// A playable race. Which classes, origins, factions, and deities suit it
/// is decided by the rule tables, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub height: Option<BodyRange>,
    #[serde(default)]
    pub weight: Option<BodyRange>,
    /// Personal name pool; empty means the race has no naming tradition.
    #[serde(default, skip_serializing)]
    pub names: Vec<String>,
}

impl Race {
    /// Base (height, weight) ranges, falling back to the defaults.
    pub fn body_ranges(&self) -> (BodyRange, BodyRange) {
        (
            self.height.unwrap_or(BodyRange::DEFAULT_HEIGHT),
            self.weight.unwrap_or(BodyRange::DEFAULT_WEIGHT),
        )
    }
}

/// A character class with its flavor pools and body modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing)]
    pub fighting_styles: Vec<String>,
    #[serde(default, skip_serializing)]
    pub quotes: Vec<String>,
    #[serde(default, skip_serializing)]
    pub titles: Vec<String>,
    #[serde(default, skip_serializing)]
    pub modifier: BodyModifier,
}

impl Class {
    /// Key used for backstory lookup.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// A region a character can hail from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub region_type: Option<String>,
    #[serde(default)]
    pub environment: Vec<String>,
    /// Named sub-locations, in display order.
    #[serde(default)]
    pub major_places: Vec<String>,
}

impl Location {
    /// The listed place matching `place` case-insensitively, if any.
    pub fn find_place(&self, place: &str) -> Option<&str> {
        let wanted = place.trim();
        self.major_places
            .iter()
            .find(|p| p.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}

/// A deity and what its followers are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deity {
    pub deity: String,
    #[serde(default)]
    pub follower: String,
    #[serde(default)]
    pub domain: String,
}

/// A birth sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialMark {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Named for Race {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Class {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Deity {
    fn name(&self) -> &str {
        &self.deity
    }
}

impl Named for CelestialMark {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}
