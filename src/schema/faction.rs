use serde::{Deserialize, Serialize};

use super::entity::Named;

/// A guild, order, or cabal a character may belong to.
///
/// Rivalry is treated as symmetric by the selection logic even when only
/// one side lists the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub allies: Vec<String>,
    #[serde(default)]
    pub rivals: Vec<String>,
}

impl Faction {
    /// Name of the synthetic record used when no faction is eligible.
    pub const UNAFFILIATED: &'static str = "Unaffiliated";

    /// The neutral placeholder faction.
    pub fn unaffiliated() -> Faction {
        Faction {
            name: Self::UNAFFILIATED.to_string(),
            description: "A lone wanderer with no faction ties.".to_string(),
            alignment: Some("Neutral".to_string()),
            allies: Vec::new(),
            rivals: Vec::new(),
        }
    }

    /// Whether this faction explicitly lists `other` as a rival.
    pub fn lists_rival(&self, other: &str) -> bool {
        self.rivals.iter().any(|r| r.eq_ignore_ascii_case(other))
    }
}

impl Named for Faction {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Allies and rivals as reported on a generated character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelations {
    pub allies: Vec<String>,
    pub rivals: Vec<String>,
}
