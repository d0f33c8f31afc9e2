use serde::{Deserialize, Serialize};

use super::entity::{BodyModifier, Named};

/// Pronoun set for a character, exposed to backstory templates as
/// `{subject}`, `{object}` and `{possessive}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pronouns {
    /// she/her/her
    SheHer,
    /// he/him/his
    HeHim,
    /// they/them/their
    TheyThem,
}

impl Default for Pronouns {
    fn default() -> Self {
        Self::TheyThem
    }
}

impl Pronouns {
    /// Nominative/subject form: "she", "he", "they".
    pub fn subject(&self) -> &'static str {
        match self {
            Self::SheHer => "she",
            Self::HeHim => "he",
            Self::TheyThem => "they",
        }
    }

    /// Accusative/object form: "her", "him", "them".
    pub fn object(&self) -> &'static str {
        match self {
            Self::SheHer => "her",
            Self::HeHim => "him",
            Self::TheyThem => "them",
        }
    }

    /// Possessive determiner: "her", "his", "their".
    pub fn possessive(&self) -> &'static str {
        match self {
            Self::SheHer => "her",
            Self::HeHim => "his",
            Self::TheyThem => "their",
        }
    }

    /// Display form, e.g. "she/her".
    pub fn display(&self) -> &'static str {
        match self {
            Self::SheHer => "she/her",
            Self::HeHim => "he/him",
            Self::TheyThem => "they/them",
        }
    }
}

/// A gender entry from the lore tables.
///
/// `modifier` is `None` for labels the body tables have no offsets for;
/// those derive with a zero offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gender {
    pub label: String,
    #[serde(default)]
    pub pronouns: Pronouns,
    #[serde(default, skip_serializing)]
    pub modifier: Option<BodyModifier>,
}

impl Named for Gender {
    fn name(&self) -> &str {
        &self.label
    }
}
