use serde::{Deserialize, Serialize};

use super::entity::Named;

/// Groups whose upper bound reaches this age belong to the elder band.
pub const ELDER_BAND_START: u32 = 50;

/// Young/elder partition used to weight default age-group sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBand {
    Young,
    Elder,
}

/// A labelled, inclusive age range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroup {
    pub label: String,
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub description: String,
}

impl AgeGroup {
    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }

    pub fn band(&self) -> AgeBand {
        if self.max < ELDER_BAND_START {
            AgeBand::Young
        } else {
            AgeBand::Elder
        }
    }
}

impl Named for AgeGroup {
    fn name(&self) -> &str {
        &self.label
    }
}
