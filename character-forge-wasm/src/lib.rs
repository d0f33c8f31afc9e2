//! WASM bindings for character-forge: powers the browser character sheet.

use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use character_forge::core::forge::CharacterForge;
use character_forge::core::lore::{tables, EmbeddedSource};
use character_forge::core::overrides::{OverrideValue, Overrides};
use character_forge::core::request::{normalize_params, BulkRequest};
use character_forge::schema::entity::Named;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Embedded lore tables: compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const RACES: &str = include_str!("../../lore_data/races.ron");
    pub const CLASSES: &str = include_str!("../../lore_data/classes.ron");
    pub const LOCATIONS: &str = include_str!("../../lore_data/locations.ron");
    pub const FACTIONS: &str = include_str!("../../lore_data/factions.ron");
    pub const RULES: &str = include_str!("../../lore_data/rules.ron");
    pub const DEITIES: &str = include_str!("../../lore_data/deities.ron");
    pub const GENDERS: &str = include_str!("../../lore_data/genders.ron");
    pub const AGES: &str = include_str!("../../lore_data/ages.ron");
    pub const CELESTIAL_MARKS: &str = include_str!("../../lore_data/celestial_marks.ron");
    pub const DISHES: &str = include_str!("../../lore_data/dishes.ron");
    pub const BACKSTORIES: &str = include_str!("../../lore_data/backstories.ron");
}

fn embedded_lore() -> EmbeddedSource {
    EmbeddedSource::new()
        .with_table(tables::RACES, data::RACES)
        .with_table(tables::CLASSES, data::CLASSES)
        .with_table(tables::LOCATIONS, data::LOCATIONS)
        .with_table(tables::FACTIONS, data::FACTIONS)
        .with_table(tables::RULES, data::RULES)
        .with_table(tables::DEITIES, data::DEITIES)
        .with_table(tables::GENDERS, data::GENDERS)
        .with_table(tables::AGES, data::AGES)
        .with_table(tables::CELESTIAL_MARKS, data::CELESTIAL_MARKS)
        .with_table(tables::DISHES, data::DISHES)
        .with_table(tables::BACKSTORIES, data::BACKSTORIES)
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct LoreSummary {
    races: Vec<String>,
    classes: Vec<String>,
    regions: Vec<String>,
    factions: Vec<String>,
    genders: Vec<String>,
    deities: Vec<String>,
}

/// Parse a flat JSON object of field values into string pairs.
fn parse_params(json: &str) -> Result<Vec<(String, String)>, JsError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: BTreeMap<String, OverrideValue> = serde_json::from_str(json)
        .map_err(|e| JsError::new(&format!("Invalid request JSON: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                OverrideValue::Text(s) => s,
                OverrideValue::Number(n) => n.to_string(),
            };
            (key, text)
        })
        .collect())
}

fn names<T: Named>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.name().to_string()).collect()
}

// ---------------------------------------------------------------------------
// CharacterForgeDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct CharacterForgeDemo {
    forge: CharacterForge,
    rng: StdRng,
}

#[wasm_bindgen]
impl CharacterForgeDemo {
    /// Create a new instance over the embedded lore, seeded for replay.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<CharacterForgeDemo, JsError> {
        let forge = CharacterForge::builder()
            .with_source(embedded_lore())
            .build()
            .map_err(|e| JsError::new(&format!("Forge build error: {e}")))?;

        Ok(CharacterForgeDemo {
            forge,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Generate one character. Returns the character record, or an
    /// `{"error": ...}` record, as JSON.
    ///
    /// Expected JSON shape (every field optional):
    /// ```json
    /// { "race": "nord", "class": "warrior", "age": 35, "place": "Whiterun" }
    /// ```
    pub fn generate(&mut self, overrides_json: &str) -> Result<String, JsError> {
        let params = normalize_params(parse_params(overrides_json)?);
        let overrides = Overrides::from_pairs(params);
        self.forge
            .forge(&overrides, &mut self.rng)
            .to_json()
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Generate a batch. Returns a JSON array of character or error records.
    ///
    /// Expected JSON shape:
    /// ```json
    /// { "count": 3, "race": "human,elf" }
    /// ```
    pub fn generate_bulk(&mut self, query_json: &str) -> Result<String, JsError> {
        let request = BulkRequest::parse(parse_params(query_json)?);
        let responses = self.forge.generate_bulk(&request, &mut self.rng);
        serde_json::to_string(&responses)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON description of the selectable lore values.
    pub fn lore_summary(&self) -> Result<String, JsError> {
        let lore = self
            .forge
            .lore()
            .map_err(|e| JsError::new(&format!("Lore error: {e}")))?;

        let summary = LoreSummary {
            races: names(&lore.races),
            classes: names(&lore.classes),
            regions: names(&lore.locations),
            factions: names(&lore.factions),
            genders: names(&lore.genders),
            deities: names(&lore.deities),
        };
        serde_json::to_string(&summary)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Reseed the generator.
    pub fn reset(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

