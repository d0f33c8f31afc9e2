/// The character forge: override-aware assembly of one character, retried
/// until a class can be chosen.
///
/// Wires together lore loading, rule filtering, entity selection, body
/// metrics, faction picking, and backstory composition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::core::backstory::{BackstoryComposer, BackstoryContext};
use crate::core::faction::{pick_non_conflicting, relations_for};
use crate::core::lore::{tables, Lore, LoreError, LoreStore, TableSource};
use crate::core::metrics::{derive_body, gender_modifier};
use crate::core::overrides::Overrides;
use crate::core::request::BulkRequest;
use crate::core::rules::RuleEngine;
use crate::core::selector::{match_name, resolve, resolve_filtered};
use crate::schema::age::{AgeBand, AgeGroup};
use crate::schema::character::{
    AgeView, ErrorRecord, FactionView, GenderView, GeneratedCharacter, Origin,
};
use crate::schema::entity::{CelestialMark, Deity, Location, Race};
use crate::schema::faction::{Faction, FactionRelations};
use crate::schema::gender::{Gender, Pronouns};

/// Attempts made before giving up on finding a class.
pub const MAX_ATTEMPTS: u32 = 10;

pub const EXHAUSTED_MESSAGE: &str = "No valid character could be generated after several attempts.";
pub const FATAL_MESSAGE: &str = "Something went wrong during character generation.";

/// Lore directory used when the builder is given none.
pub const DEFAULT_LORE_DIR: &str = "lore_data";

/// Places used when a region lists none.
pub const GENERIC_PLACES: [&str; 3] = ["a remote village", "an ancient ruin", "a forgotten outpost"];

pub const DEFAULT_NAME: &str = "Nameless Wanderer";
pub const DEFAULT_FIGHTING_STYLE: &str = "Improvised brawling";
pub const DEFAULT_QUOTE: &str = "...";
pub const DEFAULT_TITLE: &str = "The Nameless";
const UNKNOWN: &str = "Unknown";

/// Probability that default age sampling draws from the young band.
pub const YOUNG_BAND_WEIGHT: f64 = 0.85;

#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    #[error("lore error: {0}")]
    Lore(#[from] LoreError),
    #[error("lore table {0} has no entries")]
    EmptyTable(&'static str),
    #[error("no class could be selected after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("invalid forge configuration: {0}")]
    Config(String),
}

impl ForgeError {
    /// The message shown to callers. Internal detail never leaks past this.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => EXHAUSTED_MESSAGE,
            _ => FATAL_MESSAGE,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// What a generation call hands back: a character, or an error record.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ForgeResponse {
    Character(Box<GeneratedCharacter>),
    Error(ErrorRecord),
}

impl ForgeResponse {
    pub fn character(&self) -> Option<&GeneratedCharacter> {
        match self {
            Self::Character(c) => Some(c.as_ref()),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Character(_) => None,
            Self::Error(rec) => Some(&rec.error),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Result<GeneratedCharacter, ForgeError>> for ForgeResponse {
    fn from(result: Result<GeneratedCharacter, ForgeError>) -> Self {
        match result {
            Ok(character) => Self::Character(Box::new(character)),
            Err(e) => {
                if e.is_exhausted() {
                    tracing::warn!("{}", e);
                } else {
                    tracing::error!(error = ?e, "character generation failed: {}", e);
                }
                Self::Error(ErrorRecord {
                    error: e.public_message().to_string(),
                })
            }
        }
    }
}

/// The top-level generator. Built via `CharacterForge::builder()`.
#[derive(Debug)]
pub struct CharacterForge {
    store: LoreStore,
    max_attempts: u32,
}

/// Builder for constructing a `CharacterForge`.
#[derive(Debug)]
pub struct CharacterForgeBuilder {
    lore_dir: Option<PathBuf>,
    max_attempts: u32,
    /// Directly provided store (in-memory tables, embedded sources).
    store: Option<LoreStore>,
}

impl CharacterForge {
    pub fn builder() -> CharacterForgeBuilder {
        CharacterForgeBuilder {
            lore_dir: None,
            max_attempts: MAX_ATTEMPTS,
            store: None,
        }
    }

    /// The loaded lore tables, loading them on first use.
    pub fn lore(&self) -> Result<&Lore, ForgeError> {
        Ok(self.store.get()?)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generate one character.
    ///
    /// Each attempt re-resolves every field from scratch. Only a missing
    /// class triggers another attempt; any other failure ends the call.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<GeneratedCharacter, ForgeError> {
        let lore = self.store.get()?;

        for attempt in 1..=self.max_attempts {
            match assemble(lore, overrides, rng)? {
                Some(character) => {
                    tracing::debug!(attempt, id = %character.id, "character assembled");
                    return Ok(character);
                }
                None => tracing::debug!(attempt, "no class could be selected, retrying"),
            }
        }

        Err(ForgeError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Generate one character, mapping failure to its public error record.
    pub fn forge<R: Rng + ?Sized>(&self, overrides: &Overrides, rng: &mut R) -> ForgeResponse {
        self.generate(overrides, rng).into()
    }

    /// [`CharacterForge::forge`] with a freshly seeded generator.
    pub fn forge_random(&self, overrides: &Overrides) -> ForgeResponse {
        let mut rng = StdRng::from_entropy();
        self.forge(overrides, &mut rng)
    }

    /// One independent generation per requested index, in order.
    pub fn generate_bulk<R: Rng + ?Sized>(
        &self,
        request: &BulkRequest,
        rng: &mut R,
    ) -> Vec<ForgeResponse> {
        (0..request.count())
            .map(|index| {
                let overrides = request.overrides_for(index, rng);
                self.forge(&overrides, rng)
            })
            .collect()
    }
}

impl CharacterForgeBuilder {
    pub fn lore_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.lore_dir = Some(path.into());
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Read tables from `source` instead of a directory.
    pub fn with_source(mut self, source: impl TableSource + 'static) -> Self {
        self.store = Some(LoreStore::new(source));
        self
    }

    /// Provide already-loaded tables (for testing without files).
    pub fn with_lore(mut self, lore: Lore) -> Self {
        self.store = Some(LoreStore::preloaded(lore));
        self
    }

    pub fn build(self) -> Result<CharacterForge, ForgeError> {
        if self.max_attempts == 0 {
            return Err(ForgeError::Config("max_attempts must be at least 1".to_string()));
        }

        let store = match self.store {
            Some(store) => store,
            None => {
                let dir = self.lore_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_LORE_DIR));
                tracing::debug!(dir = %dir.display(), "using lore directory");
                LoreStore::from_dir(dir)
            }
        };

        Ok(CharacterForge {
            store,
            max_attempts: self.max_attempts,
        })
    }
}

/// One generation attempt. `Ok(None)` means no class was available.
fn assemble<R: Rng + ?Sized>(
    lore: &Lore,
    overrides: &Overrides,
    rng: &mut R,
) -> Result<Option<GeneratedCharacter>, ForgeError> {
    let engine = RuleEngine::new(&lore.rules);

    // 1. Race
    let race = resolve(&lore.races, overrides.race.as_deref(), rng)
        .ok_or(ForgeError::EmptyTable(tables::RACES))?;

    // 2. Class, the only retryable step
    let Some(class) = resolve_filtered(
        &lore.classes,
        overrides.class.as_deref(),
        |c| engine.is_class_allowed(race, c),
        rng,
    ) else {
        return Ok(None);
    };

    // 3. Origin
    let origin = resolve_origin(lore, engine, race, overrides, rng)?;

    // 4. Name
    let name = pick_text(overrides.name.as_deref(), &race.names, DEFAULT_NAME, rng);

    // 5. Gender
    let gender = resolve(&lore.genders, overrides.gender.as_deref(), rng)
        .cloned()
        .unwrap_or_else(unknown_gender);

    // 6. Deity
    let follower = resolve_filtered(
        &lore.deities,
        overrides.deity.as_deref(),
        |d| engine.is_deity_preferred(race, d),
        rng,
    )
    .cloned()
    .unwrap_or_else(|| {
        tracing::warn!("deity table is empty, using placeholder");
        Deity {
            deity: UNKNOWN.to_string(),
            follower: UNKNOWN.to_string(),
            domain: String::new(),
        }
    });

    // 7. Body
    let body = derive_body(race.body_ranges(), class.modifier, gender_modifier(&gender), rng);

    // 8. Age
    let age = resolve_age(&lore.ages, overrides, rng)?;

    // 9. Flavor
    let celestial_mark = resolve(&lore.celestial_marks, overrides.celestial_mark.as_deref(), rng)
        .cloned()
        .unwrap_or_else(|| {
            tracing::warn!("celestial mark table is empty, using placeholder");
            CelestialMark {
                name: UNKNOWN.to_string(),
                description: String::new(),
            }
        });
    let fighting_style = pick_text(
        overrides.fighting_style.as_deref(),
        &class.fighting_styles,
        DEFAULT_FIGHTING_STYLE,
        rng,
    );
    let quote = pick_text(overrides.quote.as_deref(), &class.quotes, DEFAULT_QUOTE, rng);
    let title = pick_text(overrides.title.as_deref(), &class.titles, DEFAULT_TITLE, rng);
    let favorite_dish = pick_text(overrides.favorite_dish.as_deref(), &lore.dishes, UNKNOWN, rng);

    // 10. Faction
    let faction = match match_name(&lore.factions, overrides.faction.as_deref()) {
        Some(f) => f.clone(),
        None => {
            if let Some(wanted) = overrides.faction.as_deref() {
                tracing::warn!("faction override '{}' matches nothing, selecting by rules", wanted);
            }
            let eligible = engine.eligible_factions(race, class, &lore.factions);
            pick_non_conflicting(&eligible, rng)
        }
    };
    let relations = if faction.name == Faction::UNAFFILIATED && lore.faction(&faction.name).is_none() {
        FactionRelations::default()
    } else {
        relations_for(&faction.name, &lore.factions)
    };

    // 11. Identity
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

    // 12. Backstory
    let context = backstory_context(
        id,
        &name,
        &title,
        race,
        &class.name,
        &origin,
        &faction,
        &celestial_mark,
        &follower,
        &favorite_dish,
        &fighting_style,
        &age,
        &gender,
    );
    let backstory = BackstoryComposer::new(&lore.backstories).compose(&class.key(), &context, rng);

    Ok(Some(GeneratedCharacter {
        id,
        name,
        title,
        gender: GenderView {
            label: gender.label.clone(),
            pronouns: gender.pronouns.display().to_string(),
        },
        age,
        body,
        race: race.clone(),
        celestial_mark,
        follower,
        origin,
        class: class.clone(),
        faction: FactionView {
            name: faction.name,
            description: faction.description,
            allies: relations.allies,
            rivals: relations.rivals,
            alignment: faction.alignment,
        },
        fighting_style,
        favorite_dish,
        quote,
        backstory,
    }))
}

/// Region and place of origin.
///
/// A place override that some region lists wins outright, preferring the
/// overridden region when both are given.
fn resolve_origin<R: Rng + ?Sized>(
    lore: &Lore,
    engine: RuleEngine<'_>,
    race: &Race,
    overrides: &Overrides,
    rng: &mut R,
) -> Result<Origin, ForgeError> {
    if let Some(wanted) = overrides.place.as_deref() {
        let preferred = match_name(&lore.locations, overrides.region.as_deref());
        let hit = preferred
            .and_then(|loc| loc.find_place(wanted).map(|p| (loc, p)))
            .or_else(|| {
                lore.locations
                    .iter()
                    .find_map(|loc| loc.find_place(wanted).map(|p| (loc, p)))
            });
        match hit {
            Some((location, place)) => return Ok(origin_from(location, place.to_string())),
            None => tracing::warn!("place override '{}' is not a known place, ignoring", wanted),
        }
    }

    let location = resolve_filtered(
        &lore.locations,
        overrides.region.as_deref(),
        |l| engine.is_origin_allowed(race, l),
        rng,
    )
    .ok_or(ForgeError::EmptyTable(tables::LOCATIONS))?;

    let place = match location.major_places.choose(rng) {
        Some(p) => p.clone(),
        None => GENERIC_PLACES
            .choose(rng)
            .copied()
            .unwrap_or(GENERIC_PLACES[0])
            .to_string(),
    };
    Ok(origin_from(location, place))
}

fn origin_from(location: &Location, place: String) -> Origin {
    Origin {
        name: location.name.clone(),
        place,
        description: location.description.clone(),
        region_type: location.region_type.clone(),
        environment: location.environment.clone(),
    }
}

/// Age value and its group.
///
/// A numeric override keeps its value and takes the label of the group
/// containing it. Otherwise a group is chosen (by label override, else with
/// the young band favored) and the value is drawn from its range.
fn resolve_age<R: Rng + ?Sized>(
    ages: &[AgeGroup],
    overrides: &Overrides,
    rng: &mut R,
) -> Result<AgeView, ForgeError> {
    if ages.is_empty() {
        return Err(ForgeError::EmptyTable(tables::AGES));
    }

    if let Some(value) = overrides.age {
        let group = match ages.iter().find(|g| g.contains(value)) {
            Some(g) => g,
            None => {
                tracing::warn!("age {} falls in no age group, labelling at random", value);
                ages.choose(rng).ok_or(ForgeError::EmptyTable(tables::AGES))?
            }
        };
        return Ok(age_view(value, group));
    }

    let group = match match_name(ages, overrides.age_label.as_deref()) {
        Some(g) => g,
        None => {
            if let Some(label) = overrides.age_label.as_deref() {
                tracing::warn!("age label override '{}' matches nothing, selecting at random", label);
            }
            weighted_age_group(ages, rng).ok_or(ForgeError::EmptyTable(tables::AGES))?
        }
    };

    let (low, high) = (group.min.min(group.max), group.min.max(group.max));
    Ok(age_view(rng.gen_range(low..=high), group))
}

fn weighted_age_group<'a, R: Rng + ?Sized>(ages: &'a [AgeGroup], rng: &mut R) -> Option<&'a AgeGroup> {
    let (young, elder): (Vec<&AgeGroup>, Vec<&AgeGroup>) =
        ages.iter().partition(|g| g.band() == AgeBand::Young);

    let pool = if young.is_empty() {
        &elder
    } else if elder.is_empty() || rng.gen_bool(YOUNG_BAND_WEIGHT) {
        &young
    } else {
        &elder
    };
    pool.choose(rng).copied()
}

fn age_view(value: u32, group: &AgeGroup) -> AgeView {
    AgeView {
        value,
        label: group.label.clone(),
        description: group.description.clone(),
    }
}

fn unknown_gender() -> Gender {
    tracing::warn!("gender table is empty, using neutral placeholder");
    Gender {
        label: UNKNOWN.to_string(),
        pronouns: Pronouns::TheyThem,
        modifier: None,
    }
}

/// Override text verbatim, else a draw from `pool`, else `default`.
fn pick_text<R: Rng + ?Sized>(wanted: Option<&str>, pool: &[String], default: &str, rng: &mut R) -> String {
    match wanted {
        Some(text) => text.to_string(),
        None => pool
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| default.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn backstory_context(
    id: Uuid,
    name: &str,
    title: &str,
    race: &Race,
    class: &str,
    origin: &Origin,
    faction: &Faction,
    celestial_mark: &CelestialMark,
    follower: &Deity,
    favorite_dish: &str,
    fighting_style: &str,
    age: &AgeView,
    gender: &Gender,
) -> BackstoryContext {
    BackstoryContext::new()
        .text("id", id.to_string())
        .text("name", name)
        .text("title", title)
        .text("race", race.name.as_str())
        .text("class", class)
        .text("region", origin.name.as_str())
        .text("place", origin.place.as_str())
        .text("faction", faction.name.as_str())
        .text("celestial_mark", celestial_mark.name.as_str())
        .text("deity", follower.deity.as_str())
        .text("follower", follower.follower.as_str())
        .text("favorite_dish", favorite_dish)
        .text("fighting_style", fighting_style)
        .int("age", i64::from(age.value))
        .text("age_label", age.label.as_str())
        .text("gender", gender.label.as_str())
        .text("pronouns", gender.pronouns.display())
        .text("subject", gender.pronouns.subject())
        .text("object", gender.pronouns.object())
        .text("possessive", gender.pronouns.possessive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backstory::CONTEXT_KEYS;
    use crate::core::lore::EmbeddedSource;
    use crate::schema::entity::{BodyModifier, BodyRange, Class};
    use crate::schema::rules::RuleSet;
    use rustc_hash::FxHashMap;

    fn race(name: &str, names: &[&str]) -> Race {
        Race {
            name: name.to_string(),
            description: format!("The {} people.", name),
            height: Some(BodyRange { min: 165, max: 190 }),
            weight: Some(BodyRange { min: 60, max: 95 }),
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn class(name: &str) -> Class {
        Class {
            name: name.to_string(),
            description: String::new(),
            fighting_styles: vec![format!("{} style", name)],
            quotes: vec![format!("For the {}!", name)],
            titles: vec![format!("the {}", name)],
            modifier: BodyModifier::ZERO,
        }
    }

    fn faction(name: &str, rivals: &[&str]) -> Faction {
        Faction {
            name: name.to_string(),
            description: format!("{} members.", name),
            alignment: None,
            allies: Vec::new(),
            rivals: rivals.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn age(label: &str, min: u32, max: u32) -> AgeGroup {
        AgeGroup {
            label: label.to_string(),
            min,
            max,
            description: format!("{} years", label),
        }
    }

    fn sample_lore() -> Lore {
        let mut rules = RuleSet::default();
        rules
            .restricted_race_classes
            .insert("Khajiit".to_string(), vec!["Warrior".to_string()]);
        rules
            .class_factions
            .insert("Thief".to_string(), vec!["Thieves Guild".to_string()]);

        let mut backstories = FxHashMap::default();
        backstories.insert("warrior".to_string(), vec!["{name} of {place} fights for {faction}.".to_string()]);
        backstories.insert("thief".to_string(), vec!["{name} slipped out of {place}.".to_string()]);

        Lore {
            races: vec![race("Nord", &["Ulfric"]), race("Khajiit", &["Ri'saad"])],
            classes: vec![class("Warrior"), class("Thief")],
            locations: vec![Location {
                name: "Skyrim".to_string(),
                description: "Cold.".to_string(),
                region_type: Some("Province".to_string()),
                environment: vec!["Tundra".to_string()],
                major_places: vec!["Whiterun".to_string(), "Riften".to_string()],
            }],
            factions: vec![
                faction("Companions", &[]),
                faction("Thieves Guild", &["Dark Brotherhood"]),
                faction("Dark Brotherhood", &[]),
            ],
            rules,
            deities: vec![Deity {
                deity: "Talos".to_string(),
                follower: "Talos Worshipper".to_string(),
                domain: "War".to_string(),
            }],
            genders: vec![Gender {
                label: "Female".to_string(),
                pronouns: Pronouns::SheHer,
                modifier: Some(BodyModifier { height: -5, weight: -10 }),
            }],
            ages: vec![age("Young Adult", 18, 35), age("Elder", 60, 120)],
            celestial_marks: vec![CelestialMark {
                name: "The Thief".to_string(),
                description: String::new(),
            }],
            dishes: vec!["Sweetroll".to_string()],
            backstories,
        }
    }

    fn forge(lore: Lore) -> CharacterForge {
        CharacterForge::builder().with_lore(lore).build().unwrap()
    }

    #[test]
    fn generates_complete_character() {
        let forge = forge(sample_lore());
        let mut rng = StdRng::seed_from_u64(42);
        let c = forge.generate(&Overrides::new(), &mut rng).unwrap();
        assert!(!c.backstory.is_empty());
        assert_eq!(c.origin.name, "Skyrim");
        assert!(["Whiterun", "Riften"].contains(&c.origin.place.as_str()));
        assert_eq!(c.favorite_dish, "Sweetroll");
        assert_eq!(c.gender.pronouns, "she/her");
    }

    #[test]
    fn race_restriction_steers_class() {
        let forge = forge(sample_lore());
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let overrides = Overrides::new().with("race", "khajiit");
            let c = forge.generate(&overrides, &mut rng).unwrap();
            assert_eq!(c.class.name, "Thief");
            assert_eq!(c.faction.name, "Thieves Guild");
        }
    }

    #[test]
    fn free_text_overrides_verbatim() {
        let forge = forge(sample_lore());
        let mut rng = StdRng::seed_from_u64(1);
        let overrides = Overrides::new()
            .with("name", "Lydia")
            .with("title", "Housecarl")
            .with("quote", "I am sworn to carry your burdens.");
        let c = forge.generate(&overrides, &mut rng).unwrap();
        assert_eq!(c.name, "Lydia");
        assert_eq!(c.title, "Housecarl");
        assert_eq!(c.quote, "I am sworn to carry your burdens.");
    }

    #[test]
    fn age_override_selects_containing_group() {
        let forge = forge(sample_lore());
        let mut rng = StdRng::seed_from_u64(3);
        let c = forge.generate(&Overrides::new().with("age", 35i64), &mut rng).unwrap();
        assert_eq!(c.age.value, 35);
        assert_eq!(c.age.label, "Young Adult");
    }

    #[test]
    fn age_label_override_draws_within_group() {
        let forge = forge(sample_lore());
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let c = forge
                .generate(&Overrides::new().with("age_label", "elder"), &mut rng)
                .unwrap();
            assert_eq!(c.age.label, "Elder");
            assert!((60..=120).contains(&c.age.value));
        }
    }

    #[test]
    fn place_override_picks_its_region() {
        let forge = forge(sample_lore());
        let mut rng = StdRng::seed_from_u64(8);
        let c = forge.generate(&Overrides::new().with("place", "riften"), &mut rng).unwrap();
        assert_eq!(c.origin.name, "Skyrim");
        assert_eq!(c.origin.place, "Riften");
    }

    #[test]
    fn region_without_places_uses_generic_place() {
        let mut lore = sample_lore();
        lore.locations[0].major_places.clear();
        let forge = forge(lore);
        let mut rng = StdRng::seed_from_u64(2);
        let c = forge.generate(&Overrides::new(), &mut rng).unwrap();
        assert!(GENERIC_PLACES.contains(&c.origin.place.as_str()));
    }

    #[test]
    fn same_seed_same_character() {
        let forge = forge(sample_lore());
        let a = forge.generate(&Overrides::new(), &mut StdRng::seed_from_u64(77)).unwrap();
        let b = forge.generate(&Overrides::new(), &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.backstory, b.backstory);
    }

    #[test]
    fn no_classes_exhausts_attempts() {
        let mut lore = sample_lore();
        lore.classes.clear();
        let forge = forge(lore);
        let mut rng = StdRng::seed_from_u64(0);
        let err = forge.generate(&Overrides::new(), &mut rng).unwrap_err();
        assert!(matches!(err, ForgeError::Exhausted { attempts: MAX_ATTEMPTS }));
        assert_eq!(err.public_message(), EXHAUSTED_MESSAGE);
    }

    #[test]
    fn empty_races_is_fatal() {
        let mut lore = sample_lore();
        lore.races.clear();
        let response = forge(lore).forge(&Overrides::new(), &mut StdRng::seed_from_u64(0));
        assert_eq!(response.error(), Some(FATAL_MESSAGE));
    }

    #[test]
    fn empty_optional_tables_use_placeholders() {
        let mut lore = sample_lore();
        lore.genders.clear();
        lore.deities.clear();
        lore.celestial_marks.clear();
        lore.dishes.clear();
        let c = forge(lore)
            .generate(&Overrides::new(), &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(c.gender.label, "Unknown");
        assert_eq!(c.gender.pronouns, "they/them");
        assert_eq!(c.follower.deity, "Unknown");
        assert_eq!(c.celestial_mark.name, "Unknown");
        assert_eq!(c.favorite_dish, "Unknown");
    }

    #[test]
    fn missing_lore_is_fatal() {
        let forge = CharacterForge::builder()
            .with_source(EmbeddedSource::new())
            .build()
            .unwrap();
        let response = forge.forge(&Overrides::new(), &mut StdRng::seed_from_u64(0));
        assert_eq!(response.error(), Some(FATAL_MESSAGE));
        assert_eq!(response.to_json().unwrap(), format!(r#"{{"error":"{}"}}"#, FATAL_MESSAGE));
    }

    #[test]
    fn context_fills_every_known_key() {
        let lore = sample_lore();
        let c = forge(lore.clone())
            .generate(&Overrides::new(), &mut StdRng::seed_from_u64(9))
            .unwrap();
        let gender = lore.genders[0].clone();
        let faction = Faction::unaffiliated();
        let context = backstory_context(
            c.id,
            &c.name,
            &c.title,
            &c.race,
            &c.class.name,
            &c.origin,
            &faction,
            &c.celestial_mark,
            &c.follower,
            &c.favorite_dish,
            &c.fighting_style,
            &c.age,
            &gender,
        );
        let mut keys: Vec<&str> = context.keys().collect();
        keys.sort_unstable();
        let mut expected = CONTEXT_KEYS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = CharacterForge::builder().max_attempts(0).build().unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
    }

    #[test]
    fn bulk_generates_per_index() {
        let forge = forge(sample_lore());
        let request = BulkRequest::parse([("count", "3"), ("race", "nord,khajiit")]);
        let mut rng = StdRng::seed_from_u64(12);
        let responses = forge.generate_bulk(&request, &mut rng);
        assert_eq!(responses.len(), 3);
        let races: Vec<&str> = responses
            .iter()
            .map(|r| r.character().unwrap().race.name.as_str())
            .collect();
        assert_eq!(races[0], "Nord");
        assert_eq!(races[1], "Khajiit");
        assert!(races[2] == "Nord" || races[2] == "Khajiit");
    }
}
