/// Shipped lore tests: the tables under lore_data/ load, cross-reference
/// cleanly, and generate valid characters.

use character_forge::core::backstory::{Template, CONTEXT_KEYS};
use character_forge::core::forge::CharacterForge;
use character_forge::core::lore::Lore;
use character_forge::core::metrics::{BMI_MAX, BMI_MIN};
use character_forge::core::overrides::Overrides;
use character_forge::schema::rules::RuleSet;
use rand::rngs::StdRng;
use rand::SeedableRng;

const LORE_DIR: &str = "lore_data";

fn shipped() -> Lore {
    Lore::load_from_dir(LORE_DIR).unwrap()
}

fn known(names: impl IntoIterator<Item = String>, value: &str) -> bool {
    names.into_iter().any(|n| n.eq_ignore_ascii_case(value))
}

#[test]
fn shipped_lore_loads() {
    let lore = shipped();
    assert!(lore.races.len() >= 10);
    assert!(lore.classes.len() >= 10);
    assert!(!lore.locations.is_empty());
    assert!(!lore.factions.is_empty());
    assert!(!lore.ages.is_empty());
    assert!(lore.genders.iter().any(|g| g.label == "Female"));
}

#[test]
fn rule_tables_reference_known_names() {
    let lore = shipped();
    let races = || lore.races.iter().map(|r| r.name.clone());
    let classes = || lore.classes.iter().map(|c| c.name.clone());
    let locations = || lore.locations.iter().map(|l| l.name.clone());
    let factions = || lore.factions.iter().map(|f| f.name.clone());
    let deities = || lore.deities.iter().map(|d| d.deity.clone());

    for (race, denied) in &lore.rules.restricted_race_classes {
        assert!(known(races(), race), "unknown race '{}'", race);
        for class in denied {
            assert!(known(classes(), class), "unknown class '{}'", class);
        }
    }
    for (race, denied) in &lore.rules.restricted_race_origins {
        assert!(known(races(), race), "unknown race '{}'", race);
        for location in denied {
            assert!(known(locations(), location), "unknown location '{}'", location);
        }
    }
    for (race, denied) in &lore.rules.restricted_race_factions {
        assert!(known(races(), race), "unknown race '{}'", race);
        for faction in denied {
            assert!(known(factions(), faction), "unknown faction '{}'", faction);
        }
    }
    for (class, permitted) in &lore.rules.class_factions {
        assert!(known(classes(), class), "unknown class '{}'", class);
        for faction in permitted {
            assert!(known(factions(), faction), "unknown faction '{}'", faction);
        }
    }
    for (race, preferred) in &lore.rules.preferred_race_deities {
        assert!(known(races(), race), "unknown race '{}'", race);
        for deity in preferred {
            assert!(known(deities(), deity), "unknown deity '{}'", deity);
        }
    }
}

#[test]
fn faction_relationships_reference_known_factions() {
    let lore = shipped();
    for faction in &lore.factions {
        for other in faction.allies.iter().chain(&faction.rivals) {
            assert!(
                lore.faction(other).is_some(),
                "faction '{}' references unknown '{}'",
                faction.name,
                other
            );
        }
    }
}

#[test]
fn every_race_keeps_a_class() {
    let lore = shipped();
    for race in &lore.races {
        if let Some(denied) = RuleSet::entry(&lore.rules.restricted_race_classes, &race.name) {
            assert!(
                lore.classes.iter().any(|c| !RuleSet::lists(denied, &c.name)),
                "race '{}' is denied every class",
                race.name
            );
        }
    }
}

#[test]
fn every_class_has_valid_backstories() {
    let lore = shipped();
    for class in &lore.classes {
        let templates = lore
            .backstories
            .get(&class.key())
            .unwrap_or_else(|| panic!("class '{}' has no backstories", class.name));
        assert!(!templates.is_empty());

        for raw in templates {
            let template = Template::parse(raw).unwrap();
            for field in template.fields() {
                assert!(
                    CONTEXT_KEYS.contains(&field),
                    "backstory for '{}' uses unknown placeholder '{}'",
                    class.name,
                    field
                );
            }
        }
    }
}

#[test]
fn shipped_lore_generates_sound_characters() {
    let forge = CharacterForge::builder().lore_dir(LORE_DIR).build().unwrap();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let c = forge.generate(&Overrides::new(), &mut rng).unwrap();

        let bmi = c.body.bmi();
        assert!((BMI_MIN..=BMI_MAX).contains(&bmi), "seed {}: bmi {}", seed, bmi);
        assert!(!c.backstory.starts_with("A Dragon Break"), "seed {}: {}", seed, c.backstory);
        assert!(!c.backstory.contains("the the"), "seed {}: {}", seed, c.backstory);
        assert!(!c.name.is_empty());
    }
}
