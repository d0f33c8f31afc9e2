/// Lore Linter: validates cross-references between lore tables.
///
/// Usage: lore_linter [LORE_DIR]

use character_forge::core::backstory::{Template, CONTEXT_KEYS};
use character_forge::core::lore::Lore;
use character_forge::schema::entity::Named;
use character_forge::schema::rules::RuleSet;
use clap::Parser;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "lore_linter", about = "Validate a lore directory")]
struct Args {
    /// Directory holding the .ron lore tables.
    #[arg(default_value = "lore_data")]
    lore_dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    let lore = match Lore::load_from_dir(&args.lore_dir) {
        Ok(lore) => lore,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded {} races, {} classes, {} locations, {} factions from {}",
        lore.races.len(),
        lore.classes.len(),
        lore.locations.len(),
        lore.factions.len(),
        args.lore_dir.display()
    );

    let (errors, warnings) = lint_lore(&lore);

    println!("\n=== Lore Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn names<T: Named>(items: &[T]) -> FxHashSet<String> {
    items.iter().map(|i| i.name().to_lowercase()).collect()
}

fn lint_lore(lore: &Lore) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let races = names(&lore.races);
    let classes = names(&lore.classes);
    let locations = names(&lore.locations);
    let factions = names(&lore.factions);
    let deities = names(&lore.deities);

    // 1. Core tables must not be empty
    for (table, len) in [
        ("races", lore.races.len()),
        ("classes", lore.classes.len()),
        ("locations", lore.locations.len()),
        ("ages", lore.ages.len()),
    ] {
        if len == 0 {
            errors.push(format!("table '{}' is empty", table));
        }
    }
    for (table, len) in [
        ("genders", lore.genders.len()),
        ("deities", lore.deities.len()),
        ("celestial_marks", lore.celestial_marks.len()),
        ("dishes", lore.dishes.len()),
        ("factions", lore.factions.len()),
    ] {
        if len == 0 {
            warnings.push(format!("table '{}' is empty, placeholders will be used", table));
        }
    }

    // 2. Rule tables reference known names
    let rule_tables: [(&str, &FxHashMap<String, Vec<String>>, &FxHashSet<String>, &FxHashSet<String>); 5] = [
        ("restricted_race_classes", &lore.rules.restricted_race_classes, &races, &classes),
        ("restricted_race_origins", &lore.rules.restricted_race_origins, &races, &locations),
        ("restricted_race_factions", &lore.rules.restricted_race_factions, &races, &factions),
        ("class_factions", &lore.rules.class_factions, &classes, &factions),
        ("preferred_race_deities", &lore.rules.preferred_race_deities, &races, &deities),
    ];
    for (table, entries, keys, values) in rule_tables {
        for (key, listed) in entries {
            if !keys.contains(&key.to_lowercase()) {
                errors.push(format!("{}: unknown key '{}'", table, key));
            }
            for value in listed {
                if !values.contains(&value.to_lowercase()) {
                    errors.push(format!("{}['{}']: unknown entry '{}'", table, key, value));
                }
            }
        }
    }

    // 3. Races whose rules exclude every class can never be generated as-is
    for race in &lore.races {
        if let Some(denied) = RuleSet::entry(&lore.rules.restricted_race_classes, &race.name) {
            if lore.classes.iter().all(|c| RuleSet::lists(denied, &c.name)) {
                warnings.push(format!("race '{}' is restricted from every class", race.name));
            }
        }
        if race.names.is_empty() {
            warnings.push(format!("race '{}' has no name pool", race.name));
        }
    }

    // 4. Faction relationships reference known factions
    for faction in &lore.factions {
        for (kind, list) in [("ally", &faction.allies), ("rival", &faction.rivals)] {
            for other in list {
                if !factions.contains(&other.to_lowercase()) {
                    warnings.push(format!(
                        "faction '{}' lists unknown {} '{}'",
                        faction.name, kind, other
                    ));
                }
            }
        }
    }

    // 5. Age groups are well-formed
    for group in &lore.ages {
        if group.min > group.max {
            errors.push(format!(
                "age group '{}' has min {} above max {}",
                group.label, group.min, group.max
            ));
        }
    }

    // 6. Every class has backstories, and every template parses with known keys
    for class in &lore.classes {
        if !lore.backstories.contains_key(&class.key()) {
            errors.push(format!("class '{}' has no backstory templates", class.name));
        }
    }
    for (class, templates) in &lore.backstories {
        if !classes.contains(class) {
            warnings.push(format!("backstories for unknown class '{}'", class));
        }
        for raw in templates {
            match Template::parse(raw) {
                Ok(template) => {
                    for field in template.fields() {
                        if !CONTEXT_KEYS.contains(&field) {
                            errors.push(format!(
                                "backstory for '{}' uses unknown placeholder '{{{}}}'",
                                class, field
                            ));
                        }
                    }
                }
                Err(e) => errors.push(format!("backstory for '{}': {}", class, e)),
            }
        }
    }

    (errors, warnings)
}
