use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Race-scoped compatibility tables.
///
/// Every table is keyed by race (or class) name. A missing key means the
/// race is unconstrained for that category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Classes a race may not take.
    #[serde(default)]
    pub restricted_race_classes: FxHashMap<String, Vec<String>>,
    /// Regions a race does not hail from.
    #[serde(default)]
    pub restricted_race_origins: FxHashMap<String, Vec<String>>,
    /// Factions a race may not join.
    #[serde(default)]
    pub restricted_race_factions: FxHashMap<String, Vec<String>>,
    /// Factions open to each class.
    #[serde(default)]
    pub class_factions: FxHashMap<String, Vec<String>>,
    /// Deities a race favors.
    #[serde(default)]
    pub preferred_race_deities: FxHashMap<String, Vec<String>>,
}

impl RuleSet {
    /// Case-insensitive lookup of the entry for `key` in `table`.
    pub fn entry<'a>(table: &'a FxHashMap<String, Vec<String>>, key: &str) -> Option<&'a [String]> {
        table
            .get(key)
            .or_else(|| {
                table
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(Vec::as_slice)
    }

    /// Whether `list` names `value`, ignoring case.
    pub fn lists(list: &[String], value: &str) -> bool {
        list.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_rules() {
        let rules: RuleSet = ron::from_str(
            r#"(
                restricted_race_classes: { "Orc": ["Mage"] },
            )"#,
        )
        .unwrap();
        assert_eq!(rules.restricted_race_classes.len(), 1);
        assert!(rules.class_factions.is_empty());
    }

    #[test]
    fn entry_lookup_ignores_case() {
        let mut table = FxHashMap::default();
        table.insert("High Elf".to_string(), vec!["Warrior".to_string()]);
        assert!(RuleSet::entry(&table, "high elf").is_some());
        assert!(RuleSet::entry(&table, "Wood Elf").is_none());
    }

    #[test]
    fn lists_ignores_case() {
        let list = vec!["Mages Guild".to_string()];
        assert!(RuleSet::lists(&list, "mages guild"));
        assert!(!RuleSet::lists(&list, "Fighters Guild"));
    }
}
