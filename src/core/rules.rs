/// Rule engine: race/class compatibility predicates.
///
/// Restrictions are exceptions: a pairing is rejected only when a table
/// explicitly lists it. A race or class without an entry is unconstrained.

use crate::schema::entity::{Class, Deity, Location, Race};
use crate::schema::faction::Faction;
use crate::schema::rules::RuleSet;

#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> RuleEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn is_class_allowed(&self, race: &Race, class: &Class) -> bool {
        !Self::restricts(
            RuleSet::entry(&self.rules.restricted_race_classes, &race.name),
            &class.name,
        )
    }

    pub fn is_origin_allowed(&self, race: &Race, location: &Location) -> bool {
        !Self::restricts(
            RuleSet::entry(&self.rules.restricted_race_origins, &race.name),
            &location.name,
        )
    }

    /// True when the race has no deity preferences, or lists this deity.
    pub fn is_deity_preferred(&self, race: &Race, deity: &Deity) -> bool {
        match RuleSet::entry(&self.rules.preferred_race_deities, &race.name) {
            Some(preferred) => RuleSet::lists(preferred, &deity.deity),
            None => true,
        }
    }

    /// True when the class has no faction list, or lists this faction.
    pub fn is_faction_permitted_for_class(&self, class: &Class, faction: &Faction) -> bool {
        match RuleSet::entry(&self.rules.class_factions, &class.name) {
            Some(permitted) => RuleSet::lists(permitted, &faction.name),
            None => true,
        }
    }

    pub fn is_faction_forbidden_for_race(&self, race: &Race, faction: &Faction) -> bool {
        Self::restricts(
            RuleSet::entry(&self.rules.restricted_race_factions, &race.name),
            &faction.name,
        )
    }

    pub fn is_faction_allowed(&self, race: &Race, class: &Class, faction: &Faction) -> bool {
        self.is_faction_permitted_for_class(class, faction)
            && !self.is_faction_forbidden_for_race(race, faction)
    }

    /// Factions eligible for this race and class.
    ///
    /// When the race restriction leaves nothing, the pool widens to every
    /// faction the class permits.
    pub fn eligible_factions<'f>(
        &self,
        race: &Race,
        class: &Class,
        factions: &'f [Faction],
    ) -> Vec<&'f Faction> {
        let strict: Vec<&Faction> = factions
            .iter()
            .filter(|f| self.is_faction_allowed(race, class, f))
            .collect();
        if !strict.is_empty() {
            return strict;
        }

        tracing::debug!(
            race = %race.name,
            class = %class.name,
            "race restrictions exclude every class faction, widening pool"
        );
        factions
            .iter()
            .filter(|f| self.is_faction_permitted_for_class(class, f))
            .collect()
    }

    fn restricts(entry: Option<&[String]>, name: &str) -> bool {
        entry.is_some_and(|listed| RuleSet::lists(listed, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleSet {
        ron::from_str(
            r#"(
                restricted_race_classes: { "Orc": ["Mage"] },
                restricted_race_origins: { "Orc": ["Summerset Isles"] },
                restricted_race_factions: { "Orc": ["Psijic Order"], "Khajiit": ["Mages Guild", "Psijic Order"] },
                class_factions: { "Mage": ["Mages Guild", "Psijic Order"] },
                preferred_race_deities: { "Nord": ["Talos", "Kynareth"] },
            )"#,
        )
        .unwrap()
    }

    fn race(name: &str) -> Race {
        ron::from_str(&format!(r#"(name: "{}")"#, name)).unwrap()
    }

    fn class(name: &str) -> Class {
        ron::from_str(&format!(r#"(name: "{}")"#, name)).unwrap()
    }

    fn faction(name: &str) -> Faction {
        ron::from_str(&format!(r#"(name: "{}")"#, name)).unwrap()
    }

    fn location(name: &str) -> Location {
        ron::from_str(&format!(r#"(name: "{}")"#, name)).unwrap()
    }

    fn deity(name: &str) -> Deity {
        ron::from_str(&format!(r#"(deity: "{}")"#, name)).unwrap()
    }

    #[test]
    fn class_restriction_is_exception_based() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        assert!(!engine.is_class_allowed(&race("Orc"), &class("Mage")));
        assert!(engine.is_class_allowed(&race("Orc"), &class("Warrior")));
        // No entry at all: unconstrained.
        assert!(engine.is_class_allowed(&race("Breton"), &class("Mage")));
    }

    #[test]
    fn origin_restriction() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        assert!(!engine.is_origin_allowed(&race("orc"), &location("Summerset Isles")));
        assert!(engine.is_origin_allowed(&race("Orc"), &location("Orsinium")));
        assert!(engine.is_origin_allowed(&race("Altmer"), &location("Summerset Isles")));
    }

    #[test]
    fn deity_preference() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        assert!(engine.is_deity_preferred(&race("Nord"), &deity("talos")));
        assert!(!engine.is_deity_preferred(&race("Nord"), &deity("Azura")));
        assert!(engine.is_deity_preferred(&race("Dunmer"), &deity("Azura")));
    }

    #[test]
    fn faction_allowed_intersects_class_and_race() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        let mage = class("Mage");
        assert!(engine.is_faction_allowed(&race("Orc"), &mage, &faction("Mages Guild")));
        assert!(!engine.is_faction_allowed(&race("Orc"), &mage, &faction("Psijic Order")));
        assert!(!engine.is_faction_allowed(&race("Breton"), &mage, &faction("Thieves Guild")));
        // Class without a faction list permits everything.
        assert!(engine.is_faction_allowed(&race("Breton"), &class("Thief"), &faction("Thieves Guild")));
    }

    #[test]
    fn eligible_factions_strict() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        let factions = vec![faction("Mages Guild"), faction("Psijic Order"), faction("Thieves Guild")];
        let pool = engine.eligible_factions(&race("Orc"), &class("Mage"), &factions);
        let names: Vec<&str> = pool.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Mages Guild"]);
    }

    #[test]
    fn eligible_factions_widen_when_race_excludes_all() {
        let rules = rules();
        let engine = RuleEngine::new(&rules);
        let factions = vec![faction("Mages Guild"), faction("Psijic Order"), faction("Thieves Guild")];
        let pool = engine.eligible_factions(&race("Khajiit"), &class("Mage"), &factions);
        let names: Vec<&str> = pool.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Mages Guild", "Psijic Order"]);
    }
}
