/// Caller-supplied field overrides.

use serde::{Deserialize, Serialize};

/// A raw override value as it arrives from a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Number(i64),
    Text(String),
}

impl From<&str> for OverrideValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OverrideValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for OverrideValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Field overrides for one generation call. Every field is optional.
///
/// Named fields (race, class, faction, gender, region, place, deity,
/// celestial_mark, age_label) are matched case-insensitively against the
/// lore tables. Free-text fields (name, fighting_style, favorite_dish,
/// quote, title) are used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    pub race: Option<String>,
    pub class: Option<String>,
    pub faction: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub place: Option<String>,
    pub name: Option<String>,
    pub deity: Option<String>,
    pub age: Option<u32>,
    pub age_label: Option<String>,
    pub celestial_mark: Option<String>,
    pub fighting_style: Option<String>,
    pub favorite_dish: Option<String>,
    pub quote: Option<String>,
    pub title: Option<String>,
}

impl Overrides {
    /// Keys recognized by [`Overrides::set`].
    pub const KEYS: [&'static str; 15] = [
        "race",
        "class",
        "faction",
        "gender",
        "region",
        "place",
        "name",
        "deity",
        "age",
        "age_label",
        "celestial_mark",
        "fighting_style",
        "favorite_dish",
        "quote",
        "title",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs. Keys are case-insensitive; unknown keys
    /// and blank values are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OverrideValue>,
    {
        let mut overrides = Self::default();
        for (key, value) in pairs {
            overrides.set(key.as_ref(), value.into());
        }
        overrides
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: impl Into<OverrideValue>) -> Self {
        self.set(key, value.into());
        self
    }

    /// Apply one override. Returns false if the key is unknown or the value
    /// was unusable.
    pub fn set(&mut self, key: &str, value: OverrideValue) -> bool {
        let key = key.trim().to_lowercase();
        if key == "age" {
            return self.set_age(value);
        }

        let text = match value {
            OverrideValue::Text(s) => s.trim().to_string(),
            OverrideValue::Number(n) => n.to_string(),
        };
        if text.is_empty() {
            return false;
        }

        let slot = match key.as_str() {
            "race" => &mut self.race,
            "class" => &mut self.class,
            "faction" => &mut self.faction,
            "gender" => &mut self.gender,
            "region" => &mut self.region,
            "place" => &mut self.place,
            "name" => &mut self.name,
            "deity" => &mut self.deity,
            "age_label" => &mut self.age_label,
            "celestial_mark" => &mut self.celestial_mark,
            "fighting_style" => &mut self.fighting_style,
            "favorite_dish" => &mut self.favorite_dish,
            "quote" => &mut self.quote,
            "title" => &mut self.title,
            _ => {
                tracing::debug!("ignoring unknown override '{}'", key);
                return false;
            }
        };
        *slot = Some(text);
        true
    }

    fn set_age(&mut self, value: OverrideValue) -> bool {
        let parsed = match &value {
            OverrideValue::Number(n) => u32::try_from(*n).ok(),
            OverrideValue::Text(s) if s.trim().is_empty() => return false,
            OverrideValue::Text(s) => s.trim().parse::<u32>().ok(),
        };
        match parsed {
            Some(age) => {
                self.age = Some(age);
                true
            }
            None => {
                tracing::warn!("ignoring unusable age override {:?}", value);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let o = Overrides::from_pairs([("RACE", "elf"), ("Class", "mage")]);
        assert_eq!(o.race.as_deref(), Some("elf"));
        assert_eq!(o.class.as_deref(), Some("mage"));
    }

    #[test]
    fn blank_and_unknown_ignored() {
        let mut o = Overrides::new();
        assert!(!o.set("race", "  ".into()));
        assert!(!o.set("horse", "Shadowmere".into()));
        assert_eq!(o, Overrides::default());
    }

    #[test]
    fn age_from_number_or_text() {
        assert_eq!(Overrides::new().with("age", 35i64).age, Some(35));
        assert_eq!(Overrides::new().with("age", " 42 ").age, Some(42));
        assert_eq!(Overrides::new().with("age", -3i64).age, None);
        assert_eq!(Overrides::new().with("age", "ancient").age, None);
    }

    #[test]
    fn json_values_deserialize() {
        let raw: Vec<(String, OverrideValue)> =
            serde_json::from_str(r#"[["age", 35], ["race", "Nord"]]"#).unwrap();
        let o = Overrides::from_pairs(raw);
        assert_eq!(o.age, Some(35));
        assert_eq!(o.race.as_deref(), Some("Nord"));
    }

    #[test]
    fn every_listed_key_is_settable() {
        for key in Overrides::KEYS {
            let value = if key == "age" { OverrideValue::Number(30) } else { "x".into() };
            assert!(Overrides::new().set(key, value), "key {} rejected", key);
        }
    }
}
