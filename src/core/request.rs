/// Request layer: parameter normalization and bulk fan-out.
///
/// A bulk request carries a `count` and comma-separated value lists per
/// field. Character `i` takes slot `i` of each list, or a random entry from
/// that list when it is shorter than the count.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::overrides::Overrides;

/// Upper bound on characters per bulk request.
pub const MAX_BULK_COUNT: usize = 50;

/// Fields whose values are title-cased before matching.
const TITLE_CASED_KEYS: [&str; 4] = ["race", "class", "faction", "gender"];

/// Uppercase the first letter of every word, lowercase the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Lowercase keys, trim values, and title-case the named-entity fields.
pub fn normalize_params<I, K, V>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .into_iter()
        .map(|(k, v)| {
            let key = k.as_ref().trim().to_lowercase();
            let value = v.as_ref().trim();
            let value = if TITLE_CASED_KEYS.contains(&key.as_str()) {
                title_case(value)
            } else {
                value.to_string()
            };
            (key, value)
        })
        .collect()
}

/// A parsed bulk generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequest {
    count: usize,
    fields: Vec<(String, Vec<String>)>,
}

impl Default for BulkRequest {
    fn default() -> Self {
        Self {
            count: 1,
            fields: Vec::new(),
        }
    }
}

impl BulkRequest {
    /// Parse raw query parameters. `count` defaults to 1 and is clamped to
    /// `1..=MAX_BULK_COUNT`; every other key becomes a comma-separated list.
    pub fn parse<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in normalize_params(params) {
            if key == "count" {
                request.count = match value.parse::<usize>() {
                    Ok(n) => n.clamp(1, MAX_BULK_COUNT),
                    Err(_) => {
                        tracing::warn!("invalid count '{}', generating one character", value);
                        1
                    }
                };
                continue;
            }

            let values: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                request.fields.push((key, values));
            }
        }
        request
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The value lists supplied for `key`, if any.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Overrides for the character at `index`.
    pub fn overrides_for<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Overrides {
        let mut overrides = Overrides::new();
        for (key, values) in &self.fields {
            let value = match values.get(index) {
                Some(v) => v,
                None => match values.choose(rng) {
                    Some(v) => v,
                    None => continue,
                },
            };
            overrides.set(key, value.as_str().into());
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("dark brotherhood"), "Dark Brotherhood");
        assert_eq!(title_case("HIGH ELF"), "High Elf");
        assert_eq!(title_case("human,elf"), "Human,Elf");
    }

    #[test]
    fn normalize_only_entity_fields() {
        let params = normalize_params([("Race", "wood elf"), ("NAME", "jarl balgruuf")]);
        assert_eq!(params[0], ("race".to_string(), "Wood Elf".to_string()));
        assert_eq!(params[1], ("name".to_string(), "jarl balgruuf".to_string()));
    }

    #[test]
    fn parse_count_and_lists() {
        let req = BulkRequest::parse([("count", "3"), ("race", "human, elf")]);
        assert_eq!(req.count(), 3);
        assert_eq!(
            req.values("race"),
            Some(&["Human".to_string(), "Elf".to_string()][..])
        );
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(BulkRequest::parse([("count", "0")]).count(), 1);
        assert_eq!(BulkRequest::parse([("count", "9999")]).count(), MAX_BULK_COUNT);
        assert_eq!(BulkRequest::parse([("count", "many")]).count(), 1);
        assert_eq!(BulkRequest::parse(Vec::<(String, String)>::new()).count(), 1);
    }

    #[test]
    fn slots_then_random_fill() {
        let req = BulkRequest::parse([("count", "3"), ("race", "human,elf")]);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(req.overrides_for(0, &mut rng).race.as_deref(), Some("Human"));
        assert_eq!(req.overrides_for(1, &mut rng).race.as_deref(), Some("Elf"));
        for _ in 0..20 {
            let third = req.overrides_for(2, &mut rng).race.unwrap();
            assert!(third == "Human" || third == "Elf");
        }
    }

    #[test]
    fn numeric_fields_slice_too() {
        let req = BulkRequest::parse([("count", "2"), ("age", "20,70")]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(req.overrides_for(0, &mut rng).age, Some(20));
        assert_eq!(req.overrides_for(1, &mut rng).age, Some(70));
    }
}
