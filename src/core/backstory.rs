/// Backstory composition: template parsing, article cleanup, and rendering.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("template references unknown field '{0}'")]
    MissingField(String),
}

/// Articles a template may place directly before a placeholder.
const ARTICLES: [&str; 3] = ["the", "a", "an"];

/// Every placeholder the forge fills for a generated character.
pub const CONTEXT_KEYS: [&str; 20] = [
    "id",
    "name",
    "title",
    "race",
    "class",
    "region",
    "place",
    "faction",
    "celestial_mark",
    "deity",
    "follower",
    "favorite_dish",
    "fighting_style",
    "age",
    "age_label",
    "gender",
    "pronouns",
    "subject",
    "object",
    "possessive",
];

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Context field interpolation: `{field}`.
    Field(String),
}

/// A parsed template: a sequence of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{field}` → `Field`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                // Escaped brace
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::Parse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }
                if end == len {
                    return Err(TemplateError::Parse("unclosed brace".to_string()));
                }

                let field: String = chars[start..end].iter().collect();
                let field = field.trim();
                if field.is_empty() {
                    return Err(TemplateError::Parse("empty braces".to_string()));
                }
                segments.push(TemplateSegment::Field(field.to_string()));
                i = end + 1;
            } else if chars[i] == '}' {
                // Escaped closing brace
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::Parse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    /// Names of every field the template references, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Field(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Substitute every field from `context`.
    pub fn render(&self, context: &BackstoryContext) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Field(name) => {
                    let value = context
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingField(name.clone()))?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

/// A value a template placeholder can be filled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Int(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Named values available to backstory templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackstoryContext {
    fields: FxHashMap<String, Value>,
}

impl BackstoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), Value::Text(value.into()));
        self
    }

    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::Int(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn text_value(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }
}

/// Strip leading articles from values whose placeholder the template
/// already prefixes with an article, so "the {place}" never renders as
/// "the the ancient ruin".
pub fn sanitize_article_collisions(template: &str, context: &BackstoryContext) -> BackstoryContext {
    let lowered = template.to_ascii_lowercase();
    let mut sanitized = context.clone();

    for (key, value) in &context.fields {
        let Value::Text(text) = value else {
            continue;
        };
        if !template_articles_field(&lowered, key) {
            continue;
        }
        if let Some(stripped) = strip_leading_article(text) {
            sanitized
                .fields
                .insert(key.clone(), Value::Text(stripped.to_string()));
        }
    }

    sanitized
}

/// Whether `lowered` contains "<article> {key}" with the article starting
/// a word.
fn template_articles_field(lowered: &str, key: &str) -> bool {
    let placeholder = format!("{{{}}}", key.to_ascii_lowercase());
    ARTICLES.iter().any(|article| {
        let needle = format!("{} {}", article, placeholder);
        lowered.match_indices(&needle).any(|(idx, _)| {
            lowered[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

/// `text` without its first leading article and the space after it.
fn strip_leading_article(text: &str) -> Option<&str> {
    ARTICLES.iter().find_map(|article| {
        let n = article.len();
        let head = text.get(..n)?;
        let rest = text.get(n..)?;
        if head.eq_ignore_ascii_case(article) && rest.starts_with(' ') {
            Some(&rest[1..])
        } else {
            None
        }
    })
}

/// Renders class-specific backstory templates.
#[derive(Debug, Clone, Copy)]
pub struct BackstoryComposer<'a> {
    templates: &'a FxHashMap<String, Vec<String>>,
}

impl<'a> BackstoryComposer<'a> {
    /// `templates` must be keyed by lowercase class name.
    pub fn new(templates: &'a FxHashMap<String, Vec<String>>) -> Self {
        Self { templates }
    }

    /// Compose a backstory for the class keyed `class_key`.
    ///
    /// Never fails: a class without templates gets a notice naming it, and a
    /// template that cannot be rendered gets the fallback narrative.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        class_key: &str,
        context: &BackstoryContext,
        rng: &mut R,
    ) -> String {
        let key = class_key.to_lowercase();
        let Some(raw) = self.templates.get(&key).and_then(|t| t.choose(rng)) else {
            let class_name = context.text_value("class").unwrap_or(class_key);
            tracing::warn!("no backstory templates for class '{}'", class_name);
            return format!("No backstories available for class: {}", class_name);
        };

        match Self::render(raw, context) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("backstory template error for class '{}': {}", key, e);
                fallback_backstory(context)
            }
        }
    }

    fn render(raw: &str, context: &BackstoryContext) -> Result<String, TemplateError> {
        let sanitized = sanitize_article_collisions(raw, context);
        Template::parse(raw)?.render(&sanitized)
    }
}

/// The narrative used when a template cannot be rendered.
pub fn fallback_backstory(context: &BackstoryContext) -> String {
    let name = context.text_value("name").unwrap_or("This soul");
    format!(
        "A Dragon Break fractured the tale... {} has a mysterious past, veiled in lost time.",
        name
    )
}
