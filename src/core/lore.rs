/// Lore store: loading, classification of load failures, and caching.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::schema::age::AgeGroup;
use crate::schema::entity::{CelestialMark, Class, Deity, Location, Race};
use crate::schema::faction::Faction;
use crate::schema::gender::Gender;
use crate::schema::rules::RuleSet;

/// Table file names, relative to the lore directory.
pub mod tables {
    pub const RACES: &str = "races.ron";
    pub const CLASSES: &str = "classes.ron";
    pub const LOCATIONS: &str = "locations.ron";
    pub const FACTIONS: &str = "factions.ron";
    pub const RULES: &str = "rules.ron";
    pub const DEITIES: &str = "deities.ron";
    pub const GENDERS: &str = "genders.ron";
    pub const AGES: &str = "ages.ron";
    pub const CELESTIAL_MARKS: &str = "celestial_marks.ron";
    pub const DISHES: &str = "dishes.ron";
    pub const BACKSTORIES: &str = "backstories.ron";

    pub const ALL: [&str; 11] = [
        RACES,
        CLASSES,
        LOCATIONS,
        FACTIONS,
        RULES,
        DEITIES,
        GENDERS,
        AGES,
        CELESTIAL_MARKS,
        DISHES,
        BACKSTORIES,
    ];
}

#[derive(Debug, Clone, Error)]
pub enum LoreError {
    #[error("missing lore table: {0}")]
    Missing(String),
    #[error("unreadable lore table {table}: {message}")]
    Unreadable { table: String, message: String },
    #[error("malformed lore table {table}: {message}")]
    Malformed { table: String, message: String },
}

/// Somewhere lore tables can be read from, by file name.
pub trait TableSource: Send + Sync {
    fn read(&self, table: &str) -> Result<String, LoreError>;
}

/// Reads tables from `.ron` files in a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl TableSource for DirSource {
    fn read(&self, table: &str) -> Result<String, LoreError> {
        let path = self.dir.join(table);
        if !path.exists() {
            return Err(LoreError::Missing(path.display().to_string()));
        }
        std::fs::read_to_string(&path).map_err(|e| LoreError::Unreadable {
            table: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory tables, e.g. compiled in with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    tables: FxHashMap<String, String>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, contents: impl Into<String>) -> Self {
        self.tables.insert(table.to_string(), contents.into());
        self
    }
}

impl TableSource for EmbeddedSource {
    fn read(&self, table: &str) -> Result<String, LoreError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| LoreError::Missing(table.to_string()))
    }
}

/// Read and deserialize one table.
pub fn load_table<T: DeserializeOwned>(
    source: &dyn TableSource,
    table: &str,
) -> Result<T, LoreError> {
    let contents = source.read(table)?;
    ron::from_str(&contents).map_err(|e| LoreError::Malformed {
        table: table.to_string(),
        message: e.to_string(),
    })
}

/// Every lookup table the generator draws from.
#[derive(Debug, Clone, Default)]
pub struct Lore {
    pub races: Vec<Race>,
    pub classes: Vec<Class>,
    pub locations: Vec<Location>,
    pub factions: Vec<Faction>,
    pub rules: RuleSet,
    pub deities: Vec<Deity>,
    pub genders: Vec<Gender>,
    pub ages: Vec<AgeGroup>,
    pub celestial_marks: Vec<CelestialMark>,
    pub dishes: Vec<String>,
    /// Backstory templates keyed by lowercase class name.
    pub backstories: FxHashMap<String, Vec<String>>,
}

impl Lore {
    /// Load all tables from `source`. The first failing table aborts the load.
    pub fn load(source: &dyn TableSource) -> Result<Lore, LoreError> {
        let raw_backstories: FxHashMap<String, Vec<String>> =
            load_table(source, tables::BACKSTORIES)?;
        let backstories = raw_backstories
            .into_iter()
            .map(|(class, templates)| (class.to_lowercase(), templates))
            .collect();

        Ok(Lore {
            races: load_table(source, tables::RACES)?,
            classes: load_table(source, tables::CLASSES)?,
            locations: load_table(source, tables::LOCATIONS)?,
            factions: load_table(source, tables::FACTIONS)?,
            rules: load_table(source, tables::RULES)?,
            deities: load_table(source, tables::DEITIES)?,
            genders: load_table(source, tables::GENDERS)?,
            ages: load_table(source, tables::AGES)?,
            celestial_marks: load_table(source, tables::CELESTIAL_MARKS)?,
            dishes: load_table(source, tables::DISHES)?,
            backstories,
        })
    }

    /// Load all tables from a directory of `.ron` files.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Lore, LoreError> {
        Self::load(&DirSource::new(dir))
    }

    /// The faction record with the given name.
    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Lazily loaded, process-lifetime cache over a [`TableSource`].
///
/// The first call to [`LoreStore::get`] performs the load; later calls
/// return the cached tables, or the cached failure.
pub struct LoreStore {
    source: Box<dyn TableSource>,
    lore: OnceLock<Result<Lore, LoreError>>,
}

impl LoreStore {
    pub fn new(source: impl TableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            lore: OnceLock::new(),
        }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(DirSource::new(dir))
    }

    /// A store whose tables are already in memory.
    pub fn preloaded(lore: Lore) -> Self {
        let store = Self::new(EmbeddedSource::new());
        let _ = store.lore.set(Ok(lore));
        store
    }

    pub fn get(&self) -> Result<&Lore, LoreError> {
        self.lore
            .get_or_init(|| {
                let loaded = Lore::load(self.source.as_ref());
                match &loaded {
                    Ok(lore) => tracing::debug!(
                        races = lore.races.len(),
                        classes = lore.classes.len(),
                        factions = lore.factions.len(),
                        "lore tables loaded"
                    ),
                    Err(e) => tracing::error!("lore tables failed to load: {}", e),
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl std::fmt::Debug for LoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoreStore")
            .field("loaded", &self.lore.get().is_some())
            .finish()
    }
}
