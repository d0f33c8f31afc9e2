//! Generation engine: lore loading, rule evaluation, selection, and assembly.

pub mod backstory;
pub mod faction;
pub mod forge;
pub mod lore;
pub mod metrics;
pub mod overrides;
pub mod request;
pub mod rules;
pub mod selector;
