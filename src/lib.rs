//! Character Forge: procedural character generation for fantasy settings.
//!
//! Assembles complete character records from interrelated lore tables,
//! honoring caller overrides and soft race compatibility rules, then
//! narrates a backstory from class-specific templates.

pub mod core;
pub mod schema;
