//! Lore table and output record types.

pub mod age;
pub mod character;
pub mod entity;
pub mod faction;
pub mod gender;
pub mod rules;
