// Models module for Exercise Binder
// Serialized field names are camelCase to match the persisted JSON

pub mod common;
pub mod config;
pub mod exercise;

pub use common::{ContainerKey, SortKey, now};
pub use config::{DEFAULT_KEYWORDS, Settings};
pub use exercise::{Course, Exercise, Store, Week, weekLabel};
