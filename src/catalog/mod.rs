// Catalog: the exercise store and the views derived from it
// Everything here is pure data manipulation, no I/O

pub mod filter;
pub mod projection;
pub mod sort;
pub mod store;
pub mod tags;

pub use filter::{filterStore, normalizeSearchTerm};
pub use projection::{ExerciseDisplay, ExpansionState, RenderTree, project};
pub use sort::sortStore;
pub use store::{ExerciseLocation, migrate};
