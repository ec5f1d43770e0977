//! Configuration module
//!
//! Loading and validation of the YAML settings shared by all three games:
//! slot counts, swap counts, and the delays that pace each round.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
