//! SQL text for the `books` table: identifiers from config only, values as parameters.

mod builder;
pub use builder::*;
