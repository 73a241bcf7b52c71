pub mod content;
pub mod legacy;
pub mod markdown;

pub use content::{load_or_empty, migrate, Migrated, SchemaError, SchemaVersion};
