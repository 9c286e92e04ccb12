//! Schema anonymization and mapping persistence

mod anonymizer;
mod store;

pub use anonymizer::{anonymize_schema, AnonymizedSchema};
pub use store::{MappingStore, SchemaMappingRecord};
