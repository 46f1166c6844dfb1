//! Storage infrastructure - Key registry backends

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{KeyRegistry, StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryKeyRegistry;
pub use migrations::{run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresKeyRegistry};
