pub mod db;
pub mod error;
pub mod model;

pub use diesel_migrations::EmbeddedMigrations;

/// SQL migrations bundled into the binary; the app runs pending ones at startup.
pub const MIGRATIONS: EmbeddedMigrations = diesel_migrations::embed_migrations!();
