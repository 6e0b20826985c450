//! Persistence layer: libSQL-backed storage for onboarded organizations.

pub mod creator;
pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use creator::StoreCreator;
pub use libsql_backend::LibSqlBackend;
pub use traits::Database;
