//! # Database Module
//!
//! Storage for user identities and tasks: a PostgreSQL backend on
//! tokio-postgres with deadpool pooling, and an in-memory backend, both
//! behind the traits in [`store`].

pub mod connection;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use memory::{InMemoryCredentialStore, InMemoryTaskStore};
pub use models::{Task, TaskChanges, TaskStatus, UserIdentity};
pub use postgres::{PgCredentialStore, PgTaskStore};
pub use store::{CredentialStore, TaskStore};
