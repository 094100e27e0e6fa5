//! # Taskboard Server
//!
//! Backend for a multi-user task tracker: signup and login, then task CRUD
//! scoped to the authenticated user.
//!
//! ## Architecture
//! - `auth`: password hashing, JWT issuance/verification, identity middleware
//! - `database`: credential and task stores (PostgreSQL and in-memory)
//! - `routes`: HTTP handlers
//! - `server`: router assembly and the serve loop
//! - `config`: environment configuration
//! - `error`: error taxonomy and its HTTP mapping

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod server;
