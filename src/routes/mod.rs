// # Routes Module
//
// - HTTP route handlers, grouped by functionality.
//
//  ## Available Route Modules
// - `health`: liveness endpoint
// - `auth`: signup, login and the current user
// - `tasks`: per-user task CRUD
//
// Protected routers are wrapped with the identity middleware in `server.rs`.

/// Health check endpoint
pub mod health;

/// Signup, login and current-user endpoints
pub mod auth;

/// Task CRUD endpoints
pub mod tasks;
