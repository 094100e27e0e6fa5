//! # Authentication Module
//!
//! Password hashing, JWT issuance and verification, and the middleware that
//! binds a protected request to the user its token names.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtService};
pub use middleware::AuthMiddleware;
pub use models::AuthUser;
pub use password::PasswordService;
