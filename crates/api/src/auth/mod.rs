//! Authentication module for Parley

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtError, JwtManager};
pub use middleware::{require_auth, AuthUser};
pub use password::{hash_password, validate_password_strength, verify_password};
