//! Authentication primitives and the request guard

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{TokenClaims, TokenRejection, TokenService};
pub use middleware::{authenticate, extract_token, require_session, AuthContext};
pub use password::PasswordHasher;
