//! Data access layer

pub mod memory;
pub mod session_repo;
pub mod user_repo;

pub use memory::{MemorySessionRepository, MemoryUserRepository};
pub use session_repo::{PgSessionRepository, SessionRepository};
pub use user_repo::{PgUserRepository, UserRepository};
