//! Business logic services layer

pub mod account_service;
pub mod session_service;

pub use account_service::AccountService;
pub use session_service::{SessionRejection, SessionService};
