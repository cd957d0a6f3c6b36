//! Domain models

pub mod session;
pub mod user;
