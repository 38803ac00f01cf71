pub mod auth_service;
pub mod profile_service;

pub use profile_service::*;
