//! Configuration validation
//!
//! Validates the monitor configuration before anything is loaded.

mod error;
mod validator;


pub use error::ValidationError;
pub use validator::validate_config;
