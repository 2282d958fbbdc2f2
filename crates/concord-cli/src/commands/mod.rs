//! Command implementations.

pub mod config;
pub mod resolve;
pub mod verify;

pub use self::config::execute_config;
pub use self::resolve::execute_resolve;
pub use self::verify::execute_verify;
