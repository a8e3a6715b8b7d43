pub mod analyzer;
pub mod config;
pub mod error;
pub mod server;
