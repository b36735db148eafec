//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Demo data (seed)

pub mod config;
pub mod db;
pub mod seed;
pub mod server;
