//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration keys, defaults and file formats
//! - Storage: Data persistence
//! - Adapters: Transport implementations (console, loopback)

pub mod config;
pub mod storage;
pub mod adapters;
