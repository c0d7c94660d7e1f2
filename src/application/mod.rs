//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Permission lists and the bot lifecycle
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing, guards, dispatching, event routing

pub mod errors;
pub mod services;
pub mod messaging;
