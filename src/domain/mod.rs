//! Domain layer - Core business objects and the seams to the outside world
//!
//! This layer contains:
//! - Entities: Events, invocations, command parameter shapes, list names
//! - Traits: Abstractions for infrastructure (Transport, Store)

pub mod entities;
pub mod traits;
