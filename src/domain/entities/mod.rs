//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod event;
pub mod invocation;
pub mod permission;

pub use command::{ArgValue, Coercion, Flag, FlagKind, ParsedArgs, Positional};
pub use event::{EResult, Event, EventKind, Relationship};
pub use invocation::Invocation;
pub use permission::ListName;
