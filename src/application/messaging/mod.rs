//! Message handling - Command dispatch and event routing

pub mod dispatcher;
pub mod guards;
pub mod parser;
pub mod router;

pub use dispatcher::{CommandDispatcher, Outcome};
pub use guards::{Guard, GuardContext};
pub use parser::MessageParser;
pub use router::TriggerRouter;
