//! Application services - Permission lists and the bot itself

pub mod permission_service;
pub mod steam_bot;

pub use permission_service::PermissionLists;
pub use steam_bot::{BotState, SteamBot};
