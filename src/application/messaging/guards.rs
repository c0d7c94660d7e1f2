//! Guards - predicates deciding whether a command may run

use crate::application::services::PermissionLists;

/// What a guard gets to look at
pub struct GuardContext<'a> {
    pub sender_id: &'a str,
    pub chat_id: &'a str,
    pub lists: &'a PermissionLists,
}

/// `true` allows the command
pub type Guard = fn(&GuardContext<'_>) -> bool;

/// Only whitelisted senders
pub fn whitelisted_sender(ctx: &GuardContext<'_>) -> bool {
    ctx.lists.whitelisted(ctx.sender_id)
}

/// Anyone not blacklisted, neither as a sender nor as a chat
pub fn not_blacklisted(ctx: &GuardContext<'_>) -> bool {
    !ctx.lists.blacklisted(ctx.sender_id) && !ctx.lists.blacklisted(ctx.chat_id)
}
