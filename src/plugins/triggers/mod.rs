//! Built-in network event triggers

mod accept_chat_invite;
mod accept_friend_request;
mod exec_cmd;

use super::TriggerSpec;

/// Every built-in trigger, in firing order per event
pub fn all() -> Vec<TriggerSpec> {
    vec![
        accept_friend_request::accept_friend_request(),
        accept_chat_invite::accept_chat_invite(),
        exec_cmd::exec_cmd(),
    ]
}
