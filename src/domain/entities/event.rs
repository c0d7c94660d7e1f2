use std::fmt;

/// Result code reported by the Steam network for logins, disconnects,
/// chat joins and friend requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EResult(pub u32);

impl EResult {
    pub const INVALID: EResult = EResult(0);
    pub const OK: EResult = EResult(1);
    pub const FAIL: EResult = EResult(2);
    pub const NO_CONNECTION: EResult = EResult(3);
    pub const INVALID_PASSWORD: EResult = EResult(5);
    pub const ACCESS_DENIED: EResult = EResult(15);
    pub const TIMEOUT: EResult = EResult(16);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::INVALID => "Invalid",
            Self::OK => "OK",
            Self::FAIL => "Fail",
            Self::NO_CONNECTION => "NoConnection",
            Self::INVALID_PASSWORD => "InvalidPassword",
            Self::ACCESS_DENIED => "AccessDenied",
            Self::TIMEOUT => "Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for EResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// Relationship state carried by friend relationship events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    None,
    Blocked,
    RequestRecipient,
    Friend,
    RequestInitiator,
    Ignored,
    IgnoredFriend,
}

/// Event name used to key triggers in the plugin registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoggedOn,
    Disconnected,
    FriendOrChatMessage,
    ChatInvite,
    FriendRelationship,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LoggedOn => "loggedOn",
            EventKind::Disconnected => "disconnected",
            EventKind::FriendOrChatMessage => "friendOrChatMessage",
            EventKind::ChatInvite => "chatInvite",
            EventKind::FriendRelationship => "friendRelationship",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound notification delivered by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoggedOn {
        result: EResult,
    },
    Disconnected {
        result: EResult,
        message: Option<String>,
    },
    FriendOrChatMessage {
        sender_id: String,
        text: String,
        chat_id: String,
    },
    ChatInvite {
        inviter_id: String,
        chat_id: String,
        name: String,
    },
    FriendRelationship {
        user_id: String,
        relationship: Relationship,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::LoggedOn { .. } => EventKind::LoggedOn,
            Event::Disconnected { .. } => EventKind::Disconnected,
            Event::FriendOrChatMessage { .. } => EventKind::FriendOrChatMessage,
            Event::ChatInvite { .. } => EventKind::ChatInvite,
            Event::FriendRelationship { .. } => EventKind::FriendRelationship,
        }
    }

    /// Chat message shorthand, mostly for adapters and tests
    pub fn message(
        sender_id: impl Into<String>,
        text: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Event::FriendOrChatMessage {
            sender_id: sender_id.into(),
            text: text.into(),
            chat_id: chat_id.into(),
        }
    }
}
