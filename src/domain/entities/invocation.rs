/// A single command line received from a chat, built per message and
/// discarded once dispatch completes
#[derive(Debug, Clone)]
pub struct Invocation {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub chat_id: String,
}

impl Invocation {
    pub fn new(
        text: impl Into<String>,
        sender_id: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender_id: sender_id.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Text shortened for log lines
    pub fn preview(&self) -> String {
        self.text.chars().take(50).collect()
    }
}
