use serde::{Deserialize, Serialize};

/// Body of a `chat.postMessage` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    pub unfurl_links: bool,
}

impl PostMessage {
    /// A top-level message with link previews turned off
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            thread_ts: None,
            unfurl_links: false,
        }
    }

    /// Post as a reply in the thread anchored at `thread_ts`
    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }
}

/// Where a posted message ended up; the pair addresses it for reactions and threading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub ts: String,
    pub channel: String,
}

/// The envelope every Web API method answers with. Only the fields the bot
/// reads are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
    /// `apps.connections.open` only
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Profile {
    /// The real name, or the display name when the real name is blank
    pub fn into_name(self) -> Option<String> {
        let non_blank = |name: Option<String>| name.filter(|n| !n.trim().is_empty());
        non_blank(self.real_name).or_else(|| non_blank(self.display_name))
    }
}

impl SlackResponse {
    pub fn error_text(&self) -> String {
        self.error.clone().unwrap_or_else(|| "unknown_error".to_string())
    }
}
