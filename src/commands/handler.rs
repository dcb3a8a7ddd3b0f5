use async_trait::async_trait;
use serde::Deserialize;

/// A slash command invocation, as delivered in a Socket Mode `slash_commands` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlashCommand {
    /// e.g. "/prs"
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub user_id: String,
    #[serde(default)]
    pub response_url: Option<String>,
}

impl SlashCommand {
    /// The single argument, trimmed
    pub fn argument(&self) -> &str {
        self.text.trim()
    }
}

/// What the bot says back to the invoking user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The command did its work
    Done(String),
    /// The argument was not understood
    Usage(String),
    /// The invoking user is not in the user map
    UnknownUser(String),
    /// The work failed; the text explains why
    Failed(String),
}

impl Response {
    pub fn text(&self) -> &str {
        match self {
            Response::Done(t) | Response::Usage(t) | Response::UnknownUser(t) | Response::Failed(t) => t,
        }
    }
}

/// A handler for one or more slash commands
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name(s) this handler processes, including the leading slash
    fn command_names(&self) -> &'static [&'static str];

    /// Text to include in the immediate acknowledgement, if any
    fn acknowledge(&self, _command: &SlashCommand) -> Option<String> {
        None
    }

    async fn handle(&self, command: &SlashCommand) -> Response;
}
