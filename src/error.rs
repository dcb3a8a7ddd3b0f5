use thiserror::Error;

/// Problems with the configuration or secrets files. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("token {0} does not have a value")]
    MissingToken(&'static str),

    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// Failures talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("repository {0} does not exist or is not visible to this token")]
    RepoNotFound(String),

    #[error("GitHub rejected the token: {0}")]
    BadGitHubToken(String),

    #[error("unexpected GitHub response: {0}")]
    UnknownHttp(String),

    #[error("GitHub request timed out: {0}")]
    Timeout(String),
}

/// Failures talking to the Slack Web API or Socket Mode endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message failed to send with error: {0}")]
    PostFailed(String),

    #[error("reaction {name} failed to add with error: {error}")]
    ReactionFailed { name: String, error: String },

    #[error("Slack member not found: {0}")]
    UserNotFound(String),

    #[error("Slack channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Slack transport error: {0}")]
    Transport(String),

    #[error("Slack request timed out: {0}")]
    Timeout(String),
}

impl ChatError {
    /// Map a Slack `error` string from a post call onto the taxonomy
    pub fn from_post_error(error: &str) -> Self {
        match error {
            "channel_not_found" | "not_in_channel" | "is_archived" => {
                ChatError::ChannelNotFound(error.to_string())
            }
            "user_not_found" | "users_not_found" => ChatError::UserNotFound(error.to_string()),
            _ => ChatError::PostFailed(error.to_string()),
        }
    }
}

/// Anything that can stop a reminder run.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Chat(#[from] ChatError),
}
