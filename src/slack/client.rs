use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{PostMessage, PostedMessage, Profile, SlackResponse};
use crate::error::ChatError;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// The chat operations the reminder pipeline needs.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post a message; `ok: false` from Slack becomes an error carrying Slack's error string
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, ChatError>;

    /// Add reaction `name` to the message at `timestamp` in `channel`
    async fn add_reaction(&self, channel: &str, timestamp: &str, name: &str)
        -> Result<(), ChatError>;

    /// Display name of a workspace member
    async fn user_display_name(&self, user_id: &str) -> Result<String, ChatError>;
}

/// Slack Web API client authenticated with the bot token
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
    deadline: Duration,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, deadline: Duration) -> Self {
        Self::with_base_url(token, SLACK_API_BASE, deadline)
    }

    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
        deadline: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into(),
            deadline,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }

    /// POST a JSON body to a Web API method
    async fn call<B: Serialize + ?Sized + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<SlackResponse, ChatError> {
        let request = self
            .http
            .post(self.method_url(method))
            .bearer_auth(&self.token)
            .json(body);
        send_with_deadline(request, method, self.deadline).await
    }

    /// GET a Web API method with query arguments
    async fn call_get(&self, method: &str, args: &[(&str, &str)]) -> Result<SlackResponse, ChatError> {
        let url = Url::parse_with_params(&self.method_url(method), args)
            .map_err(|e| ChatError::Transport(format!("bad URL for {}: {}", method, e)))?;
        let request = self.http.get(url).bearer_auth(&self.token);
        send_with_deadline(request, method, self.deadline).await
    }

    /// Post a slash-command reply to the `response_url` Slack handed us
    pub async fn respond(&self, response_url: &str, text: &str) -> Result<(), ChatError> {
        let request = self
            .http
            .post(response_url)
            .json(&json!({ "text": text, "response_type": "ephemeral" }));
        let response = tokio::time::timeout(self.deadline, request.send())
            .await
            .map_err(|_| timed_out("response_url", self.deadline))?
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChatError::Transport(format!(
                "response_url returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Ask for a Socket Mode websocket URL using the app-level token
    pub async fn open_socket_url(&self, app_token: &str) -> Result<String, ChatError> {
        let request = self
            .http
            .post(self.method_url("apps.connections.open"))
            .bearer_auth(app_token);
        let response = send_with_deadline(request, "apps.connections.open", self.deadline).await?;
        if !response.ok {
            return Err(ChatError::Api(response.error_text()));
        }
        response
            .url
            .ok_or_else(|| ChatError::Api("apps.connections.open returned no url".to_string()))
    }
}

async fn send_with_deadline(
    request: RequestBuilder,
    method: &str,
    deadline: Duration,
) -> Result<SlackResponse, ChatError> {
    let response = tokio::time::timeout(deadline, request.send())
        .await
        .map_err(|_| timed_out(method, deadline))?
        .map_err(|e| ChatError::Transport(format!("{}: {}", method, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ChatError::Transport(format!("{} returned {}", method, status)));
    }

    let parsed = tokio::time::timeout(deadline, response.json::<SlackResponse>())
        .await
        .map_err(|_| timed_out(method, deadline))?
        .map_err(|e| ChatError::Transport(format!("{}: malformed response: {}", method, e)))?;
    debug!(method, ok = parsed.ok, "slack call finished");
    Ok(parsed)
}

fn timed_out(method: &str, deadline: Duration) -> ChatError {
    warn!(method, ?deadline, "Slack request timed out");
    ChatError::Timeout(format!("{} after {:?}", method, deadline))
}

/// A post is only usable with a timestamp: replies thread on it and reactions target it
fn posted_from_response(
    response: SlackResponse,
    message: &PostMessage,
) -> Result<PostedMessage, ChatError> {
    if !response.ok {
        return Err(ChatError::from_post_error(&response.error_text()));
    }
    let ts = response
        .ts
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ChatError::Transport("chat.postMessage: response missing ts".to_string()))?;
    Ok(PostedMessage {
        ts,
        channel: response.channel.unwrap_or_else(|| message.channel.clone()),
    })
}

#[async_trait]
impl ChatApi for SlackClient {
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, ChatError> {
        let response = self.call("chat.postMessage", message).await?;
        posted_from_response(response, message)
    }

    async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<(), ChatError> {
        let body = json!({ "channel": channel, "timestamp": timestamp, "name": name });
        let response = self.call("reactions.add", &body).await?;
        if !response.ok {
            return Err(ChatError::ReactionFailed {
                name: name.to_string(),
                error: response.error_text(),
            });
        }
        Ok(())
    }

    async fn user_display_name(&self, user_id: &str) -> Result<String, ChatError> {
        let response = self.call_get("users.profile.get", &[("user", user_id)]).await?;
        if !response.ok {
            let error = response.error_text();
            return Err(match error.as_str() {
                "user_not_found" => ChatError::UserNotFound(user_id.to_string()),
                _ => ChatError::Api(error),
            });
        }
        response
            .profile
            .and_then(Profile::into_name)
            .ok_or_else(|| ChatError::UserNotFound(format!("{} has no name set", user_id)))
    }
}
