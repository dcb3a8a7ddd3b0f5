use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message as Frame};
use tracing::{debug, error, info, warn};

use super::client::SlackClient;
use crate::commands::{CommandRegistry, SlashCommand};
use crate::error::ChatError;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One Socket Mode frame from Slack
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub envelope_id: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// What to do with one incoming frame
#[derive(Debug, Default, PartialEq)]
pub struct FramePlan {
    /// Acknowledgement to write back, already serialised
    pub ack: Option<String>,
    pub command: Option<SlashCommand>,
    pub disconnect: bool,
}

/// Decide how to answer a frame. Pure, so the protocol can be tested offline.
pub fn plan_frame(text: &str, registry: &CommandRegistry) -> FramePlan {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "ignoring unparsable socket frame");
            return FramePlan::default();
        }
    };

    match envelope.kind.as_str() {
        "hello" => {
            info!("socket mode connection established");
            FramePlan::default()
        }
        "disconnect" => {
            info!(reason = ?envelope.reason, "slack asked us to reconnect");
            FramePlan {
                disconnect: true,
                ..FramePlan::default()
            }
        }
        "slash_commands" => {
            let Some(id) = envelope.envelope_id else {
                return FramePlan::default();
            };
            let command = envelope
                .payload
                .and_then(|p| serde_json::from_value::<SlashCommand>(p).ok());
            let interim = command
                .as_ref()
                .and_then(|c| registry.get(&c.command).and_then(|h| h.acknowledge(c)));
            let ack = match interim {
                Some(text) => json!({ "envelope_id": id, "payload": { "text": text } }),
                None => json!({ "envelope_id": id }),
            };
            FramePlan {
                ack: Some(ack.to_string()),
                command,
                disconnect: false,
            }
        }
        other => {
            // events_api (message events), interactive, ...: ack and log
            debug!(kind = other, payload = ?envelope.payload, "socket event");
            FramePlan {
                ack: envelope
                    .envelope_id
                    .map(|id| json!({ "envelope_id": id }).to_string()),
                ..FramePlan::default()
            }
        }
    }
}

/// Receives slash commands over Socket Mode and answers them via `response_url`
pub struct SocketModeListener {
    client: SlackClient,
    app_token: String,
    registry: Arc<CommandRegistry>,
}

impl SocketModeListener {
    pub fn new(client: SlackClient, app_token: impl Into<String>, registry: CommandRegistry) -> Self {
        Self {
            client,
            app_token: app_token.into(),
            registry: Arc::new(registry),
        }
    }

    /// Keep a connection open forever, reconnecting after drops and failures
    pub async fn run(&self) {
        loop {
            match self.run_connection().await {
                Ok(()) => info!("socket mode connection closed, reconnecting"),
                Err(e) => warn!(error = %e, "socket mode connection failed, reconnecting"),
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn run_connection(&self) -> Result<(), ChatError> {
        let url = self.client.open_socket_url(&self.app_token).await?;
        let (stream, _) = tokio::time::timeout(self.client.deadline(), connect_async(url.as_str()))
            .await
            .map_err(|_| ChatError::Timeout("socket mode connect".to_string()))?
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let (mut write, mut read) = stream.split();

        while let Some(frame) = read.next().await {
            let frame = frame.map_err(|e| ChatError::Transport(e.to_string()))?;
            match frame {
                Frame::Text(text) => {
                    let plan = plan_frame(&text, &self.registry);
                    if let Some(ack) = plan.ack {
                        write
                            .send(Frame::Text(ack))
                            .await
                            .map_err(|e| ChatError::Transport(e.to_string()))?;
                    }
                    if let Some(command) = plan.command {
                        self.spawn_command(command);
                    }
                    if plan.disconnect {
                        return Ok(());
                    }
                }
                Frame::Ping(data) => {
                    write
                        .send(Frame::Pong(data))
                        .await
                        .map_err(|e| ChatError::Transport(e.to_string()))?;
                }
                Frame::Close(_) => return Ok(()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Run the handler off the read loop so pings keep being answered
    fn spawn_command(&self, command: SlashCommand) {
        let registry = Arc::clone(&self.registry);
        let client = self.client.clone();
        tokio::spawn(async move {
            let Some(handler) = registry.get(&command.command) else {
                warn!(command = %command.command, "no handler registered");
                return;
            };
            info!(command = %command.command, user = %command.user_id, "handling slash command");
            let response = handler.handle(&command).await;
            let Some(url) = command.response_url.as_deref() else {
                debug!(response = response.text(), "no response_url, dropping reply");
                return;
            };
            if let Err(e) = client.respond(url, response.text()).await {
                error!(error = %e, "failed to answer slash command");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::FindHostCommand;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(FindHostCommand::new(None)));
        registry
    }

    #[test]
    fn test_hello_needs_no_ack() {
        let plan = plan_frame(r#"{"type":"hello","num_connections":1}"#, &registry());
        assert_eq!(plan, FramePlan::default());
    }

    #[test]
    fn test_disconnect() {
        let plan = plan_frame(r#"{"type":"disconnect","reason":"refresh_requested"}"#, &registry());
        assert!(plan.disconnect);
        assert!(plan.ack.is_none());
    }

    #[test]
    fn test_slash_command_is_acked_and_dispatched() {
        let frame = json!({
            "type": "slash_commands",
            "envelope_id": "env-1",
            "payload": {
                "command": "/find-host",
                "text": "",
                "user_id": "U1",
                "response_url": "https://hooks.slack.com/commands/x"
            }
        });
        let plan = plan_frame(&frame.to_string(), &registry());
        let ack: serde_json::Value = serde_json::from_str(plan.ack.as_deref().unwrap()).unwrap();
        assert_eq!(ack, json!({"envelope_id": "env-1"}));
        assert_eq!(plan.command.unwrap().command, "/find-host");
    }

    #[test]
    fn test_events_are_acked_only() {
        let frame = json!({
            "type": "events_api",
            "envelope_id": "env-2",
            "payload": {"event": {"type": "message", "text": "hi"}}
        });
        let plan = plan_frame(&frame.to_string(), &registry());
        assert_eq!(plan.ack.as_deref(), Some(r#"{"envelope_id":"env-2"}"#));
        assert!(plan.command.is_none());
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(plan_frame("not json", &registry()), FramePlan::default());
    }
}
