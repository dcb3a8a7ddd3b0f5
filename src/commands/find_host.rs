use async_trait::async_trait;

use super::handler::{CommandHandler, Response, SlashCommand};

pub const HOST_IP_VAR: &str = "HOST_IP";

/// `/find-host` reports which node answered, for multi-node deployments
pub struct FindHostCommand {
    host_ip: Option<String>,
}

impl FindHostCommand {
    pub fn new(host_ip: Option<String>) -> Self {
        Self { host_ip }
    }

    pub fn from_env() -> Self {
        Self::new(crate::credentials::get_token_from_env(HOST_IP_VAR))
    }
}

#[async_trait]
impl CommandHandler for FindHostCommand {
    fn command_names(&self) -> &'static [&'static str] {
        &["/find-host"]
    }

    async fn handle(&self, _command: &SlashCommand) -> Response {
        Response::Done(format!(
            "The host IP of this node is: {}",
            self.host_ip.as_deref().unwrap_or("unknown")
        ))
    }
}
