use async_trait::async_trait;
use tracing::{error, info};

use super::handler::{CommandHandler, Response, SlashCommand};
use crate::reminder::ReminderService;

pub const GATHERING_TEXT: &str = "Gathering the PRs...";
pub const DONE_TEXT: &str = "Check out your DMs.";
pub const USAGE_TEXT: &str = "Please provide the correct argument: 'mine' or 'all'.";

/// `/prs mine` sends the invoker their own PRs; `/prs all` sends them every open PR
pub struct PrsCommand {
    service: ReminderService,
}

enum Scope {
    Mine,
    All,
}

impl PrsCommand {
    pub fn new(service: ReminderService) -> Self {
        Self { service }
    }

    fn scope(command: &SlashCommand) -> Option<Scope> {
        match command.argument() {
            "mine" => Some(Scope::Mine),
            "all" => Some(Scope::All),
            _ => None,
        }
    }

    fn is_known(&self, command: &SlashCommand) -> bool {
        self.service
            .config()
            .user_by_slack_id(&command.user_id)
            .is_some()
    }
}

pub fn unknown_user_text(user_id: &str) -> String {
    format!(
        "Could not find your Slack ID {} in the user map. Please contact the service maintainer to fix this.",
        user_id
    )
}

#[async_trait]
impl CommandHandler for PrsCommand {
    fn command_names(&self) -> &'static [&'static str] {
        &["/prs"]
    }

    fn acknowledge(&self, command: &SlashCommand) -> Option<String> {
        if self.is_known(command) && Self::scope(command).is_some() {
            Some(GATHERING_TEXT.to_string())
        } else {
            None
        }
    }

    async fn handle(&self, command: &SlashCommand) -> Response {
        let Some(user) = self
            .service
            .config()
            .user_by_slack_id(&command.user_id)
            .cloned()
        else {
            return Response::UnknownUser(unknown_user_text(&command.user_id));
        };

        let result = match Self::scope(command) {
            Some(Scope::Mine) => {
                info!(user = %user.github_name, "personal reminder requested");
                self.service
                    .run_personal(std::slice::from_ref(&user), true)
                    .await
                    .map(|_| ())
            }
            Some(Scope::All) => {
                info!(user = %user.github_name, "global reminder requested");
                self.service
                    .run_global(&command.user_id)
                    .await
                    .map(|_| ())
            }
            None => return Response::Usage(USAGE_TEXT.to_string()),
        };

        match result {
            Ok(()) => Response::Done(DONE_TEXT.to_string()),
            Err(e) => {
                error!(user = %user.github_name, error = %e, "/prs failed");
                Response::Failed(format!("Failed to gather the PRs: {}", e))
            }
        }
    }
}
