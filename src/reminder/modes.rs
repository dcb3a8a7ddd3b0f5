use std::sync::Arc;
use tracing::{error, info};

use super::dispatch::{DispatchReport, PrReminder};
use crate::config::{Config, ReminderKind, User};
use crate::error::ReminderError;
use crate::fetch::{fetch_prs, PullRequestSource};
use crate::github::{filter_by, sort_by, PrField, PullRequest};
use crate::slack::ChatApi;

/// A reminder to run: which mode, and for personal runs whether to announce "no PRs"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderJob {
    pub kind: ReminderKind,
    pub message_no_prs: bool,
}

/// Everything a reminder run needs, built once at startup
#[derive(Clone)]
pub struct ReminderService {
    config: Arc<Config>,
    source: Arc<dyn PullRequestSource>,
    chat: Arc<dyn ChatApi>,
}

impl ReminderService {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn PullRequestSource>,
        chat: Arc<dyn ChatApi>,
    ) -> Self {
        Self {
            config,
            source,
            chat,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All open PRs across the configured repositories, oldest first
    async fn open_prs_oldest_first(&self) -> Result<Vec<PullRequest>, ReminderError> {
        let prs = fetch_prs(self.source.as_ref(), &self.config.repos).await?;
        Ok(sort_by(&prs, PrField::CreatedAt, true))
    }

    /// Post every open PR to `channel`
    pub async fn run_global(&self, channel: &str) -> Result<DispatchReport, ReminderError> {
        let prs = self.open_prs_oldest_first().await?;
        let user_map = self.config.user_map();
        let report = PrReminder::new(self.chat.as_ref(), &user_map)
            .run(&prs, channel, true)
            .await?;
        Ok(report)
    }

    /// Send each user their own open PRs in a direct message.
    ///
    /// Users are handled independently: a failed delivery to one user is
    /// logged and the rest still get theirs. The first failure is returned
    /// once every user has been tried.
    pub async fn run_personal(
        &self,
        users: &[User],
        message_no_prs: bool,
    ) -> Result<Vec<(String, DispatchReport)>, ReminderError> {
        let prs = self.open_prs_oldest_first().await?;
        let user_map = self.config.user_map();
        let reminder = PrReminder::new(self.chat.as_ref(), &user_map);

        let mut reports = Vec::with_capacity(users.len());
        let mut first_error = None;

        for user in users {
            let mine = filter_by(&prs, PrField::Author, user.github_name.as_str());
            match reminder.run(&mine, &user.slack_id, message_no_prs).await {
                Ok(report) => reports.push((user.slack_id.clone(), report)),
                Err(e) => {
                    error!(user = %user.github_name, error = %e, "personal reminder failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(reports),
        }
    }

    /// Run a scheduled job against the configured channel / users
    pub async fn run_job(&self, job: ReminderJob) -> Result<(), ReminderError> {
        info!(?job, "running reminder");
        match job.kind {
            ReminderKind::Global => {
                self.run_global(&self.config.channel).await?;
            }
            ReminderKind::Personal => {
                self.run_personal(&self.config.users, job.message_no_prs)
                    .await?;
            }
        }
        Ok(())
    }
}
