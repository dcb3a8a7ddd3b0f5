use tracing::{info, warn};

use super::compose::{compose_all, Message};
use crate::config::UserMap;
use crate::error::ChatError;
use crate::github::PullRequest;
use crate::slack::{ChatApi, PostMessage, PostedMessage};

pub const HEADER_TEXT: &str = "Here are the outstanding PRs as of today:";
pub const NO_PRS_TEXT: &str = "No Pull Requests were found.";

/// What one dispatch run did
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Messages posted, header included
    pub posted: usize,
    pub reactions_added: usize,
    /// Reaction adds that failed; they never stop the run
    pub reaction_failures: Vec<ChatError>,
}

/// Posts a header and one threaded reply per PR into a channel.
pub struct PrReminder<'a> {
    chat: &'a dyn ChatApi,
    user_map: &'a UserMap,
}

impl<'a> PrReminder<'a> {
    pub fn new(chat: &'a dyn ChatApi, user_map: &'a UserMap) -> Self {
        Self { chat, user_map }
    }

    /// Send the reminder for `prs` to `channel`.
    ///
    /// With no PRs, a single "none found" message is posted when
    /// `announce_empty` is set, otherwise nothing is sent. A rejected post
    /// ends the run with that error; rejected reactions are logged and skipped.
    pub async fn run(
        &self,
        prs: &[PullRequest],
        channel: &str,
        announce_empty: bool,
    ) -> Result<DispatchReport, ChatError> {
        let mut report = DispatchReport::default();

        if prs.is_empty() {
            if announce_empty {
                self.send_message(NO_PRS_TEXT, channel, &[], None, &mut report)
                    .await?;
            }
            return Ok(report);
        }

        let messages = compose_all(self.chat, self.user_map, prs).await;

        let header = self
            .send_message(HEADER_TEXT, channel, &[], None, &mut report)
            .await?;

        for Message { text, reactions } in &messages {
            self.send_message(text, &header.channel, reactions, Some(header.ts.as_str()), &mut report)
                .await?;
        }

        info!(
            channel,
            replies = messages.len(),
            reactions = report.reactions_added,
            failed_reactions = report.reaction_failures.len(),
            "posted PR reminder"
        );
        Ok(report)
    }

    /// Post one message (threaded when `thread_ts` is given), then add its reactions
    pub async fn send_message(
        &self,
        text: &str,
        channel: &str,
        reactions: &[String],
        thread_ts: Option<&str>,
        report: &mut DispatchReport,
    ) -> Result<PostedMessage, ChatError> {
        let mut message = PostMessage::new(channel, text);
        if let Some(ts) = thread_ts {
            message = message.in_thread(ts);
        }

        let posted = self.chat.post_message(&message).await?;
        report.posted += 1;

        self.add_reactions(&posted, reactions, report).await;
        Ok(posted)
    }

    /// Add each reaction independently; one failure does not skip the rest
    async fn add_reactions(&self, posted: &PostedMessage, reactions: &[String], report: &mut DispatchReport) {
        for name in reactions {
            match self.chat.add_reaction(&posted.channel, &posted.ts, name).await {
                Ok(()) => report.reactions_added += 1,
                Err(e) => {
                    warn!(
                        channel = %posted.channel,
                        ts = %posted.ts,
                        reaction = %name,
                        error = %e,
                        "failed to add reaction"
                    );
                    report.reaction_failures.push(e);
                }
            }
        }
    }
}
