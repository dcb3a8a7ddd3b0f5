use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::UserMap;
use crate::github::{PullRequest, STALE_AFTER_DAYS};
use crate::slack::ChatApi;

pub const STALE_REACTION: &str = "alarm_clock";
pub const DRAFT_REACTION: &str = "building_construction";

/// One chat message to send for one PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub reactions: Vec<String>,
}

/// Reactions for a PR: stale first, then draft
pub fn reactions_for(pr: &PullRequest) -> Vec<String> {
    let mut reactions = Vec::new();
    if pr.stale {
        reactions.push(STALE_REACTION.to_string());
    }
    if pr.draft {
        reactions.push(DRAFT_REACTION.to_string());
    }
    reactions
}

/// Fill the message template for a PR whose author has already been resolved.
///
/// `<url|title>` is Slack's hyperlink markup.
pub fn format_message(pr: &PullRequest, display_name: &str) -> String {
    let body = format!(
        "Pull Request: <{}|{}>\nAuthor: {}",
        pr.url, pr.title, display_name
    );
    if pr.stale {
        format!(
            "*This PR is older than {} days. Consider closing it:*\n{}",
            STALE_AFTER_DAYS, body
        )
    } else {
        body
    }
}

/// Resolve a GitHub login to a chat display name, falling back to the login
/// when the user is unmapped or the profile lookup fails.
pub async fn resolve_display_name(chat: &dyn ChatApi, user_map: &UserMap, author: &str) -> String {
    let Some(slack_id) = user_map.get(author) else {
        debug!(author, "author not in user map, using GitHub login");
        return author.to_string();
    };

    match chat.user_display_name(slack_id).await {
        Ok(name) => name,
        Err(e) => {
            warn!(author, slack_id = %slack_id, error = %e, "profile lookup failed, using GitHub login");
            author.to_string()
        }
    }
}

/// Render the message text for one PR
pub async fn render_text(chat: &dyn ChatApi, user_map: &UserMap, pr: &PullRequest) -> String {
    let name = resolve_display_name(chat, user_map, &pr.author).await;
    format_message(pr, &name)
}

/// Build one message per PR, in input order. Each author is resolved at most once.
pub async fn compose_all(chat: &dyn ChatApi, user_map: &UserMap, prs: &[PullRequest]) -> Vec<Message> {
    let mut names: HashMap<&str, String> = HashMap::new();
    let mut messages = Vec::with_capacity(prs.len());

    for pr in prs {
        if !names.contains_key(pr.author.as_str()) {
            let name = resolve_display_name(chat, user_map, &pr.author).await;
            names.insert(pr.author.as_str(), name);
        }
        let name = &names[pr.author.as_str()];
        messages.push(Message {
            text: format_message(pr, name),
            reactions: reactions_for(pr),
        });
    }

    messages
}
