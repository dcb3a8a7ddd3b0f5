//! Recording mocks shared by the reminder, command and schedule tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{ChatError, GitHubError};
use crate::fetch::PullRequestSource;
use crate::github::{is_stale, PullRequest};
use crate::slack::{ChatApi, PostMessage, PostedMessage};

pub fn mock_pr(author: &str, stale: bool, draft: bool) -> PullRequest {
    PullRequest {
        title: "mock_title #1".to_string(),
        number: 1,
        author: author.to_string(),
        url: "https://github.com/mock_owner/mock_repo/pull/1".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 11, 15, 7, 33, 56).unwrap(),
        draft,
        labels: vec!["mock_label".to_string()],
        repository: "mock_repo".to_string(),
        stale,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    Post(PostMessage),
    React {
        channel: String,
        timestamp: String,
        name: String,
    },
    Profile(String),
}

/// In-memory [`ChatApi`] that records every call in order
#[derive(Default)]
pub struct MockChat {
    profiles: HashMap<String, String>,
    failing_post_texts: HashSet<String>,
    failing_reactions: HashSet<String>,
    calls: Mutex<Vec<ChatCall>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, slack_id: &str, real_name: &str) -> Self {
        self.profiles.insert(slack_id.to_string(), real_name.to_string());
        self
    }

    /// Any post whose text equals `text` answers `ok: false`
    pub fn failing_post(mut self, text: &str) -> Self {
        self.failing_post_texts.insert(text.to_string());
        self
    }

    pub fn failing_reaction(mut self, name: &str) -> Self {
        self.failing_reactions.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<PostMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::Post(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn reactions(&self) -> Vec<(String, String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::React {
                    channel,
                    timestamp,
                    name,
                } => Some((channel, timestamp, name)),
                _ => None,
            })
            .collect()
    }

    pub fn profile_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::Profile(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, ChatError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(ChatCall::Post(message.clone()));
        if self.failing_post_texts.contains(&message.text) {
            return Err(ChatError::from_post_error("mock_error"));
        }
        let posts = calls.iter().filter(|c| matches!(c, ChatCall::Post(_))).count();
        Ok(PostedMessage {
            ts: format!("1700000000.{:06}", posts),
            channel: message.channel.clone(),
        })
    }

    async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<(), ChatError> {
        self.calls.lock().unwrap().push(ChatCall::React {
            channel: channel.to_string(),
            timestamp: timestamp.to_string(),
            name: name.to_string(),
        });
        if self.failing_reactions.contains(name) {
            return Err(ChatError::ReactionFailed {
                name: name.to_string(),
                error: "mock_error".to_string(),
            });
        }
        Ok(())
    }

    async fn user_display_name(&self, user_id: &str) -> Result<String, ChatError> {
        self.calls
            .lock()
            .unwrap()
            .push(ChatCall::Profile(user_id.to_string()));
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(user_id.to_string()))
    }
}

/// [`PullRequestSource`] serving `(repo, number, author, days_old, draft)` rows
#[derive(Default)]
pub struct MockSource {
    rows: Vec<(String, u64, String, i64, bool)>,
    missing: HashSet<String>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pr(mut self, repo: &str, number: u64, author: &str, days_old: i64, draft: bool) -> Self {
        self.rows
            .push((repo.to_string(), number, author.to_string(), days_old, draft));
        self
    }

    pub fn missing_repo(mut self, repo: &str) -> Self {
        self.missing.insert(repo.to_string());
        self
    }
}

#[async_trait]
impl PullRequestSource for MockSource {
    async fn open_pull_requests(
        &self,
        repo: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        if self.missing.contains(repo) {
            return Err(GitHubError::RepoNotFound(repo.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .filter(|row| row.0 == repo)
            .map(|(repo, number, author, days_old, draft)| {
                let created_at = now - Duration::days(*days_old);
                PullRequest {
                    title: format!("PR {} #{}", repo, number),
                    number: *number,
                    author: author.clone(),
                    url: format!("https://github.com/{}/pull/{}", repo, number),
                    created_at,
                    draft: *draft,
                    labels: vec![],
                    repository: repo.split('/').nth(1).unwrap_or(repo).to_string(),
                    stale: is_stale(created_at, now),
                }
            })
            .collect())
    }
}
