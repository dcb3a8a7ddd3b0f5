use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::GitHubError;

/// A PR open this many days or longer is stale
pub const STALE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,          // "{title} #{number}"
    pub number: u64,
    pub author: String,         // GitHub login
    pub url: String,            // HTML URL for the chat hyperlink
    pub created_at: DateTime<Utc>,
    pub draft: bool,
    pub labels: Vec<String>,
    pub repository: String,     // repository name taken from the URL path
    pub stale: bool,            // computed against the batch's "now"
}

/// The subset of GitHub's list-pulls JSON we read
#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    pub title: String,
    pub number: u64,
    pub user: Option<RawUser>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub name: String,
}

/// True iff the PR has been open for at least [`STALE_AFTER_DAYS`] at `now`
pub fn is_stale(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at >= Duration::days(STALE_AFTER_DAYS)
}

/// Extract the repository name from a PR URL.
///
/// Accepts both the HTML form (`https://github.com/owner/repo/pull/1`) and
/// the API form (`https://api.github.com/repos/owner/repo/pulls/1`).
pub fn repository_from_url(url: &str) -> Option<String> {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let (_host, path) = rest.split_once('/')?;
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let name = if parts.first() == Some(&"repos") {
        parts.get(2)?
    } else {
        parts.get(1)?
    };
    Some(name.to_string())
}

impl PullRequest {
    /// Build a record from one raw list-pulls object
    pub fn from_raw(raw: RawPullRequest, now: DateTime<Utc>) -> Result<Self, GitHubError> {
        let repository = repository_from_url(&raw.html_url).ok_or_else(|| {
            GitHubError::UnknownHttp(format!("malformed pull request URL: {}", raw.html_url))
        })?;

        Ok(Self {
            title: format!("{} #{}", raw.title, raw.number),
            number: raw.number,
            author: raw
                .user
                .map(|u| u.login)
                .unwrap_or_else(|| "ghost".to_string()),
            url: raw.html_url,
            created_at: raw.created_at,
            draft: raw.draft.unwrap_or(false),
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            repository,
            stale: is_stale(raw.created_at, now),
        })
    }

    /// Build a record from a raw JSON value as returned by the GitHub API
    pub fn from_json(value: serde_json::Value, now: DateTime<Utc>) -> Result<Self, GitHubError> {
        let raw: RawPullRequest = serde_json::from_value(value)
            .map_err(|e| GitHubError::UnknownHttp(format!("malformed pull request JSON: {}", e)))?;
        Self::from_raw(raw, now)
    }

    /// PR age relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }
}
