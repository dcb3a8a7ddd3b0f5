use chrono::{DateTime, Utc};
use http::StatusCode;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::split_repo;
use crate::error::GitHubError;
use crate::github::types::PullRequest;

#[derive(Serialize)]
struct ListParams {
    state: &'static str,
    per_page: u8,
}

/// List every open pull request in `repo` ("owner/repo"), following pagination.
///
/// Each call to GitHub is bounded by `deadline`.
pub async fn list_open_prs(
    client: &Octocrab,
    repo: &str,
    now: DateTime<Utc>,
    deadline: Duration,
) -> Result<Vec<PullRequest>, GitHubError> {
    let (owner, name) =
        split_repo(repo).ok_or_else(|| GitHubError::RepoNotFound(repo.to_string()))?;
    let route = format!("/repos/{}/{}/pulls", owner, name);
    let params = ListParams {
        state: "open",
        per_page: 100,
    };

    let first: Page<serde_json::Value> =
        tokio::time::timeout(deadline, client.get(&route, Some(&params)))
            .await
            .map_err(|_| timed_out(&route, deadline))?
            .map_err(|e| classify_error(repo, e))?;

    let items = tokio::time::timeout(deadline, client.all_pages(first))
        .await
        .map_err(|_| timed_out(&route, deadline))?
        .map_err(|e| classify_error(repo, e))?;

    debug!(repo, count = items.len(), "listed open pull requests");

    items
        .into_iter()
        .map(|value| PullRequest::from_json(value, now))
        .collect()
}

fn timed_out(route: &str, deadline: Duration) -> GitHubError {
    warn!(route, ?deadline, "GitHub request timed out");
    GitHubError::Timeout(format!("{} after {:?}", route, deadline))
}

/// Sort an octocrab failure into not-found / bad-token / everything else
fn classify_error(repo: &str, error: octocrab::Error) -> GitHubError {
    match &error {
        octocrab::Error::GitHub { source, .. } => {
            classify_status(repo, source.status_code, &source.message)
        }
        other => GitHubError::UnknownHttp(other.to_string()),
    }
}

fn classify_status(repo: &str, status: StatusCode, message: &str) -> GitHubError {
    match status {
        StatusCode::NOT_FOUND => GitHubError::RepoNotFound(repo.to_string()),
        StatusCode::UNAUTHORIZED => GitHubError::BadGitHubToken(message.to_string()),
        other => GitHubError::UnknownHttp(format!("{}: {}", other, message)),
    }
}
