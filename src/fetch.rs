use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::GitHubError;
use crate::github::{list_open_prs, PullRequest};

/// Anything that can list the open pull requests of one repository.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Open PRs of `repo` ("owner/repo"); staleness is computed against `now`
    async fn open_pull_requests(
        &self,
        repo: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, GitHubError>;
}

/// The real source: GitHub's REST API through octocrab
pub struct GitHubSource {
    client: Octocrab,
    deadline: Duration,
}

impl GitHubSource {
    pub fn new(client: Octocrab, deadline: Duration) -> Self {
        Self { client, deadline }
    }
}

#[async_trait]
impl PullRequestSource for GitHubSource {
    async fn open_pull_requests(
        &self,
        repo: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        list_open_prs(&self.client, repo, now, self.deadline).await
    }
}

/// Fetch open PRs from all configured repositories into one flat list.
///
/// One "now" is taken for the whole batch so staleness is consistent across
/// repositories. The first failing repository aborts the fetch.
pub async fn fetch_prs(
    source: &dyn PullRequestSource,
    repos: &[String],
) -> Result<Vec<PullRequest>, GitHubError> {
    fetch_prs_at(source, repos, Utc::now()).await
}

/// [`fetch_prs`] with an explicit batch time
pub async fn fetch_prs_at(
    source: &dyn PullRequestSource,
    repos: &[String],
    now: DateTime<Utc>,
) -> Result<Vec<PullRequest>, GitHubError> {
    let mut all_prs = Vec::new();

    for repo in repos {
        let prs = source.open_pull_requests(repo, now).await?;
        debug!(repo = %repo, count = prs.len(), "fetched pull requests");
        all_prs.extend(prs);
    }

    // Deduplicate PRs by URL (a repository may be listed twice)
    let mut seen_urls = HashSet::new();
    let unique_prs: Vec<_> = all_prs
        .into_iter()
        .filter(|pr| seen_urls.insert(pr.url.clone()))
        .collect();

    info!(
        repos = repos.len(),
        prs = unique_prs.len(),
        "fetched open pull requests"
    );

    Ok(unique_prs)
}
