use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pr_chatops::config::parse_config;
use pr_chatops::github::is_stale;
use pr_chatops::reminder::{reactions_for, render_text, HEADER_TEXT};
use pr_chatops::{
    ChatApi, ChatError, GitHubError, PostMessage, PostedMessage, PullRequest, PullRequestSource,
    ReminderService,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Mock GitHub serving raw API JSON, so records go through `from_json`
struct MockHub {
    created_days_ago: i64,
}

#[async_trait]
impl PullRequestSource for MockHub {
    async fn open_pull_requests(
        &self,
        repo: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let created = now - Duration::days(self.created_days_ago);
        let raw = json!({
            "title": "Add flavour sync",
            "number": 42,
            "user": {"login": "octo-dev"},
            "html_url": format!("https://github.com/{}/pull/42", repo),
            "created_at": created.to_rfc3339(),
            "draft": true,
            "labels": [],
        });
        Ok(vec![PullRequest::from_json(raw, now)?])
    }
}

#[derive(Default)]
struct RecordingSlack {
    posts: Mutex<Vec<PostMessage>>,
    reactions: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ChatApi for RecordingSlack {
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, ChatError> {
        let mut posts = self.posts.lock().unwrap();
        posts.push(message.clone());
        Ok(PostedMessage {
            ts: format!("ts-{}", posts.len()),
            channel: message.channel.clone(),
        })
    }

    async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<(), ChatError> {
        self.reactions.lock().unwrap().push((
            channel.to_string(),
            timestamp.to_string(),
            name.to_string(),
        ));
        Ok(())
    }

    async fn user_display_name(&self, user_id: &str) -> Result<String, ChatError> {
        match user_id {
            "UOCTO" => Ok("Octo Developer".to_string()),
            other => Err(ChatError::UserNotFound(other.to_string())),
        }
    }
}

const CONFIG: &str = r#"
repos: [stfc/cloud-chatops]
users:
  - { github_name: octo-dev, slack_id: UOCTO }
channel: CPRS
"#;

#[tokio::test]
async fn stale_draft_pr_renders_staleness_template() {
    let now = Utc::now();
    let created = now - Duration::days(31);
    assert!(is_stale(created, now));

    let pr = MockHub { created_days_ago: 31 }
        .open_pull_requests("stfc/cloud-chatops", now)
        .await
        .unwrap()
        .remove(0);
    let config = parse_config(CONFIG, "test").unwrap();
    let slack = RecordingSlack::default();

    let text = render_text(&slack, &config.user_map(), &pr).await;
    assert_eq!(
        text,
        "*This PR is older than 30 days. Consider closing it:*\n\
         Pull Request: <https://github.com/stfc/cloud-chatops/pull/42|Add flavour sync #42>\n\
         Author: Octo Developer"
    );
    assert_eq!(reactions_for(&pr), vec!["alarm_clock", "building_construction"]);
}

#[tokio::test]
async fn global_reminder_end_to_end() {
    let config = Arc::new(parse_config(CONFIG, "test").unwrap());
    let slack = Arc::new(RecordingSlack::default());
    let service = ReminderService::new(
        config,
        Arc::new(MockHub { created_days_ago: 31 }),
        slack.clone(),
    );

    let report = service.run_global("CPRS").await.unwrap();
    assert_eq!(report.posted, 2);
    assert_eq!(report.reactions_added, 2);

    let posts = slack.posts.lock().unwrap().clone();
    assert_eq!(posts[0].text, HEADER_TEXT);
    assert_eq!(posts[1].thread_ts.as_deref(), Some("ts-1"));
    assert!(!posts[1].unfurl_links);

    let reactions = slack.reactions.lock().unwrap().clone();
    assert_eq!(
        reactions,
        vec![
            ("CPRS".to_string(), "ts-2".to_string(), "alarm_clock".to_string()),
            ("CPRS".to_string(), "ts-2".to_string(), "building_construction".to_string()),
        ]
    );
}

#[tokio::test]
async fn fresh_draft_pr_has_no_preamble() {
    let now = Utc::now();
    let pr = MockHub { created_days_ago: 3 }
        .open_pull_requests("stfc/cloud-chatops", now)
        .await
        .unwrap()
        .remove(0);
    assert!(!pr.stale);
    let config = parse_config(CONFIG, "test").unwrap();
    let text = render_text(&RecordingSlack::default(), &config.user_map(), &pr).await;
    assert_eq!(
        text,
        "Pull Request: <https://github.com/stfc/cloud-chatops/pull/42|Add flavour sync #42>\n\
         Author: Octo Developer"
    );
    // drafts are marked only by their reaction
    assert_eq!(reactions_for(&pr), vec!["building_construction"]);
}
