use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source-hosting username -> chat user identifier
pub type UserMap = HashMap<String, String>;

/// Bot configuration, read once at startup and passed by reference afterwards.
///
/// Example YAML:
/// ```yaml
/// repos:
///   - stfc/cloud-chatops
/// users:
///   - github_name: alice
///     slack_id: U01ABCDEF
/// channel: C03RT2F6WHZ
/// schedule:
///   - { reminder: global, day: monday, at: "09:00" }
///   - { reminder: personal, day: monday, at: "09:00", message_no_prs: false }
/// request_timeout: 30s
/// poll_interval: 10s
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repositories to query, in "owner/repo" form
    #[serde(default)]
    pub repos: Vec<String>,

    #[serde(default)]
    pub users: Vec<User>,

    /// Channel that receives the global reminder
    #[serde(default)]
    pub channel: String,

    #[serde(default = "default_schedule")]
    pub schedule: Vec<ScheduleEntry>,

    /// Deadline applied to every external call (humantime format)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    /// Scheduler tick (humantime format)
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub github_name: String,
    pub slack_id: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Global,
    Personal,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEntry {
    pub reminder: ReminderKind,
    /// Weekday name, e.g. "monday" or "wed"
    pub day: String,
    /// Local time of day, "HH:MM"
    pub at: String,
    /// Personal reminders only: tell users when they have nothing open
    #[serde(default)]
    pub message_no_prs: bool,
}

pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_POLL_INTERVAL: &str = "10s";

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_poll_interval() -> String {
    DEFAULT_POLL_INTERVAL.to_string()
}

/// Global reminder Monday and Wednesday at 09:00, personal reminder Monday at 09:00
pub fn default_schedule() -> Vec<ScheduleEntry> {
    let entry = |reminder, day: &str| ScheduleEntry {
        reminder,
        day: day.to_string(),
        at: "09:00".to_string(),
        message_no_prs: false,
    };
    vec![
        entry(ReminderKind::Global, "monday"),
        entry(ReminderKind::Global, "wednesday"),
        entry(ReminderKind::Personal, "monday"),
    ]
}

impl Config {
    /// Build the username -> chat id lookup used by the composer
    pub fn user_map(&self) -> UserMap {
        self.users
            .iter()
            .map(|u| (u.github_name.clone(), u.slack_id.clone()))
            .collect()
    }

    /// Find the configured user behind a chat identity
    pub fn user_by_slack_id(&self, slack_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.slack_id == slack_id)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        humantime::parse_duration(&self.request_timeout).unwrap_or_else(|_| {
            humantime::parse_duration(DEFAULT_REQUEST_TIMEOUT).unwrap_or_default()
        })
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        humantime::parse_duration(&self.poll_interval).unwrap_or_else(|_| {
            humantime::parse_duration(DEFAULT_POLL_INTERVAL).unwrap_or_default()
        })
    }
}
