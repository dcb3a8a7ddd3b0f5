//! Open pull request reminders for Slack.
//!
//! Open PRs are fetched from the configured GitHub repositories, sorted
//! oldest first, and posted to Slack as a header message with one threaded
//! reply per PR. Stale and draft PRs get reactions. Reminders run on a
//! weekly schedule and on demand through the `/prs` slash command.

pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod github;
pub mod reminder;
pub mod schedule;
pub mod slack;

pub use config::{Config, User, UserMap};
pub use credentials::Secrets;
pub use error::{ChatError, ConfigError, GitHubError, ReminderError};
pub use fetch::{fetch_prs, GitHubSource, PullRequestSource};
pub use github::{filter_by, sort_by, PrField, PullRequest};
pub use reminder::{DispatchReport, Message, PrReminder, ReminderJob, ReminderService};
pub use slack::{ChatApi, PostMessage, PostedMessage, SlackClient};
