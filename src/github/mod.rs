pub mod client;
pub mod filter;
pub mod pulls;
pub mod types;

pub use client::create_client;
pub use filter::{filter_by, filter_by_label, sort_by, FieldValue, PrField};
pub use pulls::list_open_prs;
pub use types::{is_stale, PullRequest, STALE_AFTER_DAYS};
