pub mod client;
pub mod socket;
pub mod types;

pub use client::{ChatApi, SlackClient, SLACK_API_BASE};
pub use socket::SocketModeListener;
pub use types::{PostMessage, PostedMessage, SlackResponse};
