pub mod compose;
pub mod dispatch;
pub mod modes;

#[cfg(test)]
pub(crate) mod testing;

pub use compose::{compose_all, reactions_for, render_text, Message, DRAFT_REACTION, STALE_REACTION};
pub use dispatch::{DispatchReport, PrReminder, HEADER_TEXT, NO_PRS_TEXT};
pub use modes::{ReminderJob, ReminderService};
