pub mod find_host;
pub mod handler;
pub mod prs;
pub mod registry;

pub use find_host::FindHostCommand;
pub use handler::{CommandHandler, Response, SlashCommand};
pub use prs::PrsCommand;
pub use registry::CommandRegistry;

use std::sync::Arc;

use crate::reminder::ReminderService;

/// The registry with every command the bot answers
pub fn default_registry(service: ReminderService) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(PrsCommand::new(service)));
    registry.register(Arc::new(FindHostCommand::from_env()));
    registry
}
