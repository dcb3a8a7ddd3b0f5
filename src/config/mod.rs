mod schema;

pub use schema::{
    default_schedule, Config, ReminderKind, ScheduleEntry, User, UserMap,
    DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};

use crate::error::ConfigError;
use crate::schedule::Trigger;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/pr-chatops/)
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.config",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
        .join("pr-chatops")
}

/// Get the default config file path (~/.config/pr-chatops/config.yml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yml")
}

/// Load and validate configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pr-chatops/config.yml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist or cannot be read
/// - The YAML cannot be parsed
/// - Any required value is missing or malformed (all problems are reported together)
pub fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let config_path = path.unwrap_or_else(get_config_path);
    let content = read_file(&config_path)?;
    let config = parse_config(&content, &config_path.display().to_string())?;
    validate_config(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

/// Parse config YAML without validating it
pub fn parse_config(content: &str, origin: &str) -> Result<Config, ConfigError> {
    serde_saphyr::from_str(content).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.repos.is_empty() {
        errors.push("repos: does not contain any repositories".to_string());
    }
    for (i, repo) in config.repos.iter().enumerate() {
        if split_repo(repo).is_none() {
            errors.push(format!("repos[{}]: '{}' must be in 'owner/repo' form", i, repo));
        }
    }

    if config.users.is_empty() {
        errors.push("users: is not set".to_string());
    }
    for (i, user) in config.users.iter().enumerate() {
        if user.github_name.trim().is_empty() {
            errors.push(format!("users[{}].github_name: must not be empty", i));
        }
        if user.slack_id.trim().is_empty() {
            errors.push(format!("users[{}].slack_id: must not be empty", i));
        }
    }

    if config.channel.trim().is_empty() {
        errors.push("channel: is not set".to_string());
    }

    for (i, entry) in config.schedule.iter().enumerate() {
        if let Err(e) = Trigger::parse(&entry.day, &entry.at) {
            errors.push(format!("schedule[{}]: {}", i, e));
        }
    }

    for (key, value) in [
        ("request_timeout", &config.request_timeout),
        ("poll_interval", &config.poll_interval),
    ] {
        match humantime::parse_duration(value) {
            Ok(d) if d.is_zero() => errors.push(format!("{}: must be greater than zero", key)),
            Ok(_) => {}
            Err(e) => errors.push(format!("{}: invalid '{}' - {}", key, value, e)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Split "owner/repo" into its two non-empty halves
pub fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}
