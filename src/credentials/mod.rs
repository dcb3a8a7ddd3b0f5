use crate::error::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const SLACK_APP_TOKEN: &str = "SLACK_APP_TOKEN";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// The three tokens the bot needs. Debug output never shows the values.
#[derive(Clone)]
pub struct Secrets {
    /// Authenticates Web API calls (xoxb-...)
    pub slack_bot_token: String,
    /// Authenticates the Socket Mode connection (xapp-...)
    pub slack_app_token: String,
    pub github_token: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("slack_bot_token", &"<redacted>")
            .field("slack_app_token", &"<redacted>")
            .field("github_token", &"<redacted>")
            .finish()
    }
}

/// Raw secrets.yml contents: token name -> value
type SecretsFile = HashMap<String, Option<String>>;

/// Get the default secrets file path (~/.config/pr-chatops/secrets.yml)
pub fn get_secrets_path() -> PathBuf {
    crate::config::get_config_dir().join("secrets.yml")
}

/// Read a token from the environment. Returns None when unset or blank.
pub fn get_token_from_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Load secrets from the YAML secrets file, letting same-named environment
/// variables override each entry. The file may be absent if every token
/// comes from the environment.
pub fn load_secrets(path: Option<PathBuf>) -> Result<Secrets, ConfigError> {
    load_secrets_with(path, get_token_from_env)
}

fn load_secrets_with<F>(path: Option<PathBuf>, env: F) -> Result<Secrets, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.unwrap_or_else(get_secrets_path);
    let file = if path.exists() {
        let content = crate::config::read_file(&path)?;
        parse_secrets(&content, &path.display().to_string())?
    } else {
        SecretsFile::default()
    };

    let token = |name: &'static str| -> Result<String, ConfigError> {
        env(name)
            .or_else(|| {
                file
                    .get(name)
                    .cloned()
                    .flatten()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
            .ok_or(ConfigError::MissingToken(name))
    };

    Ok(Secrets {
        slack_bot_token: token(SLACK_BOT_TOKEN)?,
        slack_app_token: token(SLACK_APP_TOKEN)?,
        github_token: token(GITHUB_TOKEN)?,
    })
}

fn parse_secrets(content: &str, origin: &str) -> Result<SecretsFile, ConfigError> {
    if content.trim().is_empty() {
        return Ok(SecretsFile::default());
    }
    serde_saphyr::from_str(content).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}
