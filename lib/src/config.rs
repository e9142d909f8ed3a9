use serde::Deserialize;

use crate::mailgun::api;

pub const DEFAULT_PATH: &str = "/etc/dispatch/dispatch.toml";
const ENV_PREFIX: &str = "MAILGUN";

/// Connection settings for the Mailgun client, plus the addresses used by
/// the demo sends.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub domain: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub test_recipient_1: Option<String>,
    pub test_recipient_2: Option<String>,
}

/// Loads settings from an optional TOML file and merges them with any
/// environment variables prefixed with `MAILGUN_` (e.g. `MAILGUN_API_KEY`).
///
/// A missing file is not an error. `domain` and `api_key` have no default.
pub fn load_settings(path: Option<&str>) -> Result<Settings, config::ConfigError> {
    load_settings_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
}

fn load_settings_with_env(
    path: Option<&str>,
    env: config::Environment,
) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .set_default("base_url", api::MAILGUN_BASE_API)?
        .set_default("timeout_secs", api::MAILGUN_REQUEST_TIMEOUT as i64)?
        .add_source(config::File::with_name(path.unwrap_or(DEFAULT_PATH)).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()
}
