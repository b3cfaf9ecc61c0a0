//! Bot configuration management.
//!
//! Configuration is stored as TOML. The file is looked up in this order:
//! - the first command-line argument
//! - `$TURNPOST_CONFIG`
//! - `turnpost.toml` in the working directory
//!
//! Credentials and the bot id can be overridden from the environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use turnpost_dispatch::{Pacing, PollConfig, RejectionPolicy};
use turnpost_oauth::Credentials;

pub const DEFAULT_CONFIG_FILE: &str = "turnpost.toml";

/// Bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Numeric id of the bot account; replies to it are moves.
    #[serde(default)]
    pub bot_user_id: String,

    /// Seconds between mention fetches.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Seconds to wait before the first fetch.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,

    /// Pause after each player lookup, in milliseconds.
    #[serde(default = "default_lookup_delay")]
    pub lookup_delay_ms: u64,

    /// File holding the newest processed mention id.
    #[serde(default = "default_watermark_path")]
    pub watermark_path: PathBuf,

    /// Used when the watermark file does not exist yet.
    #[serde(default)]
    pub initial_watermark: Option<String>,

    #[serde(default)]
    pub rejection_policy: RejectionPolicy,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// The `[credentials]` table.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_credentials(), f)
    }
}

impl CredentialsConfig {
    pub fn to_credentials(&self) -> Credentials {
        Credentials {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            access_token: self.access_token.clone(),
            access_token_secret: self.access_token_secret.clone(),
        }
    }
}

fn default_poll_interval() -> u64 {
    15
}

fn default_startup_delay() -> u64 {
    2
}

fn default_lookup_delay() -> u64 {
    200
}

fn default_watermark_path() -> PathBuf {
    PathBuf::from("last_mention_id.txt")
}

fn default_api_base_url() -> String {
    turnpost_twitter::DEFAULT_API_BASE_URL.into()
}

fn default_upload_base_url() -> String {
    turnpost_twitter::DEFAULT_UPLOAD_BASE_URL.into()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_user_id: String::new(),
            poll_interval_secs: default_poll_interval(),
            startup_delay_secs: default_startup_delay(),
            lookup_delay_ms: default_lookup_delay(),
            watermark_path: default_watermark_path(),
            initial_watermark: None,
            rejection_policy: RejectionPolicy::default(),
            api_base_url: default_api_base_url(),
            upload_base_url: default_upload_base_url(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl BotConfig {
    /// Loads configuration from `path`, or returns defaults if the file
    /// does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: BotConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration read");
        Ok(config)
    }

    /// Applies the environment overrides. `lookup` is `std::env::var` in
    /// production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let creds = &mut self.credentials;
        let targets: [(&str, &mut String); 5] = [
            ("CONSUMER_KEY", &mut creds.consumer_key),
            ("CONSUMER_SECRET", &mut creds.consumer_secret),
            ("ACCESS_TOKEN", &mut creds.access_token),
            ("ACCESS_TOKEN_SECRET", &mut creds.access_token_secret),
            ("BOT_USER_ID", &mut self.bot_user_id),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }

    /// Fails when a credential or the bot id is missing.
    pub fn validate(&self) -> anyhow::Result<()> {
        let creds = &self.credentials;
        let missing: Vec<&str> = [
            ("consumer_key", creds.consumer_key.as_str()),
            ("consumer_secret", creds.consumer_secret.as_str()),
            ("access_token", creds.access_token.as_str()),
            ("access_token_secret", creds.access_token_secret.as_str()),
            ("bot_user_id", self.bot_user_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!("missing configuration: {}", missing.join(", "));
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::new(Duration::from_millis(self.lookup_delay_ms))
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            startup_delay: Duration::from_secs(self.startup_delay_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            initial_watermark: self
                .initial_watermark
                .clone()
                .filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Resolves the config file path from the CLI argument and
/// `$TURNPOST_CONFIG`.
pub fn config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("CONSUMER_KEY", "ck".to_string()),
            ("CONSUMER_SECRET", "cs".to_string()),
            ("ACCESS_TOKEN", "at".to_string()),
            ("ACCESS_TOKEN_SECRET", "ats".to_string()),
            ("BOT_USER_ID", "42".to_string()),
        ])
    }

    #[test]
    fn default_config_values() {
        let config = BotConfig::default();
        assert_eq!(config.poll_interval_secs, 15);
        assert_eq!(config.startup_delay_secs, 2);
        assert_eq!(config.lookup_delay_ms, 200);
        assert_eq!(config.watermark_path, PathBuf::from("last_mention_id.txt"));
        assert_eq!(config.rejection_policy, RejectionPolicy::Silent);
        assert_eq!(config.api_base_url, "https://api.twitter.com/1.1");
        assert_eq!(config.upload_base_url, "https://upload.twitter.com/1.1");
        assert!(config.initial_watermark.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            bot_user_id = "1234"
            rejection_policy = "reply"

            [credentials]
            consumer_key = "key"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot_user_id, "1234");
        assert_eq!(config.rejection_policy, RejectionPolicy::Reply);
        assert_eq!(config.credentials.consumer_key, "key");
        assert_eq!(config.credentials.consumer_secret, "");
        assert_eq!(config.poll_interval_secs, 15);
    }

    #[test]
    fn serialize_roundtrip() {
        let mut config = BotConfig::default();
        config.bot_user_id = "99".into();
        config.initial_watermark = Some("1000".into());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: BotConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.bot_user_id, "99");
        assert_eq!(parsed.initial_watermark.as_deref(), Some("1000"));
        assert_eq!(parsed.lookup_delay_ms, config.lookup_delay_ms);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.poll_interval_secs, 15);
        assert!(config.bot_user_id.is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnpost.toml");
        std::fs::write(&path, "poll_interval_secs = 30\nwatermark_path = \"state/id.txt\"\n")
            .unwrap();
        let config = BotConfig::load_from(&path).unwrap();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.watermark_path, PathBuf::from("state/id.txt"));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnpost.toml");
        std::fs::write(&path, "poll_interval_secs = \"soon\"").unwrap();
        assert!(BotConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = BotConfig::default();
        config.credentials.consumer_key = "from-file".into();
        config.bot_user_id = "1".into();

        let env = full_env();
        config.apply_env(|key| env.get(key).cloned());

        assert_eq!(config.credentials.consumer_key, "ck");
        assert_eq!(config.credentials.access_token_secret, "ats");
        assert_eq!(config.bot_user_id, "42");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = BotConfig::default();
        config.bot_user_id = "7".into();
        config.apply_env(|key| (key == "BOT_USER_ID").then(String::new));
        assert_eq!(config.bot_user_id, "7");
    }

    #[test]
    fn validate_names_missing_values() {
        let mut config = BotConfig::default();
        let env = full_env();
        config.apply_env(|key| (key != "ACCESS_TOKEN").then(|| env[key].clone()));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("access_token"), "{err}");
        assert!(!err.contains("consumer_key"), "{err}");

        let mut empty = BotConfig::default();
        let err = empty.validate().unwrap_err().to_string();
        assert!(err.contains("bot_user_id"), "{err}");
        empty.apply_env(|key| env.get(key).cloned());
        empty.poll_interval_secs = 0;
        assert!(empty.validate().is_err());
    }

    #[test]
    fn poll_config_and_pacing_follow_settings() {
        let mut config = BotConfig::default();
        config.poll_interval_secs = 20;
        config.startup_delay_secs = 0;
        config.lookup_delay_ms = 50;
        config.initial_watermark = Some("  ".into());

        let poll = config.poll_config();
        assert_eq!(poll.poll_interval, Duration::from_secs(20));
        assert_eq!(poll.startup_delay, Duration::ZERO);
        assert!(poll.initial_watermark.is_none());
        assert_eq!(config.pacing(), Pacing::new(Duration::from_millis(50)));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let mut config = BotConfig::default();
        config.credentials.consumer_secret = "very-secret".into();
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn config_path_precedence() {
        assert_eq!(
            config_path(Some("a.toml".into()), Some("b.toml".into())),
            PathBuf::from("a.toml")
        );
        assert_eq!(config_path(None, Some("b.toml".into())), PathBuf::from("b.toml"));
        assert_eq!(config_path(None, None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(config_path(None, Some(String::new())), PathBuf::from(DEFAULT_CONFIG_FILE));
    }
}
