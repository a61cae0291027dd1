//! Load configuration via `config` crate with env-override support.

use std::{net::SocketAddr, ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// Default image shown on the confirmation card.
fn default_card_image_url() -> String {
    "https://raw.githubusercontent.com/GeekTrainer/help-desk-bot-lab/master/assets/botimages/head-smiling-medium.png".to_string()
}

/// Default timeout for ticket submissions over HTTP.
fn default_intake_timeout_secs() -> u64 {
    10
}

/// The channel the bot talks to users through.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// A single conversation over stdin / stdout.
    #[default]
    Console,
    /// Slack, via socket mode.
    Slack,
    /// No conversations; only host the ticket submission endpoint.
    None,
}

/// Configuration for the helpdesk-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Configuration values, shared behind [`Config`].
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Which transport to run conversations over (`TRANSPORT`).
    #[serde(default)]
    pub transport: Transport,
    /// Slack app token (`SLACK_APP_TOKEN`).
    #[serde(default)]
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// Ticket submission endpoint (`INTAKE_ENDPOINT`).
    /// When absent, tickets are submitted to an in-process intake service.
    #[serde(default)]
    pub intake_endpoint: Option<String>,
    /// Address to host the ticket submission endpoint on (`INTAKE_LISTEN_ADDRESS`).
    #[serde(default)]
    pub intake_listen_address: Option<String>,
    /// Timeout, in seconds, for a single HTTP ticket submission (`INTAKE_TIMEOUT_SECS`).
    #[serde(default = "default_intake_timeout_secs")]
    pub intake_timeout_secs: u64,
    /// Image shown on the confirmation card (`CARD_IMAGE_URL`).
    #[serde(default = "default_card_image_url")]
    pub card_image_url: String,
}

impl Config {
    /// Loads the configuration from the environment and an optional TOML file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("HELPDESK_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the cross-field constraints that `serde` cannot express.
    pub fn validate(&self) -> Res<()> {
        if self.transport == Transport::Slack && (self.slack_app_token.is_empty() || self.slack_bot_token.is_empty()) {
            return Err(anyhow::anyhow!("Slack app and bot tokens are required for the slack transport."));
        }

        if self.transport == Transport::None && self.intake_listen_address.is_none() {
            return Err(anyhow::anyhow!("An intake listen address is required when no transport is configured."));
        }

        if self.intake_timeout_secs < 1 || self.intake_timeout_secs > 300 {
            return Err(anyhow::anyhow!("Intake timeout must be between 1 and 300 seconds."));
        }

        if let Some(endpoint) = &self.intake_endpoint {
            reqwest::Url::parse(endpoint).map_err(|e| anyhow::anyhow!("Invalid intake endpoint `{endpoint}`: {e}"))?;
        }

        if let Some(address) = &self.intake_listen_address {
            address.parse::<SocketAddr>().map_err(|e| anyhow::anyhow!("Invalid intake listen address `{address}`: {e}"))?;
        }

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ConfigInner {
        ConfigInner {
            intake_timeout_secs: default_intake_timeout_secs(),
            card_image_url: default_card_image_url(),
            ..Default::default()
        }
    }

    #[test]
    fn console_defaults_are_valid() {
        let config = Config::from(base());

        assert_eq!(config.transport, Transport::Console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn slack_requires_tokens() {
        let config = Config::from(ConfigInner {
            transport: Transport::Slack,
            slack_app_token: "xapp-test".to_string(),
            ..base()
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn headless_requires_listen_address() {
        let config = Config::from(ConfigInner { transport: Transport::None, ..base() });
        assert!(config.validate().is_err());

        let config = Config::from(ConfigInner {
            transport: Transport::None,
            intake_listen_address: Some("127.0.0.1:3978".to_string()),
            ..base()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_endpoint_and_timeout() {
        let config = Config::from(ConfigInner {
            intake_endpoint: Some("not a url".to_string()),
            ..base()
        });
        assert!(config.validate().is_err());

        let config = Config::from(ConfigInner { intake_timeout_secs: 0, ..base() });
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_toml_file() {
        let path = std::env::temp_dir().join(format!("helpdesk-bot-config-{}.toml", std::process::id()));
        std::fs::write(&path, "transport = \"none\"\nintake_listen_address = \"127.0.0.1:3978\"\nintake_timeout_secs = 5\n").unwrap();

        let config = Config::load(Some(&path));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.transport, Transport::None);
        assert_eq!(config.intake_listen_address.as_deref(), Some("127.0.0.1:3978"));
        assert_eq!(config.intake_timeout_secs, 5);
        assert_eq!(config.card_image_url, default_card_image_url());
    }
}
