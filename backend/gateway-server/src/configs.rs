use std::{net::SocketAddr, path::PathBuf};

use common_utils::consts;
use domain_types::types::{Connectors, Proxy};
use hyperswitch_masking::Secret;

use crate::{error::ConfigurationError, logger::config::Log};

/// Prefix of environment variables overriding file values, e.g. `GW__SERVER__PORT`
const ENV_PREFIX: &str = "GW";

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    pub server: Listener,
    pub metrics: Listener,
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub connectors: Connectors,
    #[serde(default)]
    pub stripe: StripeConfig,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: Environment,
}

/// Deployment environment. Anything else is rejected while the file is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

/// Address a server binds to
#[derive(Clone, serde::Deserialize, Debug)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

/// Account level Stripe credentials
#[derive(Clone, serde::Deserialize, Debug, Default)]
pub struct StripeConfig {
    /// Used when a request carries no `x-api-key` header
    pub secret_key: Option<Secret<String>>,
    /// Webhook signing secret. Signatures are only checked when this is set.
    pub webhook_secret: Option<Secret<String>>,
    pub webhook_tolerance_secs: Option<i64>,
}

impl StripeConfig {
    fn validate(&self) -> Result<(), config::ConfigError> {
        match self.webhook_tolerance_secs {
            Some(tolerance) if tolerance <= 0 => Err(config::ConfigError::Message(format!(
                "stripe.webhook_tolerance_secs must be positive, got {tolerance}"
            ))),
            _ => Ok(()),
        }
    }
}

impl Config {
    /// Reads the profile's default file, then environment overrides
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = config::Config::builder()
            // the build profile always wins over a file value
            .set_override("env", env.to_string())?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.stripe.validate()?;

        Ok(config)
    }

    /// `config/<profile>.toml` under the workspace unless a path is given
    pub fn config_path(environment: &consts::Env, explicit_config_path: Option<PathBuf>) -> PathBuf {
        explicit_config_path.unwrap_or_else(|| {
            workspace_path()
                .join("config")
                .join(environment.config_path())
        })
    }
}

impl Listener {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        Ok(SocketAddr::new(self.host.parse()?, self.port))
    }

    pub async fn tcp_listener(&self) -> Result<tokio::net::TcpListener, ConfigurationError> {
        let addr = self.socket_addr()?;
        tracing::info!(%addr, "binding listener");
        Ok(tokio::net::TcpListener::bind(addr).await?)
    }
}

pub fn workspace_path() -> PathBuf {
    std::env::var("CARGO_MANIFEST_DIR").map_or_else(
        |_| PathBuf::from("."),
        |manifest_dir| {
            let mut path = PathBuf::from(manifest_dir);
            path.pop();
            path.pop();
            path
        },
    )
}
