//! Portal configuration

use clap::Parser;
use thiserror::Error;

pub use crate::config::{
    backend::{BackendConfig, Endpoints},
    checkout::CheckoutConfig,
    logging::{LogFormat, LoggingConfig},
};

pub(crate) mod backend;
pub(crate) mod checkout;
pub(crate) mod logging;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration")]
    Parse(#[from] clap::Error),

    #[error("no {0} endpoint configured and no page origin to derive it from")]
    MissingEndpoint(&'static str),
}

/// Pedido Listo portal configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "pedido-listo", about = "Pedido Listo ordering portal", long_about = None)]
pub struct PortalConfig {
    /// Backend endpoints.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Order submission settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Parse configuration from explicit arguments, as the browser build does.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }
}
