//! Logging subscriber initialisation.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::MakeWriter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("a global subscriber is already installed")]
    Subscriber(#[from] TryInitError),
}

/// Installs the global subscriber, writing formatted events to `writer`.
///
/// # Errors
///
/// Returns an error if a global subscriber was already set.
pub fn init_logging<W>(config: &LoggingConfig, writer: W) -> Result<(), ObservabilityError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer(config, writer))
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},reqwest=warn,hyper=warn", config.log_level))
    })
}

fn fmt_layer<W>(config: &LoggingConfig, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true);

    match (config.log_format, config.timestamps) {
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Json, true) => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        (LogFormat::Json, false) => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .without_time()
            .boxed(),
    }
}
