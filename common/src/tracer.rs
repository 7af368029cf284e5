//! Installs the global tracing subscriber used by the binaries.
//!
//! Logs are written to stderr, leaving stdout free for the output handed to external consumers.
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

/// Filter used when neither the options nor `RUST_LOG` specify one.
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("Cannot install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Options controlling the subscriber installed by [init_tracer].
#[derive(Debug, Default, Clone)]
pub struct TracerOptions<'a> {
    /// If set, overrides the `RUST_LOG` environment variable.
    log_filter: Option<&'a str>,
}

impl<'a> TracerOptions<'a> {
    pub fn new(log_filter: Option<&'a str>) -> Self {
        Self { log_filter }
    }

    fn env_filter(&self) -> Result<EnvFilter, TracerError> {
        match self.log_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// Installs a formatting subscriber filtered according to `options`.
///
/// Fails if the filter cannot be parsed or if a global subscriber has already been installed.
pub fn init_tracer(options: TracerOptions) -> Result<(), TracerError> {
    let filter = options.env_filter()?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
