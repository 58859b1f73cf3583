use crate::LogFormat;
use tracing::{dispatcher::SetGlobalDefaultError, subscriber};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

type LoggerResult<T> = Result<T, SetGlobalDefaultError>;

const ENGINE_CRATES: [&str; 5] = ["cud_engine", "cud_core", "request_handlers", "memory_connector", "cud_connector"];

/// An installer for a global logger.
#[derive(Debug, Clone)]
pub struct Logger {
    service_name: &'static str,
    log_format: LogFormat,
    log_level: String,
}

impl Logger {
    /// Initialize a new global logger installer.
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            log_format: LogFormat::Text,
            log_level: "info".to_owned(),
        }
    }

    /// Sets the STDERR log output format. Default: Text.
    pub fn log_format(&mut self, log_format: LogFormat) {
        self.log_format = log_format;
    }

    /// Sets the level of the engine crates. Default: info.
    pub fn log_level(&mut self, log_level: impl Into<String>) {
        self.log_level = log_level.into();
    }

    /// Install logger as a global. Can be called only once per application instance.
    pub fn install(&self) -> LoggerResult<()> {
        let filter = create_env_filter(&self.log_level);

        let fmt_layer = match self.log_format {
            LogFormat::Text => tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
        };

        subscriber::set_global_default(tracing_subscriber::registry().with(fmt_layer))?;
        tracing::debug!(service = self.service_name, "installed logger");

        Ok(())
    }
}

/// `RUST_LOG` directives, followed by the engine crates at `log_level`.
fn create_env_filter(log_level: &str) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    for krate in ENGINE_CRATES {
        if let Ok(directive) = format!("{krate}={log_level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}
