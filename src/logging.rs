use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, Settings};

static INIT: Once = Once::new();

/// Installs the global tracing subscriber. Safe to call more than once.
pub fn init(settings: &Settings) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = fmt().with_env_filter(filter).with_target(true);

        // Lambda already stamps each log line.
        let installed = match settings.log_format {
            LogFormat::Json => builder.json().without_time().with_current_span(false).try_init(),
            LogFormat::Pretty => builder.try_init(),
        };

        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}
