//! Setup logging subsystem.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::config;
use crate::error::ConfigurationError;

/// Crates of this workspace, logged at the configured level rather than the default one
const WORKSPACE_CRATES: &[&str] = &[
    "gateway_server",
    "connector_integration",
    "external_services",
    "domain_types",
    "interfaces",
    "gateway_api_types",
    "gateway_common_utils",
    "gateway_common_enums",
];

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Result<TelemetryGuard, ConfigurationError> {
    let mut guards = Vec::new();

    let console_layer = if config.console.enabled {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let level = config.console.level.into_level();
        let directive = config
            .console
            .filtering_directive
            .clone()
            .unwrap_or_else(|| {
                get_envfilter_directive(tracing::Level::WARN, level, crates_to_filter.as_ref())
            });
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(directive);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_target(true)
                .with_writer(writer)
                .boxed(),
            config::LogFormat::Json => {
                // Disable color or emphasis related ANSI escape codes for JSON formats
                error_stack::Report::set_color_mode(error_stack::fmt::ColorMode::None);

                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_writer(writer)
                    .boxed()
            }
        };
        Some(layer.with_filter(filter))
    } else {
        None
    };

    tracing_subscriber::registry().with(console_layer).try_init()?;

    tracing::info!(
        service_name,
        build_version = crate::version!(),
        "Logging subsystem initialized"
    );

    // Logs are flushed until the returned guard is dropped
    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}

fn get_envfilter_directive(
    default_log_level: tracing::Level,
    filter_log_level: tracing::Level,
    crates_to_filter: &[&'static str],
) -> String {
    std::iter::once(default_log_level.to_string())
        .chain(
            WORKSPACE_CRATES
                .iter()
                .chain(crates_to_filter)
                .map(|crate_name| format!("{}={filter_log_level}", crate_name.replace('-', "_"))),
        )
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_starts_with_the_default_level() {
        let directive =
            get_envfilter_directive(tracing::Level::WARN, tracing::Level::DEBUG, &["tower-http"]);
        assert!(directive.starts_with("WARN,"));
        assert!(directive.contains("connector_integration=DEBUG"));
        assert!(directive.ends_with("tower_http=DEBUG"));
    }
}
