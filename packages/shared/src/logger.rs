//! Logging setup utilities for the Irori chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for both the application crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// Log lines go to stderr: stdout carries the chat stream itself.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "irori", "irori-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use irori_shared::logger::setup_logger;
///
/// setup_logger("irori-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the default `EnvFilter` directive string.
///
/// Crate and binary names are normalized to their module-path form
/// (`irori-server` -> `irori_server`), which is what `tracing` targets use.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "irori_server={level},irori_client={level},{}={level}",
        binary_name.replace('-', "_"),
        level = default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "irori-server";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert!(filter.ends_with("irori_server=debug"));
        assert!(filter.contains("irori_client=debug"));
        assert!(!filter.contains('-'));
    }
}
