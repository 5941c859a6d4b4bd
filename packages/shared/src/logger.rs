//! Logging setup utilities for Hayaoshi binaries.

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-field default formatter
    #[default]
    Full,
    /// Single-line formatter with abbreviated fields
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Build the default filter directive for the given crate and binary names.
///
/// Cargo names use `-` while tracing targets use `_`, so both are normalized.
pub fn default_directive(crate_name: &str, binary_name: &str, level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        level,
        binary_name.replace('-', "_"),
        level,
        level
    )
}

/// Initialize the tracing subscriber.
///
/// The filter can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose logs should be shown (e.g., "hayaoshi-server")
/// * `binary_name` - The name of the binary (e.g., "hayaoshi-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
/// * `format` - Output format of each log line
///
/// # Examples
///
/// ```no_run
/// use hayaoshi_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger("hayaoshi-server", "hayaoshi-server", "info", LogFormat::Compact);
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(crate_name, binary_name, default_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Full => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parses_case_insensitively() {
        // テスト項目: ログ形式の文字列が大文字小文字を区別せずにパースされる
        // given (前提条件):
        let inputs = ["full", "COMPACT", "Compact"];

        // when (操作):
        let parsed: Vec<LogFormat> = inputs.iter().map(|s| s.parse().unwrap()).collect();

        // then (期待する結果):
        assert_eq!(
            parsed,
            vec![LogFormat::Full, LogFormat::Compact, LogFormat::Compact]
        );
    }

    #[test]
    fn test_log_format_rejects_unknown_value() {
        // テスト項目: 未知のログ形式はエラーになる
        // given (前提条件):
        let input = "json";

        // when (操作):
        let result = input.parse::<LogFormat>();

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_default_directive_normalizes_names() {
        // テスト項目: クレート名とバイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "hayaoshi-server";
        let binary_name = "hayaoshi-server";

        // when (操作):
        let directive = default_directive(crate_name, binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "hayaoshi_server=debug,hayaoshi_server=debug,tower_http=debug"
        );
    }
}
