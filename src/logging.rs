//! Installs the `tracing-subscriber` formatter. Records from the `log` macros
//! reach it through the subscriber's `log` bridge.

use log::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no level is given on the command line.
pub const LOG_ENV: &str = "IDLEMOVER_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Command-line level first, then the environment filter, then `info`.
pub fn build_filter(cli_level: Option<LevelFilter>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.to_string().to_ascii_lowercase());
    }
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init(cli_level: Option<LevelFilter>) {
    let env_value = std::env::var(LOG_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level, env_value.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter as Hint;

    #[test]
    fn test_cli_level_wins() {
        let filter = build_filter(Some(LevelFilter::Warn), Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(Hint::WARN));
    }

    #[test]
    fn test_cli_off_silences_everything() {
        let filter = build_filter(Some(LevelFilter::Off), Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(Hint::OFF));
    }

    #[test]
    fn test_env_filter_used_when_cli_absent() {
        let filter = build_filter(None, Some(" debug "));
        assert_eq!(filter.max_level_hint(), Some(Hint::DEBUG));
    }

    #[test]
    fn test_missing_or_blank_env_falls_back_to_info() {
        assert_eq!(build_filter(None, None).max_level_hint(), Some(Hint::INFO));
        assert_eq!(build_filter(None, Some("  ")).max_level_hint(), Some(Hint::INFO));
    }

    #[test]
    fn test_unparsable_env_falls_back_to_info() {
        let filter = build_filter(None, Some("idlemover=loudest"));
        assert_eq!(filter.max_level_hint(), Some(Hint::INFO));
    }
}
