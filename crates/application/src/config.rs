//! Dispatcher configuration loaded from environment variables.

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Dispatcher configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DISPATCH_MAX_CONCURRENCY`: event handlers run at once (default: `1`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `"json"` for JSON logs (default: plain text)
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub max_concurrent_handlers: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl DispatcherConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_handlers: lookup("DISPATCH_MAX_CONCURRENCY")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .map_or(defaults.max_concurrent_handlers, |limit| limit.max(1)),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        }
    }

    /// Returns a copy that runs up to `limit` event handlers at once.
    pub fn with_max_concurrent_handlers(mut self, limit: usize) -> Self {
        self.max_concurrent_handlers = limit.max(1);
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_handlers: 1,
            log_level: "info".to_string(),
            log_format: LogFormat::Plain,
        }
    }
}
