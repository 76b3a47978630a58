//! Run settings resolved from command-line flags and the environment.

use std::env;
use std::path::PathBuf;

/// Environment variable naming a custom templates file.
pub const TEMPLATES_ENV: &str = "CLASSGEN_TEMPLATES";
/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "CLASSGEN_LOG";
/// Filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// YAML file overriding built-in templates by name.
    pub templates_path: Option<PathBuf>,
    /// Also generate relational table helper classes.
    pub tables: bool,
}

impl Settings {
    /// Resolves settings, letting explicit flags win over the environment.
    #[must_use]
    pub fn resolve(templates_flag: Option<PathBuf>, tables: bool) -> Self {
        Self::resolve_with(templates_flag, tables, |key| env::var(key).ok())
    }

    /// Like [`Settings::resolve`], reading variables through `lookup`.
    #[must_use]
    pub fn resolve_with(
        templates_flag: Option<PathBuf>,
        tables: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let templates_path = templates_flag
            .or_else(|| lookup(TEMPLATES_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));
        Self { templates_path, tables }
    }
}

/// Log filter directive from [`LOG_ENV`], falling back to [`DEFAULT_LOG_FILTER`].
#[must_use]
pub fn log_filter() -> String {
    env::var(LOG_ENV).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
