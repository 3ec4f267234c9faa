//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
///
/// Every section has defaults, so an empty configuration is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger view configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Batch scoping configuration.
    #[serde(default)]
    pub scope: ScopeConfig,
    /// Receipt numbering configuration.
    #[serde(default)]
    pub receipt: ReceiptConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger view configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Display ordering used when the caller does not pick one.
    #[serde(default = "default_sort")]
    pub default_sort: String,
    /// Whether the ledger hides non-financial entries by default.
    #[serde(default)]
    pub financial_only: bool,
}

fn default_sort() -> String {
    "date-newest".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            financial_only: false,
        }
    }
}

/// What a batch filter returns when asked for a batch it does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeFallback {
    /// Return the collection untouched.
    Unfiltered,
    /// Return nothing.
    #[default]
    Empty,
}

/// Batch scoping configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    /// Reference batch set; empty accepts any batch label.
    #[serde(default)]
    pub known_batches: Vec<String>,
    /// Policy for unknown batch labels.
    #[serde(default)]
    pub fallback: ScopeFallback,
}

/// Receipt numbering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptConfig {
    /// Receipt number prefix.
    #[serde(default = "default_receipt_prefix")]
    pub prefix: String,
}

fn default_receipt_prefix() -> String {
    "RCT".to_string()
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            prefix: default_receipt_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "institute=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("INSTITUTE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scope.known_batches")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.default_sort, "date-newest");
        assert!(!config.ledger.financial_only);
        assert!(config.scope.known_batches.is_empty());
        assert_eq!(config.scope.fallback, ScopeFallback::Empty);
        assert_eq!(config.receipt.prefix, "RCT");
        assert_eq!(config.logging.filter, "institute=info");
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        temp_env::with_vars_unset(
            ["INSTITUTE__LEDGER__DEFAULT_SORT", "INSTITUTE__SCOPE__FALLBACK"],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.default_sort, "date-newest");
                assert_eq!(config.scope.fallback, ScopeFallback::Empty);
            },
        );
    }

    #[test]
    fn test_load_reads_environment_overrides() {
        temp_env::with_vars(
            [
                ("INSTITUTE__LEDGER__DEFAULT_SORT", Some("name-asc")),
                ("INSTITUTE__LEDGER__FINANCIAL_ONLY", Some("true")),
                ("INSTITUTE__SCOPE__FALLBACK", Some("unfiltered")),
                ("INSTITUTE__SCOPE__KNOWN_BATCHES", Some("2023-24,2024-25")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.default_sort, "name-asc");
                assert!(config.ledger.financial_only);
                assert_eq!(config.scope.fallback, ScopeFallback::Unfiltered);
                assert_eq!(config.scope.known_batches, vec!["2023-24", "2024-25"]);
            },
        );
    }
}
