//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DATABASE_URL` - `PostgreSQL` connection string (absent: in-memory store)
//! - `CLAUDE_API_KEY` - Anthropic Claude API key (absent: AI reports disabled)
//! - `CLAUDE_MODEL` - Claude model ID (default: claude-sonnet-4-20250514)
//! - `STORE_TIMEOUT_SECS` - Upper bound for one document store call (default: 10)
//! - `SEED_PROPAGATION_DELAY_MS` - Pause after seeding before re-reading (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SEED_PROPAGATION_DELAY_MS: u64 = 1000;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct DashboardConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Claude AI configuration
    pub claude: Option<ClaudeConfig>,
    /// Bound applied to every document store call
    pub store_timeout: Duration,
    /// Pause after seeding writes before the follow-up read
    pub seed_propagation_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("claude", &self.claude)
            .field("store_timeout", &self.store_timeout)
            .field("seed_propagation_delay", &self.seed_propagation_delay)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

/// Claude AI API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl ClaudeConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let Some(key) = lookup("CLAUDE_API_KEY") else {
            return Ok(None);
        };
        validate_secret_strength(&key, "CLAUDE_API_KEY")?;
        Ok(Some(Self {
            api_key: SecretString::from(key),
            model: lookup("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
        }))
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the Claude API key
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`DashboardConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(SecretString::from);
        let claude = ClaudeConfig::from_lookup(&lookup)?;
        let store_timeout = Duration::from_secs(parse_or_default(
            &lookup,
            "STORE_TIMEOUT_SECS",
            DEFAULT_STORE_TIMEOUT_SECS,
        )?);
        if store_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let seed_propagation_delay = Duration::from_millis(parse_or_default(
            &lookup,
            "SEED_PROPAGATION_DELAY_MS",
            DEFAULT_SEED_PROPAGATION_DELAY_MS,
        )?);
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            claude,
            store_timeout,
            seed_propagation_delay,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }

    /// Returns a reference to the Claude configuration, if available.
    ///
    /// Returns `None` if `CLAUDE_API_KEY` was not set, which disables the
    /// AI report commands.
    #[must_use]
    pub const fn claude(&self) -> Option<&ClaudeConfig> {
        self.claude.as_ref()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(ToString::to_string)
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-api-key-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("sk-ant-REDACTED", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = DashboardConfig::from_lookup(vars(&[])).expect("config");
        assert!(config.database_url.is_none());
        assert!(config.claude().is_none());
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.seed_propagation_delay, Duration::from_millis(1000));
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(vars(&[
            ("DATABASE_URL", "postgres://localhost/bakery"),
            ("CLAUDE_API_KEY", "sk-ant-REDACTED"),
            ("CLAUDE_MODEL", "claude-haiku"),
            ("STORE_TIMEOUT_SECS", "3"),
            ("SEED_PROPAGATION_DELAY_MS", "0"),
        ]))
        .expect("config");
        assert!(config.database_url.is_some());
        assert_eq!(config.claude().unwrap().model, "claude-haiku");
        assert_eq!(config.store_timeout, Duration::from_secs(3));
        assert!(config.seed_propagation_delay.is_zero());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = DashboardConfig::from_lookup(vars(&[("STORE_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STORE_TIMEOUT_SECS"));

        let err = DashboardConfig::from_lookup(vars(&[("STORE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_placeholder_claude_key_rejected() {
        let err =
            DashboardConfig::from_lookup(vars(&[("CLAUDE_API_KEY", "changeme")])).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = DashboardConfig::from_lookup(vars(&[
            ("DATABASE_URL", "postgres://baker:hunter2@db/bakery"),
            ("CLAUDE_API_KEY", "sk-ant-REDACTED"),
        ]))
        .expect("config");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("aB3xY9"));
        assert!(debug.contains("[REDACTED]"));
    }
}
