//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TRADEYARD_HOST` - Bind address (default: 127.0.0.1)
//! - `TRADEYARD_PORT` - Listen port (default: 3000)
//! - `TRADEYARD_DATA_DIR` - Directory for persisted shopper state (default: .tradeyard)
//! - `FREIGHT_QUOTE_URL` - Freight quote endpoint (default: [`DEFAULT_FREIGHT_QUOTE_URL`])
//! - `FREIGHT_QUOTE_TIMEOUT_SECS` - Per-attempt timeout (default: 180)
//! - `FREIGHT_QUOTE_API_KEY` - Bearer token for the quote service
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Freight quote endpoint used when `FREIGHT_QUOTE_URL` is unset.
pub const DEFAULT_FREIGHT_QUOTE_URL: &str = "https://freight.tradeyard.dev/api/v1/quotes";

/// Freight quote timeout used when `FREIGHT_QUOTE_TIMEOUT_SECS` is unset.
pub const DEFAULT_FREIGHT_TIMEOUT: Duration = Duration::from_secs(180);

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for persisted cart, wishlist and comparison state
    pub data_dir: PathBuf,
    /// Freight quote client configuration
    pub freight: FreightConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Freight quote client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FreightConfig {
    /// Quote endpoint (`POST`)
    pub endpoint: Url,
    /// Time allowed for one attempt, connection through body
    pub timeout: Duration,
    /// Optional bearer token
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for FreightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreightConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// freight API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("TRADEYARD_HOST", "127.0.0.1")?;
        let port = parse_env("TRADEYARD_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default("TRADEYARD_DATA_DIR", ".tradeyard"));
        let freight = FreightConfig::from_env()?;

        Ok(Self {
            host,
            port,
            data_dir,
            freight,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FreightConfig {
    /// Load the freight settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the endpoint or timeout is invalid, or the API
    /// key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = parse_endpoint(&get_env_or_default(
            "FREIGHT_QUOTE_URL",
            DEFAULT_FREIGHT_QUOTE_URL,
        ))?;

        let timeout = match get_optional_env("FREIGHT_QUOTE_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_FREIGHT_TIMEOUT,
        };

        let api_key = match get_optional_env("FREIGHT_QUOTE_API_KEY") {
            Some(value) => {
                validate_secret_strength(&value, "FREIGHT_QUOTE_API_KEY")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            endpoint,
            timeout,
            api_key,
        })
    }

    /// Settings for `endpoint` with the default timeout and no API key.
    #[must_use]
    pub const fn with_endpoint(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_FREIGHT_TIMEOUT,
            api_key: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable (empty values count as unset).
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a Sentry sample rate and check it lies in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Parse the freight endpoint, which must be an absolute http(s) URL.
fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("FREIGHT_QUOTE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "FREIGHT_QUOTE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a positive whole number of seconds.
fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("FREIGHT_QUOTE_TIMEOUT_SECS".to_string(), e.to_string())
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "FREIGHT_QUOTE_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
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

    // Real API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the quote service."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_endpoint() {
        assert!(parse_endpoint(DEFAULT_FREIGHT_QUOTE_URL).is_ok());
        assert!(parse_endpoint("http://127.0.0.1:9000/quotes").is_ok());
        assert!(parse_endpoint("ftp://freight.example/quotes").is_err());
        assert!(parse_endpoint("not a url").is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("45").unwrap(), Duration::from_secs(45));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    fn default_freight() -> FreightConfig {
        FreightConfig::with_endpoint(Url::parse(DEFAULT_FREIGHT_QUOTE_URL).unwrap())
    }

    #[test]
    fn test_default_freight_config() {
        let config = default_freight();
        assert_eq!(config.timeout, Duration::from_secs(180));
        assert_eq!(config.endpoint.as_str(), DEFAULT_FREIGHT_QUOTE_URL);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: PathBuf::from(".tradeyard"),
            freight: default_freight(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_freight_config_debug_redacts_key() {
        let config = FreightConfig {
            api_key: Some(SecretString::from("super_secret_freight_key")),
            ..default_freight()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("freight.tradeyard.dev"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_freight_key"));
    }
}
