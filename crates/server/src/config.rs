//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CAFE_EMAIL` - Sender address for order notifications (also the SMTP username)
//! - `CAFE_EMAIL_PASSWORD` - SMTP password
//! - `CAFE_NOTIFICATION_EMAIL` - Address that receives new-order notifications
//! - `CAFE_SMTP_HOST` - SMTP relay hostname
//! - `CAFE_SMTP_PORT` - SMTP relay port
//! - `MP_ACCESS_TOKEN` - Mercado Pago access token
//! - `CORREIOS_CODE` - Correios contract (company) code
//! - `CORREIOS_PASSWORD` - Correios API password
//! - `STORE_CEP` - CEP the parcels are shipped from
//!
//! ## Optional
//! - `CAFE_HOST` - Bind address (default: 127.0.0.1)
//! - `CAFE_PORT` - Listen port (default: 2222)
//! - `CAFE_MENU_PATH` - Menu document (default: products/menu.md)
//! - `CORREIOS_API_URL` - Correios API base URL (default: <https://api.correios.com.br>)
//! - `MERCADOPAGO_API_URL` - Mercado Pago API base URL (default: <https://api.mercadopago.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use terminal_cafe_core::{Email, PostalCode};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_CORREIOS_API_URL: &str = "https://api.correios.com.br";
const DEFAULT_MERCADOPAGO_API_URL: &str = "https://api.mercadopago.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct CafeConfig {
    /// IP address to bind the listener to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Menu document parsed into the catalog at start-up
    pub menu_path: PathBuf,
    /// SMTP notification settings
    pub email: EmailConfig,
    /// Mercado Pago settings
    pub payment: MercadoPagoConfig,
    /// Correios settings
    pub shipping: CorreiosConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// SMTP configuration for order notifications.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// Sender address, also used as the SMTP username
    pub from_address: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Recipient of new-order notifications
    pub notify_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from_address", &self.from_address)
            .field("smtp_password", &"[REDACTED]")
            .field("notify_address", &self.notify_address)
            .finish()
    }
}

/// Mercado Pago API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// API base URL
    pub api_url: String,
    /// Private access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for MercadoPagoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Correios API configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct CorreiosConfig {
    /// API base URL
    pub api_url: String,
    /// Contract (company) code
    pub company_code: String,
    /// API password
    pub password: SecretString,
    /// CEP the parcels leave from
    pub origin: PostalCode,
}

impl std::fmt::Debug for CorreiosConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorreiosConfig")
            .field("api_url", &self.api_url)
            .field("company_code", &self.company_code)
            .field("password", &"[REDACTED]")
            .field("origin", &self.origin)
            .finish()
    }
}

impl CafeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CAFE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CAFE_PORT", "2222")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_PORT".to_string(), e.to_string()))?;
        let menu_path = PathBuf::from(get_env_or_default("CAFE_MENU_PATH", "products/menu.md"));

        let email = EmailConfig::from_env()?;
        let payment = MercadoPagoConfig::from_env()?;
        let shipping = CorreiosConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            menu_path,
            email,
            payment,
            shipping,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the listener.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_required_env("CAFE_SMTP_PORT")?
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            smtp_host: get_required_env("CAFE_SMTP_HOST")?,
            smtp_port,
            from_address: get_required_email("CAFE_EMAIL")?,
            smtp_password: get_required_secret("CAFE_EMAIL_PASSWORD")?,
            notify_address: get_required_email("CAFE_NOTIFICATION_EMAIL")?,
        })
    }
}

impl MercadoPagoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_env_or_default("MERCADOPAGO_API_URL", DEFAULT_MERCADOPAGO_API_URL),
            access_token: get_validated_secret("MP_ACCESS_TOKEN")?,
        })
    }
}

impl CorreiosConfig {
    /// Load only the Correios settings.
    ///
    /// Calls `dotenvy::dotenv()` like [`CafeConfig::from_env`], so operator
    /// tooling can quote shipping without SMTP or payment credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a Correios variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let origin = PostalCode::parse(&get_required_env("STORE_CEP")?)
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_CEP".to_string(), e.to_string()))?;

        Ok(Self {
            api_url: get_env_or_default("CORREIOS_API_URL", DEFAULT_CORREIOS_API_URL),
            company_code: get_required_env("CORREIOS_CODE")?,
            password: get_required_secret("CORREIOS_PASSWORD")?,
            origin,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get a required environment variable holding an email address.
fn get_required_email(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    Email::parse(&value)
        .map(Email::into_inner)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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
    let len = s.chars().count() as f64;
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> CafeConfig {
        CafeConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 2222,
            menu_path: PathBuf::from("products/menu.md"),
            email: EmailConfig {
                smtp_host: "smtp.example.com".to_string(),
                smtp_port: 587,
                from_address: "loja@example.com".to_string(),
                smtp_password: SecretString::from("super_secret_smtp_password"),
                notify_address: "pedidos@example.com".to_string(),
            },
            payment: MercadoPagoConfig {
                api_url: DEFAULT_MERCADOPAGO_API_URL.to_string(),
                access_token: SecretString::from("APP_USR-super-secret-token"),
            },
            shipping: CorreiosConfig {
                api_url: DEFAULT_CORREIOS_API_URL.to_string(),
                company_code: "12345678".to_string(),
                password: SecretString::from("super_secret_correios_password"),
                origin: PostalCode::parse("01310100").unwrap(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-access-token", "MP_ACCESS_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "MP_ACCESS_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength(
            "APP_USR-7f3a9c1e2b4d-081526-b9e4a7c3d2f1e0a9b8c7d6e5f4a3b2c1",
            "MP_ACCESS_TOKEN",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = sample_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 2222);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", sample_config());

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("01310100"));

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_smtp_password"));
        assert!(!debug_output.contains("super-secret-token"));
        assert!(!debug_output.contains("super_secret_correios_password"));
    }
}
