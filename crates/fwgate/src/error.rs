//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fwgate_config::ConfigError;
use fwgate_core::CoreError;

/// Process exit codes. Success is the implicit 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Firewall with label '{label}' not found")]
    #[diagnostic(
        code(fwgate::not_found),
        help(
            "Scanned {pages} page(s) of firewalls without a match.\n\
             Check the label in Cloud Manager, or pass --firewall <label>."
        )
    )]
    FirewallNotFound { label: String, pages: u32 },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(fwgate::connection_failed),
        help("Check network access to the API, or the api_url setting.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s while {step}")]
    #[diagnostic(
        code(fwgate::timeout),
        help("Increase timeout with --timeout or the timeout setting.")
    )]
    Timeout { step: String, seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fwgate::auth_failed),
        help("The token needs the firewall:read_write scope.")
    )]
    AuthFailed { message: String },

    #[error("No API token configured for firewall '{label}'")]
    #[diagnostic(
        code(fwgate::no_credentials),
        help(
            "Set LINODE_TOKEN, pass --token, or set token / token_env in the config file.\n\
             Keyring entry: service 'fwgate', user '{label}/token'."
        )
    )]
    NoCredentials { label: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Error {step} (HTTP {status}): {message}")]
    #[diagnostic(code(fwgate::api_error))]
    ApiError {
        step: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response while {step}: {message}")]
    #[diagnostic(code(fwgate::invalid_response))]
    InvalidResponse { step: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fwgate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(fwgate::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fwgate::config))]
    Config { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(fwgate::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::FirewallNotFound { label, pages } => Self::FirewallNotFound { label, pages },

            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },

            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { step, timeout_secs } => Self::Timeout {
                step: step.to_string(),
                seconds: timeout_secs,
            },

            CoreError::Api {
                step,
                status,
                message,
            } => Self::ApiError {
                step: step.to_string(),
                status,
                message,
            },

            CoreError::InvalidResponse { step, message } => Self::InvalidResponse {
                step: step.to_string(),
                message,
            },

            CoreError::Config { message } => Self::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { label } => Self::NoCredentials { label },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
