// ── Core error types ──
//
// User-facing errors from fwgate-core. Every variant is terminal: the
// binary prints it and exits. `CoreError::at` attaches the pipeline step
// to API failures so the report names the call that failed.

use std::fmt;

use thiserror::Error;

/// The remote call a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ListFirewalls,
    FetchRules,
    UpdateRules,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ListFirewalls => "listing firewalls",
            Self::FetchRules => "fetching rules",
            Self::UpdateRules => "updating rules",
        })
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Firewall with label '{label}' not found ({pages} page(s) scanned)")]
    FirewallNotFound { label: String, pages: u32 },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s while {step}")]
    Timeout { step: Step, timeout_secs: u64 },

    // ── API errors ───────────────────────────────────────────────────
    #[error("Error {step} (HTTP {status}): {message}")]
    Api {
        step: Step,
        status: u16,
        /// Server's error text.
        message: String,
    },

    #[error("Unexpected response while {step}: {message}")]
    InvalidResponse { step: Step, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a transport-layer error raised during `step`.
    pub fn at(step: Step, err: fwgate_api::Error, timeout_secs: u64) -> Self {
        use fwgate_api::Error as ApiError;

        match err {
            ApiError::InvalidToken { message } | ApiError::Authentication { message } => {
                Self::AuthenticationFailed { message }
            }
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout { step, timeout_secs },
            ApiError::Transport(e) => match e.status() {
                Some(status) => Self::Api {
                    step,
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => Self::ConnectionFailed {
                    url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                },
            },
            ApiError::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::ClientBuild(message) => Self::Config { message },
            ApiError::Api { status, message } => Self::Api {
                step,
                status,
                message,
            },
            ApiError::Deserialization { message, body: _ } => {
                Self::InvalidResponse { step, message }
            }
        }
    }

    /// HTTP status of the failing call, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
