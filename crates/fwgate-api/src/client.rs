// Async HTTP client for the Linode Cloud Firewall endpoints (API v4).
//
// Base URL: https://api.linode.com/v4/
// Auth: Authorization: Bearer <token>

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{Firewall, Page, RuleSet, RulesUpdate};

/// Public Linode API root.
pub const DEFAULT_BASE_URL: &str = "https://api.linode.com/v4";

// ── Error response shape from the Linode API ─────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(serde::Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

impl ErrorResponse {
    /// Join every `reason` into one line, prefixing the offending field.
    fn message(&self) -> Option<String> {
        let reasons: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| {
                let reason = e.reason.as_deref()?;
                Some(match e.field.as_deref() {
                    Some(field) => format!("{field}: {reason}"),
                    None => reason.to_owned(),
                })
            })
            .collect();

        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the firewall endpoints of the Linode API.
///
/// Uses bearer-token authentication and JSON bodies. Every call is a
/// single request; nothing is retried.
pub struct FirewallClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FirewallClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a personal access token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` as a default header on
    /// every request, marked sensitive so it never shows up in logs.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment (`/v4` → `/v4/`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"networking/firewalls"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Turn a non-success response into an error carrying the server's
    /// text: the `errors[].reason` list if present, else the raw body,
    /// else the status line.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message())
            .unwrap_or_else(|| {
                if raw.trim().is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::InvalidToken { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Firewalls ────────────────────────────────────────────────────

    /// One page of `GET /networking/firewalls`. `page` is 1-based.
    pub async fn list_firewalls(&self, page: u32, page_size: u32) -> Result<Page<Firewall>, Error> {
        self.get_with_params(
            "networking/firewalls",
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    // ── Rules ────────────────────────────────────────────────────────

    pub async fn get_rules(&self, firewall_id: u64) -> Result<RuleSet, Error> {
        self.get(&format!("networking/firewalls/{firewall_id}/rules"))
            .await
    }

    /// Replace the firewall's entire rule set with `rules`.
    pub async fn update_rules(&self, firewall_id: u64, rules: &RulesUpdate<'_>) -> Result<(), Error> {
        self.put_no_response(&format!("networking/firewalls/{firewall_id}/rules"), rules)
            .await
    }
}
