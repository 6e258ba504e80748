//! REST client for the ANCINE API using reqwest.
//!
//! Adds retry with exponential backoff, a request timeout and Portuguese
//! user-facing messages for every failure class.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;
use url::Url;

use crate::config::RetryConfig;
use crate::error::ErrorKind;
use crate::transport::traits::{GetFuture, HttpClient};
use crate::types::QueryParams;
use crate::user_agent;
use crate::Error;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.ancine.gov.br/api/v1";

/// Environment variable read by [`RestClientBuilder::from_env`].
pub const BASE_URL_ENV: &str = "ANCINE_API_BASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TIMEOUT_MESSAGE: &str = "Tempo limite da requisição excedido. Tente novamente.";
const NETWORK_MESSAGE: &str = "Erro de conexão. Verifique sua internet e tente novamente.";

// ============================================================================
// REST Client
// ============================================================================

/// [`HttpClient`] backed by reqwest.
///
/// Requests are `GET {base_url}{endpoint}?{params}`. Network errors,
/// timeouts and 5xx responses are retried according to [`RetryConfig`];
/// everything else is returned on the first attempt.
///
/// ## Example
///
/// ```rust,no_run
/// use ancine_query::{RestClient, RetryConfig};
/// use std::time::Duration;
///
/// # fn main() -> ancine_query::Result<()> {
/// let client = RestClient::builder()
///     .base_url("https://api.ancine.gov.br/api/v1")?
///     .retry_config(RetryConfig::new().with_max_retries(2))
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a new REST client builder.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// Creates a client from `ANCINE_API_BASE_URL` with default settings.
    pub fn from_env() -> Result<Self, Error> {
        RestClientBuilder::from_env()?.build()
    }

    fn new(base_url: Url, retry_config: RetryConfig, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .user_agent(user_agent::user_agent())
            .build()
            .map_err(|e| {
                Error::new(
                    ErrorKind::Configuration,
                    format!("Failed to create HTTP client: {}", e),
                )
                .with_source(e)
            })?;

        Ok(Self {
            client,
            base_url,
            retry_config,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL for `endpoint` and `params`.
    ///
    /// `endpoint` is appended to the base URL's path, so a base of
    /// `https://host/api/v1` and an endpoint of `/producao/obras` yield
    /// `https://host/api/v1/producao/obras`.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = if endpoint.starts_with('/') {
            endpoint.to_owned()
        } else {
            format!("/{}", endpoint)
        };

        let mut url = Url::parse(&format!("{}{}", base, path)).map_err(|e| {
            Error::new(ErrorKind::Configuration, format!("Invalid URL path: {}", e)).with_source(e)
        })?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        Ok(url)
    }

    /// Issues a GET request with retries and returns the JSON body.
    pub async fn get_json(&self, endpoint: &str, params: &QueryParams) -> Result<Value, Error> {
        let url = self.build_url(endpoint, params)?;
        self.execute_with_retry(&url).await
    }

    /// Executes a request with retry logic.
    async fn execute_with_retry(&self, url: &Url) -> Result<Value, Error> {
        let max_attempts = self.retry_config.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.send_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if attempt >= max_attempts || !self.retry_config.should_retry(&err) {
                return Err(err);
            }

            let delay = err
                .retry_after()
                .unwrap_or_else(|| self.retry_config.delay_for_attempt(attempt))
                .min(self.retry_config.max_delay);

            tracing::warn!(
                url = %url,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "API request failed, retrying"
            );

            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(&self, url: &Url) -> Result<Value, Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();

            let err = map_status_error(status.as_u16(), &body);
            return Err(match retry_after {
                Some(duration) => err.with_retry_after(duration),
                None => err,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            Error::new(
                ErrorKind::InvalidResponse,
                format!("Failed to parse response: {}", e),
            )
            .with_source(e)
        })
    }
}

impl HttpClient for RestClient {
    fn get<'a>(&'a self, endpoint: &'a str, params: &'a QueryParams) -> GetFuture<'a> {
        Box::pin(self.get_json(endpoint, params))
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

// ============================================================================
// REST Client Builder
// ============================================================================

/// Builder for [`RestClient`].
#[derive(Debug)]
pub struct RestClientBuilder {
    base_url: Option<Url>,
    retry_config: RetryConfig,
    timeout: Duration,
}

impl RestClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            retry_config: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a builder whose base URL comes from `ANCINE_API_BASE_URL`.
    ///
    /// Falls back to [`DEFAULT_BASE_URL`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new().base_url(url.trim()),
            _ => Ok(Self::new()),
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.base_url = Some(Url::parse(url.as_ref()).map_err(|e| {
            Error::new(ErrorKind::Configuration, format!("Invalid base URL: {}", e)).with_source(e)
        })?);
        Ok(self)
    }

    /// Sets the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the REST client.
    pub fn build(self) -> Result<RestClient, Error> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        RestClient::new(base_url, self.retry_config, self.timeout)
    }
}

// ============================================================================
// Error mapping
// ============================================================================

/// Maps reqwest errors to classified errors.
///
/// Anything that failed before a response arrived, other than a timeout, is
/// reported as a network error.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(TIMEOUT_MESSAGE).with_source(e)
    } else if e.is_builder() {
        Error::configuration(format!("Invalid request: {}", e)).with_source(e)
    } else if e.is_decode() {
        Error::invalid_response(format!("Failed to parse response: {}", e)).with_source(e)
    } else {
        Error::connection(NETWORK_MESSAGE).with_source(e)
    }
}

/// Maps a non-success HTTP status and its body to a classified error.
fn map_status_error(status: u16, body: &str) -> Error {
    let details = serde_json::from_str::<Value>(body).ok();
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason());

    let message = match status {
        400 => "Requisição inválida. Verifique os parâmetros enviados.".to_owned(),
        401 => "Acesso não autorizado. Verifique suas credenciais.".to_owned(),
        403 => "Acesso negado. Você não tem permissão para acessar este recurso.".to_owned(),
        404 => "Recurso não encontrado. O endpoint solicitado não existe.".to_owned(),
        429 => "Muitas requisições. Aguarde um momento antes de tentar novamente.".to_owned(),
        500 => "Erro interno do servidor. Tente novamente em alguns minutos.".to_owned(),
        502 => "Serviço temporariamente indisponível. Tente novamente em alguns minutos."
            .to_owned(),
        503 => "Serviço em manutenção. Tente novamente mais tarde.".to_owned(),
        _ => details
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| match reason {
                Some(reason) => format!("Erro HTTP {}: {}", status, reason),
                None => format!("Erro HTTP {}", status),
            }),
    };

    let err = Error::from_status(status, message);

    let code = details.as_ref().and_then(|d| d.get("code")).and_then(|c| match c {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    match code {
        Some(code) => err.with_code(code),
        None => err,
    }
}

// ============================================================================
// Tests
// ============================================================================
