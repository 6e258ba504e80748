//! Main error type for the query layer.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use super::ErrorKind;

/// A classified request failure.
///
/// `Error` carries everything a view needs to explain a failure:
/// - [`kind()`](Error::kind): category for `match` statements
/// - [`message()`](Error::message): user-facing text
/// - [`status_code()`](Error::status_code): HTTP status, `0` when none was received
/// - [`code()`](Error::code): server-provided error code, if any
/// - [`is_network_error()`](Error::is_network_error) /
///   [`is_timeout_error()`](Error::is_timeout_error): transport classification
///
/// ## Example
///
/// ```rust
/// use ancine_query::{Error, ErrorKind};
///
/// fn banner(err: &Error) -> &'static str {
///     if err.is_network_error() {
///         "Erro de Conexão"
///     } else if err.is_timeout_error() {
///         "Tempo Limite Excedido"
///     } else if err.kind().is_server_error() {
///         "Erro do Servidor"
///     } else if err.kind() == ErrorKind::NotFound {
///         "Dados Não Encontrados"
///     } else {
///         "Erro na Requisição"
///     }
/// }
///
/// assert_eq!(banner(&Error::timeout("slow")), "Tempo Limite Excedido");
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<u16>,
    code: Option<String>,
    retry_after: Option<Duration>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// ```rust
    /// use ancine_query::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidResponse, "missing data array");
    /// assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    /// assert_eq!(err.status_code(), 0);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            retry_after: None,
            source: None,
        }
    }

    /// Creates an error for an HTTP status, classified by [`ErrorKind::from_http_status`].
    pub fn from_status(status: u16, message: impl Into<Cow<'static, str>>) -> Self {
        let mut err = Self::new(ErrorKind::from_http_status(status), message);
        err.status = Some(status);
        err
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the user-facing message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, or `0` when no response was received.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(0)
    }

    /// Returns the server-provided error code, if the body carried one.
    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the `Retry-After` hint sent with a 429, if any.
    #[inline]
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Returns `true` if the request never reached the server.
    #[inline]
    pub fn is_network_error(&self) -> bool {
        self.kind.is_network()
    }

    /// Returns `true` if the request timed out on the client.
    #[inline]
    pub fn is_timeout_error(&self) -> bool {
        self.kind.is_timeout()
    }

    /// Returns `true` for 4xx responses.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// Returns `true` for 5xx responses.
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Returns `true` if this error is generally safe to retry.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Sets the server-provided error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the retry-after duration for this error.
    #[must_use]
    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a connection (network) error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self::new(kind, message)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}
