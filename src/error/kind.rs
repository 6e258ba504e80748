//! Error kind enumeration for categorizing request failures.

/// Categorization of request failures.
///
/// The controller never produces these on its own: every kind except
/// [`InvalidResponse`](ErrorKind::InvalidResponse) comes from the HTTP client
/// and is republished unchanged.
///
/// ## Families
///
/// | ErrorKind         | Family  | Retried by `RestClient` |
/// |-------------------|---------|-------------------------|
/// | `Connection`      | network | Yes                     |
/// | `Timeout`         | timeout | Yes                     |
/// | `Internal`        | 5xx     | Yes                     |
/// | `Unavailable`     | 5xx     | Yes                     |
/// | `ServerError`     | 5xx     | Yes                     |
/// | `InvalidArgument` | 4xx     | No                      |
/// | `Unauthorized`    | 4xx     | No                      |
/// | `Forbidden`       | 4xx     | No                      |
/// | `NotFound`        | 4xx     | No                      |
/// | `RateLimited`     | 4xx     | No                      |
/// | `ClientError`     | 4xx     | No                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request never reached the server (DNS, refused, reset).
    #[error("connection error")]
    Connection,

    /// The request did not complete within the client timeout.
    #[error("timeout")]
    Timeout,

    /// HTTP 400.
    #[error("invalid argument")]
    InvalidArgument,

    /// HTTP 401.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 403.
    #[error("forbidden")]
    Forbidden,

    /// HTTP 404. The endpoint or resource does not exist.
    #[error("not found")]
    NotFound,

    /// HTTP 429.
    #[error("rate limited")]
    RateLimited,

    /// Any other 4xx status.
    #[error("client error")]
    ClientError,

    /// HTTP 500.
    #[error("internal error")]
    Internal,

    /// HTTP 502 or 503.
    #[error("service unavailable")]
    Unavailable,

    /// Any other 5xx status.
    #[error("server error")]
    ServerError,

    /// The server answered 2xx with a body that could not be decoded.
    #[error("invalid response")]
    InvalidResponse,

    /// Invalid client configuration (base URL, endpoint path).
    #[error("configuration error")]
    Configuration,

    /// Transport failure that fits no other category.
    #[error("transport error")]
    Transport,
}

impl ErrorKind {
    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            429 => ErrorKind::RateLimited,
            500 => ErrorKind::Internal,
            502 | 503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if (400..500).contains(&status) => ErrorKind::ClientError,
            _ if (500..600).contains(&status) => ErrorKind::ServerError,
            _ => ErrorKind::Transport,
        }
    }

    /// Returns `true` for failures where no response was received.
    #[inline]
    pub fn is_network(&self) -> bool {
        matches!(self, ErrorKind::Connection)
    }

    /// Returns `true` for client-side timeouts.
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ErrorKind::Timeout)
    }

    /// Returns `true` for 4xx kinds.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::RateLimited
                | ErrorKind::ClientError
        )
    }

    /// Returns `true` for 5xx kinds.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::Internal | ErrorKind::Unavailable | ErrorKind::ServerError
        )
    }

    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// Network failures, timeouts and server errors are retriable;
    /// everything the caller could fix (4xx, bad configuration, undecodable
    /// bodies) is not.
    ///
    /// ```rust
    /// use ancine_query::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::NotFound.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.is_network() || self.is_timeout() || self.is_server_error()
    }
}
