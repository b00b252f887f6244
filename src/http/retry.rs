//! Which HTTP failures are worth another attempt.

use reqwest::StatusCode;
use std::fmt;

/// Maximum number of attempts for one request.
pub const MAX_RETRIES: usize = 3;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Responses that will not change if the request is repeated.
#[derive(Debug)]
pub enum NonRetryableError {
    /// HTTP 429, or 403 mentioning the rate limit
    RateLimitExceeded(String),
    /// HTTP 401
    AuthenticationFailed(String),
    /// HTTP 404
    NotFound(String),
    /// HTTP 403 for any other reason
    Forbidden(String),
    /// Any other 4xx
    ClientError(String),
}

impl fmt::Display for NonRetryableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonRetryableError::RateLimitExceeded(msg) => write!(
                f,
                "Rate limit exceeded: {}. Try again later or set GITHUB_TOKEN.",
                msg
            ),
            NonRetryableError::AuthenticationFailed(msg) => {
                write!(f, "Authentication failed: {}. Check GITHUB_TOKEN.", msg)
            }
            NonRetryableError::NotFound(msg) => write!(f, "Not found: {}", msg),
            NonRetryableError::Forbidden(msg) => write!(f, "Access forbidden: {}", msg),
            NonRetryableError::ClientError(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for NonRetryableError {}

/// Map a status error to a [`NonRetryableError`], or `Ok(())` when a retry may help.
///
/// Connection failures, timeouts and 5xx responses are retryable.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        return Ok(());
    };

    match status {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::AuthenticationFailed(
            "invalid or missing token".to_string(),
        )),
        StatusCode::FORBIDDEN if error.to_string().contains("rate limit") => Err(
            NonRetryableError::RateLimitExceeded("GitHub API rate limit exceeded".to_string()),
        ),
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden(
            "the release API refused the request".to_string(),
        )),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimitExceeded(
            "too many requests".to_string(),
        )),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound(
            "no published release".to_string(),
        )),
        s if s.is_client_error() => Err(NonRetryableError::ClientError(format!(
            "HTTP {}",
            s.as_u16()
        ))),
        _ => Ok(()),
    }
}

/// Convert an `error_for_status()` failure into an `anyhow::Error`,
/// wrapping non-retryable statuses in [`NonRetryableError`].
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_error(status: usize) -> reqwest::Error {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(status)
            .create_async()
            .await;

        let response = reqwest::Client::new().get(server.url()).send().await.unwrap();
        response.error_for_status().unwrap_err()
    }

    #[test]
    fn test_non_retryable_error_display() {
        let err = NonRetryableError::RateLimitExceeded("x".to_string());
        assert!(err.to_string().contains("Rate limit"));
        assert!(err.to_string().contains("GITHUB_TOKEN"));

        let err = NonRetryableError::NotFound("x".to_string());
        assert_eq!(err.to_string(), "Not found: x");

        let err = NonRetryableError::ClientError("HTTP 400".to_string());
        assert_eq!(err.to_string(), "Request error: HTTP 400");
    }

    #[tokio::test]
    async fn test_classify_client_errors() {
        assert!(matches!(
            classify_error(&status_error(401).await),
            Err(NonRetryableError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            classify_error(&status_error(403).await),
            Err(NonRetryableError::Forbidden(_))
        ));
        assert!(matches!(
            classify_error(&status_error(404).await),
            Err(NonRetryableError::NotFound(_))
        ));
        assert!(matches!(
            classify_error(&status_error(429).await),
            Err(NonRetryableError::RateLimitExceeded(_))
        ));
        assert!(matches!(
            classify_error(&status_error(422).await),
            Err(NonRetryableError::ClientError(_))
        ));
    }

    #[tokio::test]
    async fn test_server_errors_are_retryable() {
        assert!(classify_error(&status_error(500).await).is_ok());
        let err = check_retryable(status_error(503).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_none());
    }

    #[tokio::test]
    async fn test_check_retryable_wraps_not_found() {
        let err = check_retryable(status_error(404).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_some());
    }
}
