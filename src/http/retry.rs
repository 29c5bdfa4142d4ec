// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Retry logic for Photos API calls with exponential backoff
//!
//! Retries GET and POST requests on 500/502/503/504 and on connect or
//! timeout failures. Every other response is returned to the caller as-is.

use reqwest::{Client, Method, Request, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{ResilienceConfig, MAX_BACKOFF_FACTOR_SECS};
use crate::error::{ApiError, GphotoError, Result};

/// Status codes that trigger a retry
pub const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Retry configuration
///
/// Unlike urllib3, the first retry already sleeps `backoff_factor`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Retry n waits `backoff_factor * 2^n`
    pub backoff_factor: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ResilienceConfig::default())
    }
}

impl From<&ResilienceConfig> for RetryPolicy {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: Duration::try_from_secs_f64(config.backoff_factor_secs.max(0.0))
                .unwrap_or(Duration::from_secs_f64(MAX_BACKOFF_FACTOR_SECS))
                .min(Duration::from_secs_f64(MAX_BACKOFF_FACTOR_SECS)),
        }
    }
}

impl RetryPolicy {
    /// Calculate delay for a given attempt number
    fn calculate_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: factor * 2^attempt
        self.backoff_factor
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

/// Whether a response status is retried
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}

/// Only GET and POST go through the retry loop
pub fn is_retryable_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::POST
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Execute a request, retrying transient server failures.
///
/// # Arguments
/// * `client` - HTTP client used for every attempt
/// * `request` - Request to send; its body must be cloneable
/// * `policy` - Retry bound and backoff
/// * `operation_name` - Name of the operation for logging
pub async fn execute_with_retry(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
    operation_name: &str,
) -> Result<Response> {
    if !is_retryable_method(request.method()) {
        return Ok(client.execute(request).await?);
    }

    let mut attempt = 0;

    loop {
        let attempt_request = request.try_clone().ok_or_else(|| {
            GphotoError::InvalidInput(format!("{}: request body cannot be replayed", operation_name))
        })?;

        match client.execute(attempt_request).await {
            Ok(response) if is_retryable_status(response.status()) => {
                let status = response.status().as_u16();
                if attempt >= policy.max_retries {
                    tracing::warn!(
                        "{} exhausted all {} retries (last status {})",
                        operation_name,
                        policy.max_retries,
                        status
                    );
                    return Err(ApiError::RetriesExhausted {
                        attempts: attempt + 1,
                        status,
                    }
                    .into());
                }
                tracing::warn!(
                    "{} got status {} (attempt {}/{})",
                    operation_name,
                    status,
                    attempt + 1,
                    policy.max_retries + 1
                );
            }
            Ok(response) => {
                if attempt > 0 {
                    tracing::info!(
                        "{} succeeded after {} attempts",
                        operation_name,
                        attempt + 1
                    );
                }
                return Ok(response);
            }
            Err(error) if is_transient(&error) => {
                if attempt >= policy.max_retries {
                    tracing::warn!(
                        "{} exhausted all {} retries: {}",
                        operation_name,
                        policy.max_retries,
                        error
                    );
                    return Err(error.into());
                }
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation_name,
                    attempt + 1,
                    policy.max_retries + 1,
                    error
                );
            }
            Err(error) => return Err(error.into()),
        }

        let delay = policy.calculate_delay(attempt);
        tracing::debug!("{} retrying in {:.1}s", operation_name, delay.as_secs_f64());
        sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_factor: Duration::ZERO,
        }
    }

    #[test]
    fn test_policy_from_oversized_backoff_is_capped() {
        let config = ResilienceConfig {
            backoff_factor_secs: 1e20,
            ..ResilienceConfig::default()
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.backoff_factor, Duration::from_secs(3600));
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff_factor, Duration::from_millis(100));
    }

    #[test]
    fn test_calculate_delay() {
        let policy = RetryPolicy {
            max_retries: 5,
            backoff_factor: Duration::from_millis(100),
        };

        assert_eq!(policy.calculate_delay(0).as_millis(), 100);
        assert_eq!(policy.calculate_delay(1).as_millis(), 200);
        assert_eq!(policy.calculate_delay(2).as_millis(), 400);
        assert_eq!(policy.calculate_delay(3).as_millis(), 800);
    }

    #[test]
    fn test_calculate_delay_zero_factor() {
        let policy = fast_policy(5);
        assert_eq!(policy.calculate_delay(0), Duration::ZERO);
        assert_eq!(policy.calculate_delay(10), Duration::ZERO);
    }

    #[test]
    fn test_is_retryable_status() {
        for status in [500, 502, 503, 504] {
            assert!(is_retryable_status(StatusCode::from_u16(status).unwrap()));
        }
        for status in [200, 400, 401, 404, 429, 501] {
            assert!(!is_retryable_status(StatusCode::from_u16(status).unwrap()));
        }
    }

    #[test]
    fn test_is_retryable_method() {
        assert!(is_retryable_method(&Method::GET));
        assert!(is_retryable_method(&Method::POST));
        assert!(!is_retryable_method(&Method::PUT));
        assert!(!is_retryable_method(&Method::DELETE));
    }

    #[tokio::test]
    async fn test_succeeds_after_server_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(4)
            .expect(4)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let request = client
            .get(format!("{}/flaky", mock_server.uri()))
            .build()
            .unwrap();

        let response = execute_with_retry(&client, request, &fast_policy(5), "flaky")
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_exhausts_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let request = client
            .post(format!("{}/down", mock_server.uri()))
            .body("{}")
            .build()
            .unwrap();

        let err = execute_with_retry(&client, request, &fast_policy(3), "down")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GphotoError::Api(ApiError::RetriesExhausted {
                attempts: 4,
                status: 503
            })
        ));
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let request = client
            .get(format!("{}/missing", mock_server.uri()))
            .build()
            .unwrap();

        let response = execute_with_retry(&client, request, &fast_policy(5), "missing")
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_is_sent_once() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/put"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let request = client
            .put(format!("{}/put", mock_server.uri()))
            .build()
            .unwrap();

        let response = execute_with_retry(&client, request, &fast_policy(5), "put")
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_zero_max_retries_single_attempt() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/once"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let request = client
            .get(format!("{}/once", mock_server.uri()))
            .build()
            .unwrap();

        let err = execute_with_retry(&client, request, &fast_policy(0), "once")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GphotoError::Api(ApiError::RetriesExhausted { attempts: 1, .. })
        ));
    }
}
