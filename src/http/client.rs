//! HTTP remote-procedure transport: `RemoteHttp`.
//!
//! Each procedure is a POST to `/api/{query|update}/{method}` with the
//! argument tuple as `{"args": [...]}`. Queries retry like idempotent GETs;
//! updates are sent once.

use crate::error::{CallError, HttpError};
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::remote::{CallArgs, CallKind, RemoteService};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct CallBody<'a> {
    args: &'a CallArgs,
}

/// A refusal the gateway reports with a 200 status.
#[derive(Debug, Deserialize)]
struct RejectBody {
    reject: RejectDetail,
}

#[derive(Debug, Deserialize)]
struct RejectDetail {
    code: String,
    message: String,
}

/// HTTP client for the remote-procedure gateway.
#[derive(Clone)]
pub struct RemoteHttp {
    base_url: String,
    client: Client,
    query_retry: RetryPolicy,
}

impl RemoteHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            query_retry: RetryPolicy::Idempotent,
        })
    }

    /// Override the retry policy used for queries.
    pub fn with_query_retry(mut self, policy: RetryPolicy) -> Self {
        self.query_retry = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn procedure_url(&self, kind: CallKind, method: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(method)
        )
    }

    async fn dispatch(
        &self,
        kind: CallKind,
        method: &str,
        args: &CallArgs,
    ) -> Result<serde_json::Value, CallError> {
        let url = self.procedure_url(kind, method);
        let retry = match kind {
            CallKind::Query => self.query_retry.clone(),
            CallKind::Update => RetryPolicy::None,
        };
        let value: serde_json::Value = self
            .request_with_retry(&url, &CallBody { args }, retry)
            .await?;
        check_reject(value)
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn request_with_retry<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<serde_json::Value, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request(url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.is_retryable_status(*status)
                        }
                        HttpError::RateLimited { .. } => config.is_retryable_status(429),
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = retry_delay(&config, &e, attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying call to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<serde_json::Value, HttpError> {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json::<serde_json::Value>().await?);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body_text = resp.text().await.unwrap_or_default();

        Err(status_error(status_code, body_text, retry_after_ms))
    }
}

/// `Retry-After` in whole seconds, as milliseconds.
fn parse_retry_after(value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Wait before retry `attempt`: the server's hint if it gave one, else backoff.
/// Never longer than `max_delay`.
fn retry_delay(config: &RetryConfig, err: &HttpError, attempt: u32) -> Duration {
    match err {
        HttpError::RateLimited {
            retry_after_ms: Some(ms),
        } => Duration::from_millis(*ms).min(config.max_delay),
        _ => config.delay_for_attempt(attempt),
    }
}

fn status_error(status: u16, body: String, retry_after_ms: Option<u64>) -> HttpError {
    match status {
        401 => HttpError::Unauthorized,
        404 => HttpError::NotFound(body),
        408 => HttpError::Timeout,
        429 => HttpError::RateLimited { retry_after_ms },
        400..=499 => HttpError::BadRequest(body),
        _ => HttpError::ServerError { status, body },
    }
}

fn check_reject(value: serde_json::Value) -> Result<serde_json::Value, CallError> {
    let is_reject = value
        .as_object()
        .is_some_and(|o| o.len() == 1 && o.contains_key("reject"));
    if !is_reject {
        return Ok(value);
    }
    let body: RejectBody = serde_json::from_value(value)?;
    Err(CallError::Rejected {
        code: body.reject.code,
        message: body.reject.message,
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RemoteService for RemoteHttp {
    async fn query(&self, method: &str, args: &CallArgs) -> Result<serde_json::Value, CallError> {
        self.dispatch(CallKind::Query, method, args).await
    }

    async fn update(&self, method: &str, args: &CallArgs) -> Result<serde_json::Value, CallError> {
        self.dispatch(CallKind::Update, method, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_url() {
        let http = RemoteHttp::new("https://api.example.com/").unwrap();
        assert_eq!(http.base_url(), "https://api.example.com");
        assert_eq!(
            http.procedure_url(CallKind::Query, "get_limit_orders"),
            "https://api.example.com/api/query/get_limit_orders"
        );
        assert_eq!(
            http.procedure_url(CallKind::Update, "vote on/ballot"),
            "https://api.example.com/api/update/vote%20on%2Fballot"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error(401, String::new(), None), HttpError::Unauthorized));
        assert!(matches!(status_error(404, "x".into(), None), HttpError::NotFound(b) if b == "x"));
        assert!(matches!(
            status_error(429, String::new(), Some(2000)),
            HttpError::RateLimited { retry_after_ms: Some(2000) }
        ));
        assert!(matches!(status_error(422, String::new(), None), HttpError::BadRequest(_)));
        assert!(matches!(
            status_error(503, "down".into(), None),
            HttpError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_retry_after_parsing_saturates() {
        assert_eq!(parse_retry_after("2"), Some(2000));
        assert_eq!(parse_retry_after(" 30 "), Some(30_000));
        assert_eq!(parse_retry_after("18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_retry_delay_capped_by_max_delay() {
        let config = RetryConfig::idempotent().without_jitter();
        let huge = HttpError::RateLimited {
            retry_after_ms: parse_retry_after("18446744073709551615"),
        };
        assert_eq!(retry_delay(&config, &huge, 0), config.max_delay);

        let hinted = HttpError::RateLimited {
            retry_after_ms: Some(1500),
        };
        assert_eq!(retry_delay(&config, &hinted, 0), Duration::from_millis(1500));

        let unhinted = HttpError::RateLimited { retry_after_ms: None };
        assert_eq!(retry_delay(&config, &unhinted, 1), Duration::from_millis(400));
    }

    #[test]
    fn test_check_reject() {
        let ok = serde_json::json!({ "Ok": 1 });
        assert_eq!(check_reject(ok.clone()).unwrap(), ok);

        let rejected = serde_json::json!({ "reject": { "code": "CanisterReject", "message": "paused" } });
        assert_eq!(
            check_reject(rejected).unwrap_err(),
            CallError::Rejected {
                code: "CanisterReject".into(),
                message: "paused".into()
            }
        );

        let malformed = serde_json::json!({ "reject": 5 });
        assert!(matches!(check_reject(malformed).unwrap_err(), CallError::Decode(_)));
    }

    #[test]
    fn test_call_body_shape() {
        let args = CallArgs::one(7u64).push("abc");
        let json = serde_json::to_string(&CallBody { args: &args }).unwrap();
        assert_eq!(json, r#"{"args":["7","abc"]}"#);
    }
}
