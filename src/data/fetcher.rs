//! Remote dataset retrieval
//!
//! Issues one HTTP GET per attempt against the configured endpoint and
//! retries transient failures according to a [`RetryPolicy`]. The HTTP
//! layer and the sleep primitive are both injectable so the retry loop can
//! be exercised without a network.

use crate::constants::DEFAULT_TIMEOUT;
use crate::data::error::FetchError;
use crate::data::retry::{RetryDecision, RetryPolicy};
use crate::settings::Settings;
use crate::types::RawCountryRecord;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Status and body of a completed HTTP exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

/// Performs a single GET request.
///
/// Implementations report transport faults as [`FetchError::Timeout`] or
/// [`FetchError::ConnectionFailed`]; any completed exchange, whatever its
/// status, is an `Ok`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

impl<F> Transport for F
where
    F: Fn(&str, Duration) -> Result<HttpResponse, FetchError> + Send + Sync,
{
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        self(url, timeout)
    }
}

/// Blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("countryboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(classify_transport_error)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::ConnectionFailed(e.to_string())
    }
}

type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Retrieves raw country records from the remote source
pub struct Fetcher {
    endpoint: String,
    timeout: Duration,
    policy: RetryPolicy,
    transport: Box<dyn Transport>,
    sleep: SleepFn,
}

impl Fetcher {
    /// Fetcher using the real HTTP client and default policy
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::with_transport(endpoint, HttpTransport::new()?))
    }

    /// Fetcher configured from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Ok(Self::new(settings.endpoint.clone())?
            .with_timeout(settings.timeout())
            .with_retry_policy(settings.retry_policy()))
    }

    /// Fetcher over a custom transport
    pub fn with_transport(endpoint: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            policy: RetryPolicy::default(),
            transport: Box::new(transport),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the function used to wait between attempts
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch the dataset, retrying transient failures.
    ///
    /// Blocks until a response is accepted or the policy gives up.
    pub fn fetch(&self) -> Result<Vec<RawCountryRecord>, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                attempt = attempt,
                max = self.policy.max_attempts,
                endpoint = %self.endpoint,
                "fetch: requesting dataset"
            );

            let error = match self.attempt() {
                Ok(records) => {
                    info!(records = records.len(), attempts = attempt, "fetch: dataset received");
                    return Ok(records);
                }
                Err(e) => e,
            };

            match self.policy.decide(attempt, &error) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        attempt = attempt,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "fetch: transient failure, retrying"
                    );
                    (self.sleep)(delay);
                }
                RetryDecision::Fail => {
                    warn!(attempts = attempt, error = %error, "fetch: giving up");
                    return Err(error);
                }
            }
        }
    }

    fn attempt(&self) -> Result<Vec<RawCountryRecord>, FetchError> {
        let response = self.transport.get(&self.endpoint, self.timeout)?;
        if response.status != 200 {
            return Err(FetchError::HttpStatus(response.status));
        }
        parse_payload(&response.body)
    }
}

/// Parse a response body into raw records.
///
/// The body must be a JSON array; its elements are returned untouched.
pub fn parse_payload(body: &[u8]) -> Result<Vec<RawCountryRecord>, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::InvalidPayload(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(records) => Ok(records),
        other => Err(FetchError::InvalidPayload(format!(
            "expected a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
