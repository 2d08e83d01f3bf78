//! Long-running operation polling

use crate::decode::{ResponseDecoder, SuccessSet};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, RawResponse, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Header carrying the operation-status URL
pub const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";
/// Header carrying the completion URL for 202 responses
pub const LOCATION_HEADER: &str = "location";
/// Header overriding the poll interval, in seconds
pub const RETRY_AFTER_HEADER: &str = "retry-after";

const POLL_SUCCESS: SuccessSet = SuccessSet::new(&[200, 201, 202, 204]);

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Delay between polls when the service sends no `Retry-After`
    #[serde(with = "seconds")]
    pub interval: Duration,
    /// Maximum number of status requests before giving up
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

impl PollerConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// How completion of an accepted operation is observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStrategy {
    /// GET the operation-status URL until `status` is terminal
    AsyncOperation(Url),
    /// GET the location URL until the status is not 202
    Location(Url),
    /// Re-GET the resource until `properties.provisioningState` is terminal
    ProvisioningState(Url),
    /// Nothing to wait for
    Done,
}

/// Terminal states reported by `status` and `provisioningState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationState {
    Succeeded,
    Failed,
    Canceled,
    Running,
}

impl OperationState {
    fn parse(state: &str) -> Self {
        if state.eq_ignore_ascii_case("succeeded") {
            Self::Succeeded
        } else if state.eq_ignore_ascii_case("failed") {
            Self::Failed
        } else if state.eq_ignore_ascii_case("canceled") || state.eq_ignore_ascii_case("cancelled")
        {
            Self::Canceled
        } else {
            Self::Running
        }
    }
}

fn provisioning_state(body: &Value) -> Option<&str> {
    body.get("properties")?.get("provisioningState")?.as_str()
}

/// Delay-seconds form only; an HTTP-date falls back to the configured interval
fn retry_after(response: &RawResponse) -> Option<Duration> {
    let value = response.header(RETRY_AFTER_HEADER)?;
    match value.trim().parse::<u64>() {
        Ok(seconds) => Some(Duration::from_secs(seconds)),
        Err(_) => {
            debug!(value, "Ignoring Retry-After that is not a number of seconds");
            None
        }
    }
}

/// The service's initial answer to a `begin_*` call
#[derive(Debug, Clone)]
pub struct Accepted<T> {
    status: u16,
    body: Option<T>,
    strategy: PollStrategy,
    retry_after: Option<Duration>,
}

impl<T> Accepted<T> {
    /// Inspect an accepted response and choose how to wait for it
    ///
    /// `resource_url` is the URL a provisioning-state poll re-reads. Pass
    /// `None` for operations whose target disappears (DELETE).
    pub fn from_response(
        response: &RawResponse,
        base_url: &Url,
        resource_url: Option<&Url>,
        body: Option<T>,
    ) -> Result<Self> {
        let strategy = if let Some(link) = response.header(ASYNC_OPERATION_HEADER) {
            PollStrategy::AsyncOperation(base_url.join(link)?)
        } else if let (202, Some(link)) = (response.status, response.header(LOCATION_HEADER)) {
            PollStrategy::Location(base_url.join(link)?)
        } else {
            let state = serde_json::from_slice::<Value>(&response.body)
                .ok()
                .and_then(|v| provisioning_state(&v).map(OperationState::parse));
            match (state, resource_url) {
                (Some(OperationState::Running), Some(url)) => {
                    PollStrategy::ProvisioningState(url.clone())
                }
                _ => PollStrategy::Done,
            }
        };

        Ok(Self {
            status: response.status,
            body,
            strategy,
            retry_after: retry_after(response),
        })
    }

    /// An operation that finished in the initial response
    pub fn completed(status: u16, body: Option<T>) -> Self {
        Self {
            status,
            body,
            strategy: PollStrategy::Done,
            retry_after: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Body of the initial response, when it had one
    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    pub fn strategy(&self) -> &PollStrategy {
        &self.strategy
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// `true` when there is nothing left to poll
    pub fn is_complete(&self) -> bool {
        self.strategy == PollStrategy::Done
    }
}

/// Drives an [`Accepted`] operation to a terminal state
#[derive(Clone)]
pub struct Poller {
    transport: Arc<dyn Transport>,
    config: PollerConfig,
}

impl Poller {
    pub fn new(transport: Arc<dyn Transport>, config: PollerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Poll until the operation succeeds, fails, or attempts run out
    pub async fn wait<T>(&self, accepted: &Accepted<T>) -> Result<()> {
        let url = match accepted.strategy() {
            PollStrategy::Done => return Ok(()),
            PollStrategy::AsyncOperation(url)
            | PollStrategy::Location(url)
            | PollStrategy::ProvisioningState(url) => url.clone(),
        };

        let decoder = ResponseDecoder::new(POLL_SUCCESS);
        let mut delay = accepted.retry_after().unwrap_or(self.config.interval);

        for attempt in 1..=self.config.max_attempts {
            tokio::time::sleep(delay).await;
            debug!(attempt, url = %url, "Polling long-running operation");

            let response = self.transport.send(HttpRequest::get(url.clone())).await?;
            decoder.check(&response)?;

            let state = match accepted.strategy() {
                PollStrategy::Location(_) => {
                    if response.status == 202 {
                        OperationState::Running
                    } else {
                        OperationState::Succeeded
                    }
                }
                PollStrategy::AsyncOperation(_) => {
                    let body: Value = decoder.decode(&response)?;
                    let status = body
                        .get("status")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    Self::finish(OperationState::parse(&status), &status, body)?
                }
                PollStrategy::ProvisioningState(_) => {
                    let body: Value = decoder.decode(&response)?;
                    match provisioning_state(&body).map(str::to_owned) {
                        Some(state) => Self::finish(OperationState::parse(&state), &state, body)?,
                        None => OperationState::Succeeded,
                    }
                }
                PollStrategy::Done => OperationState::Succeeded,
            };

            if state == OperationState::Succeeded {
                info!(attempts = attempt, "Long-running operation succeeded");
                return Ok(());
            }
            delay = retry_after(&response).unwrap_or(self.config.interval);
        }

        warn!(
            attempts = self.config.max_attempts,
            url = %url,
            "Long-running operation did not finish"
        );
        Err(Error::PollingExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn finish(state: OperationState, raw: &str, body: Value) -> Result<OperationState> {
        match state {
            OperationState::Failed | OperationState::Canceled => {
                warn!(state = raw, "Long-running operation ended unsuccessfully");
                Err(Error::OperationFailed {
                    state: raw.to_string(),
                    body: Some(body),
                })
            }
            other => Ok(other),
        }
    }
}
