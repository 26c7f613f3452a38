use std::time::{Duration, Instant};

use thiserror::Error;

/// How a probe failed to produce a response.
///
/// A timeout classifies as `Down` while a transport failure classifies as
/// `Error`, so the two are kept distinct here instead of being collapsed
/// into one error string.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A response produced by a probe, whatever its status code.
#[derive(Debug, Clone, Copy)]
pub struct ProbeResponse {
    /// Wall-clock time from sending the request to the response arriving.
    pub latency_ms: u64,
    pub status_code: u16,
}

/// Checker trait - performs one probe against a URL.
///
/// Implementations must not retry internally; retry policy belongs to the
/// scheduler's next cycle.
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, ProbeError>;
}

/// HTTP/HTTPS checker issuing a single GET per probe.
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        let start = Instant::now();

        match self.client.get(url).send().await {
            Ok(response) => Ok(ProbeResponse {
                latency_ms: start.elapsed().as_millis() as u64,
                status_code: response.status().as_u16(),
            }),
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout),
            Err(e) => Err(ProbeError::Transport(e.to_string())),
        }
    }
}
