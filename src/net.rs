// src/net.rs
//! Connectivity probe — a single GET against a fixed URL.
//!
//! Any HTTP response at all counts as "online", including error statuses;
//! only transport failures (DNS, connect, timeout) count as offline. The
//! probe is the one place in the pipeline with an explicit timeout.

use std::time::Duration;

use crate::constants::{CONNECTIVITY_PROBE_URL, CONNECTIVITY_TIMEOUT_SECS};
use crate::error::AppError;
use crate::pipeline::ConnectivityProbe;

pub struct HttpProbe {
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            url: CONNECTIVITY_PROBE_URL.to_string(),
            timeout: Duration::from_secs(CONNECTIVITY_TIMEOUT_SECS),
        }
    }

    /// Probe an arbitrary target. Used by tests pointing at addresses that
    /// are guaranteed unreachable.
    #[allow(dead_code)] // Public API - used by tests and library consumers
    pub fn with_target(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn check(&self) -> Result<(), AppError> {
        log::debug!("Probing connectivity via {}", self.url);

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        match client.get(&self.url).send().await {
            Ok(response) => {
                log::debug!("Connectivity probe answered with HTTP {}", response.status());
                Ok(())
            }
            Err(e) => Err(AppError::NoConnectivity {
                probe: self.url.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_target_reports_no_connectivity() {
        // TEST-NET-1 (RFC 5737) is reserved and never routable.
        let probe = HttpProbe::with_target("http://192.0.2.1/", Duration::from_millis(200));
        let err = probe.check().await.unwrap_err();

        match err {
            AppError::NoConnectivity { probe, .. } => {
                assert!(probe.contains("192.0.2.1"));
            }
            other => panic!("expected NoConnectivity, got {:?}", other),
        }
    }
}
