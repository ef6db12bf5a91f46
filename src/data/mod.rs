//! Adapters that fetch raw metrics and turn them into a [`MetricSample`].
//!
//! [`MetricSample`]: crate::domain::metrics::MetricSample

pub mod sheets;
pub mod source;
pub mod table;
pub mod weather;

use thiserror::Error;

pub use source::{LiveMetricSource, MetricSource};
pub use table::MetricTable;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{service} request failed")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode {service} payload")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("metric table has neither a sales nor a labor row")]
    NoKpiRows,
}

impl FetchError {
    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { service, source }
    }

    pub(crate) fn decode(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Decode { service, source }
    }
}

/// Fails with [`FetchError::Status`] on any non-2xx response.
pub(crate) fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status { service, status })
    }
}
