//! Inference service ports
//!
//! The remote detection service is consumed through the [`InferencePort`]
//! trait so orchestrators stay independent of the transport. The shipped
//! implementation speaks the service's HTTP contract:
//!
//! - `GET /infer?lat={f}&lon={f}&buffer_sqft={int}` for one location
//! - `POST /batch_infer` with `{ "locations": [...] }` for a batch
//!
//! All transport-level failures, non-success statuses, and undecodable
//! response bodies surface as the same generic transport error; callers are
//! given no distinction between "service down" and "service returned
//! malformed data".

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::models::{InferenceResult, LocationRecord};
use crate::config::Config;
use crate::Result;

/// Outbound port to the detection service
#[allow(async_fn_in_trait)]
pub trait InferencePort {
    /// Issue exactly one single-location request
    async fn infer_single(&self, lat: f64, lon: f64, buffer_sqft: i64) -> Result<InferenceResult>;

    /// Issue exactly one request carrying the entire record array.
    ///
    /// No chunking and no partial submission; the service is assumed to
    /// preserve array order / correlate results by sample id.
    async fn infer_batch(&self, locations: &[LocationRecord]) -> Result<Vec<InferenceResult>>;
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    locations: &'a [LocationRecord],
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    results: Vec<InferenceResult>,
}

/// HTTP client for the detection service
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInferenceClient {
    /// Create a client against the configured service base address
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl InferencePort for HttpInferenceClient {
    async fn infer_single(&self, lat: f64, lon: f64, buffer_sqft: i64) -> Result<InferenceResult> {
        let url = self.endpoint("infer");
        debug!("GET {} lat={} lon={} buffer_sqft={}", url, lat, lon, buffer_sqft);

        let result = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("buffer_sqft", buffer_sqft.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<InferenceResult>()
            .await?;

        Ok(result)
    }

    async fn infer_batch(&self, locations: &[LocationRecord]) -> Result<Vec<InferenceResult>> {
        let url = self.endpoint("batch_infer");
        debug!("POST {} with {} locations", url, locations.len());

        let response = self
            .http
            .post(&url)
            .json(&BatchRequest { locations })
            .send()
            .await?
            .error_for_status()?
            .json::<BatchResponse>()
            .await?;

        Ok(response.results)
    }
}
