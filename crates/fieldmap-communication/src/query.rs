//! Object query seam and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use fieldmap_core::{GeoBounds, MapObject, QueryError};
use serde_json::Value;

use crate::geojson::decode_feature_collection;

/// Parameters of one object query.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectQueryRequest {
    /// Visible bounds.
    pub bounds: GeoBounds,
    /// Integer zoom level.
    pub zoom: u8,
    /// Backend type keys; empty means every type.
    pub types: Vec<String>,
}

impl ObjectQueryRequest {
    /// URL query parameters: `bbox`, `zoom`, and `types` when filtered.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("bbox", self.bounds.to_query_value()),
            ("zoom", self.zoom.to_string()),
        ];
        if !self.types.is_empty() {
            pairs.push(("types", self.types.join(",")));
        }
        pairs
    }
}

/// Source of backend map objects.
#[async_trait]
pub trait ObjectQuery: Send + Sync {
    /// Fetches the objects visible for `request`.
    async fn query_objects(
        &self,
        request: &ObjectQueryRequest,
    ) -> Result<Vec<MapObject>, QueryError>;
}

/// Queries objects from the backend over HTTP `GET`.
#[derive(Debug, Clone)]
pub struct HttpObjectQuery {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpObjectQuery {
    /// Creates a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueryError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, error: reqwest::Error) -> QueryError {
        if error.is_timeout() {
            QueryError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if error.is_decode() {
            QueryError::Decode {
                reason: error.to_string(),
            }
        } else {
            QueryError::Transport {
                reason: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ObjectQuery for HttpObjectQuery {
    async fn query_objects(
        &self,
        request: &ObjectQueryRequest,
    ) -> Result<Vec<MapObject>, QueryError> {
        tracing::debug!("GET {} zoom={} types={:?}", self.endpoint, request.zoom, request.types);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| self.map_error(e))?;
        decode_feature_collection(&body)
    }
}
