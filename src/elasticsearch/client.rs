//! Elasticsearch client wrapper.

use elasticsearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch, SearchParts,
};
use serde_json::Value;
use url::Url;

use crate::error::GatewayError;

/// Elasticsearch client wrapper with connection configuration
#[derive(Clone)]
pub struct EsClient {
    client: Elasticsearch,
    pub index_name: String,
}

impl EsClient {
    /// Create a new Elasticsearch client
    pub fn new(es_url: &str, index_name: &str) -> Result<Self, GatewayError> {
        let url = Url::parse(es_url)
            .map_err(|e| GatewayError::SearchIndexUnavailable(e.to_string()))?;
        let conn_pool = SingleNodeConnectionPool::new(url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| GatewayError::SearchIndexUnavailable(e.to_string()))?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            index_name: index_name.to_string(),
        })
    }

    /// Execute a search body against the index and return its raw hits.
    ///
    /// A missing index (404) is an empty result, not an error; transport
    /// failures surface as [`GatewayError::SearchIndexUnavailable`].
    pub async fn search(&self, body: Value) -> Result<Vec<Value>, GatewayError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_name]))
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::SearchIndexUnavailable(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Ok(Vec::new());
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::SearchIndexUnavailable(e.to_string()))?;

        Ok(response_body["hits"]["hits"]
            .as_array()
            .map(|a| a.to_vec())
            .unwrap_or_default())
    }
}
