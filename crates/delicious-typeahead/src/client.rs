//! Search endpoint client.
//!
//! [`SearchClient`] is the seam between the controller and the network.
//! [`HttpSearchClient`] calls `GET {server}/api/search?q=` with the query
//! percent-encoded and decodes the JSON list.

use bytes::Bytes;
use delicious_core::SearchResult;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, Empty};
use hyper::{StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid search url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("reading response body failed: {0}")]
    Body(#[from] hyper::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait SearchClient: Send + Sync {
    /// Ask the server for hits matching `query`. The returned future owns
    /// everything it needs so it can run on a spawned task.
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SearchResult>, ClientError>>;
}

#[derive(Clone)]
pub struct HttpSearchClient {
    base_url: String,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpSearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_url(&self, query: &str) -> String {
        format!("{}/api/search?q={}", self.base_url, urlencoding::encode(query))
    }
}

impl SearchClient for HttpSearchClient {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SearchResult>, ClientError>> {
        let url = self.search_url(query);
        let client = self.client.clone();

        Box::pin(async move {
            let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
                ClientError::InvalidUrl {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            })?;

            let response = client.get(uri).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::Status(status));
            }

            let body = response.into_body().collect().await?.to_bytes();
            let results: Vec<SearchResult> = serde_json::from_slice(&body)?;
            tracing::debug!(%url, hits = results.len(), "client: search answered");
            Ok(results)
        })
    }
}
