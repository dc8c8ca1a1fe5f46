//! # REST Client
//!
//! Typed access to the backend endpoints the register needs.
//!
//! ## Endpoint Map
//! ```text
//! ApiClient
//!  ├── products()
//!  │     └── search(query)   GET  /products?search=&active=true&limit=N
//!  └── sales()
//!        ├── create(request) POST /sales
//!        └── cancel(id)      POST /sales/:id/cancel
//! ```
//!
//! Every request carries a fresh `X-Request-Id` and, when configured,
//! `Authorization: Bearer <token>`. There is no retry here: a failed
//! submission is reported and the operator decides.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tally_core::catalog::{CatalogQuery, ProductPage};
use tally_core::order::CreateSaleRequest;
use tally_core::{EntityId, Sale};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::RegisterConfig;
use crate::error::{ClientError, ClientResult};

/// Header used to correlate a request across register and backend logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// ApiClient
// =============================================================================

/// HTTP client for the Tally backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration, token: Option<String>) -> ClientResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(ApiClient {
            http,
            base_url,
            token,
        })
    }

    /// Creates a client from a validated register configuration.
    pub fn from_config(config: &RegisterConfig) -> ClientResult<Self> {
        Self::new(config.api_url()?, config.timeout(), config.api.token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Product catalog endpoints.
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }

    /// Sale endpoints.
    pub fn sales(&self) -> SalesApi<'_> {
        SalesApi { client: self }
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn prepare(&self, builder: RequestBuilder, request_id: &Uuid) -> RequestBuilder {
        let builder = builder.header(REQUEST_ID_HEADER, request_id.to_string());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Reads a JSON body, turning non-success statuses into [`ClientError::Api`].
    async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

// =============================================================================
// Products
// =============================================================================

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ProductsApi<'_> {
    /// Searches active products by SKU or name.
    pub async fn search(&self, query: &CatalogQuery) -> ClientResult<ProductPage> {
        let request_id = Uuid::new_v4();
        let url = self.client.endpoint(&["products"])?;
        debug!(%request_id, search = %query.search, limit = query.limit, "Searching catalog");

        let response = self
            .client
            .prepare(self.client.http.get(url).query(query), &request_id)
            .send()
            .await?;

        ApiClient::read_json(response).await
    }
}

// =============================================================================
// Sales
// =============================================================================

pub struct SalesApi<'a> {
    client: &'a ApiClient,
}

impl SalesApi<'_> {
    /// Commits a sale. The backend re-prices items and decrements stock.
    pub async fn create(&self, request: &CreateSaleRequest) -> ClientResult<Sale> {
        let request_id = Uuid::new_v4();
        let url = self.client.endpoint(&["sales"])?;
        debug!(%request_id, items = request.items.len(), "Submitting sale");

        let response = self
            .client
            .prepare(self.client.http.post(url).json(request), &request_id)
            .send()
            .await?;

        let sale: Sale = ApiClient::read_json(response).await?;
        info!(%request_id, sale_id = %sale.id, total = %sale.total, "Sale created");
        Ok(sale)
    }

    /// Voids a committed sale. The backend restores the stock.
    pub async fn cancel(&self, sale_id: &EntityId) -> ClientResult<Sale> {
        let request_id = Uuid::new_v4();
        let id = sale_id.to_string();
        let url = self.client.endpoint(&["sales", &id, "cancel"])?;
        debug!(%request_id, %sale_id, "Canceling sale");

        let response = self
            .client
            .prepare(self.client.http.post(url), &request_id)
            .send()
            .await?;

        ApiClient::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(5), None).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://pos.example.com/api/");
        assert_eq!(
            api.endpoint(&["products"]).unwrap().as_str(),
            "https://pos.example.com/api/products"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = client("http://localhost:3000/");
        assert_eq!(
            api.endpoint(&["sales", "a b/c", "cancel"]).unwrap().as_str(),
            "http://localhost:3000/sales/a%20b%2Fc/cancel"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:pos@example.com").unwrap();
        assert!(ApiClient::new(url, Duration::from_secs(5), None).is_err());
    }
}
