//! # Backend Seam
//!
//! The three backend calls the quick-sale flow depends on, behind a trait so
//! the session can run against the real REST client or an in-process fake.

use async_trait::async_trait;
use tally_core::catalog::CatalogQuery;
use tally_core::order::CreateSaleRequest;
use tally_core::{EntityId, ProductSnapshot, Sale};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[async_trait]
pub trait PosBackend: Send + Sync {
    /// Active products matching the query, in backend order.
    async fn search_products(&self, query: &CatalogQuery) -> ClientResult<Vec<ProductSnapshot>>;

    /// Commits a sale and returns it as the backend recorded it.
    async fn create_sale(&self, request: &CreateSaleRequest) -> ClientResult<Sale>;

    /// Voids a committed sale.
    async fn cancel_sale(&self, sale_id: &EntityId) -> ClientResult<Sale>;
}

#[async_trait]
impl PosBackend for ApiClient {
    async fn search_products(&self, query: &CatalogQuery) -> ClientResult<Vec<ProductSnapshot>> {
        let page = self.products().search(query).await?;
        Ok(page.into_snapshots())
    }

    async fn create_sale(&self, request: &CreateSaleRequest) -> ClientResult<Sale> {
        self.sales().create(request).await
    }

    async fn cancel_sale(&self, sale_id: &EntityId) -> ClientResult<Sale> {
        self.sales().cancel(sale_id).await
    }
}
