//! # Catalog
//!
//! Query parameters, wire records and search sequencing for product lookup.
//!
//! ## Stale Responses
//! ```text
//! issue("co")   → token 1 ─────────────────────────────┐ (slow)
//! issue("coke") → token 2 ──────┐                      │
//!                               ▼                      ▼
//!                     accept(2) ✓ kept        accept(1) ✗ discarded
//! ```
//! Only the most recently issued token may replace the held results.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::money::{self, Money};
use crate::types::{EntityId, ProductSnapshot};
use crate::validation::{validate_search_limit, validate_search_query, ValidationResult};

// =============================================================================
// Query
// =============================================================================

/// Parameters of `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogQuery {
    pub search: String,
    pub active: bool,
    pub limit: u32,
}

impl CatalogQuery {
    /// Builds a query for active products.
    ///
    /// Returns `Ok(None)` for a blank query: search is opt-in, never browse-all.
    pub fn active(search: &str, limit: u32) -> ValidationResult<Option<Self>> {
        let search = validate_search_query(search)?;
        validate_search_limit(limit)?;

        if search.is_empty() {
            return Ok(None);
        }

        Ok(Some(CatalogQuery {
            search,
            active: true,
            limit,
        }))
    }
}

// =============================================================================
// Wire Records
// =============================================================================

/// A product as returned by the backend list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: EntityId,
    pub sku: String,
    pub name: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ProductRecord> for ProductSnapshot {
    fn from(record: ProductRecord) -> Self {
        ProductSnapshot {
            id: record.id,
            sku: record.sku,
            name: record.name,
            unit_price: record.price,
            stock: record.stock,
            min_stock: record.min_stock,
            is_active: record.is_active,
        }
    }
}

/// One page of `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductPage {
    pub items: Vec<ProductRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl ProductPage {
    /// Snapshots of the active products on this page.
    pub fn into_snapshots(self) -> Vec<ProductSnapshot> {
        self.items
            .into_iter()
            .filter(|r| r.is_active)
            .map(ProductSnapshot::from)
            .collect()
    }
}

// =============================================================================
// Sequencing
// =============================================================================

/// Monotonic tag of one catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues query tokens and tells whether a response is still current.
///
/// Shared by reference across concurrent searches.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next token. Every issued token supersedes all earlier ones.
    pub fn issue(&self) -> QueryToken {
        QueryToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if `token` is the most recently issued one.
    pub fn is_current(&self, token: QueryToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_is_no_search() {
        assert_eq!(CatalogQuery::active("   ", 10).unwrap(), None);
    }

    #[test]
    fn test_query_is_trimmed_and_active() {
        let query = CatalogQuery::active(" coke ", 10).unwrap().unwrap();
        assert_eq!(query.search, "coke");
        assert!(query.active);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_query_rejects_bad_input() {
        assert!(CatalogQuery::active(&"x".repeat(101), 10).is_err());
        assert!(CatalogQuery::active("coke", 0).is_err());
    }

    #[test]
    fn test_sequencer_keeps_only_latest() {
        let seq = SearchSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(second > first);
        assert!(seq.is_current(second));
        assert!(!seq.is_current(first));
    }

    #[test]
    fn test_product_page_maps_to_snapshots() {
        let body = r#"{
            "items": [
                {"id": 1, "sku": "COKE-330", "name": "Coke", "price": "1.50",
                 "stock": 10, "minStock": 3, "isActive": true, "category": null},
                {"id": "p2", "sku": "OLD", "name": "Retired", "price": 2,
                 "stock": 0, "minStock": 0, "isActive": false}
            ],
            "total": 2, "page": 1, "limit": 10
        }"#;
        let page: ProductPage = serde_json::from_str(body).unwrap();
        let snapshots = page.into_snapshots();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].unit_price.cents(), 150);
        assert_eq!(snapshots[0].min_stock, 3);
    }
}
