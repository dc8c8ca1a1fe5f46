//! # Catalog Lookup
//!
//! Free-text product search for the register.
//!
//! ## Search Flow
//! ```text
//! search("coke")
//!      │
//!      ├── invalid query? ──► error, in-flight searches unaffected
//!      │
//!      ├── issue token N (supersedes every earlier search)
//!      │
//!      ├── blank query? ──► clear results, no request
//!      │
//!      ├── GET /products?search=coke&active=true&limit=10
//!      │
//!      └── token N still latest?
//!             ├── yes ──► replace held results
//!             └── no  ──► discard (a newer search owns the results)
//! ```
//!
//! Several searches may be in flight at once; only the newest one's response
//! is ever shown. Results are held until the next search, never cached.

use std::sync::{Arc, Mutex, MutexGuard};
use tally_core::catalog::{CatalogQuery, QueryToken, SearchSequencer};
use tally_core::ProductSnapshot;
use tracing::{debug, warn};

use crate::backend::PosBackend;
use crate::error::ClientResult;

/// What happened to one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The results now held by the lookup.
    Current(Vec<ProductSnapshot>),
    /// A newer search was issued while this one was in flight.
    Stale,
}

pub struct CatalogLookup<B: ?Sized> {
    backend: Arc<B>,
    limit: u32,
    sequencer: SearchSequencer,
    results: Mutex<Vec<ProductSnapshot>>,
}

impl<B: PosBackend + ?Sized> CatalogLookup<B> {
    pub fn new(backend: Arc<B>, limit: u32) -> Self {
        CatalogLookup {
            backend,
            limit,
            sequencer: SearchSequencer::new(),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Runs a search and, if it is still the newest, stores its results.
    pub async fn search(&self, text: &str) -> ClientResult<SearchOutcome> {
        let query = CatalogQuery::active(text, self.limit)?;
        let token = self.sequencer.issue();

        let Some(query) = query else {
            debug!(token = token.value(), "Blank search, clearing results");
            return Ok(self.store(token, Vec::new()));
        };

        let response = self.backend.search_products(&query).await;

        if !self.sequencer.is_current(token) {
            warn!(token = token.value(), search = %query.search, "Discarding stale search response");
            return Ok(SearchOutcome::Stale);
        }

        let products = response?;
        debug!(token = token.value(), found = products.len(), "Search complete");
        Ok(self.store(token, products))
    }

    /// Results of the newest completed search.
    pub fn results(&self) -> Vec<ProductSnapshot> {
        self.lock().clone()
    }

    /// One result by position (0-based).
    pub fn result(&self, index: usize) -> Option<ProductSnapshot> {
        self.lock().get(index).cloned()
    }

    fn store(&self, token: QueryToken, products: Vec<ProductSnapshot>) -> SearchOutcome {
        let mut results = self.lock();
        if !self.sequencer.is_current(token) {
            return SearchOutcome::Stale;
        }
        *results = products.clone();
        SearchOutcome::Current(products)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProductSnapshot>> {
        self.results.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
