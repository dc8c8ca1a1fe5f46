//! # tally-client: Backend Client and Quick-Sale Session
//!
//! Everything the register needs beyond pure ticket rules: configuration,
//! the REST client, and the session that ties the ticket to the backend.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tally-client                                     │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 QuickSaleSession (session.rs)                    │  │
//! │  │   ticket reducer + catalog results + confirm / void             │  │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘  │
//! │                  │                              │                       │
//! │  ┌───────────────▼──────────────┐   ┌───────────▼──────────────────┐   │
//! │  │ CatalogLookup (catalog.rs)   │   │ PosBackend (backend.rs)      │   │
//! │  │ newest search wins           │──►│ search / create / cancel     │   │
//! │  └──────────────────────────────┘   └───────────┬──────────────────┘   │
//! │                                                 │                       │
//! │                                     ┌───────────▼──────────────────┐   │
//! │                                     │ ApiClient (http.rs)          │   │
//! │                                     │ reqwest, bearer, request id  │   │
//! │                                     └──────────────────────────────┘   │
//! │                                                                         │
//! │  RegisterConfig (config.rs): defaults → register.toml → TALLY_* env    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use backend::PosBackend;
pub use catalog::{CatalogLookup, SearchOutcome};
pub use config::RegisterConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use session::{QuickSaleSession, Receipt};
