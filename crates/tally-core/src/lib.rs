//! # tally-core: Pure Quick-Sale Logic for Tally POS
//!
//! This crate is the **heart** of the register. It contains the ticket
//! (cart) state machine and every rule that decides what may go into a sale,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Register (apps/register)                     │   │
//! │  │    search ──► select ──► add ──► discount/pay ──► confirm      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-client (QuickSaleSession)                 │   │
//! │  │        catalog lookup, submission, REST calls (reqwest)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  types  │ │ ticket  │ │ totals  │ │  order  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain types (ProductSnapshot, PaymentMethod, Discount, Sale)
//! - [`ticket`] - The ticket reducer: `(state, action) → state`
//! - [`totals`] - Subtotal / discount / total calculation
//! - [`order`] - Create-sale request builder
//! - [`catalog`] - Catalog query parameters and search sequencing
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::types::Discount;
//!
//! let subtotal = Money::from_cents(35_000); // $350.00
//! let discount = Discount::from_percent(10).unwrap();
//!
//! assert_eq!(subtotal.percentage_of(discount.bps()).cents(), 3_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod ticket;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{TicketError, TicketResult, ValidationError};
pub use money::Money;
pub use ticket::{
    reduce, Advisory, StagedLine, Ticket, TicketAction, TicketLine, TicketPhase, Transition,
};
pub use totals::Totals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of catalog results requested per search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Upper bound accepted for a catalog search limit.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Maximum length of a free-text catalog query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Maximum length of the notes attached to a sale.
pub const MAX_NOTES_LEN: usize = 500;
