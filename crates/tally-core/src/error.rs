//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── TicketError      - Ticket rule violations and submission outcome  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-client errors (separate crate)                                  │
//! │  └── ClientError      - HTTP, backend and configuration failures       │
//! │                                                                         │
//! │  Flow: ValidationError → TicketError → register prints the message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant leaves the ticket in a well-defined state: a failed
//! transition never produces a new state, so the caller keeps the old one.

use thiserror::Error;

use crate::types::EntityId;

// =============================================================================
// Ticket Error
// =============================================================================

/// Errors raised by ticket transitions and submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// Requested quantity (new or cumulative) exceeds the stock snapshot.
    ///
    /// ## User Workflow
    /// ```text
    /// Ticket holds 8 × "Coke 330ml" (stock 10)
    ///      │
    ///      ▼
    /// add 3 more
    ///      │
    ///      ▼
    /// InsufficientStock { available: 10, in_ticket: 8, requested: 3 }
    ///      │
    ///      ▼
    /// Register shows: "Only 10 in stock, 8 already in ticket"
    /// ```
    #[error(
        "Insufficient stock for {product}: {available} available, {in_ticket} already in ticket, {requested} requested"
    )]
    InsufficientStock {
        product: String,
        available: i64,
        in_ticket: i64,
        requested: i64,
    },

    /// Confirm attempted with zero lines.
    #[error("Ticket is empty")]
    EmptyTicket,

    /// The backend rejected the sale or the request never completed.
    /// The message is passed through verbatim.
    #[error("{message}")]
    SubmissionFailed { message: String },

    /// The backend accepted the request but its reply could not be read.
    /// The sale may have been committed, so the ticket is kept for the
    /// operator to check before confirming again.
    #[error("Sale may have been recorded; check recent sales before retrying ({message})")]
    SubmissionUnconfirmed { message: String },

    /// A submission is in flight; the ticket is frozen until it resolves.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// Quantity update for a product that has no line in the ticket.
    #[error("Product {0} is not in the ticket")]
    LineNotFound(EntityId),

    /// `add` called without a staged product.
    #[error("No product selected")]
    NothingSelected,

    /// The catalog marks the product inactive.
    #[error("Product {0} is not available for sale")]
    ProductUnavailable(String),

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl TicketError {
    /// Wraps a backend or transport failure message.
    pub fn submission_failed(message: impl Into<String>) -> Self {
        TicketError::SubmissionFailed {
            message: message.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any ticket rule runs, e.g. a zero quantity or a
/// discount above 100%.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed decimal amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with TicketError.
pub type TicketResult<T> = Result<T, TicketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_both_figures() {
        let err = TicketError::InsufficientStock {
            product: "Coke 330ml".to_string(),
            available: 10,
            in_ticket: 8,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Coke 330ml: 10 available, 8 already in ticket, 3 requested"
        );
    }

    #[test]
    fn test_submission_failed_is_verbatim() {
        let err = TicketError::submission_failed("items should not be empty");
        assert_eq!(err.to_string(), "items should not be empty");
    }

    #[test]
    fn test_validation_converts_to_ticket_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let err: TicketError = validation_err.into();
        assert!(matches!(err, TicketError::Validation(_)));
        assert_eq!(err.to_string(), "quantity must be positive");
    }
}
