//! # Validation Module
//!
//! Input validation for register operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register input parsing                                       │
//! │  └── Numbers parse, ids are non-empty                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Quantity > 0, discount 0..=100%, query/notes length               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ticket rules (ticket.rs)                                     │
//! │  └── Stock snapshot checks, merge semantics                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Backend                                                      │
//! │  └── Final stock and price check at commit time                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_NOTES_LEN, MAX_SEARCH_LIMIT, MAX_SEARCH_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (an empty query means "no search", not "browse all")
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Normalizes free-text notes: blank becomes `None`.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to the ticket.
///
/// ## User Workflow
/// ```text
/// Operator types: add 0
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       └── qty <= 0? → Error: "quantity must be positive"
/// ```
///
/// There is no fixed upper bound; the stock snapshot is the ceiling.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the number of catalog results requested per search.
pub fn validate_search_limit(limit: u32) -> ValidationResult<()> {
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(MAX_SEARCH_LIMIT),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
