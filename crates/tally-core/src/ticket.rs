//! # Ticket
//!
//! The in-progress sale (a.k.a. cart) as an explicit state machine.
//!
//! ## Reducer Pattern
//! Every change goes through [`Ticket::apply`], a pure function
//! `(&state, action) → Result<Transition>`. A failed action returns an error
//! and no state, so the caller's ticket is untouched by construction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ticket Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐  AddToTicket  ┌──────────┐  BeginSubmit  ┌────────────┐  │
//! │  │  Empty   │──────────────►│ Building │──────────────►│ Submitting │  │
//! │  └──────────┘               └──────────┘               └────────────┘  │
//! │       ▲                       │  ▲    │                   │       │     │
//! │       │        RemoveLine /   │  │    │ SubmitFailed      │       │     │
//! │       │        UpdateQty(0)   │  └────┼───────────────────┘       │     │
//! │       │◄──────────────────────┘       │ (same contents)           │     │
//! │       │◄──────── Cancel ──────────────┘                           │     │
//! │       │◄──────── SubmitSucceeded ─────────────────────────────────┘     │
//! │                                                                         │
//! │  While Submitting, only SubmitSucceeded / SubmitFailed are accepted.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding again merges quantities)
//! - `line.subtotal == line.unit_price × line.quantity`, `line.quantity >= 1`
//! - `line.quantity <= line.product.stock` at the moment of mutation

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{TicketError, TicketResult, ValidationError};
use crate::money::Money;
use crate::totals::Totals;
use crate::types::{Discount, EntityId, PaymentMethod, ProductSnapshot};
use crate::validation::{validate_notes, validate_quantity};

// =============================================================================
// Ticket Line
// =============================================================================

/// One product entry in the ticket.
///
/// ## Price Freezing
/// `unit_price` is captured when the line is first created. Later adds of
/// the same product refresh the stock snapshot but keep this price, so the
/// figure on screen does not jump mid-sale. The backend re-prices at commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TicketLine {
    pub product_id: EntityId,
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl TicketLine {
    /// Creates a line from a product snapshot and quantity.
    ///
    /// Fails if `unit_price × quantity` does not fit in i64 cents.
    pub fn new(product: ProductSnapshot, quantity: i64) -> TicketResult<Self> {
        let unit_price = product.unit_price;
        Ok(TicketLine {
            product_id: product.id.clone(),
            product,
            quantity,
            unit_price,
            subtotal: line_subtotal(unit_price, quantity)?,
        })
    }

    fn set_quantity(&mut self, quantity: i64) -> TicketResult<()> {
        self.subtotal = line_subtotal(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

fn line_subtotal(unit_price: Money, quantity: i64) -> TicketResult<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| amount_out_of_range("subtotal"))
}

fn amount_out_of_range(field: &str) -> TicketError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// A product picked from the catalog but not yet added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StagedLine {
    pub product: ProductSnapshot,
    pub quantity: i64,
}

// =============================================================================
// Phase, Actions, Advisories
// =============================================================================

/// Where the ticket is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TicketPhase {
    Empty,
    Building,
    Submitting,
}

/// Every way a ticket can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketAction {
    /// Stage a candidate line with quantity 1.
    SelectProduct(ProductSnapshot),
    /// Change the staged quantity.
    SetStagedQuantity(i64),
    /// Drop the staged candidate.
    ClearSelection,
    /// Add `quantity` units of the staged product.
    AddToTicket { quantity: i64 },
    /// Select and add in one step (scanner-style entry).
    AddProduct {
        product: ProductSnapshot,
        quantity: i64,
    },
    /// Set a line's quantity; `<= 0` removes the line.
    UpdateQuantity { product_id: EntityId, quantity: i64 },
    /// Remove a line if present.
    RemoveLine { product_id: EntityId },
    /// `None` clears the discount; `Some(0%)` is an explicit zero discount.
    SetDiscount(Option<Discount>),
    SetPaymentMethod(PaymentMethod),
    SetCustomer(Option<EntityId>),
    SetNotes(Option<String>),
    /// Freeze the ticket while the create-sale request is in flight.
    BeginSubmit,
    /// The backend committed the sale: reset.
    SubmitSucceeded,
    /// The backend rejected the sale: unfreeze with the same contents.
    SubmitFailed,
    /// Discard everything.
    Cancel,
}

/// Non-blocking notices produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Advisory {
    /// Remaining stock after this ticket would be at or below the minimum.
    LowStock {
        product_id: EntityId,
        name: String,
        remaining: i64,
        min_stock: i64,
    },
}

impl Advisory {
    fn low_stock(product: &ProductSnapshot, remaining: i64) -> Option<Advisory> {
        product.low_stock_after(remaining).then(|| Advisory::LowStock {
            product_id: product.id.clone(),
            name: product.name.clone(),
            remaining,
            min_stock: product.min_stock,
        })
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::LowStock {
                name,
                remaining,
                min_stock,
                ..
            } => write!(
                f,
                "Low stock: {} will have {} left (minimum {})",
                name, remaining, min_stock
            ),
        }
    }
}

/// The result of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: Ticket,
    pub advisories: Vec<Advisory>,
}

// =============================================================================
// Ticket
// =============================================================================

/// The in-progress sale.
///
/// Fields are private: the only way to change a ticket is [`Ticket::apply`].
/// It serializes for the dashboard but is never deserialized:
///
/// ```compile_fail
/// let ticket: tally_core::Ticket = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ticket {
    lines: Vec<TicketLine>,
    discount: Option<Discount>,
    payment_method: PaymentMethod,
    customer_id: Option<EntityId>,
    notes: Option<String>,
    staged: Option<StagedLine>,
    submitting: bool,
}

impl Ticket {
    /// Creates a new empty ticket (CASH, no discount, no customer).
    pub fn new() -> Self {
        Ticket::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn lines(&self) -> &[TicketLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &EntityId) -> Option<&TicketLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Units of `product_id` already in the ticket (0 if absent).
    pub fn quantity_of(&self, product_id: &EntityId) -> i64 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    /// The discount exactly as set; `None` means never set.
    pub fn discount(&self) -> Option<Discount> {
        self.discount
    }

    /// The effective discount; an unset discount reads as 0%.
    pub fn discount_percent(&self) -> Discount {
        self.discount.unwrap_or_default()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn customer_id(&self) -> Option<&EntityId> {
        self.customer_id.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn staged(&self) -> Option<&StagedLine> {
        self.staged.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn phase(&self) -> TicketPhase {
        if self.submitting {
            TicketPhase::Submitting
        } else if self.lines.is_empty() {
            TicketPhase::Empty
        } else {
            TicketPhase::Building
        }
    }

    /// Recomputed on every call.
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.lines, self.discount)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Applies `action` and returns the next state plus any advisories.
    ///
    /// `self` is never modified. On error the caller keeps its current state.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{EntityId, Money, ProductSnapshot, Ticket, TicketAction};
    ///
    /// let coke = ProductSnapshot {
    ///     id: EntityId::Numeric(1),
    ///     sku: "COKE-330".into(),
    ///     name: "Coke 330ml".into(),
    ///     unit_price: Money::from_cents(150),
    ///     stock: 10,
    ///     min_stock: 3,
    ///     is_active: true,
    /// };
    ///
    /// let ticket = Ticket::new()
    ///     .apply(TicketAction::AddProduct { product: coke, quantity: 2 })
    ///     .unwrap()
    ///     .state;
    /// assert_eq!(ticket.totals().subtotal.cents(), 300);
    /// ```
    pub fn apply(&self, action: TicketAction) -> TicketResult<Transition> {
        if self.submitting
            && !matches!(
                action,
                TicketAction::SubmitSucceeded | TicketAction::SubmitFailed
            )
        {
            return Err(TicketError::SubmissionInProgress);
        }

        let mut next = self.clone();
        let mut advisories = Vec::new();

        match action {
            TicketAction::SelectProduct(product) => {
                ensure_sellable(&product)?;
                next.staged = Some(StagedLine {
                    product,
                    quantity: 1,
                });
            }
            TicketAction::SetStagedQuantity(quantity) => {
                validate_quantity(quantity)?;
                let staged = next.staged.as_mut().ok_or(TicketError::NothingSelected)?;
                staged.quantity = quantity;
            }
            TicketAction::ClearSelection => next.staged = None,
            TicketAction::AddToTicket { quantity } => {
                validate_quantity(quantity)?;
                let staged = next.staged.take().ok_or(TicketError::NothingSelected)?;
                advisories.extend(next.merge_line(staged.product, quantity)?);
            }
            TicketAction::AddProduct { product, quantity } => {
                validate_quantity(quantity)?;
                ensure_sellable(&product)?;
                advisories.extend(next.merge_line(product, quantity)?);
            }
            TicketAction::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity <= 0 {
                    next.lines.retain(|l| l.product_id != product_id);
                } else {
                    let line = next
                        .lines
                        .iter_mut()
                        .find(|l| l.product_id == product_id)
                        .ok_or(TicketError::LineNotFound(product_id))?;
                    if quantity > line.product.stock {
                        return Err(TicketError::InsufficientStock {
                            product: line.product.name.clone(),
                            available: line.product.stock,
                            in_ticket: line.quantity,
                            requested: quantity,
                        });
                    }
                    line.set_quantity(quantity)?;
                    advisories.extend(Advisory::low_stock(
                        &line.product,
                        line.product.stock - quantity,
                    ));
                    next.ensure_subtotal_fits()?;
                }
            }
            TicketAction::RemoveLine { product_id } => {
                next.lines.retain(|l| l.product_id != product_id);
            }
            TicketAction::SetDiscount(discount) => next.discount = discount,
            TicketAction::SetPaymentMethod(method) => next.payment_method = method,
            TicketAction::SetCustomer(customer_id) => next.customer_id = customer_id,
            TicketAction::SetNotes(notes) => next.notes = validate_notes(notes.as_deref())?,
            TicketAction::BeginSubmit => {
                if next.lines.is_empty() {
                    return Err(TicketError::EmptyTicket);
                }
                next.submitting = true;
            }
            TicketAction::SubmitSucceeded => {
                if self.submitting {
                    next = Ticket::new();
                }
            }
            TicketAction::SubmitFailed => next.submitting = false,
            TicketAction::Cancel => next = Ticket::new(),
        }

        Ok(Transition {
            state: next,
            advisories,
        })
    }

    /// Adds `quantity` units, merging into an existing line for the product.
    fn merge_line(
        &mut self,
        product: ProductSnapshot,
        quantity: i64,
    ) -> TicketResult<Option<Advisory>> {
        let in_ticket = self.quantity_of(&product.id);
        let total_requested = in_ticket.saturating_add(quantity);

        if total_requested > product.stock {
            return Err(TicketError::InsufficientStock {
                product: product.name,
                available: product.stock,
                in_ticket,
                requested: quantity,
            });
        }

        let advisory = Advisory::low_stock(&product, product.stock - total_requested);

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.set_quantity(total_requested)?;
                line.product = product;
            }
            None => self.lines.push(TicketLine::new(product, quantity)?),
        }

        self.ensure_subtotal_fits()?;
        Ok(advisory)
    }

    /// The sum of all line subtotals must stay representable.
    fn ensure_subtotal_fits(&self) -> TicketResult<()> {
        self.lines
            .iter()
            .try_fold(Money::zero(), |sum, line| sum.checked_add(line.subtotal))
            .map(|_| ())
            .ok_or_else(|| amount_out_of_range("ticket subtotal"))
    }
}

/// Free-function form of [`Ticket::apply`].
pub fn reduce(state: &Ticket, action: TicketAction) -> TicketResult<Transition> {
    state.apply(action)
}

fn ensure_sellable(product: &ProductSnapshot) -> TicketResult<()> {
    if !product.is_active {
        return Err(TicketError::ProductUnavailable(product.name.clone()));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price_cents: i64, stock: i64, min_stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: EntityId::Numeric(id),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            unit_price: Money::from_cents(price_cents),
            stock,
            min_stock,
            is_active: true,
        }
    }

    fn add(ticket: &Ticket, product: ProductSnapshot, quantity: i64) -> TicketResult<Transition> {
        ticket.apply(TicketAction::AddProduct { product, quantity })
    }

    fn assert_subtotal_invariant(ticket: &Ticket) {
        for line in ticket.lines() {
            assert_eq!(line.subtotal, line.unit_price * line.quantity);
            assert!(line.quantity >= 1);
        }
        let expected: Money = ticket.lines().iter().map(|l| l.unit_price * l.quantity).sum();
        assert_eq!(ticket.totals().subtotal, expected);
    }

    #[test]
    fn test_new_ticket_is_empty() {
        let ticket = Ticket::new();
        assert_eq!(ticket.phase(), TicketPhase::Empty);
        assert_eq!(ticket.payment_method(), PaymentMethod::Cash);
        assert!(ticket.discount_percent().is_zero());
        assert!(ticket.staged().is_none());
    }

    #[test]
    fn test_select_then_add_uses_staged_product() {
        let ticket = Ticket::new()
            .apply(TicketAction::SelectProduct(product(1, 999, 10, 0)))
            .unwrap()
            .state;
        assert_eq!(ticket.staged().unwrap().quantity, 1);

        let ticket = ticket
            .apply(TicketAction::AddToTicket { quantity: 2 })
            .unwrap()
            .state;

        assert!(ticket.staged().is_none());
        assert_eq!(ticket.lines().len(), 1);
        assert_eq!(ticket.totals().subtotal.cents(), 1998);
        assert_eq!(ticket.phase(), TicketPhase::Building);
        assert_subtotal_invariant(&ticket);
    }

    #[test]
    fn test_add_without_selection_fails() {
        let err = Ticket::new()
            .apply(TicketAction::AddToTicket { quantity: 1 })
            .unwrap_err();
        assert_eq!(err, TicketError::NothingSelected);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let err = add(&Ticket::new(), product(1, 100, 10, 0), 0).unwrap_err();
        assert!(matches!(err, TicketError::Validation(_)));
    }

    #[test]
    fn test_inactive_product_cannot_be_selected() {
        let mut retired = product(1, 100, 10, 0);
        retired.is_active = false;
        let err = Ticket::new()
            .apply(TicketAction::SelectProduct(retired))
            .unwrap_err();
        assert!(matches!(err, TicketError::ProductUnavailable(_)));
    }

    #[test]
    fn test_same_product_merges_into_one_line() {
        let ticket = add(&Ticket::new(), product(1, 999, 10, 0), 2).unwrap().state;
        let ticket = add(&ticket, product(1, 999, 10, 0), 3).unwrap().state;

        assert_eq!(ticket.lines().len(), 1);
        assert_eq!(ticket.quantity_of(&EntityId::Numeric(1)), 5);
        assert_eq!(ticket.totals().subtotal.cents(), 4995);
        assert_subtotal_invariant(&ticket);
    }

    #[test]
    fn test_merge_keeps_first_price_and_refreshes_stock() {
        let ticket = add(&Ticket::new(), product(1, 500, 10, 0), 1).unwrap().state;
        let ticket = add(&ticket, product(1, 700, 4, 0), 1).unwrap().state;

        let line = ticket.line(&EntityId::Numeric(1)).unwrap();
        assert_eq!(line.unit_price.cents(), 500);
        assert_eq!(line.product.stock, 4);
        assert_eq!(line.subtotal.cents(), 1000);
    }

    #[test]
    fn test_low_stock_scenario() {
        let coke = product(1, 150, 10, 3);

        let first = add(&Ticket::new(), coke.clone(), 8).unwrap();
        assert_eq!(
            first.advisories,
            vec![Advisory::LowStock {
                product_id: EntityId::Numeric(1),
                name: "Product 1".to_string(),
                remaining: 2,
                min_stock: 3,
            }]
        );

        let err = add(&first.state, coke, 3).unwrap_err();
        assert_eq!(
            err,
            TicketError::InsufficientStock {
                product: "Product 1".to_string(),
                available: 10,
                in_ticket: 8,
                requested: 3,
            }
        );
        assert_eq!(first.state.quantity_of(&EntityId::Numeric(1)), 8);
    }

    #[test]
    fn test_no_advisory_when_stock_runs_out_or_stays_high() {
        let sold_out = add(&Ticket::new(), product(1, 100, 5, 3), 5).unwrap();
        assert!(sold_out.advisories.is_empty());

        let plenty = add(&Ticket::new(), product(2, 100, 50, 3), 5).unwrap();
        assert!(plenty.advisories.is_empty());
    }

    #[test]
    fn test_failed_add_keeps_staged_selection() {
        let ticket = Ticket::new()
            .apply(TicketAction::SelectProduct(product(1, 100, 2, 0)))
            .unwrap()
            .state;
        assert!(ticket.apply(TicketAction::AddToTicket { quantity: 3 }).is_err());
        assert!(ticket.staged().is_some());
    }

    #[test]
    fn test_update_quantity() {
        let ticket = add(&Ticket::new(), product(1, 250, 10, 0), 2).unwrap().state;
        let id = EntityId::Numeric(1);

        let updated = ticket
            .apply(TicketAction::UpdateQuantity {
                product_id: id.clone(),
                quantity: 6,
            })
            .unwrap()
            .state;
        assert_eq!(updated.line(&id).unwrap().subtotal.cents(), 1500);
        assert_subtotal_invariant(&updated);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let ticket = add(&Ticket::new(), product(1, 250, 10, 0), 2).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::UpdateQuantity {
                product_id: EntityId::Numeric(1),
                quantity: 0,
            })
            .unwrap()
            .state;
        assert!(ticket.is_empty());
        assert_eq!(ticket.phase(), TicketPhase::Empty);
    }

    #[test]
    fn test_update_quantity_above_stock_fails_unchanged() {
        let ticket = add(&Ticket::new(), product(1, 250, 10, 0), 2).unwrap().state;
        let err = ticket
            .apply(TicketAction::UpdateQuantity {
                product_id: EntityId::Numeric(1),
                quantity: 11,
            })
            .unwrap_err();
        assert!(matches!(err, TicketError::InsufficientStock { .. }));
        assert_eq!(ticket.quantity_of(&EntityId::Numeric(1)), 2);
    }

    #[test]
    fn test_update_unknown_line_fails() {
        let err = Ticket::new()
            .apply(TicketAction::UpdateQuantity {
                product_id: EntityId::Numeric(9),
                quantity: 1,
            })
            .unwrap_err();
        assert_eq!(err, TicketError::LineNotFound(EntityId::Numeric(9)));
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let ticket = add(&Ticket::new(), product(1, 250, 10, 0), 2).unwrap().state;
        let remove = TicketAction::RemoveLine {
            product_id: EntityId::Numeric(1),
        };
        let once = ticket.apply(remove.clone()).unwrap().state;
        let twice = once.apply(remove).unwrap().state;
        assert!(once.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_discount_scenario() {
        let ticket = add(&Ticket::new(), product(1, 10_000, 10, 0), 2).unwrap().state;
        let ticket = add(&ticket, product(2, 5_000, 10, 0), 3).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::SetDiscount(Some(Discount::from_percent(10).unwrap())))
            .unwrap()
            .state;

        let totals = ticket.totals();
        assert_eq!(totals.subtotal.cents(), 35_000);
        assert_eq!(totals.discount_amount.cents(), 3_500);
        assert_eq!(totals.total.cents(), 31_500);
    }

    #[test]
    fn test_empty_ticket_cannot_submit() {
        let err = Ticket::new().apply(TicketAction::BeginSubmit).unwrap_err();
        assert_eq!(err, TicketError::EmptyTicket);
    }

    #[test]
    fn test_submitting_freezes_ticket() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 1).unwrap().state;
        let submitting = ticket.apply(TicketAction::BeginSubmit).unwrap().state;
        assert_eq!(submitting.phase(), TicketPhase::Submitting);

        for action in [
            TicketAction::Cancel,
            TicketAction::BeginSubmit,
            TicketAction::SetPaymentMethod(PaymentMethod::Card),
            TicketAction::RemoveLine {
                product_id: EntityId::Numeric(1),
            },
        ] {
            assert_eq!(
                submitting.apply(action).unwrap_err(),
                TicketError::SubmissionInProgress
            );
        }
    }

    #[test]
    fn test_submit_failure_returns_to_building_with_same_contents() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 3).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::SetPaymentMethod(PaymentMethod::Transfer))
            .unwrap()
            .state;
        let submitting = ticket.apply(TicketAction::BeginSubmit).unwrap().state;
        let failed = submitting.apply(TicketAction::SubmitFailed).unwrap().state;

        assert_eq!(failed, ticket);
        assert_eq!(failed.phase(), TicketPhase::Building);
    }

    #[test]
    fn test_submit_failure_keeps_staged_selection() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 2).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::SelectProduct(product(2, 250, 5, 0)))
            .unwrap()
            .state
            .apply(TicketAction::SetStagedQuantity(2))
            .unwrap()
            .state;

        let submitting = ticket.apply(TicketAction::BeginSubmit).unwrap().state;
        assert!(submitting.staged().is_some());
        let failed = submitting.apply(TicketAction::SubmitFailed).unwrap().state;

        assert_eq!(failed, ticket);
        assert_eq!(failed.staged().unwrap().quantity, 2);
    }

    #[test]
    fn test_line_subtotal_overflow_is_rejected() {
        let mut huge = product(1, 0, 1_000, 0);
        huge.unit_price = Money::parse_decimal("100000000000000").unwrap();

        let err = add(&Ticket::new(), huge.clone(), 1_000).unwrap_err();
        assert!(matches!(
            err,
            TicketError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "subtotal"
        ));

        let ticket = add(&Ticket::new(), huge, 1).unwrap().state;
        let before = ticket.clone();
        let err = ticket
            .apply(TicketAction::UpdateQuantity {
                product_id: EntityId::Numeric(1),
                quantity: 1_000,
            })
            .unwrap_err();
        assert!(matches!(err, TicketError::Validation(_)));
        assert_eq!(ticket, before);
    }

    #[test]
    fn test_ticket_subtotal_overflow_is_rejected() {
        let mut first = product(1, 0, 10, 0);
        first.unit_price = Money::from_cents(i64::MAX / 2 + 1);
        let mut second = first.clone();
        second.id = EntityId::Numeric(2);

        let ticket = add(&Ticket::new(), first, 1).unwrap().state;
        let err = add(&ticket, second, 1).unwrap_err();
        assert!(matches!(
            err,
            TicketError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "ticket subtotal"
        ));
        assert_eq!(ticket.lines().len(), 1);
    }

    #[test]
    fn test_submit_success_resets_everything() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 3).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::SetDiscount(Some(Discount::from_percent(5).unwrap())))
            .unwrap()
            .state
            .apply(TicketAction::SetPaymentMethod(PaymentMethod::Card))
            .unwrap()
            .state
            .apply(TicketAction::SetCustomer(Some(EntityId::Numeric(4))))
            .unwrap()
            .state;

        let done = ticket
            .apply(TicketAction::BeginSubmit)
            .unwrap()
            .state
            .apply(TicketAction::SubmitSucceeded)
            .unwrap()
            .state;

        assert_eq!(done, Ticket::new());
        assert!(done.lines().is_empty());
        assert!(done.discount_percent().is_zero());
        assert_eq!(done.payment_method(), PaymentMethod::Cash);
    }

    #[test]
    fn test_stray_submit_success_does_not_reset() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 1).unwrap().state;
        let after = ticket.apply(TicketAction::SubmitSucceeded).unwrap().state;
        assert_eq!(after, ticket);
    }

    #[test]
    fn test_cancel_resets() {
        let ticket = add(&Ticket::new(), product(1, 100, 10, 0), 1).unwrap().state;
        let ticket = ticket
            .apply(TicketAction::SetNotes(Some("fragile".to_string())))
            .unwrap()
            .state;
        assert_eq!(ticket.notes(), Some("fragile"));

        let cancelled = reduce(&ticket, TicketAction::Cancel).unwrap().state;
        assert_eq!(cancelled, Ticket::new());
    }
}
