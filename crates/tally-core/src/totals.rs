//! # Totals
//!
//! Pure calculation of ticket totals. Nothing here is cached: the ticket
//! recomputes on every read, so totals can never go stale after a mutation.
//!
//! ```text
//! subtotal        = Σ line.subtotal                 (exact, cents)
//! discount_amount = subtotal × bps / 10000          (rounded half-up, once)
//! total           = subtotal − discount_amount      (exact, cents)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::ticket::TicketLine;
use crate::types::Discount;

/// Ticket totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Number of distinct lines.
    pub item_count: usize,
    /// Sum of line quantities.
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

impl Totals {
    /// Computes totals for `lines` with an optional whole-ticket discount.
    pub fn compute(lines: &[TicketLine], discount: Option<Discount>) -> Totals {
        let subtotal: Money = lines.iter().map(|line| line.subtotal).sum();
        let discount_amount = discount
            .map(|d| subtotal.percentage_of(d.bps()))
            .unwrap_or_default();

        Totals {
            item_count: lines.len(),
            total_quantity: lines.iter().map(|line| line.quantity).sum(),
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }
}
