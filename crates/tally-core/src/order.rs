//! # Order Payload
//!
//! Builds the `POST /sales` body from a ticket.
//!
//! ```text
//! {
//!   "items": [{ "productId": 1, "quantity": 2 }],
//!   "paymentMethod": "CASH",
//!   "discountPercent": 10,        ← omitted when the discount was never set
//!   "customerId": null,           ← always present
//!   "notes": "gift wrap"          ← omitted when blank
//! }
//! ```
//!
//! Prices are deliberately absent: the backend re-prices every item at commit.

use serde::Serialize;

use crate::error::{TicketError, TicketResult};
use crate::ticket::Ticket;
use crate::types::{EntityId, PaymentMethod};

/// One item of a create-sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: EntityId,
    pub quantity: i64,
}

/// Body of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<serde_json::Number>,
    pub customer_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateSaleRequest {
    /// Builds the request for `ticket`, in line order.
    ///
    /// An explicit 0% discount is sent as `0`; only an unset discount is
    /// left out.
    pub fn from_ticket(ticket: &Ticket) -> TicketResult<Self> {
        if ticket.is_empty() {
            return Err(TicketError::EmptyTicket);
        }

        Ok(CreateSaleRequest {
            items: ticket
                .lines()
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            payment_method: ticket.payment_method(),
            discount_percent: ticket.discount().map(|d| d.as_percent_number()),
            customer_id: ticket.customer_id().cloned(),
            notes: ticket.notes().map(str::to_string),
        })
    }
}
