//! # Quick-Sale Session
//!
//! One register's sale in progress: the ticket, the catalog results, and the
//! backend they are submitted to.
//!
//! ## Confirm Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  confirm()                                                              │
//! │     │                                                                   │
//! │     ├── ticket empty? ──► EmptyTicket (no request)                     │
//! │     │                                                                   │
//! │     ├── BeginSubmit        ticket frozen (Submitting)                  │
//! │     │                                                                   │
//! │     ├── POST /sales ───────┬── 2xx ──► SubmitSucceeded ──► Receipt     │
//! │     │                      │            (ticket reset)                 │
//! │     │                      └── error ─► SubmitFailed ──► SubmissionFailed
//! │     │                                   (same lines, operator retries) │
//! │     │                                                                   │
//! │     └── future dropped mid-flight ──► ticket unfrozen (SubmitFailed)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tally_core::order::CreateSaleRequest;
use tally_core::{
    Advisory, Discount, EntityId, Money, PaymentMethod, ProductSnapshot, Sale, SaleStatus, Ticket,
    TicketAction, TicketError, TicketResult, Totals,
};
use tracing::{debug, error, info, warn};

use crate::backend::PosBackend;
use crate::catalog::{CatalogLookup, SearchOutcome};
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Receipt
// =============================================================================

/// What the operator sees after a sale is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub sale_id: EntityId,
    pub status: SaleStatus,
    pub item_count: usize,
    /// Total charged by the backend.
    pub total: Money,
    pub discount_amount: Money,
    /// Total the ticket showed before submission.
    pub expected_total: Money,
    pub created_at: Option<DateTime<Utc>>,
}

impl Receipt {
    fn new(sale: Sale, request: &CreateSaleRequest, expected_total: Money) -> Self {
        let item_count = if sale.items.is_empty() {
            request.items.len()
        } else {
            sale.items.len()
        };

        Receipt {
            sale_id: sale.id,
            status: sale.status,
            item_count,
            total: sale.total,
            discount_amount: sale.discount_amount,
            expected_total,
            created_at: sale.created_at,
        }
    }

    /// True if the backend charged a different total than the ticket showed.
    pub fn was_repriced(&self) -> bool {
        self.total != self.expected_total
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct QuickSaleSession<B: ?Sized> {
    backend: Arc<B>,
    catalog: CatalogLookup<B>,
    ticket: Ticket,
}

impl<B: PosBackend + ?Sized> QuickSaleSession<B> {
    pub fn new(backend: Arc<B>, search_limit: u32) -> Self {
        QuickSaleSession {
            catalog: CatalogLookup::new(Arc::clone(&backend), search_limit),
            backend,
            ticket: Ticket::new(),
        }
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn totals(&self) -> Totals {
        self.ticket.totals()
    }

    pub fn catalog(&self) -> &CatalogLookup<B> {
        &self.catalog
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn search(&self, text: &str) -> ClientResult<SearchOutcome> {
        self.catalog.search(text).await
    }

    /// Stages the `index`-th (0-based) result of the last search.
    pub fn select_result(&mut self, index: usize) -> ClientResult<ProductSnapshot> {
        let product = self
            .catalog
            .result(index)
            .ok_or(ClientError::Core(TicketError::NothingSelected))?;
        self.select_product(product.clone())?;
        Ok(product)
    }

    // =========================================================================
    // Ticket Mutations
    // =========================================================================

    pub fn select_product(&mut self, product: ProductSnapshot) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SelectProduct(product))
    }

    pub fn set_staged_quantity(&mut self, quantity: i64) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SetStagedQuantity(quantity))
    }

    pub fn clear_selection(&mut self) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::ClearSelection)
    }

    pub fn add_to_ticket(&mut self, quantity: i64) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::AddToTicket { quantity })
    }

    pub fn add_product(
        &mut self,
        product: ProductSnapshot,
        quantity: i64,
    ) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::AddProduct { product, quantity })
    }

    pub fn update_quantity(
        &mut self,
        product_id: EntityId,
        quantity: i64,
    ) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::UpdateQuantity {
            product_id,
            quantity,
        })
    }

    pub fn remove_line(&mut self, product_id: EntityId) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::RemoveLine { product_id })
    }

    pub fn set_discount(&mut self, discount: Option<Discount>) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SetDiscount(discount))
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SetPaymentMethod(method))
    }

    pub fn set_customer(&mut self, customer_id: Option<EntityId>) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SetCustomer(customer_id))
    }

    pub fn set_notes(&mut self, notes: Option<String>) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::SetNotes(notes))
    }

    /// Discards the ticket.
    pub fn cancel(&mut self) -> TicketResult<Vec<Advisory>> {
        self.dispatch(TicketAction::Cancel)
    }

    fn dispatch(&mut self, action: TicketAction) -> TicketResult<Vec<Advisory>> {
        debug!(?action, "Applying ticket action");
        let transition = self.ticket.apply(action)?;
        for advisory in &transition.advisories {
            warn!(%advisory, "Stock advisory");
        }
        self.ticket = transition.state;
        Ok(transition.advisories)
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submits the ticket as one sale.
    ///
    /// On success the ticket is reset. On failure it is left exactly as it
    /// was and the error carries the backend's message. A 2xx reply that
    /// cannot be decoded is reported as
    /// [`TicketError::SubmissionUnconfirmed`] since the sale may exist.
    pub async fn confirm(&mut self) -> ClientResult<Receipt> {
        let request = CreateSaleRequest::from_ticket(&self.ticket)?;
        let expected_total = self.ticket.totals().total;
        let backend = Arc::clone(&self.backend);

        let submission = Submission::begin(&mut self.ticket)?;
        info!(
            items = request.items.len(),
            payment_method = %request.payment_method,
            total = %expected_total,
            "Confirming sale"
        );

        match backend.create_sale(&request).await {
            Ok(sale) => {
                submission.succeed();
                let receipt = Receipt::new(sale, &request, expected_total);
                info!(sale_id = %receipt.sale_id, total = %receipt.total, "Sale confirmed");
                if receipt.was_repriced() {
                    warn!(
                        expected = %receipt.expected_total,
                        charged = %receipt.total,
                        "Backend total differs from ticket total"
                    );
                }
                Ok(receipt)
            }
            Err(ClientError::Decode(detail)) => {
                submission.fail();
                error!(error = %detail, "Sale reply unreadable; sale may have been recorded");
                Err(TicketError::SubmissionUnconfirmed { message: detail }.into())
            }
            Err(err) => {
                submission.fail();
                error!(error = %err, "Sale rejected");
                Err(TicketError::submission_failed(err.to_string()).into())
            }
        }
    }

    /// Voids a previously committed sale. The current ticket is not touched.
    pub async fn void_sale(&self, sale_id: &EntityId) -> ClientResult<Sale> {
        let sale = self.backend.cancel_sale(sale_id).await?;
        info!(%sale_id, status = ?sale.status, "Sale voided");
        Ok(sale)
    }
}

/// Holds the ticket in the Submitting phase for the duration of one request.
///
/// Dropping it without an outcome (the confirm future was cancelled) counts
/// as a failure, so the ticket never stays frozen.
struct Submission<'a> {
    ticket: &'a mut Ticket,
    settled: bool,
}

impl<'a> Submission<'a> {
    fn begin(ticket: &'a mut Ticket) -> TicketResult<Self> {
        *ticket = ticket.apply(TicketAction::BeginSubmit)?.state;
        Ok(Submission {
            ticket,
            settled: false,
        })
    }

    fn succeed(mut self) {
        self.settle(TicketAction::SubmitSucceeded);
    }

    fn fail(mut self) {
        self.settle(TicketAction::SubmitFailed);
    }

    fn settle(&mut self, action: TicketAction) {
        if let Ok(transition) = self.ticket.apply(action) {
            *self.ticket = transition.state;
        }
        self.settled = true;
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(TicketAction::SubmitFailed);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
