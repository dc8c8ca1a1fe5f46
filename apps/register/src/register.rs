//! # Register
//!
//! Executes parsed commands against a [`QuickSaleSession`] and turns every
//! outcome, success or error, into lines for the operator.
//!
//! ## User Workflow
//! ```text
//! > search coke
//!   1. COKE-330   Coke 330ml   $1.50  (10 in stock)
//! > select 1
//! > add 8
//!   ! Low stock: Coke 330ml will have 2 left (minimum 3)
//! > discount 10
//! > confirm
//!   Sale 981 confirmed: 1 line(s), total $10.80
//! ```

use tally_client::{PosBackend, QuickSaleSession, SearchOutcome};
use tally_core::{Advisory, TicketResult};
use tracing::debug;

use crate::commands::{Command, HELP};
use crate::render;

/// Result of one command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Reply { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::line(format!("error: {}", err))
    }
}

pub struct Register<B: ?Sized> {
    session: QuickSaleSession<B>,
    currency_symbol: String,
}

impl<B: PosBackend + ?Sized> Register<B> {
    pub fn new(session: QuickSaleSession<B>, currency_symbol: impl Into<String>) -> Self {
        Register {
            session,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn session(&self) -> &QuickSaleSession<B> {
        &self.session
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Executing register command");
        let symbol = self.currency_symbol.clone();

        match command {
            Command::Search(text) => match self.session.search(&text).await {
                Ok(SearchOutcome::Current(products)) => {
                    Reply::lines(render::results(&products, &symbol))
                }
                Ok(SearchOutcome::Stale) => Reply::line("(superseded by a newer search)"),
                Err(err) => Reply::error(err),
            },
            Command::Select(position) => match self.session.select_result(position - 1) {
                Ok(product) => Reply::line(format!(
                    "Selected {} at {} ({} in stock)",
                    product.name,
                    product.unit_price.format_with_symbol(&symbol),
                    product.stock
                )),
                Err(err) => Reply::error(err),
            },
            Command::Unselect => match self.session.clear_selection() {
                Ok(_) => Reply::line("Selection cleared"),
                Err(err) => Reply::error(err),
            },
            Command::Add(quantity) => {
                let quantity = quantity
                    .or_else(|| self.session.ticket().staged().map(|s| s.quantity))
                    .unwrap_or(1);
                let result = self.session.add_to_ticket(quantity);
                self.after_mutation(result)
            }
            Command::Quantity(product_id, quantity) => {
                let result = self.session.update_quantity(product_id, quantity);
                self.after_mutation(result)
            }
            Command::Remove(product_id) => {
                let result = self.session.remove_line(product_id);
                self.after_mutation(result)
            }
            Command::Discount(discount) => {
                let result = self.session.set_discount(discount);
                self.after_mutation(result)
            }
            Command::Pay(method) => match self.session.set_payment_method(method) {
                Ok(_) => Reply::line(format!("Payment method: {}", method)),
                Err(err) => Reply::error(err),
            },
            Command::Customer(customer) => match self.session.set_customer(customer) {
                Ok(_) => Reply::line(match self.session.ticket().customer_id() {
                    Some(id) => format!("Customer: {}", id),
                    None => "Customer cleared".to_string(),
                }),
                Err(err) => Reply::error(err),
            },
            Command::Note(notes) => match self.session.set_notes(notes) {
                Ok(_) => Reply::line(match self.session.ticket().notes() {
                    Some(notes) => format!("Notes: {}", notes),
                    None => "Notes cleared".to_string(),
                }),
                Err(err) => Reply::error(err),
            },
            Command::Show => Reply::lines(render::ticket(self.session.ticket(), &symbol)),
            Command::Confirm => match self.session.confirm().await {
                Ok(receipt) => Reply::lines(render::receipt(&receipt, &symbol)),
                Err(err) => Reply::error(err),
            },
            Command::Cancel => match self.session.cancel() {
                Ok(_) => Reply::line("Ticket cleared"),
                Err(err) => Reply::error(err),
            },
            Command::Void(sale_id) => match self.session.void_sale(&sale_id).await {
                Ok(sale) => Reply::line(format!("Sale {} voided ({:?})", sale.id, sale.status)),
                Err(err) => Reply::error(err),
            },
            Command::Help => Reply::lines(HELP.lines().map(str::to_string).collect()),
            Command::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
        }
    }

    /// Advisories first, then the updated totals.
    fn after_mutation(&self, result: TicketResult<Vec<Advisory>>) -> Reply {
        match result {
            Ok(advisories) => {
                let ticket = self.session.ticket();
                let mut lines: Vec<String> =
                    advisories.iter().map(|a| format!("! {}", a)).collect();
                lines.extend(render::totals(
                    &ticket.totals(),
                    ticket,
                    &self.currency_symbol,
                ));
                Reply::lines(lines)
            }
            Err(err) => Reply::error(err),
        }
    }
}
