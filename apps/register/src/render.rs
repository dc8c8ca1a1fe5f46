//! Text rendering for the terminal register.

use tally_client::Receipt;
use tally_core::{ProductSnapshot, Ticket, Totals};

pub fn results(products: &[ProductSnapshot], symbol: &str) -> Vec<String> {
    if products.is_empty() {
        return vec!["No products found".to_string()];
    }

    products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{:>3}. {:<14} {:<28} {:>10}  ({} in stock)",
                i + 1,
                p.sku,
                p.name,
                p.unit_price.format_with_symbol(symbol),
                p.stock
            )
        })
        .collect()
}

pub fn ticket(ticket: &Ticket, symbol: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(staged) = ticket.staged() {
        out.push(format!(
            "Selected: {} x{} (type 'add' to add it)",
            staged.product.name, staged.quantity
        ));
    }

    if ticket.is_empty() {
        out.push("Ticket is empty".to_string());
        return out;
    }

    for line in ticket.lines() {
        out.push(format!(
            "  [{}] {:<28} {:>4} x {:>10} = {:>10}",
            line.product_id,
            line.product.name,
            line.quantity,
            line.unit_price.format_with_symbol(symbol),
            line.subtotal.format_with_symbol(symbol)
        ));
    }

    let mut details = vec![format!("Payment: {}", ticket.payment_method())];
    if let Some(customer) = ticket.customer_id() {
        details.push(format!("Customer: {}", customer));
    }
    if let Some(notes) = ticket.notes() {
        details.push(format!("Notes: {}", notes));
    }
    out.push(details.join("  |  "));
    out.extend(totals(&ticket.totals(), ticket, symbol));
    out
}

pub fn totals(totals: &Totals, ticket: &Ticket, symbol: &str) -> Vec<String> {
    let mut out = vec![format!(
        "Subtotal: {} ({} items)",
        totals.subtotal.format_with_symbol(symbol),
        totals.total_quantity
    )];
    if ticket.discount().is_some() {
        out.push(format!(
            "Discount: {} (-{})",
            ticket.discount_percent(),
            totals.discount_amount.format_with_symbol(symbol)
        ));
    }
    out.push(format!("Total:    {}", totals.total.format_with_symbol(symbol)));
    out
}

pub fn receipt(receipt: &Receipt, symbol: &str) -> Vec<String> {
    let mut out = vec![format!(
        "Sale {} confirmed: {} line(s), total {}",
        receipt.sale_id,
        receipt.item_count,
        receipt.total.format_with_symbol(symbol)
    )];
    if receipt.was_repriced() {
        out.push(format!(
            "Note: backend charged {} (ticket showed {})",
            receipt.total.format_with_symbol(symbol),
            receipt.expected_total.format_with_symbol(symbol)
        ));
    }
    out
}
