//! # Register Commands
//!
//! Parses one line of operator input into a [`Command`].
//!
//! ## Command Reference
//! ```text
//! search <text>            find active products by SKU or name
//! select <n>               stage result n of the last search
//! unselect                 drop the staged product
//! add [qty]                add the staged product (default: staged qty)
//! qty <id> <n>             set a line's quantity (0 removes it)
//! rm <id>                  remove a line
//! discount <pct|none>      whole-ticket discount, e.g. 10 or 12.5
//! pay <cash|card|transfer> payment method
//! customer <id|none>       attach a customer
//! note <text|none>         notes sent with the sale
//! show                     print the ticket
//! confirm                  submit the sale
//! cancel                   discard the ticket
//! void <saleId>            void a committed sale
//! help | quit
//! ```

use tally_core::{Discount, EntityId, PaymentMethod, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    /// 1-based position in the last search results.
    Select(usize),
    Unselect,
    Add(Option<i64>),
    Quantity(EntityId, i64),
    Remove(EntityId),
    Discount(Option<Discount>),
    Pay(PaymentMethod),
    Customer(Option<EntityId>),
    Note(Option<String>),
    Show,
    Confirm,
    Cancel,
    Void(EntityId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub const HELP: &str = "\
search <text>             find products by SKU or name
select <n>                stage result n of the last search
unselect                  drop the staged product
add [qty]                 add the staged product to the ticket
qty <id> <n>              set a line's quantity (0 removes it)
rm <id>                   remove a line
discount <pct|none>       set or clear the ticket discount
pay <cash|card|transfer>  set the payment method
customer <id|none>        set or clear the customer
note <text|none>          set or clear the sale notes
show                      print the ticket
confirm                   submit the sale
cancel                    discard the ticket
void <saleId>             void a committed sale
help                      show this help
quit                      leave the register";

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "select" => Command::Select(parse_position(rest)?),
            "unselect" => Command::Unselect,
            "add" | "a" => Command::Add(if rest.is_empty() {
                None
            } else {
                Some(parse_number(rest)?)
            }),
            "qty" => {
                let (id, qty) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("qty <id> <n>"))?;
                Command::Quantity(EntityId::parse(id)?, parse_number(qty.trim())?)
            }
            "rm" | "remove" => Command::Remove(required_id(rest, "rm <id>")?),
            "discount" => match optional(rest, "discount <pct|none>")? {
                Some(pct) => Command::Discount(Some(Discount::parse(pct)?)),
                None => Command::Discount(None),
            },
            "pay" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("pay <cash|card|transfer>"));
                }
                Command::Pay(rest.parse()?)
            }
            "customer" => match optional(rest, "customer <id|none>")? {
                Some(id) => Command::Customer(Some(EntityId::parse(id)?)),
                None => Command::Customer(None),
            },
            "note" | "notes" => {
                Command::Note(optional(rest, "note <text|none>")?.map(str::to_string))
            }
            "show" | "ticket" => Command::Show,
            "confirm" => Command::Confirm,
            "cancel" => Command::Cancel,
            "void" => Command::Void(required_id(rest, "void <saleId>")?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_number(text: &str) -> Result<i64, CommandError> {
    text.parse()
        .map_err(|_| CommandError::NotANumber(text.to_string()))
}

fn parse_position(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::Usage("select <n>  (n starts at 1)")),
    }
}

fn required_id(text: &str, usage: &'static str) -> Result<EntityId, CommandError> {
    if text.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(EntityId::parse(text)?)
}

/// `none` clears; anything else is the new value.
fn optional<'a>(text: &'a str, usage: &'static str) -> Result<Option<&'a str>, CommandError> {
    match text {
        "" => Err(CommandError::Usage(usage)),
        t if t.eq_ignore_ascii_case("none") => Ok(None),
        t => Ok(Some(t)),
    }
}
