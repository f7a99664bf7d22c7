//! All-or-nothing invoice validation.
//!
//! Every rule is checked independently so a caller learns about every
//! problem with an invoice at once rather than one per submission.

use crate::invoice::{Invoice, LineItem};
use thiserror::Error;

/// A single problem found in an invoice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Invoice is missing")]
    MissingInvoice,

    #[error("Missing invoice_id")]
    MissingInvoiceId,

    #[error("Missing customer_id")]
    MissingCustomerId,

    #[error("Invoice must contain items")]
    NoItems,

    #[error("Item sku is missing")]
    MissingSku,

    #[error("Invalid qty for {sku}")]
    InvalidQty { sku: String },

    #[error("Invalid price for {sku}")]
    InvalidPrice { sku: String },

    #[error("Unknown category for {sku}")]
    UnknownCategory { sku: String },
}

/// A non-empty, ordered collection of violations.
///
/// Displays as every violation joined by `"; "`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_violations(.0))]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Violation messages in validation order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Violation> for ValidationErrors {
    fn from(violation: Violation) -> Self {
        ValidationErrors(vec![violation])
    }
}

/// Checks an invoice and returns every problem found. An empty list means
/// the invoice is valid.
pub fn validate(invoice: Option<&Invoice>) -> Vec<Violation> {
    let invoice = match invoice {
        Some(invoice) => invoice,
        None => return vec![Violation::MissingInvoice],
    };

    let mut problems = Vec::new();

    if invoice.invoice_id.is_empty() {
        problems.push(Violation::MissingInvoiceId);
    }
    if invoice.customer_id.is_empty() {
        problems.push(Violation::MissingCustomerId);
    }
    if invoice.items.is_empty() {
        problems.push(Violation::NoItems);
    }

    for item in &invoice.items {
        validate_item(item, &mut problems);
    }

    problems
}

fn validate_item(item: &LineItem, problems: &mut Vec<Violation>) {
    if item.sku.is_empty() {
        problems.push(Violation::MissingSku);
    }
    if item.qty <= 0 {
        problems.push(Violation::InvalidQty {
            sku: item.sku.clone(),
        });
    }
    if item.unit_price.is_negative() {
        problems.push(Violation::InvalidPrice {
            sku: item.sku.clone(),
        });
    }
    if item.category().is_none() {
        problems.push(Violation::UnknownCategory {
            sku: item.sku.clone(),
        });
    }
}

/// Runs [`validate`] and folds any problems into a single error value.
pub fn ensure_valid(invoice: Option<&Invoice>) -> Result<(), ValidationErrors> {
    let problems = validate(invoice);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(problems))
    }
}
