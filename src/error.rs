//! Error types for the pricing engine.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Result type alias for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur while pricing an invoice or loading its inputs.
#[derive(Error, Debug)]
pub enum PricingError {
    /// The invoice or one of its items is malformed. Carries every problem
    /// found, in validation order.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// An amount grew past what a `Decimal` can hold
    #[error("Amount overflow computing {stage} for invoice {invoice_id}")]
    Overflow {
        invoice_id: String,
        stage: &'static str,
    },

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invoice JSON could not be parsed
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Coupon CSV could not be parsed
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid coupon table row
    #[error("Invalid coupon at row {row}: {message}")]
    InvalidCoupon { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing invoice file argument. Usage: invoice-pricing <invoice.json> [coupons.csv]")]
    MissingArgument,
}

