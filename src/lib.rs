//! # Invoice Pricing
//!
//! A deterministic pricing engine that validates an invoice and computes
//! the amount payable from its line items, destination country, membership
//! tier and coupon code.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 4 decimal places via `rust_decimal`
//! - **All-or-nothing validation**: every problem is reported together
//! - **Immutable rule tables**: shipping, tax and membership rates are
//!   built once and shared read-only
//! - **Advisories, not errors**: unknown coupons and upgrade hints never
//!   change the total
//!
//! ## Pipeline
//!
//! validate → subtotal and fragile fee → shipping → discount → tax → total
//!
//! ## Example
//!
//! ```
//! use invoice_pricing::{Invoice, LineItem, Money, PricingEngine};
//!
//! let invoice = Invoice {
//!     invoice_id: "I-001".to_string(),
//!     customer_id: "C-001".to_string(),
//!     country: "TH".to_string(),
//!     membership: "none".to_string(),
//!     coupon: None,
//!     items: vec![LineItem::new("A", "book", Money::from_units(100), 2)],
//! };
//!
//! let quote = PricingEngine::new().compute_total(&invoice).unwrap();
//! assert_eq!(quote.total.to_string(), "274.0000");
//! assert!(quote.warnings.is_empty());
//! ```

pub mod coupon;
pub mod engine;
pub mod error;
pub mod invoice;
pub mod money;
pub mod rules;
pub mod validation;

pub use coupon::CouponBook;
pub use engine::{Advisory, PriceBreakdown, PricingEngine, Quote};
pub use error::{PricingError, Result};
pub use invoice::{Category, Invoice, LineItem, Membership};
pub use money::Money;
pub use rules::{PricingRules, ShippingTier};
pub use validation::{ValidationErrors, Violation};
