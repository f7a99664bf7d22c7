//! Core pricing engine.
//!
//! Prices a validated invoice in a single pass: subtotal and fragile fee,
//! shipping, discount, tax, then the final total. Each step is a pure
//! function of the invoice and the rule tables.

use crate::coupon::CouponBook;
use crate::error::{PricingError, Result};
use crate::invoice::{Invoice, LineItem, Membership};
use crate::money::Money;
use crate::rules::{
    PricingRules, BULK_CONCESSION, BULK_THRESHOLD, FRAGILE_FEE_PER_UNIT, UPGRADE_HINT_THRESHOLD,
};
use crate::validation;
use log::{debug, warn};
use serde::{Serialize, Serializer};
use std::fmt;

/// A non-fatal observation made while pricing. Never changes the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// A non-blank coupon code was not in the coupon table.
    UnknownCoupon,
    /// Large order from a customer without a membership tier.
    MembershipUpgrade,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnknownCoupon => f.write_str("Unknown coupon"),
            Advisory::MembershipUpgrade => f.write_str("Consider membership upgrade"),
        }
    }
}

impl Serialize for Advisory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Every intermediate figure behind a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub fragile_fee: Money,
    pub shipping: Money,
    pub discount: Money,
    pub taxable_base: Money,
    pub tax: Money,
}

/// The result of pricing an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Amount payable, never negative.
    pub total: Money,

    /// Advisories in emission order: unknown coupon first, then upgrade hint.
    pub warnings: Vec<Advisory>,

    pub breakdown: PriceBreakdown,
}

impl Quote {
    /// Splits the quote into the `(total, warnings)` pair.
    pub fn into_parts(self) -> (Money, Vec<String>) {
        let warnings = self.warnings.iter().map(ToString::to_string).collect();
        (self.total, warnings)
    }

    /// Returns `true` if the given advisory was raised.
    pub fn has_warning(&self, advisory: Advisory) -> bool {
        self.warnings.contains(&advisory)
    }
}

/// The pricing engine.
///
/// Reads the process-wide rule tables and owns its coupon table. Holds no
/// other state, so one engine can price any number of invoices, from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rules: &'static PricingRules,
    coupons: CouponBook,
}

impl PricingEngine {
    /// Creates an engine with the standard coupon codes.
    pub fn new() -> Self {
        PricingEngine::with_coupons(CouponBook::standard())
    }

    /// Creates an engine that looks coupons up in `coupons`.
    pub fn with_coupons(coupons: CouponBook) -> Self {
        PricingEngine {
            rules: PricingRules::standard(),
            coupons,
        }
    }

    /// Computes the payable total for an invoice.
    ///
    /// Fails with [`PricingError::Validation`](crate::PricingError::Validation)
    /// carrying every problem found when the invoice or any item is invalid.
    /// No total is computed in that case.
    pub fn compute_total(&self, invoice: &Invoice) -> Result<Quote> {
        validation::ensure_valid(Some(invoice))?;

        let overflow = |stage| PricingError::Overflow {
            invoice_id: invoice.invoice_id.clone(),
            stage,
        };
        let mut warnings = Vec::new();

        let (subtotal, fragile_fee) =
            subtotal_and_fragile_fee(&invoice.items).ok_or_else(|| overflow("subtotal"))?;
        let shipping = self.rules.shipping_fee(&invoice.country, subtotal);
        let discount = self
            .discount(invoice, subtotal, &mut warnings)
            .ok_or_else(|| overflow("discount"))?;
        let net = subtotal
            .checked_sub(discount)
            .ok_or_else(|| overflow("taxable base"))?;
        let taxable_base = net.clamp_non_negative();
        let tax = taxable_base
            .checked_apply_rate(self.rules.tax_rate(&invoice.country))
            .ok_or_else(|| overflow("tax"))?;

        // subtotal + shipping + fragile_fee + tax - discount
        let mut total = [shipping, fragile_fee, tax]
            .into_iter()
            .try_fold(net, Money::checked_add)
            .ok_or_else(|| overflow("total"))?;
        if total.is_negative() {
            debug!(
                "Invoice {}: Total {} below zero, clamping",
                invoice.invoice_id, total
            );
            total = Money::ZERO;
        }

        if needs_upgrade_hint(subtotal, invoice.membership()) {
            warnings.push(Advisory::MembershipUpgrade);
        }

        debug!(
            "Invoice {}: subtotal={} fragile={} shipping={} discount={} tax={} total={}",
            invoice.invoice_id, subtotal, fragile_fee, shipping, discount, tax, total
        );

        Ok(Quote {
            total,
            warnings,
            breakdown: PriceBreakdown {
                subtotal,
                fragile_fee,
                shipping,
                discount,
                taxable_base,
                tax,
            },
        })
    }

    /// Membership (or bulk) discount plus coupon discount, capped at the
    /// subtotal. Both are computed on the pre-discount subtotal.
    ///
    /// Returns `None` on overflow.
    fn discount(
        &self,
        invoice: &Invoice,
        subtotal: Money,
        warnings: &mut Vec<Advisory>,
    ) -> Option<Money> {
        let mut discount = Money::ZERO;

        match self.rules.membership_rate(invoice.membership()) {
            Some(rate) => {
                discount = discount.checked_add(subtotal.checked_apply_rate(rate)?)?;
            }
            None if subtotal > Money::new(BULK_THRESHOLD) => {
                discount = discount.checked_add(Money::new(BULK_CONCESSION))?;
            }
            None => {}
        }

        if let Some(code) = invoice.coupon_code() {
            match self.coupons.rate(code) {
                Some(rate) => {
                    discount = discount.checked_add(subtotal.checked_apply_rate(rate)?)?;
                }
                None => {
                    warn!(
                        "Invoice {}: Unknown coupon {:?}, no coupon discount applied",
                        invoice.invoice_id, code
                    );
                    warnings.push(Advisory::UnknownCoupon);
                }
            }
        }

        Some(discount.min(subtotal))
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sums line amounts and the per-unit fragile surcharge, in item order.
///
/// Returns `None` on overflow.
fn subtotal_and_fragile_fee(items: &[LineItem]) -> Option<(Money, Money)> {
    let per_unit = Money::new(FRAGILE_FEE_PER_UNIT);
    let mut subtotal = Money::ZERO;
    let mut fragile_fee = Money::ZERO;

    for item in items {
        subtotal = subtotal.checked_add(item.line_amount()?)?;
        if item.fragile {
            fragile_fee = fragile_fee.checked_add(per_unit.checked_times(item.qty)?)?;
        }
    }

    Some((subtotal, fragile_fee))
}

fn needs_upgrade_hint(subtotal: Money, membership: Membership) -> bool {
    subtotal > Money::new(UPGRADE_HINT_THRESHOLD) && !membership.is_tiered()
}
