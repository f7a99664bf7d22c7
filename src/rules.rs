//! Process-wide pricing rule tables.
//!
//! Built once on first access and never mutated afterwards, so they can be
//! read from any number of threads without locking.

use crate::invoice::Membership;
use crate::money::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One step of a country's shipping schedule: orders whose subtotal is
/// strictly below `threshold` pay `fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingTier {
    pub threshold: Money,
    pub fee: Money,
}

impl ShippingTier {
    fn new(threshold: Decimal, fee: Decimal) -> Self {
        ShippingTier {
            threshold: Money::new(threshold),
            fee: Money::new(fee),
        }
    }
}

/// Shipping, tax and membership tables.
#[derive(Debug)]
pub struct PricingRules {
    shipping: HashMap<&'static str, Vec<ShippingTier>>,
    default_shipping: Vec<ShippingTier>,
    tax_rates: HashMap<&'static str, Decimal>,
    default_tax_rate: Decimal,
    membership_rates: HashMap<Membership, Decimal>,
}

static STANDARD_RULES: LazyLock<PricingRules> = LazyLock::new(|| PricingRules {
    shipping: HashMap::from([
        ("TH", vec![ShippingTier::new(dec!(500), dec!(60.0))]),
        ("JP", vec![ShippingTier::new(dec!(4000), dec!(600.0))]),
        (
            "US",
            vec![
                ShippingTier::new(dec!(100), dec!(15.0)),
                ShippingTier::new(dec!(300), dec!(8.0)),
            ],
        ),
    ]),
    default_shipping: vec![ShippingTier::new(dec!(200), dec!(25.0))],
    tax_rates: HashMap::from([("TH", dec!(0.07)), ("JP", dec!(0.10)), ("US", dec!(0.08))]),
    default_tax_rate: dec!(0.05),
    membership_rates: HashMap::from([
        (Membership::Gold, dec!(0.03)),
        (Membership::Platinum, dec!(0.05)),
    ]),
});

/// Per-unit surcharge for fragile items.
pub const FRAGILE_FEE_PER_UNIT: Decimal = dec!(5.0);

/// Subtotal above which customers without a tier get the flat concession.
pub const BULK_THRESHOLD: Decimal = dec!(3000);

/// Flat amount knocked off bulk orders from customers without a tier.
pub const BULK_CONCESSION: Decimal = dec!(20);

/// Subtotal above which untiered customers are nudged to upgrade.
pub const UPGRADE_HINT_THRESHOLD: Decimal = dec!(10000);

impl PricingRules {
    /// Returns the compiled-in rule tables.
    pub fn standard() -> &'static PricingRules {
        &STANDARD_RULES
    }

    /// Returns the shipping schedule for a country, falling back to the
    /// default schedule for unknown codes.
    pub fn shipping_tiers(&self, country: &str) -> &[ShippingTier] {
        self.shipping
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(self.default_shipping.as_slice())
    }

    /// Shipping fee for an order.
    ///
    /// Tiers are scanned in listed order and the first one whose threshold
    /// exceeds the subtotal wins. Meeting every threshold ships free.
    pub fn shipping_fee(&self, country: &str, subtotal: Money) -> Money {
        self.shipping_tiers(country)
            .iter()
            .find(|tier| subtotal < tier.threshold)
            .map(|tier| tier.fee)
            .unwrap_or(Money::ZERO)
    }

    /// Tax rate for a country, falling back to the default rate.
    pub fn tax_rate(&self, country: &str) -> Decimal {
        self.tax_rates
            .get(country)
            .copied()
            .unwrap_or(self.default_tax_rate)
    }

    /// Discount rate for a membership tier, `None` when untiered.
    pub fn membership_rate(&self, membership: Membership) -> Option<Decimal> {
        self.membership_rates.get(&membership).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_th_single_tier() {
        let rules = PricingRules::standard();
        assert_eq!(rules.shipping_fee("TH", money("499.99")), money("60"));
        assert_eq!(rules.shipping_fee("TH", money("500")), Money::ZERO);
        assert_eq!(rules.shipping_fee("TH", money("10000")), Money::ZERO);
    }

    #[test]
    fn test_us_multi_tier() {
        let rules = PricingRules::standard();
        assert_eq!(rules.shipping_fee("US", money("50")), money("15"));
        assert_eq!(rules.shipping_fee("US", money("100")), money("8"));
        assert_eq!(rules.shipping_fee("US", money("250")), money("8"));
        assert_eq!(rules.shipping_fee("US", money("300")), Money::ZERO);
        assert_eq!(rules.shipping_fee("US", money("350")), Money::ZERO);
    }

    #[test]
    fn test_jp_threshold_is_exclusive() {
        let rules = PricingRules::standard();
        assert_eq!(rules.shipping_fee("JP", money("3999.99")), money("600"));
        assert_eq!(rules.shipping_fee("JP", money("4000")), Money::ZERO);
    }

    #[test]
    fn test_unknown_country_uses_defaults() {
        let rules = PricingRules::standard();
        assert_eq!(rules.shipping_fee("FR", money("199")), money("25"));
        assert_eq!(rules.shipping_fee("FR", money("200")), Money::ZERO);
        assert_eq!(rules.tax_rate("FR"), dec!(0.05));
        assert_eq!(rules.tax_rate(""), dec!(0.05));
    }

    #[test]
    fn test_tax_rates() {
        let rules = PricingRules::standard();
        assert_eq!(rules.tax_rate("TH"), dec!(0.07));
        assert_eq!(rules.tax_rate("JP"), dec!(0.10));
        assert_eq!(rules.tax_rate("US"), dec!(0.08));
    }

    #[test]
    fn test_membership_rates() {
        let rules = PricingRules::standard();
        assert_eq!(rules.membership_rate(Membership::Gold), Some(dec!(0.03)));
        assert_eq!(rules.membership_rate(Membership::Platinum), Some(dec!(0.05)));
        assert_eq!(rules.membership_rate(Membership::None), None);
    }

    #[test]
    fn test_tier_order_is_preserved() {
        let tiers = PricingRules::standard().shipping_tiers("US");
        assert_eq!(tiers[0].threshold, money("100"));
        assert_eq!(tiers[1].threshold, money("300"));
    }
}
