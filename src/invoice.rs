//! Invoice models as received from callers and their typed interpretations.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A single line on an invoice.
///
/// Holds the raw category label and a signed quantity so that malformed
/// input survives deserialization and can be reported by validation
/// instead of being rejected by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stock keeping unit identifier
    pub sku: String,

    /// Category label: book, food, electronics, other
    pub category: String,

    /// Price of one unit
    pub unit_price: Money,

    /// Number of units, must be positive
    pub qty: i64,

    /// Fragile items carry a per-unit handling surcharge
    #[serde(default)]
    pub fragile: bool,
}

impl LineItem {
    /// Creates a non-fragile line item.
    pub fn new(sku: &str, category: &str, unit_price: Money, qty: i64) -> Self {
        LineItem {
            sku: sku.to_string(),
            category: category.to_string(),
            unit_price,
            qty,
            fragile: false,
        }
    }

    /// Marks the item as fragile.
    pub fn fragile(mut self) -> Self {
        self.fragile = true;
        self
    }

    /// Parses the category label.
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// `unit_price × qty`, or `None` if the product overflows.
    pub fn line_amount(&self) -> Option<Money> {
        self.unit_price.checked_times(self.qty)
    }
}

/// An order to be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,

    pub customer_id: String,

    /// Country code. Unrecognized codes fall back to default rules.
    pub country: String,

    /// Membership tier label. Absent or unknown labels mean no membership.
    #[serde(default)]
    pub membership: String,

    /// Optional coupon code, trimmed before lookup
    #[serde(default)]
    pub coupon: Option<String>,

    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Parses the membership label.
    pub fn membership(&self) -> Membership {
        Membership::from_label(&self.membership)
    }

    /// Returns the coupon code with surrounding whitespace removed, or `None`
    /// when absent or blank.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Book,
    Food,
    Electronics,
    Other,
}

impl Category {
    /// Parses an exact lowercase category label.
    ///
    /// Returns `None` for anything outside the allowed set.
    pub fn parse(label: &str) -> Option<Category> {
        match label {
            "book" => Some(Category::Book),
            "food" => Some(Category::Food),
            "electronics" => Some(Category::Electronics),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// Membership tier of the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    Gold,
    Platinum,
    /// No recognized tier.
    None,
}

impl Membership {
    /// Maps a label to a tier. Matching is exact; `"Gold"` is not gold.
    pub fn from_label(label: &str) -> Membership {
        match label {
            "gold" => Membership::Gold,
            "platinum" => Membership::Platinum,
            _ => Membership::None,
        }
    }

    /// Returns `true` for gold and platinum.
    pub fn is_tiered(&self) -> bool {
        !matches!(self, Membership::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_with_coupon(coupon: Option<&str>) -> Invoice {
        Invoice {
            invoice_id: "I-1".to_string(),
            customer_id: "C-1".to_string(),
            country: "TH".to_string(),
            membership: "none".to_string(),
            coupon: coupon.map(str::to_string),
            items: vec![LineItem::new("A", "book", Money::from_units(10), 1)],
        }
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(Category::parse("book"), Some(Category::Book));
        assert_eq!(Category::parse("electronics"), Some(Category::Electronics));
        assert_eq!(Category::parse("other"), Some(Category::Other));
        assert_eq!(Category::parse("invalid"), None);
        assert_eq!(Category::parse("Book"), None);
    }

    #[test]
    fn test_membership_from_label() {
        assert_eq!(Membership::from_label("gold"), Membership::Gold);
        assert_eq!(Membership::from_label("platinum"), Membership::Platinum);
        assert_eq!(Membership::from_label("none"), Membership::None);
        assert_eq!(Membership::from_label(""), Membership::None);
        assert_eq!(Membership::from_label("GOLD"), Membership::None);
        assert!(Membership::Gold.is_tiered());
        assert!(!Membership::None.is_tiered());
    }

    #[test]
    fn test_coupon_code_is_trimmed() {
        assert_eq!(
            invoice_with_coupon(Some("  WELCOME10 ")).coupon_code(),
            Some("WELCOME10")
        );
        assert_eq!(invoice_with_coupon(Some("   ")).coupon_code(), None);
        assert_eq!(invoice_with_coupon(None).coupon_code(), None);
    }

    #[test]
    fn test_line_amount() {
        let item = LineItem::new("B", "electronics", Money::from_units(2000), 2);
        assert_eq!(item.line_amount(), Some(Money::from_units(4000)));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "invoice_id": "I-9",
            "customer_id": "C-9",
            "country": "FR",
            "items": [{"sku": "D", "category": "other", "unit_price": 3000.0, "qty": 4}]
        }"#;

        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.membership(), Membership::None);
        assert_eq!(invoice.coupon, None);
        assert!(!invoice.items[0].fragile);
        assert_eq!(invoice.items[0].unit_price.to_string(), "3000.0000");
    }
}
