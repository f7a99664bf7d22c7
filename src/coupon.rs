//! Coupon code lookup table.
//!
//! Unlike the country and membership tables, the coupon table belongs to an
//! engine instance so callers can price against a different set of codes
//! without touching process-wide state.

use crate::error::{PricingError, Result};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

/// Raw coupon row as read from CSV: `code,rate`.
#[derive(Debug, Deserialize)]
struct CouponRecord {
    code: String,
    rate: String,
}

/// Maps coupon codes to fractional discount rates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponBook {
    rates: HashMap<String, Decimal>,
}

impl CouponBook {
    /// Creates an empty book. Every non-blank code will be reported unknown.
    pub fn new() -> Self {
        CouponBook {
            rates: HashMap::new(),
        }
    }

    /// The default codes: WELCOME10, VIP20 and STUDENT5.
    pub fn standard() -> Self {
        let mut book = CouponBook::new();
        book.insert("WELCOME10", dec!(0.10));
        book.insert("VIP20", dec!(0.20));
        book.insert("STUDENT5", dec!(0.05));
        book
    }

    /// Adds or replaces a code.
    pub fn insert(&mut self, code: &str, rate: Decimal) {
        self.rates.insert(code.to_string(), rate);
    }

    /// Looks up the rate for an already-trimmed code. Codes are case-sensitive.
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Loads a book from CSV with a `code,rate` header.
    ///
    /// Rows with a blank code or a rate outside `[0, 1]` are logged at warn
    /// level and skipped. Later rows override earlier rows with the same code.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut book = CouponBook::new();

        for (row_idx, result) in csv_reader.deserialize::<CouponRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match parse_record(&record, row_num) {
                    Ok((code, rate)) => {
                        debug!("Row {}: Loaded coupon {} at rate {}", row_num, code, rate);
                        book.rates.insert(code, rate);
                    }
                    Err(e) => warn!("{}", e),
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(book)
    }
}

fn parse_record(record: &CouponRecord, row: usize) -> Result<(String, Decimal)> {
    let code = record.code.trim();
    if code.is_empty() {
        return Err(PricingError::InvalidCoupon {
            row,
            message: "coupon code is blank".to_string(),
        });
    }

    let rate = Decimal::from_str(record.rate.trim()).map_err(|e| PricingError::InvalidCoupon {
        row,
        message: format!("rate {:?} is not a number: {}", record.rate, e),
    })?;

    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PricingError::InvalidCoupon {
            row,
            message: format!("rate {} must be between 0 and 1", rate),
        });
    }

    Ok((code.to_string(), rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_standard_codes() {
        let book = CouponBook::standard();
        assert_eq!(book.len(), 3);
        assert_eq!(book.rate("WELCOME10"), Some(dec!(0.10)));
        assert_eq!(book.rate("VIP20"), Some(dec!(0.20)));
        assert_eq!(book.rate("STUDENT5"), Some(dec!(0.05)));
        assert_eq!(book.rate("welcome10"), None);
        assert_eq!(book.rate("NOTREAL"), None);
    }

    #[test]
    fn test_insert_overrides() {
        let mut book = CouponBook::standard();
        book.insert("VIP20", dec!(0.25));
        assert_eq!(book.rate("VIP20"), Some(dec!(0.25)));
    }

    #[test]
    fn test_from_csv() {
        let csv = r#"code,rate
SPRING15,0.15
 BLACKFRIDAY , 0.30 "#;

        let book = CouponBook::from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.rate("SPRING15"), Some(dec!(0.15)));
        assert_eq!(book.rate("BLACKFRIDAY"), Some(dec!(0.30)));
        assert_eq!(book.rate("WELCOME10"), None);
    }

    #[test]
    fn test_from_csv_skips_invalid_rows() {
        let csv = r#"code,rate
GOOD,0.1
,0.2
NEGATIVE,-0.1
HUGE,1.5
WORDS,ten
EXTRA,0.05,unexpected"#;

        let book = CouponBook::from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(book.rate("GOOD"), Some(dec!(0.1)));
        assert_eq!(book.rate("NEGATIVE"), None);
        assert_eq!(book.rate("HUGE"), None);
        assert_eq!(book.rate("WORDS"), None);
    }

    #[test]
    fn test_parse_record_reports_row() {
        let record = CouponRecord {
            code: "HUGE".to_string(),
            rate: "1.5".to_string(),
        };

        let err = parse_record(&record, 7).unwrap_err();
        assert!(err.to_string().contains("row 7"));
    }
}
