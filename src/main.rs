//! Invoice Pricing CLI
//!
//! Reads an invoice as JSON and prints its quote as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- invoice.json > quote.json
//! cargo run -- invoice.json coupons.csv > quote.json
//! ```
//!
//! The optional coupon CSV (`code,rate` header) replaces the built-in
//! coupon codes. A JSON `null` invoice is reported as missing.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use invoice_pricing::{
    CouponBook, Invoice, PricingEngine, PricingError, Result, ValidationErrors, Violation,
};
use log::{info, warn};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(PricingError::MissingArgument);
    }

    let invoice_file = File::open(&args[1])?;
    let invoice: Option<Invoice> = serde_json::from_reader(BufReader::new(invoice_file))?;

    let engine = match args.get(2) {
        Some(coupon_path) => {
            let coupon_file = File::open(coupon_path)?;
            let coupons = CouponBook::from_csv(BufReader::new(coupon_file))?;
            if coupons.is_empty() {
                warn!("{}: No usable coupon rows, every coupon will be unknown", coupon_path);
            } else {
                info!("{}: Loaded {} coupons", coupon_path, coupons.len());
            }
            PricingEngine::with_coupons(coupons)
        }
        None => PricingEngine::new(),
    };

    let invoice = invoice.ok_or_else(|| ValidationErrors::from(Violation::MissingInvoice))?;

    let quote = engine.compute_total(&invoice)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &quote)?;
    writeln!(handle)?;

    Ok(())
}
