//! Encode and decode a few amount fields
//!
//! Run with `RUST_LOG=debug` to see truncation and round-to-zero events.

use ledger_amount_codec::{Amount, BinaryParser, SerializedType};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Ledger Amount Codec - Round Trip Example\n");

    let issuer = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    let inputs = [
        json!("1000000"),
        json!({"value": "1", "currency": "USD", "issuer": issuer}),
        json!({"value": "-0.0125", "currency": "EUR", "issuer": issuer}),
        json!({"value": "3.14159265358979323846", "currency": "XAU", "issuer": issuer}),
        json!({"value": "1e-90", "currency": "USD", "issuer": issuer}),
    ];

    let mut stream = Vec::new();
    for input in &inputs {
        let amount = Amount::from_value(input)?;
        println!("  {} -> {}", input, amount.to_hex());
        stream.extend_from_slice(amount.to_bytes());
    }
    println!();

    // Each field is framed by its leading bit
    let mut parser = BinaryParser::new(&stream);
    while !parser.is_end() {
        let amount = Amount::from_parser(&mut parser, None)?;
        let kind = if amount.is_native() { "native" } else { "issued" };
        println!("  {} ({} bytes): {}", kind, amount.to_bytes().len(), amount.to_json()?);
    }

    match Amount::from_value(&json!("1.5")) {
        Ok(_) => println!("\n  unexpected: fractional drops accepted"),
        Err(e) => println!("\n  rejected \"1.5\" as native: {}", e),
    }

    Ok(())
}
