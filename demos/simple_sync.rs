//! Initiate a sandbox payment and read it back with the blocking client.
//!
//! ```text
//! SHWARY_MERCHANT_ID=... SHWARY_MERCHANT_KEY=... cargo run --example simple_sync
//! ```

use std::path::PathBuf;

use shwary::{init_logging, ErrorKind, Shwary, ShwaryConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ShwaryConfig::from_env()?.with_sandbox(true);
    config.logging.file = Some(PathBuf::from("shwary.log"));

    // Console and ./shwary.log, for this client only.
    let client = Shwary::with_logging(&config, init_logging(&config.logging)?)?;

    let payment = match client.initiate_payment("DRC", 5000.0, "+243972345678", None) {
        Ok(payment) => payment,
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => eprintln!("Validation error: {e}"),
                ErrorKind::Authentication => eprintln!("Authentication failed, check merchant credentials"),
                ErrorKind::InsufficientFunds => eprintln!("Insufficient balance in merchant account"),
                ErrorKind::RateLimited => eprintln!("Rate limited, try again later"),
                ErrorKind::Api => eprintln!("API error {:?}: {e}", e.status()),
            }
            return Ok(());
        }
    };
    println!("Payment initiated: {} ({}, sandbox: {})", payment.id, payment.status, payment.is_sandbox);

    match client.get_transaction(&payment.id) {
        Ok(tx) => {
            println!("Transaction {}", tx.id);
            println!("  status:  {}", tx.status);
            println!("  amount:  {}", tx.amount);
            println!("  created: {}", tx.created_at.as_deref().unwrap_or("-"));
        }
        Err(e) if e.status() == Some(404) => eprintln!("Transaction not found: {e}"),
        Err(e) => eprintln!("API error: {e}"),
    }

    client.close();
    Ok(())
}
