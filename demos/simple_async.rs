//! Run several sandbox payments concurrently with the async client.
//!
//! ```text
//! SHWARY_MERCHANT_ID=... SHWARY_MERCHANT_KEY=... cargo run --example simple_async
//! ```

use shwary::config::LoggingConfig;
use shwary::{init_logging, install_global, ShwaryAsync, ShwaryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    install_global(init_logging(&LoggingConfig::default())?)?;

    let config = ShwaryConfig::from_env()?.with_sandbox(true);
    let client = ShwaryAsync::new(&config)?;

    let payments = [
        ("DRC", 5000.0, "+243972345678"),
        ("KE", 150.0, "+254712345678"),
        ("UG", 2000.0, "+256772123456"),
    ];

    let mut tasks = Vec::new();
    for (country, amount, phone) in payments {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let result = client.initiate_payment(country, amount, phone, None).await;
            (country, result)
        }));
    }

    for task in tasks {
        match task.await? {
            (country, Ok(payment)) => println!("{country}: {} is {}", payment.id, payment.status),
            (country, Err(e)) => eprintln!("{country}: {} error: {e}", e.kind()),
        }
    }

    client.close();
    Ok(())
}
