//! Factor a small integer with Shor's algorithm.
//!
//! Takes a JSON configuration as its only argument, with the same fields
//! the factorization service accepted:
//!
//! ```text
//! cargo run --example factorize -- '{"N": 21, "t": 6, "a": 2, "seed": 7}'
//! RUST_LOG=shor_sim=debug cargo run --example factorize
//! ```

use shor_sim::json::{config_from_json, factorization_to_json, state_listing, state_listing_to_json};
use shor_sim::shor::{order_finding_state, Registers};
use shor_sim::{factorize, ShorError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ShorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| r#"{"N": 15, "a": 7}"#.to_string());
    let config = config_from_json(&arg)?;

    match factorize(&config) {
        Ok(out) => println!("{}", factorization_to_json(&out)?),
        Err(err) => {
            println!("{}", serde_json::json!({ "message": err.to_string() }));
            return Ok(());
        }
    }

    // The pre-measurement state of the phase and work registers.
    if let Some(a) = config.a {
        let regs = Registers::new(config.t, config.n);
        let state = order_finding_state(a, config.n, &regs)?;
        let listing = state_listing(&state, &[&regs.phase_register(), &regs.r1]);
        println!("{}", state_listing_to_json(&listing)?);
    }

    Ok(())
}
