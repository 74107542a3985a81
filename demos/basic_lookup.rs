//! # Basic SDK Setup Example
//!
//! Demonstrates how to initialize the IFSC Lookup SDK and walk the cascade
//! programmatically:
//! - Settings configuration
//! - HTTP client setup
//! - Cache + session construction
//! - Cascade navigation and a direct code lookup
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example basic_lookup
//! ```

use std::sync::Arc;

use anyhow::Result;
use ifsc_lookup_sdk::{
    CascadeLevel, HttpDirectoryApi, LookupCache, LookupOutcome, LookupSession, Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // 1. Load settings from Config.toml / environment (defaults otherwise)
    let settings = Settings::new()?;
    println!("Using proxy at {}", settings.api.base_url);

    // 2. Build the HTTP client and one cache instance for the session
    let api = Arc::new(HttpDirectoryApi::new(&settings.api)?);
    let cache = Arc::new(LookupCache::new());
    let mut session = LookupSession::new(api, Arc::clone(&cache));

    // 3. Load the bank list
    session.init().await;
    let banks = session.cascade().options(CascadeLevel::Bank);
    println!("{} banks available", banks.len());

    // 4. Walk the cascade with the first option at every level
    for level in CascadeLevel::ALL {
        let Some(choice) = session.cascade().options(level).first().cloned() else {
            println!("No options at {:?}, stopping", level);
            return Ok(());
        };
        println!("{:?}: {}", level, choice.label);
        session.cascade_mut().select(level, choice).await;
    }

    if let Some(LookupOutcome::Record(record)) = session.lookup_selected().await {
        println!(
            "Resolved IFSC {} ({})",
            record.ifsc.as_deref().unwrap_or("-"),
            record.branch.as_deref().unwrap_or("-")
        );
    }

    // 5. Direct path, bypassing the cascade
    if let Some(outcome) = session.lookup_code("sbin0000001").await {
        match outcome {
            LookupOutcome::Record(record) => {
                println!("Direct lookup: {:?}", record.bank);
            }
            LookupOutcome::Error(message) => println!("Direct lookup: {}", message),
        }
    }

    let stats = cache.stats();
    println!(
        "Cache: {} entries, {} hits / {} misses",
        stats.cache_size, stats.hits, stats.misses
    );

    Ok(())
}
