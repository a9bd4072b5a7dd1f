//! Example demonstrating health-gated submission tracing.
//!
//! Run with: cargo run -p nydart-core --example health_tracing
//!
//! Point `NYDART_AI_SERVICE_URL` at a running analysis service to see a
//! healthy probe; otherwise the probe fails and the negative result is cached.

use std::sync::Arc;

use nydart_core::{AdvisorConfig, HealthCache, HttpAnalysisService, Submitter};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::new("nydart_core=debug,info"))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!("=== Analysis Service Health Demo ===\n");

    let config = match AdvisorConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };
    println!("Service: {}\n", config.ai_service_url);

    let service = match HttpAnalysisService::new(config.ai_service_url.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    let submitter = Submitter::new(Arc::new(service), Arc::new(HealthCache::new(config.health_ttl)));

    for attempt in 1..=2 {
        let healthy = submitter.check_health().await;
        println!("Attempt {attempt}: healthy = {healthy}");
    }
    println!("\nThe second attempt reuses the cached result.");
}
