//! Example: shorten a link against a running MiniURL server.
//!
//! --- Equivalent curl commands (set BASE first) ---
//!
//!   export BASE="http://localhost:8000"
//!
//!   # Shorten
//!   curl -s -X POST "$BASE/api/v1.0/minify" \
//!     -H "Content-Type: application/json" \
//!     -d '{"url":"https://example.com","description":"Test URL"}'
//!
//!   # Resolve an alias (JSON, no redirect)
//!   curl -s "$BASE/api/v1.0/<alias>"
//!
//! --- Rust example ---
//!
//!   MINIURL_BASE_URL=http://localhost:8000 cargo run --example minify_url -- example.com
//!
//! Bare hosts are normalized first (`example.com` -> `https://example.com`,
//! `localhost:3000` -> `http://localhost:3000`).

use miniurl::{normalize, MiniUrlClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let Some(input) = std::env::args().nth(1) else {
        eprintln!("Usage: MINIURL_BASE_URL=... cargo run --example minify_url -- <URL>");
        std::process::exit(1);
    };

    let client = MiniUrlClient::from_env()?;
    println!("Server:     {}", client.config().base_url);
    println!("Input:      {}", input);
    println!("Normalized: {}", normalize(&input).unwrap_or_else(|| "<invalid>".to_string()));
    println!();

    let minified = client.minify(&input).await?;
    println!("Short URL:  {}", minified.minified_url);
    println!("Took:       {} ms", minified.elapsed_ms);

    let alias = minified.minified_url.rsplit('/').next().unwrap_or_default();
    match client.resolve(alias).await {
        Ok(original) => println!("Resolves to: {}", original),
        Err(e) => println!("Resolve failed: {}", e),
    }

    Ok(())
}
