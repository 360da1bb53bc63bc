//! Send pipeline demonstration.
//!
//! This example shows how independent features compose on one chain:
//! 1. Build a client over an offline engine
//! 2. Install cookies (State phase) and redirects (Validation phase)
//! 3. Add an ad-hoc timing interceptor around everything
//! 4. Send a request that is redirected and picks up a session cookie
//!
//! Run with: `RUST_LOG=debug cargo run --example send_pipeline`

use std::sync::Arc;
use std::time::Instant;

use chain_pipeline::client::{
    HttpClient, HttpCookies, HttpCookiesConfig, HttpRedirect, HttpRedirectConfig,
    HttpRequestData, HttpResponse, HttpSendChain, MockEngine,
};
use http::header::{HeaderValue, COOKIE, LOCATION, SET_COOKIE};
use http::StatusCode;
use tracing_subscriber::EnvFilter;

/// Simulates a site that logs the user in and bounces them home
fn site(request: &HttpRequestData) -> HttpResponse {
    match request.url.path() {
        "/login" => HttpResponse::new(StatusCode::FOUND)
            .with_header(LOCATION, HeaderValue::from_static("/home"))
            .with_header(SET_COOKIE, HeaderValue::from_static("session=s3cr3t; HttpOnly")),
        "/home" if request.headers.contains_key(COOKIE) => {
            HttpResponse::new(StatusCode::OK).with_body("welcome back")
        }
        "/home" => HttpResponse::new(StatusCode::UNAUTHORIZED),
        _ => HttpResponse::new(StatusCode::NOT_FOUND),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Building client ===");
    let engine = Arc::new(MockEngine::new(|request| Ok(site(request))));
    let mut client = HttpClient::new(engine.clone())?;

    client
        .install::<HttpRedirect>(HttpRedirectConfig::default().max_jumps(5))
        .await?;
    client
        .install::<HttpCookies>(HttpCookiesConfig::default())
        .await?;
    println!("Installed features: {:?}", client.features());

    // Registered last on the outer phase, so it wraps the redirect loop.
    client
        .send_pipeline()
        .intercept(HttpSendChain::validation(), |next, request| async move {
            let started = Instant::now();
            let result = next.run(request).await;
            println!("   round trip took {:?}", started.elapsed());
            result
        })?;

    println!("\n=== Sending GET /login ===");
    let call = client
        .execute(HttpRequestData::get("https://shop.test/login")?)
        .await?;

    println!("1. Final URL: {}", call.request.url);
    println!("2. Status: {}", call.response.status);
    println!("3. Body: {}", String::from_utf8_lossy(&call.response.body));
    println!("4. Engine saw {} requests:", engine.request_count());
    for request in engine.requests() {
        println!(
            "   {} {} cookie={:?}",
            request.method,
            request.url,
            request.headers.get(COOKIE)
        );
    }
    println!("5. Stored cookies: {:?}", client.cookies("shop.test").await);

    Ok(())
}
