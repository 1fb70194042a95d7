#![allow(clippy::expect_used, clippy::uninlined_format_args)]
//! Example: Open a transport to a real SMTP server
//!
//! Reads server details from the environment and runs the full open
//! sequence: connect, negotiate encryption, authenticate. Watch the log
//! output for the certificate-fallback warning when pointing this at a
//! server with a self-signed certificate.
//!
//! ## Running
//!
//! ```bash
//! SMTP_HOST=smtp.example.com SMTP_USER=me SMTP_PASSWORD=secret \
//!     cargo run --package ecopuntos-smtp --example open_transport
//! ```

use ecopuntos_smtp::{Config, TransportOpener};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let host = env::var("SMTP_HOST")?;
    let port = env::var("SMTP_PORT").ok().and_then(|p| p.parse().ok());
    let use_ssl = env::var("SMTP_SSL").is_ok();

    let mut builder = Config::builder(host.as_str())
        .use_ssl(use_ssl)
        .use_tls(!use_ssl)
        .timeout(Duration::from_secs(15));
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let (Ok(user), Ok(pass)) = (env::var("SMTP_USER"), env::var("SMTP_PASSWORD")) {
        builder = builder.credentials(user, pass);
    }
    let config = builder.build()?;

    println!("Opening transport to {}:{}...", config.host, config.port);

    let mut opener = TransportOpener::new(config);
    if opener.open().await? {
        println!("✓ Transport open");
    } else {
        println!("✗ No transport opened");
    }
    opener.close().await;

    Ok(())
}
