//! # ecopuntos-smtp
//!
//! Resilient SMTP transport opener: opens a connection to an SMTP server,
//! negotiating encryption (implicit TLS or STARTTLS) and authenticating,
//! with a layered fallback when certificate validation fails.
//!
//! ## Trust fallback
//!
//! Certificate verification is attempted strict-first, in the order of the
//! configured [`TrustProvider`] list (the compiled-in `webpki-roots` bundle,
//! then the platform trust store). A handshake rejected at the
//! certificate/TLS layer is retried exactly once with verification
//! disabled; a warning is emitted before that retry because it is a known
//! security degradation. Protocol, authentication, and timeout failures
//! are terminal and never trigger the fallback.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ecopuntos_smtp::{Config, TransportOpener};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> ecopuntos_smtp::Result<()> {
//!     let config = Config::builder("smtp.example.com")
//!         .use_tls(true)
//!         .credentials("notifier@example.com", "password")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let mut opener = TransportOpener::new(config);
//!     if opener.open().await? {
//!         // transport_mut() hands the live session to the mail sender
//!     }
//!     opener.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Open progression
//!
//! ```text
//! Idle ── open() ──→ Connecting ──→ [EncryptionNegotiating] ──→ Authenticating ──→ Open
//!                        │ certificate/TLS failure                    │
//!                        └──── one permissive retry ◄─────────────────┘
//! ```
//!
//! A second `open()` while a transport is held returns `false` without any
//! network activity. With `fail_silently` set, terminal failures are
//! reported as `false` instead of an error.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Streams and the live session
//! - [`parser`]: Response parser
//! - [`transport`]: The injected connector/transport seam
//! - [`trust`]: Certificate-verification contexts and providers
//! - [`types`]: Core SMTP types (extensions, replies)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
mod config;
pub mod connection;
mod error;
mod opener;
pub mod parser;
pub mod transport;
pub mod trust;
pub mod types;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use opener::TransportOpener;
pub use transport::{Connector, SmtpConnector, Transport};
pub use trust::{TrustContext, TrustProvider, Verification};
pub use types::{AuthMechanism, Extension, Reply, ReplyCode};
