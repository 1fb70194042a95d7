//! The transport capability seam.
//!
//! The opener drives these traits rather than live sockets, so its state
//! machine can be exercised against scripted transports in tests and is
//! not tied to one I/O implementation.

use crate::connection::{self, SmtpSession};
use crate::error::Result;
use crate::trust::TrustContext;
use std::time::Duration;

/// One live mail session: the operations the opener performs after the
/// transport is established.
pub trait Transport {
    /// Issues the protocol greeting (EHLO, falling back to HELO) and
    /// records the server's capabilities.
    fn ehlo(&mut self, hello_name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Upgrades the plaintext connection to an encrypted one in place,
    /// validating the peer against `trust`.
    fn starttls(&mut self, trust: &TrustContext) -> impl Future<Output = Result<()>> + Send;

    /// Performs credential authentication.
    fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Ends the session politely. Best-effort.
    fn quit(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Produces transports; one per connection attempt.
pub trait Connector {
    /// The session type this connector produces.
    type Transport: Transport;

    /// Establishes a plaintext transport and reads the greeting.
    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Transport>> + Send;

    /// Establishes an implicit-TLS transport (handshake before any protocol
    /// exchange) and reads the greeting.
    fn connect_tls(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        trust: &TrustContext,
    ) -> impl Future<Output = Result<Self::Transport>> + Send;
}

/// The real connector: TCP via tokio, TLS via rustls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpConnector;

impl Connector for SmtpConnector {
    type Transport = SmtpSession;

    async fn connect(&self, host: &str, port: u16, timeout: Duration) -> Result<SmtpSession> {
        let stream = connection::connect(host, port, timeout).await?;
        SmtpSession::from_stream(stream, host, timeout).await
    }

    async fn connect_tls(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
        trust: &TrustContext,
    ) -> Result<SmtpSession> {
        let stream = connection::connect_tls(host, port, trust, timeout).await?;
        SmtpSession::from_stream(stream, host, timeout).await
    }
}
