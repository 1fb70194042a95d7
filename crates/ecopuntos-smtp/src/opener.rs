//! The resilient connection opener.
//!
//! Drives one connection attempt through
//! `Connecting → [EncryptionNegotiating] → Authenticating → Open`, with a
//! single permissive retry when the strict TLS handshake is rejected at
//! the certificate layer.

use crate::config::Config;
use crate::error::Result;
use crate::transport::{Connector, SmtpConnector, Transport};
use crate::trust::{self, TrustContext, TrustProvider};

/// Opens and holds one SMTP transport per the configured policy.
///
/// Certificate verification tries the configured providers strict-first;
/// a handshake rejected at the certificate/TLS layer is retried exactly
/// once with verification disabled, after an audit warning. Protocol,
/// authentication, and timeout failures are terminal immediately.
pub struct TransportOpener<C: Connector = SmtpConnector> {
    config: Config,
    providers: Vec<TrustProvider>,
    connector: C,
    transport: Option<C::Transport>,
}

impl TransportOpener {
    /// Creates an opener using the real network connector and the default
    /// trust provider order.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, trust::default_providers(), SmtpConnector)
    }
}

impl<C: Connector> TransportOpener<C> {
    /// Creates an opener with an explicit trust provider order and
    /// connector. The provider list is consulted strict-first; permissive
    /// entries are never used for a first attempt.
    #[must_use]
    pub fn with_connector(config: Config, providers: Vec<TrustProvider>, connector: C) -> Self {
        Self {
            config,
            providers,
            connector,
            transport: None,
        }
    }

    /// Returns true if a transport is currently held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Returns the held transport, if any, for subsequent send operations.
    pub fn transport_mut(&mut self) -> Option<&mut C::Transport> {
        self.transport.as_mut()
    }

    /// Opens a connection, negotiating encryption and authenticating.
    ///
    /// Returns `Ok(true)` when a transport was opened, `Ok(false)` when one
    /// is already held (no-op, no network activity) or when a terminal
    /// failure was swallowed by `fail_silently`.
    ///
    /// # Errors
    ///
    /// With `fail_silently` unset: certificate/TLS failures propagate after
    /// the one permissive retry has also failed; protocol, authentication,
    /// and timeout failures propagate immediately.
    pub async fn open(&mut self) -> Result<bool> {
        if self.transport.is_some() {
            return Ok(false);
        }

        let strict = trust::strict_context(&self.providers);
        let first = self.attempt(&strict).await;

        let outcome = match first {
            Ok(transport) => Ok(transport),
            Err(err) if err.is_certificate_failure() => {
                // Audited security degradation; runs regardless of
                // fail_silently because it is recovery, not silencing.
                tracing::warn!(
                    host = %self.config.host,
                    port = self.config.port,
                    error = %err,
                    "strict TLS handshake failed; retrying without certificate verification"
                );
                self.attempt(&trust::permissive_context()).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(transport) => {
                tracing::debug!(
                    host = %self.config.host,
                    port = self.config.port,
                    "SMTP transport open"
                );
                self.transport = Some(transport);
                Ok(true)
            }
            Err(err) if self.config.fail_silently => {
                tracing::debug!(error = %err, "open failed silently");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Closes the held transport with a best-effort QUIT. Errors during
    /// close are swallowed; the opener may be reused afterwards.
    pub async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(err) = transport.quit().await {
                tracing::debug!(error = %err, "QUIT failed during close");
            }
        }
    }

    /// One full chain: connect, negotiate encryption, greet, authenticate.
    async fn attempt(&self, trust: &TrustContext) -> Result<C::Transport> {
        let Config {
            ref host,
            port,
            timeout,
            ..
        } = self.config;

        let mut transport = if self.config.use_ssl {
            self.connector.connect_tls(host, port, timeout, trust).await?
        } else {
            self.connector.connect(host, port, timeout).await?
        };

        transport.ehlo(&self.config.hello_name).await?;

        if self.config.use_tls && !self.config.use_ssl {
            transport.starttls(trust).await?;
            // Servers may advertise different capabilities once encrypted.
            transport.ehlo(&self.config.hello_name).await?;
        }

        if let Some((username, password)) = self.config.credentials() {
            transport.authenticate(username, password).await?;
        }

        Ok(transport)
    }
}
