//! Error types for the transport opener.

use std::io;
use std::time::Duration;

/// Result type alias for SMTP transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for opening an SMTP transport.
///
/// Only [`Error::Tls`] is recoverable: a certificate/TLS-layer failure
/// triggers exactly one retry with the permissive trust context. Every
/// other kind is terminal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid transport configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error (connect refused, connection reset).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Certificate/TLS-layer error (handshake rejected, chain invalid).
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server returned an error response.
    #[error("SMTP error {code}: {message}")]
    Smtp {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Protocol error (malformed or unexpected response).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Credentials rejected by the server.
    #[error("authentication rejected ({code}): {message}")]
    Auth {
        /// Reply code (e.g., 535).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Feature not supported by server (e.g. STARTTLS not advertised).
    #[error("server does not support {0}")]
    NotSupported(String),

    /// No response within the configured window.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Coarse failure kinds, used for retry gating and by callers that only
/// care about the class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected configuration, no connection was attempted.
    Config,
    /// TLS handshake or certificate chain failure.
    CertificateTrust,
    /// Transport- or protocol-level failure.
    Protocol,
    /// Credentials rejected.
    Authentication,
    /// Deadline exceeded.
    Timeout,
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp_error(code: u16, message: impl Into<String>) -> Self {
        Self::Smtp {
            code,
            message: message.into(),
        }
    }

    /// Creates an authentication error from a reply code and message.
    #[must_use]
    pub fn auth_error(code: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            code,
            message: message.into(),
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Tls(_) => ErrorKind::CertificateTrust,
            Self::Io(_) | Self::Smtp { .. } | Self::Protocol(_) | Self::NotSupported(_) => {
                ErrorKind::Protocol
            }
            Self::Auth { .. } => ErrorKind::Authentication,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Returns true if this failure is attributable to the certificate/TLS
    /// layer and therefore eligible for the one permissive retry.
    #[must_use]
    pub const fn is_certificate_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::CertificateTrust)
    }

    /// Converts a handshake I/O error into [`Error::Tls`] when the cause is
    /// a `rustls` error, keeping plain transport failures as [`Error::Io`].
    ///
    /// `tokio-rustls` reports handshake rejections as `io::Error` values
    /// wrapping the underlying `rustls::Error`.
    #[must_use]
    pub fn from_handshake(err: io::Error) -> Self {
        let is_tls = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<rustls::Error>())
            .is_some();
        if is_tls {
            match err.into_inner().map(|inner| inner.downcast::<rustls::Error>()) {
                Some(Ok(tls)) => Self::Tls(*tls),
                Some(Err(other)) => Self::Io(io::Error::other(other)),
                None => Self::Io(io::Error::other("handshake failed")),
            }
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn tls_errors_are_certificate_failures() {
        let err = Error::Tls(rustls::Error::InvalidCertificate(
            rustls::CertificateError::UnknownIssuer,
        ));
        assert_eq!(err.kind(), ErrorKind::CertificateTrust);
        assert!(err.is_certificate_failure());
    }

    #[test]
    fn io_errors_are_protocol_failures() {
        let err = Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(!err.is_certificate_failure());
    }

    #[test]
    fn timeout_is_not_a_certificate_failure() {
        let err = Error::Timeout(Duration::from_secs(30));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(!err.is_certificate_failure());
    }

    #[test]
    fn auth_rejection_kind() {
        let err = Error::auth_error(535, "authentication credentials invalid");
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!err.is_certificate_failure());
    }

    #[test]
    fn handshake_error_wrapping_rustls_becomes_tls() {
        let inner = rustls::Error::InvalidCertificate(rustls::CertificateError::Expired);
        let err = Error::from_handshake(io::Error::new(io::ErrorKind::InvalidData, inner));
        assert!(matches!(err, Error::Tls(_)));
    }

    #[test]
    fn handshake_error_without_rustls_cause_stays_io() {
        let err = Error::from_handshake(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}
