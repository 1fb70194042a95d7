//! Trust contexts for TLS certificate verification.
//!
//! The opener negotiates encryption against an ordered list of
//! [`TrustProvider`]s, most strict first. The permissive [`Insecure`]
//! provider exists only for the last-resort retry after a certificate
//! failure and is never selected as a first attempt.
//!
//! [`Insecure`]: TrustProvider::Insecure

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::Arc;

/// Verification policy that produced a [`TrustContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Certificate chain and hostname are verified.
    Strict,
    /// Verification disabled. Audited security degradation.
    Unverified,
}

/// A certificate-verification policy source, ordered strict-to-permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustProvider {
    /// The compiled-in `webpki-roots` CA bundle. Always available.
    BundledRoots,
    /// The platform trust store via `rustls-native-certs`, with a
    /// TLS 1.2 protocol floor. Unavailable when the store yields nothing.
    PlatformRoots,
    /// Certificate verification and hostname checking both disabled.
    /// Last resort only.
    Insecure,
}

/// A fully configured certificate-verification context.
#[derive(Debug, Clone)]
pub struct TrustContext {
    config: Arc<ClientConfig>,
    verification: Verification,
}

impl TrustContext {
    /// Builds the context backed by the compiled-in CA bundle.
    #[must_use]
    pub fn bundled() -> Self {
        let root_store = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
            verification: Verification::Strict,
        }
    }

    /// Returns the rustls client configuration.
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Returns the verification policy behind this context.
    #[must_use]
    pub const fn verification(&self) -> Verification {
        self.verification
    }

    /// Returns true if this context skips certificate verification.
    #[must_use]
    pub const fn is_unverified(&self) -> bool {
        matches!(self.verification, Verification::Unverified)
    }
}

impl TrustProvider {
    /// Attempts to build a trust context from this provider.
    ///
    /// Returns `None` when the provider's certificate source is unavailable
    /// (currently only possible for [`Self::PlatformRoots`]).
    #[must_use]
    pub fn try_build(self) -> Option<TrustContext> {
        match self {
            Self::BundledRoots => Some(TrustContext::bundled()),
            Self::PlatformRoots => platform_context(),
            Self::Insecure => Some(insecure_context()),
        }
    }
}

/// The default strict provider order: the bundled CA package first, the
/// platform store second.
#[must_use]
pub fn default_providers() -> Vec<TrustProvider> {
    vec![TrustProvider::BundledRoots, TrustProvider::PlatformRoots]
}

/// Selects the first available strict context from an ordered provider
/// list. Never fails: an empty or fully unavailable list degrades to the
/// bundled roots. [`TrustProvider::Insecure`] entries are skipped; the
/// permissive context is only reachable through [`permissive_context`].
#[must_use]
pub fn strict_context(providers: &[TrustProvider]) -> TrustContext {
    providers
        .iter()
        .filter(|provider| !matches!(provider, TrustProvider::Insecure))
        .find_map(|provider| provider.try_build())
        .unwrap_or_else(TrustContext::bundled)
}

/// Builds the last-resort context with certificate verification and
/// hostname checking disabled.
#[must_use]
pub fn permissive_context() -> TrustContext {
    insecure_context()
}

/// Platform trust store with a TLS 1.2 protocol floor.
fn platform_context() -> Option<TrustContext> {
    let result = rustls_native_certs::load_native_certs();

    let mut root_store = RootCertStore::empty();
    let (_, ignored) = root_store.add_parsable_certificates(result.certs);

    if ignored > 0 || !result.errors.is_empty() {
        tracing::debug!(
            ignored,
            errors = ?result.errors,
            "some platform certificates could not be loaded"
        );
    }

    if root_store.is_empty() {
        return None;
    }

    let config = ClientConfig::builder_with_protocol_versions(&[
        &rustls::version::TLS13,
        &rustls::version::TLS12,
    ])
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Some(TrustContext {
        config: Arc::new(config),
        verification: Verification::Strict,
    })
}

fn insecure_context() -> TrustContext {
    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerifier))
        .with_no_client_auth();
    TrustContext {
        config: Arc::new(config),
        verification: Verification::Unverified,
    }
}

/// A certificate verifier that accepts every chain and hostname.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn bundled_context_is_strict() {
        let ctx = TrustContext::bundled();
        assert_eq!(ctx.verification(), Verification::Strict);
        assert!(!ctx.is_unverified());
    }

    #[test]
    fn strict_context_never_fails() {
        // An empty provider list still yields a usable strict context.
        let ctx = strict_context(&[]);
        assert_eq!(ctx.verification(), Verification::Strict);
    }

    #[test]
    fn strict_context_skips_insecure_entries() {
        // Insecure must never win the strict selection, even listed first.
        let ctx = strict_context(&[TrustProvider::Insecure, TrustProvider::BundledRoots]);
        assert_eq!(ctx.verification(), Verification::Strict);
    }

    #[test]
    fn permissive_context_is_unverified() {
        let ctx = permissive_context();
        assert_eq!(ctx.verification(), Verification::Unverified);
        assert!(ctx.is_unverified());
    }

    #[test]
    fn default_provider_order() {
        assert_eq!(
            default_providers(),
            vec![TrustProvider::BundledRoots, TrustProvider::PlatformRoots]
        );
    }

    #[test]
    fn bundled_provider_always_builds() {
        assert!(TrustProvider::BundledRoots.try_build().is_some());
    }
}
