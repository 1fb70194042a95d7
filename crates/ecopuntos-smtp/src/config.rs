//! Transport configuration types.

use crate::error::{Error, Result};
use std::time::Duration;

/// SMTP transport configuration.
///
/// Mirrors the settings an application hands to its mail layer: where to
/// connect, how to encrypt, optional credentials, and whether open failures
/// should be swallowed or propagated. Immutable for the duration of one
/// open attempt.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Per-step network timeout (connect, handshake, each round-trip).
    pub timeout: Duration,
    /// Implicit TLS from connect (port 465 semantics).
    pub use_ssl: bool,
    /// STARTTLS upgrade after the greeting (port 587 semantics).
    pub use_tls: bool,
    /// Authentication username.
    pub username: Option<String>,
    /// Authentication password.
    pub password: Option<String>,
    /// Report terminal failures as `false` instead of an error.
    pub fail_silently: bool,
    /// Identity announced in EHLO/HELO.
    pub hello_name: String,
}

impl Config {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(host)
    }

    /// Returns the credential pair when both parts are present and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user, pass))
            }
            _ => None,
        }
    }
}

/// Builder for transport configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    timeout: Duration,
    use_ssl: bool,
    use_tls: bool,
    username: Option<String>,
    password: Option<String>,
    fail_silently: bool,
    hello_name: String,
}

impl ConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            timeout: Duration::from_secs(30),
            use_ssl: false,
            use_tls: false,
            username: None,
            password: None,
            fail_silently: false,
            hello_name: "localhost".into(),
        }
    }

    /// Sets the port. Defaults from the security flags when unset.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the per-step network timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables implicit TLS (encryption negotiated as part of the connect).
    #[must_use]
    pub const fn use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Enables STARTTLS (plaintext connect, upgraded in place).
    #[must_use]
    pub const fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets the credential pair.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Swallow terminal open failures instead of propagating them.
    #[must_use]
    pub const fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    /// Sets the identity announced in EHLO/HELO.
    #[must_use]
    pub fn hello_name(mut self, hello_name: impl Into<String>) -> Self {
        self.hello_name = hello_name.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if both `use_ssl` and `use_tls` are set; the two
    /// encryption modes are mutually exclusive.
    pub fn build(self) -> Result<Config> {
        if self.use_ssl && self.use_tls {
            return Err(Error::Config(
                "use_ssl and use_tls are mutually exclusive; \
                 set only one of them"
                    .into(),
            ));
        }

        let port = self.port.unwrap_or(match (self.use_ssl, self.use_tls) {
            (true, _) => 465,
            (_, true) => 587,
            _ => 25,
        });

        Ok(Config {
            host: self.host,
            port,
            timeout: self.timeout,
            use_ssl: self.use_ssl,
            use_tls: self.use_tls,
            username: self.username,
            password: self.password,
            fail_silently: self.fail_silently,
            hello_name: self.hello_name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_follow_security_flags() {
        let plain = Config::builder("smtp.example.com").build().unwrap();
        assert_eq!(plain.port, 25);

        let ssl = Config::builder("smtp.example.com")
            .use_ssl(true)
            .build()
            .unwrap();
        assert_eq!(ssl.port, 465);

        let tls = Config::builder("smtp.example.com")
            .use_tls(true)
            .build()
            .unwrap();
        assert_eq!(tls.port, 587);
    }

    #[test]
    fn explicit_port_wins() {
        let config = Config::builder("smtp.example.com")
            .use_ssl(true)
            .port(2465)
            .build()
            .unwrap();
        assert_eq!(config.port, 2465);
    }

    #[test]
    fn ssl_and_tls_are_mutually_exclusive() {
        let err = Config::builder("smtp.example.com")
            .use_ssl(true)
            .use_tls(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn credentials_require_both_parts_non_empty() {
        let config = Config::builder("smtp.example.com")
            .credentials("user@example.com", "secret")
            .build()
            .unwrap();
        assert_eq!(config.credentials(), Some(("user@example.com", "secret")));

        let empty_pass = Config::builder("smtp.example.com")
            .credentials("user@example.com", "")
            .build()
            .unwrap();
        assert_eq!(empty_pass.credentials(), None);

        let absent = Config::builder("smtp.example.com").build().unwrap();
        assert_eq!(absent.credentials(), None);
    }

    #[test]
    fn builder_defaults() {
        let config = Config::builder("smtp.example.com").build().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.use_ssl);
        assert!(!config.use_tls);
        assert!(!config.fail_silently);
        assert_eq!(config.hello_name, "localhost");
    }
}
