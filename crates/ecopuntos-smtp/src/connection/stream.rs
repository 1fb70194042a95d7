//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use crate::trust::TrustContext;
use rustls::pki_types::ServerName;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Tls(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl SmtpStream {
    /// Reads a line from the stream, bounded by `deadline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails, times out, or the server closed
    /// the connection.
    pub async fn read_line(&mut self, deadline: Duration) -> Result<String> {
        let mut line = String::new();
        let read = match self {
            Self::Tcp(reader) => bounded(deadline, reader.read_line(&mut line)).await??,
            Self::Tls(reader) => bounded(deadline, reader.read_line(&mut line)).await??,
        };
        if read == 0 {
            return Err(Error::Protocol("connection closed by server".into()));
        }
        Ok(line.trim_end().to_string())
    }

    /// Writes data to the stream, bounded by `deadline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or times out.
    pub async fn write_all(&mut self, data: &[u8], deadline: Duration) -> Result<()> {
        match self {
            Self::Tcp(reader) => {
                bounded(deadline, reader.get_mut().write_all(data)).await??;
                bounded(deadline, reader.get_mut().flush()).await??;
            }
            Self::Tls(reader) => {
                bounded(deadline, reader.get_mut().write_all(data)).await??;
                bounded(deadline, reader.get_mut().flush()).await??;
            }
        }
        Ok(())
    }

    /// Upgrades a plaintext stream to TLS in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] when the handshake is rejected at the TLS
    /// layer, [`Error::Timeout`] when it does not complete in time.
    pub async fn upgrade_to_tls(
        self,
        hostname: &str,
        trust: &TrustContext,
        deadline: Duration,
    ) -> Result<Self> {
        let tcp_stream = match self {
            Self::Tcp(reader) => reader.into_inner(),
            Self::Tls(_) => return Err(Error::Protocol("already using TLS".into())),
        };

        let connector = TlsConnector::from(trust.client_config());
        let server_name = server_name(hostname)?;

        let tls_stream = bounded(deadline, connector.connect(server_name, tcp_stream))
            .await?
            .map_err(Error::from_handshake)?;
        Ok(Self::Tls(Box::new(BufReader::new(tls_stream))))
    }
}

/// Connects to an SMTP server over plain TCP.
///
/// # Errors
///
/// Returns an error if the connection fails or times out.
pub async fn connect(hostname: &str, port: u16, deadline: Duration) -> Result<SmtpStream> {
    let addr = format!("{hostname}:{port}");
    let stream = bounded(deadline, TcpStream::connect(&addr)).await??;
    Ok(SmtpStream::Tcp(BufReader::new(stream)))
}

/// Connects to an SMTP server with implicit TLS (port 465 semantics): the
/// handshake happens before any protocol exchange.
///
/// # Errors
///
/// Returns [`Error::Tls`] when the handshake is rejected at the TLS layer,
/// [`Error::Io`] for transport failures, [`Error::Timeout`] on deadline.
pub async fn connect_tls(
    hostname: &str,
    port: u16,
    trust: &TrustContext,
    deadline: Duration,
) -> Result<SmtpStream> {
    let addr = format!("{hostname}:{port}");
    let tcp_stream = bounded(deadline, TcpStream::connect(&addr)).await??;

    let connector = TlsConnector::from(trust.client_config());
    let server_name = server_name(hostname)?;

    let tls_stream = bounded(deadline, connector.connect(server_name, tcp_stream))
        .await?
        .map_err(Error::from_handshake)?;
    Ok(SmtpStream::Tls(Box::new(BufReader::new(tls_stream))))
}

fn server_name(hostname: &str) -> Result<ServerName<'static>> {
    ServerName::try_from(hostname.to_string())
        .map_err(|_| Error::Protocol(format!("invalid hostname: {hostname}")))
}

/// Bounds a network step by the configured timeout.
async fn bounded<F: Future>(deadline: Duration, fut: F) -> Result<F::Output> {
    timeout(deadline, fut)
        .await
        .map_err(|_| Error::Timeout(deadline))
}
