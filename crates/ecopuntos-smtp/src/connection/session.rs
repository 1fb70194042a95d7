//! Live SMTP session over a [`SmtpStream`].

use super::{ServerInfo, SmtpStream};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::transport::Transport;
use crate::trust::TrustContext;
use crate::types::{AuthMechanism, Extension, Reply, ReplyCode};
use base64::Engine;
use std::collections::HashSet;
use std::time::Duration;

/// A live SMTP session: the stream plus the server's advertised
/// capabilities and the SNI host used for in-place TLS upgrades.
///
/// The stream is `None` only after a failed STARTTLS upgrade, where the
/// plaintext connection has been consumed by the handshake attempt.
#[derive(Debug)]
pub struct SmtpSession {
    stream: Option<SmtpStream>,
    server_info: ServerInfo,
    host: String,
    timeout: Duration,
}

impl SmtpSession {
    /// Wraps a freshly connected stream and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server does
    /// not answer 220.
    pub async fn from_stream(
        mut stream: SmtpStream,
        host: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let greeting = read_reply(&mut stream, timeout).await?;
        if greeting.code != ReplyCode::SERVICE_READY {
            return Err(Error::smtp_error(
                greeting.code.as_u16(),
                greeting.message_text(),
            ));
        }

        // Extract hostname from greeting (first word after code)
        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            stream: Some(stream),
            server_info: ServerInfo {
                hostname,
                extensions: HashSet::new(),
            },
            host: host.into(),
            timeout,
        })
    }

    /// Returns the server information gathered so far.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    fn stream_mut(&mut self) -> Result<&mut SmtpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| Error::Protocol("connection lost during TLS upgrade".into()))
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        let timeout = self.timeout;
        let stream = self.stream_mut()?;
        stream.write_all(&cmd.serialize(), timeout).await?;
        read_reply(stream, timeout).await
    }

    async fn send_auth_line(&mut self, line: &str) -> Result<Reply> {
        let timeout = self.timeout;
        let mut data = line.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        let stream = self.stream_mut()?;
        stream.write_all(&data, timeout).await?;
        read_reply(stream, timeout).await
    }

    fn record_extensions(&mut self, reply: &Reply) {
        // First line of the EHLO reply is the server greeting
        let mut extensions = HashSet::new();
        for line in reply.message.iter().skip(1) {
            extensions.insert(Extension::parse(line));
        }
        self.server_info.extensions = extensions;
    }

    async fn auth_plain(&mut self, username: &str, password: &str) -> Result<Reply> {
        // PLAIN initial response: \0username\0password
        let credentials = format!("\0{username}\0{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        self.send_command(Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(encoded),
        })
        .await
    }

    async fn auth_login(&mut self, username: &str, password: &str) -> Result<Reply> {
        let engine = &base64::engine::general_purpose::STANDARD;

        let reply = self
            .send_command(Command::Auth {
                mechanism: AuthMechanism::Login,
                initial_response: None,
            })
            .await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Ok(reply);
        }

        let reply = self
            .send_auth_line(&engine.encode(username.as_bytes()))
            .await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Ok(reply);
        }

        self.send_auth_line(&engine.encode(password.as_bytes()))
            .await
    }
}

impl Transport for SmtpSession {
    /// Sends EHLO and records the advertised capabilities, falling back to
    /// HELO when the server rejects EHLO.
    async fn ehlo(&mut self, hello_name: &str) -> Result<()> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: hello_name.to_string(),
            })
            .await?;

        if reply.is_success() {
            self.record_extensions(&reply);
            return Ok(());
        }

        // Old servers may only speak HELO; no capabilities in that case.
        let reply = self
            .send_command(Command::Helo {
                hostname: hello_name.to_string(),
            })
            .await?;
        if !reply.is_success() {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }
        self.server_info.extensions = HashSet::new();
        Ok(())
    }

    /// Upgrades the plaintext connection to TLS in place. Capabilities may
    /// change post-upgrade, so the opener re-issues EHLO afterwards.
    async fn starttls(&mut self, trust: &TrustContext) -> Result<()> {
        if !self.server_info.supports_starttls() {
            return Err(Error::NotSupported("STARTTLS".into()));
        }

        let reply = self.send_command(Command::StartTls).await?;
        if reply.code != ReplyCode::SERVICE_READY {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }

        let stream = self
            .stream
            .take()
            .ok_or_else(|| Error::Protocol("connection lost during TLS upgrade".into()))?;
        let upgraded = stream
            .upgrade_to_tls(&self.host, trust, self.timeout)
            .await?;
        self.stream = Some(upgraded);
        self.server_info.extensions = HashSet::new();
        Ok(())
    }

    /// Authenticates with PLAIN when advertised (or when the server
    /// advertises nothing), LOGIN otherwise.
    async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let mechanisms = self.server_info.auth_mechanisms();
        let use_login = mechanisms.contains(&AuthMechanism::Login)
            && !mechanisms.contains(&AuthMechanism::Plain);

        let reply = if use_login {
            self.auth_login(username, password).await?
        } else {
            self.auth_plain(username, password).await?
        };

        if reply.code == ReplyCode::AUTH_SUCCESS {
            Ok(())
        } else {
            Err(Error::auth_error(reply.code.as_u16(), reply.message_text()))
        }
    }

    /// Sends QUIT. Close is best-effort; the reply code is not checked.
    async fn quit(&mut self) -> Result<()> {
        self.send_command(Command::Quit).await?;
        Ok(())
    }
}

async fn read_reply(stream: &mut SmtpStream, timeout: Duration) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = stream.read_line(timeout).await?;
        if line.is_empty() {
            continue;
        }

        let is_last = is_last_reply_line(&line);
        lines.push(line);

        if is_last {
            break;
        }
    }

    parse_reply(&lines)
}
