//! SMTP response parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Parses an SMTP reply from response lines.
///
/// SMTP replies can be single-line or multi-line:
/// - Single: `250 OK\r\n`
/// - Multi: `250-First line\r\n250-Second line\r\n250 Last line\r\n`
///
/// # Errors
///
/// Returns an error if the reply is malformed.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    if lines.is_empty() {
        return Err(Error::Protocol("empty reply".into()));
    }

    // Parse code from first line. Slicing must stay on char boundaries:
    // a server can send arbitrary bytes, so use `get` instead of indexing.
    let first = &lines[0];
    let code_str = first
        .get(0..3)
        .ok_or_else(|| Error::Protocol(format!("reply too short: {first}")))?;
    let code = code_str
        .parse::<u16>()
        .map_err(|_| Error::Protocol(format!("invalid reply code: {code_str}")))?;

    let reply_code = ReplyCode::new(code);

    // Extract message from all lines
    let mut message = Vec::new();
    for line in lines {
        if line.len() > 4 {
            // Skip code and separator (e.g., "250-" or "250 ")
            let text = line
                .get(4..)
                .ok_or_else(|| Error::Protocol(format!("malformed reply line: {line}")))?;
            message.push(text.to_string());
        } else if line.len() == 3 {
            // Just code, no message
            message.push(String::new());
        } else {
            return Err(Error::Protocol(format!("malformed reply line: {line}")));
        }
    }

    Ok(Reply::new(reply_code, message))
}

/// Checks if a line is the last line of a multi-line reply.
///
/// Multi-line replies use `-` separator for continuation and ` ` for the last line.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.len() >= 4 && line.as_bytes()[3] == b' '
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_line_reply() {
        let lines = vec!["250 OK".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.message, vec!["OK"]);
        assert!(reply.is_success());
    }

    #[test]
    fn parse_multi_line_reply() {
        let lines = vec![
            "250-smtp.example.com".to_string(),
            "250-STARTTLS".to_string(),
            "250 AUTH PLAIN LOGIN".to_string(),
        ];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(
            reply.message,
            vec!["smtp.example.com", "STARTTLS", "AUTH PLAIN LOGIN"]
        );
    }

    #[test]
    fn parse_greeting() {
        let lines = vec!["220 smtp.example.com ESMTP ready".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code, ReplyCode::SERVICE_READY);
        assert_eq!(reply.message, vec!["smtp.example.com ESMTP ready"]);
    }

    #[test]
    fn last_reply_line_detection() {
        assert!(is_last_reply_line("250 OK"));
        assert!(!is_last_reply_line("250-Continuing"));
        assert!(!is_last_reply_line("250"));
    }

    #[test]
    fn parse_error_empty() {
        assert!(parse_reply(&[]).is_err());
    }

    #[test]
    fn parse_error_too_short() {
        let lines = vec!["25".to_string()];
        assert!(parse_reply(&lines).is_err());
    }

    #[test]
    fn parse_error_invalid_code() {
        let lines = vec!["ABC OK".to_string()];
        assert!(parse_reply(&lines).is_err());
    }

    #[test]
    fn parse_error_multibyte_in_code() {
        // 'é' straddles byte index 3; must error, not panic
        let lines = vec!["25é x".to_string()];
        let err = parse_reply(&lines).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn parse_error_multibyte_at_separator() {
        // 'é' straddles byte index 4 in a later line
        let lines = vec!["250-ok".to_string(), "250éOK".to_string()];
        let err = parse_reply(&lines).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
