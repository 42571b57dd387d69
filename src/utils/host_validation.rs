//! Host header validation for the webhook echo.
//!
//! The incoming-call webhook echoes the request's `Host` header into the
//! stream URL of the returned call-control markup. Before echoing, the value
//! is restricted to hostname characters plus an optional numeric port, so a
//! crafted header cannot inject XML or URL syntax into the document.

use thiserror::Error;

/// Errors that can occur during host validation
#[derive(Debug, Error)]
pub enum HostValidationError {
    #[error("Host header is missing or empty")]
    Empty,

    #[error("Host header is too long: {0} bytes")]
    TooLong(usize),

    #[error("Host header contains forbidden character: {0:?}")]
    ForbiddenCharacter(char),

    #[error("Host header has an invalid port")]
    InvalidPort,
}

/// Maximum accepted length for a Host header value.
const MAX_HOST_LEN: usize = 255;

/// Validate a `Host` header value before echoing it.
///
/// Accepts `hostname` or `hostname:port` where the hostname uses only ASCII
/// letters, digits, `-` and `.`, and the port is purely numeric. Returns the
/// trimmed value on success.
pub fn validate_echo_host(host: &str) -> Result<&str, HostValidationError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(HostValidationError::Empty);
    }
    if host.len() > MAX_HOST_LEN {
        return Err(HostValidationError::TooLong(host.len()));
    }

    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) => (name, Some(port)),
        None => (host, None),
    };

    if name.is_empty() {
        return Err(HostValidationError::Empty);
    }
    for c in name.chars() {
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '.') {
            return Err(HostValidationError::ForbiddenCharacter(c));
        }
    }

    if let Some(port) = port
        && (port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(HostValidationError::InvalidPort);
    }

    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_hostname_is_accepted() {
        assert_eq!(validate_echo_host("example.ngrok.io").unwrap(), "example.ngrok.io");
    }

    #[test]
    fn test_hostname_with_port_is_accepted() {
        assert_eq!(validate_echo_host("bridge.example.com:8443").unwrap(), "bridge.example.com:8443");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(validate_echo_host(" example.com ").unwrap(), "example.com");
    }

    #[test]
    fn test_empty_host_is_rejected() {
        assert!(matches!(validate_echo_host(""), Err(HostValidationError::Empty)));
        assert!(matches!(validate_echo_host(":8080"), Err(HostValidationError::Empty)));
    }

    #[test]
    fn test_markup_injection_is_rejected() {
        for bad in [
            "example.com\"/><Hangup",
            "example.com/path",
            "a.com?x=1",
            "host with space",
            "<script>",
        ] {
            assert!(
                matches!(validate_echo_host(bad), Err(HostValidationError::ForbiddenCharacter(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        assert!(matches!(
            validate_echo_host("example.com:80a"),
            Err(HostValidationError::InvalidPort)
        ));
        assert!(matches!(
            validate_echo_host("example.com:"),
            Err(HostValidationError::InvalidPort)
        ));
    }

    #[test]
    fn test_overlong_host_is_rejected() {
        let long = "a".repeat(MAX_HOST_LEN + 1);
        assert!(matches!(
            validate_echo_host(&long),
            Err(HostValidationError::TooLong(_))
        ));
    }
}
