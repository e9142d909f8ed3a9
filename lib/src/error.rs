use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures while building the request body. Nothing was sent.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to read attachment {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode recipient variables: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failures talking to Mailgun or interpreting its reply.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Mailgun returned a status >= 400.
    ///
    /// `raw` is the body exactly as received. `body` is the same bytes as
    /// text, with invalid UTF-8 replaced by U+FFFD.
    #[error("mailgun error {code}: {body}")]
    Status {
        code: u16,
        body: String,
        raw: Vec<u8>,
    },

    #[error("failed to parse response: {0}")]
    ResponseParse(#[source] serde_json::Error),
}

/// All possible errors returned by the client
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not build request: {0}")]
    Encode(#[from] EncodeError),

    #[error("could not send request: {0}")]
    Send(#[from] SendError),

    #[error("invalid client setup: {0}")]
    Setup(String),
}

impl Error {
    /// Status code and raw body, if Mailgun rejected the request
    pub fn status(&self) -> Option<(u16, &str)> {
        match *self {
            Error::Send(SendError::Status { code, ref body, .. }) => Some((code, body.as_str())),
            _ => None,
        }
    }
}

impl SendError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = Error::from(SendError::Status {
            code: 401,
            body: "Forbidden".to_string(),
            raw: b"Forbidden".to_vec(),
        });

        assert_eq!(err.status(), Some((401, "Forbidden")));
        assert_eq!(
            err.to_string(),
            "could not send request: mailgun error 401: Forbidden"
        );
    }

    #[test]
    fn test_status_only_for_http_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(EncodeError::Io {
            path: PathBuf::from("/tmp/missing.txt"),
            source: io,
        });

        assert!(err.status().is_none());
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }
}
