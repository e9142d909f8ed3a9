use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Per-recipient substitution variables.
///
/// Exposed to Mailgun as `recipient-variables` when a message is sent to more
/// than one address, e.g. `%recipient.name%` in the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientMetadata {
    pub name: String,
    pub id: String,
}

impl RecipientMetadata {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// A single outgoing email.
///
/// Recipients are keyed by address. The map is sorted, which only affects the
/// order of the `to` fields in the request body.
#[derive(Clone, Debug, Default)]
pub struct EmailMessage {
    pub sender: String,
    pub recipients: BTreeMap<String, RecipientMetadata>,
    pub subject: String,

    /// Plaintext body
    pub text: Option<String>,

    /// HTML body, if any
    pub html: Option<String>,

    /// Path to a single local file sent as `attachment`
    pub attachment: Option<PathBuf>,
}

impl EmailMessage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_recipient(mut self, address: impl Into<String>, metadata: RecipientMetadata) -> Self {
        self.recipients.insert(address.into(), metadata);
        self
    }

    /// Replaces all recipients
    pub fn with_recipients<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = (S, RecipientMetadata)>,
        S: Into<String>,
    {
        self.recipients = recipients
            .into_iter()
            .map(|(address, metadata)| (address.into(), metadata))
            .collect();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    /// Mailgun switches to batch sending when it sees two or more `to` fields
    /// along with `recipient-variables`.
    pub fn is_batch(&self) -> bool {
        self.recipients.len() >= 2
    }

    /// Plaintext body, unless missing or empty
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref().filter(|s| !s.is_empty())
    }

    /// HTML body, unless missing or empty
    pub fn html_body(&self) -> Option<&str> {
        self.html.as_deref().filter(|s| !s.is_empty())
    }

    /// Attachment path, unless missing or empty
    pub fn attachment_path(&self) -> Option<&Path> {
        self.attachment
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
