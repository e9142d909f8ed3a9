use std::path::Path;

use crate::email::EmailMessage;
use crate::error::EncodeError;
use crate::multipart::{EncodedRequest, FormBuilder};

/// Encode a message as a Mailgun `multipart/form-data` body.
///
/// Fields are written in this order: `from`, `subject`, one `to` per recipient,
/// `recipient-variables` (batch sends only), `text`, `html`, `attachment`.
/// Nothing is validated here; empty senders or recipient lists are passed
/// through as-is.
pub async fn encode(msg: &EmailMessage) -> Result<EncodedRequest, EncodeError> {
    let mut form = FormBuilder::new()
        .text("from", &msg.sender)
        .text("subject", &msg.subject);

    for address in msg.recipients.keys() {
        form = form.text("to", address);
    }

    // A single recipient has nothing to substitute
    if msg.is_batch() {
        let variables = serde_json::to_string(&msg.recipients)?;
        form = form.text("recipient-variables", &variables);
    }

    if let Some(text) = msg.text_body() {
        form = form.text("text", text);
    }
    if let Some(html) = msg.html_body() {
        form = form.text("html", html);
    }

    if let Some(path) = msg.attachment_path() {
        form = attach(form, path).await?;
    }

    let req = form.finish();

    log::debug!(
        "Encoded message for {} recipient(s), {} bytes",
        msg.recipients.len(),
        req.body().len()
    );

    Ok(req)
}

/// Stream the file at `path` into an `attachment` part.
/// The file is closed when this returns, whatever the outcome.
async fn attach(form: FormBuilder, path: &Path) -> Result<FormBuilder, EncodeError> {
    let io_err = |source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    form.file("attachment", &filename, mime.essence_str(), &mut file)
        .await
        .map_err(io_err)
}
