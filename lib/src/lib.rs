//! Client for the Mailgun messages API.
//!
//! An [`EmailMessage`] is encoded into a multipart/form-data body by
//! [`mailgun::encode`] and posted by a [`MailgunClient`]. A message with two or
//! more recipients is sent as a single batch, with per-recipient variables.
pub mod config;
pub mod email;
pub mod error;
pub mod mailgun;
pub mod multipart;

pub use email::{EmailMessage, RecipientMetadata};
pub use error::{EncodeError, Error, SendError};
pub use mailgun::MailgunClient;
pub use multipart::EncodedRequest;
