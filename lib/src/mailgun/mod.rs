pub mod api;
mod encode;

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::config::Settings;
use crate::email::EmailMessage;
use crate::error::{Error, SendError};
use crate::multipart::EncodedRequest;

pub use encode::encode;

/// Client for the Mailgun messages endpoint of a single domain.
///
/// Cheap to clone and safe to share between tasks; clones reuse the same
/// connection pool.
#[derive(Clone)]
pub struct MailgunClient {
    url: reqwest::Url,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl MailgunClient {
    /// Builds a client posting to `<base_url>/v3/<domain>/messages`, with the
    /// default 30 second request timeout.
    pub fn new(base_url: &str, domain: &str, api_key: &str) -> Result<Self, Error> {
        Self::with_timeout(
            base_url,
            domain,
            api_key,
            Duration::from_secs(api::MAILGUN_REQUEST_TIMEOUT),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        domain: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let url = api::build_messages_url(base_url, domain);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| Error::Setup(format!("invalid URL {}: {}", url, e)))?;

        // One call, one round trip: a 3xx is handed back as the reply
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Setup(e.to_string()))?;

        Ok(Self {
            url,
            api_key: api_key.to_string(),
            timeout,
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Self::with_timeout(
            &settings.base_url,
            &settings.domain,
            &settings.api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST an already encoded body and return the queued message ID.
    pub async fn send_request(&self, request: EncodedRequest) -> Result<String, SendError> {
        let content_type = request.content_type().to_string();

        let resp = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, content_type)
            .basic_auth(api::MAILGUN_API_USER, Some(&self.api_key))
            .body(request.into_body())
            .send()
            .await
            .map_err(|e| SendError::from_reqwest(e, self.timeout))?;

        let status = resp.status();

        // Always drain the body so the connection can go back to the pool
        let body = resp
            .bytes()
            .await
            .map_err(|e| SendError::from_reqwest(e, self.timeout))?;

        if status.as_u16() >= 400 {
            return Err(SendError::Status {
                code: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
                raw: body.to_vec(),
            });
        }

        let result: api::SendResult =
            serde_json::from_slice(&body).map_err(SendError::ResponseParse)?;

        Ok(result.id)
    }

    /// Encode `msg` and send it in one API call.
    pub async fn send_email(&self, msg: &EmailMessage) -> Result<String, Error> {
        let request = encode(msg).await?;

        match self.send_request(request).await {
            Ok(id) => {
                log::info!("Queued message {} for {} recipient(s)", id, msg.recipients.len());
                Ok(id)
            }
            Err(e) => {
                log::error!("Failed to send message \"{}\": {}", msg.subject, e);
                Err(e.into())
            }
        }
    }
}

impl fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MailgunClient")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url() {
        let client = MailgunClient::new(api::MAILGUN_BASE_API, "mg.example.com", "key-123").unwrap();

        assert_eq!(
            client.url().as_str(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = MailgunClient::new("not a url", "mg.example.com", "key").unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = MailgunClient::new(api::MAILGUN_EU_BASE_API, "mg.example.com", "key-secret").unwrap();
        let debug = format!("{:?}", client);

        assert!(!debug.contains("key-secret"));
        assert!(debug.contains("api.eu.mailgun.net"));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            base_url: "http://127.0.0.1:9000".to_string(),
            domain: "sandbox".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 5,
            test_recipient_1: None,
            test_recipient_2: None,
        };

        let client = MailgunClient::from_settings(&settings).unwrap();
        assert_eq!(client.url().as_str(), "http://127.0.0.1:9000/v3/sandbox/messages");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_client_is_shareable() {
        assert_send_sync::<MailgunClient>();
    }
}
