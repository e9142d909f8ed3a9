use serde::Deserialize;

pub const MAILGUN_BASE_API: &str = "https://api.mailgun.net";
pub const MAILGUN_EU_BASE_API: &str = "https://api.eu.mailgun.net";

/// Mailgun expects this literal username, with the API key as password
pub const MAILGUN_API_USER: &str = "api";

// Request timeout, in seconds
pub const MAILGUN_REQUEST_TIMEOUT: u64 = 30;

/// Reply to a successful `POST /messages`.
///
/// Mailgun also sends a human readable `message`; only the ID is needed.
#[derive(Deserialize, Debug)]
pub struct SendResult {
    pub id: String,
}

#[inline]
pub fn build_messages_url(base_url: &str, domain: &str) -> String {
    format!("{}/v3/{}/messages", base_url.trim_end_matches('/'), domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        assert_eq!(
            build_messages_url(MAILGUN_BASE_API, "mg.example.com"),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
        assert_eq!(
            build_messages_url("http://localhost:8080/", "sandbox"),
            "http://localhost:8080/v3/sandbox/messages"
        );
    }

    #[test]
    fn test_send_result_requires_id() {
        let ok: SendResult =
            serde_json::from_str(r#"{"id":"<abc@mg>","message":"Queued. Thank you."}"#).unwrap();
        assert_eq!(ok.id, "<abc@mg>");

        assert!(serde_json::from_str::<SendResult>(r#"{"message":"Queued."}"#).is_err());
    }
}
