//! Minimal multipart/form-data writer.
//!
//! Parts are written into an in-memory buffer as they are added. The content
//! type (which carries the boundary) is only available once the body has been
//! closed with [`FormBuilder::finish`].
use tokio::io::{AsyncRead, AsyncReadExt};

const CRLF: &[u8] = b"\r\n";

pub struct FormBuilder {
    boundary: String,
    buf: Vec<u8>,
}

/// A finished multipart body and its matching content type.
#[derive(Clone, Debug)]
pub struct EncodedRequest {
    content_type: String,
    body: Vec<u8>,
}

impl FormBuilder {
    /// Each builder gets its own boundary
    pub fn new() -> Self {
        Self {
            boundary: uuid::Uuid::new_v4().simple().to_string(),
            buf: Vec::new(),
        }
    }

    /// Append a plain form field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.part_header(name, None, None);
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Append a file part, streaming its data from `reader`.
    ///
    /// The reader is only borrowed; the caller owns (and releases) it.
    pub async fn file<R>(
        mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        reader: &mut R,
    ) -> std::io::Result<Self>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.part_header(name, Some(filename), Some(content_type));
        reader.read_to_end(&mut self.buf).await?;
        Ok(self)
    }

    /// Write the closing delimiter
    pub fn finish(mut self) -> EncodedRequest {
        if !self.buf.is_empty() {
            self.buf.extend_from_slice(CRLF);
        }
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(CRLF);

        EncodedRequest {
            content_type: format!("multipart/form-data; boundary={}", self.boundary),
            body: self.buf,
        }
    }

    fn part_header(&mut self, name: &str, filename: Option<&str>, content_type: Option<&str>) {
        // Terminate the previous part's data
        if !self.buf.is_empty() {
            self.buf.extend_from_slice(CRLF);
        }

        let mut header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"",
            self.boundary,
            escape_quotes(name)
        );
        if let Some(filename) = filename {
            header.push_str(&format!("; filename=\"{}\"", escape_quotes(filename)));
        }
        header.push_str("\r\n");
        if let Some(content_type) = content_type {
            header.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        header.push_str("\r\n");

        self.buf.extend_from_slice(header.as_bytes());
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodedRequest {
    /// `multipart/form-data; boundary=...`
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[cfg(test)]
    pub(crate) fn boundary(&self) -> &str {
        self.content_type
            .rsplit("boundary=")
            .next()
            .unwrap_or_default()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Splits an encoded body back into its parts. Only meant for tests, and
/// assumes part data never contains the delimiter.
#[cfg(test)]
pub(crate) mod testing {
    use super::EncodedRequest;

    #[derive(Debug)]
    pub struct Part {
        pub name: String,
        pub filename: Option<String>,
        pub content_type: Option<String>,
        pub data: Vec<u8>,
    }

    impl Part {
        pub fn text(&self) -> &str {
            std::str::from_utf8(&self.data).unwrap()
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn quoted_param(header: &str, key: &str) -> Option<String> {
        let start = header.find(key)? + key.len();
        let rest = &header[start..];
        let end = rest.find('"')?;
        Some(rest[..end].to_string())
    }

    pub fn parts(req: &EncodedRequest) -> Vec<Part> {
        let delim = format!("--{}", req.boundary());
        let mut body = req.body();
        let mut parts = Vec::new();

        // Body starts with a delimiter
        assert!(body.starts_with(delim.as_bytes()));
        body = &body[delim.len()..];

        loop {
            if body.starts_with(b"--") {
                assert_eq!(&body[2..], b"\r\n");
                break;
            }
            assert!(body.starts_with(b"\r\n"));
            body = &body[2..];

            let header_end = find(body, b"\r\n\r\n").unwrap();
            let headers = std::str::from_utf8(&body[..header_end]).unwrap();
            body = &body[header_end + 4..];

            let next = find(body, format!("\r\n{}", delim).as_bytes()).unwrap();
            let data = body[..next].to_vec();
            body = &body[next + 2 + delim.len()..];

            let mut part = Part {
                name: String::new(),
                filename: None,
                content_type: None,
                data,
            };
            for line in headers.split("\r\n") {
                if let Some(disposition) = line.strip_prefix("Content-Disposition: ") {
                    part.name = quoted_param(disposition, "; name=\"").unwrap();
                    part.filename = quoted_param(disposition, "; filename=\"");
                } else if let Some(ct) = line.strip_prefix("Content-Type: ") {
                    part.content_type = Some(ct.to_string());
                }
            }
            parts.push(part);
        }

        parts
    }
}
