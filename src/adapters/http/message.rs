use crate::utils::error::{LeadError, Result};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Headers plus body, 64 KiB. A contact form never gets close.
pub const MAX_REQUEST_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 4096;

/// Parsed HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Parses a complete request (head and full body) from bytes.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let headers_end = find_headers_end(buf).ok_or_else(|| http_error("Incomplete HTTP request"))?;
        let head = std::str::from_utf8(&buf[..headers_end])
            .map_err(|_| http_error("Invalid UTF-8 in headers"))?;

        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or_else(|| http_error("Empty request"))?;
        let (method, path) = parse_request_line(request_line)?;

        let mut headers = Vec::new();
        for line in lines.filter(|line| !line.is_empty()) {
            headers.push(parse_header_line(line)?);
        }

        let content_length = content_length(&headers)?;
        let body_start = headers_end + 4;
        let available = buf.len() - body_start;
        if available < content_length {
            return Err(http_error(&format!(
                "Incomplete body: expected {}, got {}",
                content_length, available
            )));
        }

        Ok(HttpRequest {
            method,
            path,
            headers,
            body: buf[body_start..body_start + content_length].to_vec(),
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reads exactly one request from `reader`, enforcing `limit` on the total size.
pub async fn read_request<R>(reader: &mut R, limit: usize) -> Result<HttpRequest>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    let mut expected_len: Option<usize> = None;

    loop {
        if expected_len.is_none() {
            if let Some(headers_end) = find_headers_end(&buf) {
                let declared = declared_body_length(&buf[..headers_end])?;
                expected_len = Some(headers_end + 4 + declared);
            } else if buf.len() > limit {
                return Err(LeadError::PayloadTooLarge { limit });
            }
        }

        if let Some(expected) = expected_len {
            if expected > limit {
                return Err(LeadError::PayloadTooLarge { limit });
            }
            if buf.len() >= expected {
                return HttpRequest::parse(&buf[..expected]);
            }
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(http_error("Connection closed before the request was complete"));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// HTTP response builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status)
                .with_header("Content-Type", "application/json")
                .with_body(body),
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self::new(500)
                    .with_header("Content-Type", "application/json")
                    .with_body(br#"{"error":"Internal server error"}"#.to_vec())
            }
        }
    }

    pub fn html(status: u16, markup: String) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(markup.into_bytes())
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes the response. Every connection is closed after one exchange.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256 + self.body.len());

        buf.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", self.status, status_text(self.status)).as_bytes(),
        );
        buf.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        for (name, value) in &self.headers {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"Connection: close\r\n\r\n");
        buf.extend_from_slice(&self.body);
        buf
    }
}

pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn http_error(message: &str) -> LeadError {
    LeadError::HttpError {
        message: message.to_string(),
    }
}

/// end of HTTP headers (\r\n\r\n).
fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

fn declared_body_length(head: &[u8]) -> Result<usize> {
    let head = std::str::from_utf8(head).map_err(|_| http_error("Invalid UTF-8 in headers"))?;
    let mut headers = Vec::new();
    for line in head.split("\r\n").skip(1).filter(|line| !line.is_empty()) {
        headers.push(parse_header_line(line)?);
    }
    content_length(&headers)
}

fn content_length(headers: &[(String, String)]) -> Result<usize> {
    if headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("transfer-encoding"))
    {
        return Err(http_error("Chunked request bodies are not supported"));
    }

    match headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
    {
        Some((_, value)) => value
            .parse()
            .map_err(|_| http_error(&format!("Invalid Content-Length: {}", value))),
        None => Ok(0),
    }
}

/// parse HTTP request line (e.g., "POST /api/lead HTTP/1.1").
fn parse_request_line(line: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 || !parts[2].starts_with("HTTP/1.") {
        return Err(http_error(&format!("Invalid request line: {}", line)));
    }

    let target = parts[1];
    let path = target.split('?').next().unwrap_or(target);
    if !path.starts_with('/') {
        return Err(http_error(&format!("Invalid request target: {}", target)));
    }

    Ok((parts[0].to_string(), path.to_string()))
}

/// parse HTTP header line (e.g., "Content-Type: application/json").
fn parse_header_line(line: &str) -> Result<(String, String)> {
    let pos = line
        .find(':')
        .ok_or_else(|| http_error(&format!("Invalid header: {}", line)))?;

    let name = line[..pos].trim();
    if name.is_empty() {
        return Err(http_error(&format!("Invalid header: {}", line)));
    }

    Ok((name.to_string(), line[pos + 1..].trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_post() {
        let raw = b"POST /api/lead?src=ad HTTP/1.1\r\nContent-Length: 5\r\nX-Forwarded-For: 1.2.3.4\r\n\r\nHello";
        let req = HttpRequest::parse(raw).unwrap();

        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/lead");
        assert_eq!(req.body, b"Hello");
        assert_eq!(req.header("x-forwarded-for"), Some("1.2.3.4"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(HttpRequest::parse(b"POST / HTTP/1.1\r\n").is_err());
        assert!(HttpRequest::parse(b"HELLO\r\n\r\n").is_err());
        assert!(HttpRequest::parse(b"GET / HTTP/1.1\r\nNoColon\r\n\r\n").is_err());
        assert!(HttpRequest::parse(b"POST / HTTP/1.1\r\nContent-Length: x\r\n\r\n").is_err());
        assert!(HttpRequest::parse(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nHello").is_err());
    }

    #[tokio::test]
    async fn test_read_request_waits_for_full_body() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let writer = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            client
                .write_all(b"POST /api/lead HTTP/1.1\r\nContent-Length: 11\r\n\r\n")
                .await
                .unwrap();
            client.write_all(b"hello ").await.unwrap();
            client.write_all(b"world").await.unwrap();
            client
        });

        let req = read_request(&mut server, MAX_REQUEST_SIZE).await.unwrap();
        assert_eq!(req.body, b"hello world");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_request_limits() {
        let mut oversized: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 999999\r\n\r\n";
        let err = read_request(&mut oversized, MAX_REQUEST_SIZE).await.unwrap_err();
        assert!(matches!(err, LeadError::PayloadTooLarge { .. }));

        let mut truncated: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let err = read_request(&mut truncated, MAX_REQUEST_SIZE).await.unwrap_err();
        assert!(matches!(err, LeadError::HttpError { .. }));

        let mut endless_head = vec![b'a'; MAX_REQUEST_SIZE + READ_CHUNK];
        endless_head.splice(0..0, b"GET / HTTP/1.1\r\nX: ".iter().copied());
        let mut reader: &[u8] = &endless_head;
        let err = read_request(&mut reader, MAX_REQUEST_SIZE).await.unwrap_err();
        assert!(matches!(err, LeadError::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_read_request_rejects_chunked() {
        let mut chunked: &[u8] =
            b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n";
        let err = read_request(&mut chunked, MAX_REQUEST_SIZE).await.unwrap_err();
        assert!(matches!(err, LeadError::HttpError { .. }));
    }

    #[test]
    fn test_response_build() {
        let resp = HttpResponse::json(200, &serde_json::json!({"status": "ok"}))
            .with_header("RateLimit-Limit", "15");
        let text = String::from_utf8(resp.build()).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Content-Length: 15\r\n"));
        assert!(text.contains("RateLimit-Limit: 15\r\n"));
        assert!(text.contains("Connection: close\r\n\r\n"));
        assert!(text.ends_with(r#"{"status":"ok"}"#));
    }
}
