use crate::http::request::{Method, Request};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRequest => f.write_str("malformed request line"),
            ParseError::InvalidMethod => f.write_str("unknown request method"),
            ParseError::InvalidHeader => f.write_str("malformed header line"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the accumulated text of one request.
///
/// The reader has already decided the request is complete, so nothing here
/// waits for more input: a missing blank line means the whole text is the
/// head, and the body is whatever follows the blank line, whatever
/// `Content-Length` says.
pub fn parse_http_request(text: &str) -> Result<Request, ParseError> {
    let (head, body) = match text.find("\r\n\r\n") {
        Some(end) => (&text[..end], &text[end + 4..]),
        None => (text, ""),
    };

    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }

        headers.insert(key.to_string(), value.trim().to_string());
    }

    Ok(Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body.as_bytes().to_vec(),
    })
}
