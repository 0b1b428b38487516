use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response into the bytes written to the client.
///
/// `Content-Length` is added unless the response already carries it.
/// `Connection: close` always replaces whatever the handler set; the
/// connection is closed after this response. Header order follows the
/// response's name order, so equal responses serialize to equal bytes.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let body = resp.body_bytes();
    let mut buf = Vec::with_capacity(128 + body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status_code(),
        resp.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    let mut headers: Vec<(&str, String)> = resp
        .headers
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case("Connection"))
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    if !resp.has_header("Content-Length") {
        headers.push(("Content-Length", body.len().to_string()));
    }
    headers.push(("Connection", "close".to_string()));
    headers.sort_by(|a, b| a.0.cmp(b.0));

    for (k, v) in &headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
