use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::http::handler::{Handler, respond};
use crate::http::reader::ConnectionReader;
use crate::http::writer::ResponseWriter;

/// One accepted connection, driven through a single exchange.
pub struct Connection<S = TcpStream> {
    stream: S,
    reader: ConnectionReader,
    handler: Option<Arc<dyn Handler>>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Handling(String),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        handler: Option<Arc<dyn Handler>>,
        buffer_size: usize,
        read_timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            stream,
            reader: ConnectionReader::new(buffer_size, read_timeout)?,
            handler,
            state: ConnectionState::Reading,
        })
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the exchange to completion and closes the stream.
    ///
    /// The stream is shut down whether or not reading or writing failed; the
    /// failure is returned afterwards.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.exchange().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Shutdown after exchange failed");
        }
        self.state = ConnectionState::Closed;

        result
    }

    async fn exchange(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let text = self.reader.read_request(&mut self.stream).await?;
                    debug!(bytes = text.len(), "Request received");
                    self.state = ConnectionState::Handling(text);
                }

                ConnectionState::Handling(text) => {
                    let response = respond(self.handler.as_deref(), text);
                    info!(
                        status = response.status_code(),
                        reason = response.reason_phrase(),
                        "Responding"
                    );

                    self.state = ConnectionState::Responding(ResponseWriter::new(&response));
                }

                ConnectionState::Responding(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }
}
