//! HTTP protocol implementation.
//!
//! Every connection carries exactly one request and one response.
//!
//! # Architecture
//!
//! - **`connection`**: drives one connection through the exchange state machine
//! - **`reader`**: accumulates request bytes until the framing heuristic fires
//! - **`parser`**: turns the accumulated text into a [`request::Request`]
//! - **`handler`**: the injected handler and the mapping of its outcomes
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until a short read
//!        └──────┬──────┘
//!               │ Request text received
//!               ▼
//!        ┌──────────────────┐
//!        │    Handling      │ ← Parse, run the handler, map failures
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Always
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! A read or write failure skips straight to `Closed`; the stream is shut
//! down either way.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ferry::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8088").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, None, 256, None)?;
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod handler;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
