//! Ferry - single-exchange HTTP server
//!
//! Accepts a connection, reads one request, hands it to an injected handler,
//! writes the response and closes the connection.

pub mod config;
pub mod http;
pub mod server;
