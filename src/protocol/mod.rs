//! # Protocol Layer
//!
//! Stateful connection handling: the transport session, the
//! authentication handshake, and request/response correlation.

pub mod session;

pub use session::{ConnectionState, RconSession};
