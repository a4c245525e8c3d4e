//! # Error Types
//!
//! Error handling for the RCON client.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from socket-level I/O failures to the domain-specific
//! operator-selection failures of `execute_as_op`.
//!
//! ## Error Categories
//! - **I/O Errors**: connect failures, writes on a dead socket
//! - **Protocol Errors**: authentication rejection, timeouts
//! - **State Errors**: commands attempted while not connected
//! - **Domain Errors**: operator selection (no operator online, ambiguous)
//!
//! Transport errors reject the in-flight request and surface to the caller;
//! they are never retried or swallowed inside the core. Business-logic
//! outcomes (empty reply, unparseable list, ambiguous operator) are *not*
//! errors; the service layer returns them as values so the tool boundary
//! can render uniform results.

use std::io;
use thiserror::Error;

/// Error message constants shared by the session and tool layers.
pub mod constants {
    pub const ERR_NOT_CONNECTED: &str = "Not connected to RCON server";
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed";
    pub const ERR_AUTH_FAILED: &str = "RCON authentication failed (bad password)";
    pub const ERR_TIMEOUT: &str = "Operation timed out";
    pub const ERR_NO_OPERATOR: &str = "No operators online";
    pub const ERR_AMBIGUOUS_OPERATOR: &str = "Ambiguous operator, specify one of";
}

/// Primary error type for all RCON operations.
#[derive(Error, Debug)]
pub enum RconError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", constants::ERR_AUTH_FAILED)]
    AuthenticationFailed,

    #[error("{}", constants::ERR_TIMEOUT)]
    Timeout,

    #[error("{}", constants::ERR_NOT_CONNECTED)]
    NotConnected,

    #[error("{}", constants::ERR_CONNECTION_CLOSED)]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", constants::ERR_NO_OPERATOR)]
    NoOperatorOnline,

    #[error("{}: {}", constants::ERR_AMBIGUOUS_OPERATOR, .0.join(", "))]
    AmbiguousOperator(Vec<String>),
}

/// Type alias for Results using RconError
pub type Result<T> = std::result::Result<T, RconError>;
