//! # Utility Modules
//!
//! Supporting utilities for logging and timing.
//!
//! ## Components
//! - **Logging**: structured logging configuration
//! - **Timeout**: async timeout wrappers and default durations

pub mod logging;
pub mod timeout;
