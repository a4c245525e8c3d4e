//! # Core Protocol Components
//!
//! Low-level RCON packet handling and framing.
//!
//! ## Components
//! - **Packet**: the RCON frame (request id, type, free-text payload)
//! - **Codec**: tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Length(4, LE)] [RequestId(4, LE)] [Type(4, LE)] [Payload(N)] [0x00 0x00]
//! ```

pub mod codec;
pub mod packet;
