//! # Service Layer
//!
//! High-level operations over an authenticated session, and the uniform
//! tool-reply boundary exposed to the surrounding process.

pub mod commands;
pub mod tools;

pub use commands::{Commander, OpExecution, PlayerList, PlayerListReply, ServerInfo};
pub use tools::ToolReply;
