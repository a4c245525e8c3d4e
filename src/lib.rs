//! # mc-rcon
//!
//! Async RCON client and command toolkit for Minecraft-compatible game
//! servers.
//!
//! The crate is organised in layers, leaves first:
//! - [`core`]: pure packet encode/decode and the tokio framing codec
//! - [`protocol`]: the transport session: one TCP connection, the
//!   password handshake, and request/response correlation by id
//! - [`service`]: command orchestration (player listing, whitelist and
//!   operator management, execute-as-operator) plus the uniform tool
//!   boundary for embedding processes
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use mc_rcon::{Commander, RconConfig, RconSession};
//!
//! # async fn run() -> mc_rcon::Result<()> {
//! let config = RconConfig::from_env()?;
//! config.validate_strict()?;
//!
//! let session = Arc::new(RconSession::new(config));
//! session.connect().await?;
//!
//! let commander = Commander::new(Arc::clone(&session));
//! let players = commander.list_players().await?;
//! println!("{players:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod utils;

pub use crate::core::packet::Packet;
pub use config::RconConfig;
pub use error::{RconError, Result};
pub use protocol::{ConnectionState, RconSession};
pub use service::{Commander, OpExecution, PlayerList, PlayerListReply, ServerInfo, ToolReply};
