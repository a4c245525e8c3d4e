//! Uniform tool boundary for the surrounding process.
//!
//! Each operation maps one-to-one onto a [`Commander`] method and always
//! completes with a [`ToolReply`]: success text, or an error-flagged text.
//! No error type escapes this layer, so the adapter that exposes these
//! operations can render transport failures and logical failures the same
//! way.

use tracing::error;

use crate::service::commands::{Commander, OpExecution, PlayerListReply};
use crate::RconError;

/// Tool names the surrounding process exposes, one per operation.
pub const TOOL_NAMES: &[&str] = &[
    "mc_execute_command",
    "mc_list_players",
    "mc_get_server_info",
    "mc_whitelist_add",
    "mc_whitelist_remove",
    "mc_op",
    "mc_deop",
    "mc_execute_as_op",
];

/// The uniform result payload: free text plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn err(text: impl Into<String>) -> Self {
        let text = text.into();
        error!(reason = %text, "Tool call failed");
        Self {
            text,
            is_error: true,
        }
    }
}

pub async fn execute_command(cmd: &Commander, command: &str) -> ToolReply {
    match cmd.execute(command).await {
        Ok(text) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn list_players(cmd: &Commander) -> ToolReply {
    match cmd.list_players().await {
        Ok(PlayerListReply::Players(list)) => match serde_json::to_string_pretty(&list) {
            Ok(json) => ToolReply::ok(json),
            Err(e) => ToolReply::err(e.to_string()),
        },
        Ok(PlayerListReply::Raw(text)) if text.is_empty() => {
            ToolReply::ok("Failed to parse player list")
        }
        Ok(PlayerListReply::Raw(text)) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn get_server_info(cmd: &Commander) -> ToolReply {
    match cmd.server_info().await {
        Ok(info) => match serde_json::to_string_pretty(&info) {
            Ok(json) => ToolReply::ok(json),
            Err(e) => ToolReply::err(e.to_string()),
        },
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn whitelist_add(cmd: &Commander, player: &str) -> ToolReply {
    match cmd.whitelist_add(player).await {
        Ok(text) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn whitelist_remove(cmd: &Commander, player: &str) -> ToolReply {
    match cmd.whitelist_remove(player).await {
        Ok(text) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn op_player(cmd: &Commander, player: &str) -> ToolReply {
    match cmd.op(player).await {
        Ok(text) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn deop_player(cmd: &Commander, player: &str) -> ToolReply {
    match cmd.deop(player).await {
        Ok(text) => ToolReply::ok(text),
        Err(e) => ToolReply::err(e.to_string()),
    }
}

pub async fn execute_as_op(cmd: &Commander, command: &str, op: Option<&str>) -> ToolReply {
    match cmd.execute_as_op(command, op).await {
        Ok(OpExecution::Executed { reply, .. }) => ToolReply::ok(reply),
        Ok(OpExecution::NoOperatorOnline) => ToolReply::err(RconError::NoOperatorOnline.to_string()),
        Ok(OpExecution::Ambiguous(names)) => {
            ToolReply::err(RconError::AmbiguousOperator(names).to_string())
        }
        Err(e) => ToolReply::err(e.to_string()),
    }
}
