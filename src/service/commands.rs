//! High-level server operations built on the transport session.
//!
//! The RCON protocol has no structured responses; everything here is
//! regex/substring interpretation of free text, with fallback to the raw
//! reply when a parse fails. Business-logic outcomes (empty reply,
//! unparseable list, ambiguous operator) are values, never errors; only
//! transport failures propagate as `Err`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::protocol::RconSession;

/// Placeholder returned when a command reply carries no text at all.
pub const EMPTY_REPLY: &str = "(empty response)";

/// Placeholder for admin commands many servers acknowledge with empty text.
pub const DONE_REPLY: &str = "Done";

/// Failure marker in the reply to an `execute if entity` probe.
const NO_ENTITY_MARKER: &str = "No entity was found";

/// Success marker in the reply to an `execute if entity` probe.
const TEST_PASSED_MARKER: &str = "Test passed";

#[allow(clippy::expect_used)]
static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"There are (\d+) of a max of (\d+) players online:(.*)")
        .expect("player list pattern is valid")
});

/// Structured result of a successful `list` parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerList {
    pub online: u32,
    pub max: u32,
    pub players: Vec<String>,
}

/// Outcome of `list_players`: parsed when the reply matches the known
/// format, otherwise the raw text passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerListReply {
    Players(PlayerList),
    Raw(String),
}

/// TPS and version strings, fetched concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub tps: String,
    pub version: String,
}

/// Outcome of `execute_as_op`'s operator selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpExecution {
    Executed { operator: String, reply: String },
    NoOperatorOnline,
    Ambiguous(Vec<String>),
}

/// Command orchestrator over one [`RconSession`].
#[derive(Clone)]
pub struct Commander {
    session: Arc<RconSession>,
}

impl Commander {
    pub fn new(session: Arc<RconSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &RconSession {
        &self.session
    }

    /// Execute an arbitrary command, substituting a placeholder for an
    /// empty reply.
    pub async fn execute(&self, command: &str) -> Result<String> {
        let reply = self.session.send(command).await?;
        Ok(if reply.is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply
        })
    }

    /// List online players, parsing the server's summary line.
    pub async fn list_players(&self) -> Result<PlayerListReply> {
        let reply = self.session.send("list").await?;
        Ok(parse_player_list(&reply))
    }

    /// Fetch TPS and version with two concurrent requests.
    pub async fn server_info(&self) -> Result<ServerInfo> {
        let (tps, version) = tokio::try_join!(self.session.send("tps"), self.session.send("version"))?;
        Ok(ServerInfo { tps, version })
    }

    /// Send an admin command, substituting the "Done" placeholder for the
    /// empty reply many servers send on success.
    async fn admin(&self, command: String) -> Result<String> {
        let reply = self.session.send(&command).await?;
        Ok(if reply.is_empty() {
            DONE_REPLY.to_string()
        } else {
            reply
        })
    }

    pub async fn whitelist_add(&self, player: &str) -> Result<String> {
        self.admin(format!("whitelist add {player}")).await
    }

    pub async fn whitelist_remove(&self, player: &str) -> Result<String> {
        self.admin(format!("whitelist remove {player}")).await
    }

    pub async fn op(&self, player: &str) -> Result<String> {
        self.admin(format!("op {player}")).await
    }

    pub async fn deop(&self, player: &str) -> Result<String> {
        self.admin(format!("deop {player}")).await
    }

    /// Find which online players hold operator status.
    ///
    /// One probe per online player, sequentially; the server has no bulk
    /// query for this, so the cost is O(players) round trips.
    #[instrument(skip(self))]
    pub async fn online_ops(&self) -> Result<Vec<String>> {
        let players = match self.list_players().await? {
            PlayerListReply::Players(list) => list.players,
            PlayerListReply::Raw(_) => Vec::new(),
        };

        let mut ops = Vec::new();
        for player in players {
            let reply = self
                .session
                .send(&format!("execute if entity @a[name={player},operator=true]"))
                .await?;
            if probe_indicates_op(&reply) {
                debug!(player = %player, "Operator probe matched");
                ops.push(player);
            }
        }
        Ok(ops)
    }

    /// Run a command as an online operator.
    ///
    /// Selection order: explicit `op` argument, else the configured
    /// default operator, else auto-detect via [`Self::online_ops`]. An
    /// explicitly supplied operator is used as-is, with no check that it
    /// is actually online. Auto-detection with zero or multiple
    /// candidates does not execute anything and reports the condition as
    /// a value.
    #[instrument(skip(self, command))]
    pub async fn execute_as_op(&self, command: &str, op: Option<&str>) -> Result<OpExecution> {
        let configured = self.session.config().default_op.clone();
        let operator = match op.map(str::to_string).or(configured) {
            Some(name) => name,
            None => {
                let mut ops = self.online_ops().await?;
                match ops.len() {
                    0 => return Ok(OpExecution::NoOperatorOnline),
                    1 => ops.remove(0),
                    _ => return Ok(OpExecution::Ambiguous(ops)),
                }
            }
        };

        let reply = self
            .execute(&format!("execute as {operator} run {command}"))
            .await?;
        Ok(OpExecution::Executed { operator, reply })
    }
}

/// Parse the `list` reply, falling back to raw text on any mismatch.
pub fn parse_player_list(reply: &str) -> PlayerListReply {
    let Some(caps) = LIST_RE.captures(reply) else {
        return PlayerListReply::Raw(reply.to_string());
    };

    let (Ok(online), Ok(max)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return PlayerListReply::Raw(reply.to_string());
    };

    let names = caps[3].trim();
    let players = if names.is_empty() {
        Vec::new()
    } else {
        names
            .split(", ")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    };

    PlayerListReply::Players(PlayerList { online, max, players })
}

/// Classify an `execute if entity` probe reply.
///
/// A player counts as an operator when the reply carries the success
/// marker, or simply lacks the no-entities failure marker. Heuristic, but
/// the protocol offers nothing better.
pub fn probe_indicates_op(reply: &str) -> bool {
    reply.contains(TEST_PASSED_MARKER) || !reply.contains(NO_ENTITY_MARKER)
}
