//! In-process mock RCON server for integration tests.
//!
//! The server speaks the real wire format through `PacketCodec`; test
//! behavior is injected as a handler that maps each inbound packet to the
//! packets to write back (possibly none, possibly several, possibly out of
//! order).

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

use mc_rcon::core::codec::PacketCodec;
use mc_rcon::core::packet::{
    Packet, AUTH_FAILURE_ID, TYPE_AUTH, TYPE_AUTH_RESPONSE, TYPE_RESPONSE_VALUE,
};
use mc_rcon::RconConfig;

pub type Handler = dyn Fn(Packet) -> Vec<Packet> + Send + Sync;

/// Bind a mock server on an ephemeral port and serve connections with the
/// given handler until the test's runtime shuts down.
pub async fn spawn_server<F>(handler: F) -> SocketAddr
where
    F: Fn(Packet) -> Vec<Packet> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler: Arc<Handler> = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, PacketCodec);
                while let Some(Ok(packet)) = framed.next().await {
                    for reply in handler(packet.clone()) {
                        if framed.send(reply).await.is_err() {
                            return;
                        }
                    }
                }
            });
        }
    });

    addr
}

/// Successful AUTH_RESPONSE echoing the request id.
pub fn auth_ok(id: i32) -> Packet {
    Packet {
        id,
        ptype: TYPE_AUTH_RESPONSE,
        payload: String::new(),
    }
}

/// Server-generated authentication rejection (id = -1).
pub fn auth_rejected() -> Packet {
    Packet {
        id: AUTH_FAILURE_ID,
        ptype: TYPE_AUTH_RESPONSE,
        payload: String::new(),
    }
}

/// RESPONSE_VALUE reply to a command.
pub fn response(id: i32, payload: &str) -> Packet {
    Packet {
        id,
        ptype: TYPE_RESPONSE_VALUE,
        payload: payload.to_string(),
    }
}

/// Handler that accepts any password and answers commands from a fixed
/// command-to-reply table. Unknown commands get an "Unknown command" reply
/// so nothing ever times out by accident.
pub fn scripted(replies: &[(&str, &str)]) -> impl Fn(Packet) -> Vec<Packet> + Send + Sync {
    let table: HashMap<String, String> = replies
        .iter()
        .map(|(cmd, reply)| (cmd.to_string(), reply.to_string()))
        .collect();

    move |packet: Packet| {
        if packet.ptype == TYPE_AUTH {
            return vec![auth_ok(packet.id)];
        }
        let reply = table
            .get(&packet.payload)
            .cloned()
            .unwrap_or_else(|| "Unknown command".to_string());
        vec![response(packet.id, &reply)]
    }
}

/// Config pointing a session at the mock server, with a short deadline so
/// timeout tests stay fast.
pub fn test_config(addr: SocketAddr) -> RconConfig {
    RconConfig::default_with_overrides(|config| {
        config.host = addr.ip().to_string();
        config.port = addr.port();
        config.password = "hunter2".to_string();
        config.timeout = std::time::Duration::from_millis(500);
    })
}
