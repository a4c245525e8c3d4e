//! RCON transport session: one TCP connection, the authentication
//! handshake, and request/response correlation.
//!
//! A [`RconSession`] owns the socket exclusively. Commands are written from
//! the caller's task; a single dedicated reader task owns the decode half
//! and is the only code that resolves pending requests, so the receive
//! buffer and the pending map are never touched concurrently. Any number of
//! commands may be in flight at once over the one connection; each is
//! tracked by its request id and resolved independently, in whatever order
//! the server replies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument, warn};

use crate::config::RconConfig;
use crate::core::codec::PacketCodec;
use crate::core::packet::{Packet, AUTH_FAILURE_ID};
use crate::error::{RconError, Result};
use crate::utils::timeout::with_timeout;

/// Connection lifecycle. Only in `Ready` may application commands be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Authenticating = 2,
    Ready = 3,
}

impl From<u8> for ConnectionState {
    fn from(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Authenticating,
            3 => ConnectionState::Ready,
            _ => ConnectionState::Disconnected,
        }
    }
}

type PendingMap = HashMap<i32, oneshot::Sender<Result<String>>>;

/// State shared between the session handle and its reader task.
struct Shared {
    state: AtomicU8,
    authenticated: AtomicBool,
    /// Monotonically increasing request id counter, shared between the
    /// handshake and command traffic. Never reset while connected.
    next_id: AtomicI32,
    /// Id of the in-flight AUTH request, so a server-generated id = -1
    /// failure reply can be routed back to the handshake waiter.
    auth_id: AtomicI32,
    pending: Mutex<PendingMap>,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        self.state.load(Ordering::Acquire).into()
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn allocate_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Reject every outstanding request and clear the map.
    async fn fail_pending(&self, reason: fn() -> RconError) {
        let drained: Vec<_> = self.pending.lock().await.drain().collect();
        for (id, tx) in drained {
            debug!(id, "Rejecting in-flight request");
            let _ = tx.send(Err(reason()));
        }
    }
}

/// A client session against a single RCON endpoint.
///
/// All state lives behind this handle; nothing is global, so multiple
/// sessions against different servers can coexist in one process.
pub struct RconSession {
    config: RconConfig,
    shared: Arc<Shared>,
    writer: Mutex<Option<FramedWrite<OwnedWriteHalf, PacketCodec>>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
}

impl RconSession {
    pub fn new(config: RconConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                state: AtomicU8::new(ConnectionState::Disconnected as u8),
                authenticated: AtomicBool::new(false),
                next_id: AtomicI32::new(0),
                auth_id: AtomicI32::new(0),
                pending: Mutex::new(HashMap::new()),
            }),
            writer: Mutex::new(None),
            reader_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RconConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// True iff the handshake has completed and the socket is still open.
    pub fn is_connected(&self) -> bool {
        self.shared.authenticated.load(Ordering::Acquire)
            && self.shared.state() == ConnectionState::Ready
    }

    /// Open the TCP connection and perform the authentication handshake.
    ///
    /// The connect and the handshake each run under the configured timeout.
    /// A reply with id = -1 means the server rejected the password; the
    /// session is torn down and [`RconError::AuthenticationFailed`] is
    /// returned, leaving the state `Disconnected`.
    #[instrument(skip(self), fields(address = %self.config.address()))]
    pub async fn connect(&self) -> Result<()> {
        // A fresh connect supersedes any previous one.
        self.disconnect().await;

        self.shared.set_state(ConnectionState::Connecting);

        let stream = match with_timeout(
            async {
                TcpStream::connect(self.config.address())
                    .await
                    .map_err(RconError::from)
            },
            self.config.timeout,
        )
        .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.shared.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        let (read_half, write_half) = stream.into_split();
        *self.writer.lock().await = Some(FramedWrite::new(write_half, PacketCodec));

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(reader_loop(FramedRead::new(read_half, PacketCodec), shared));
        *self.reader_task.lock().await = Some(handle);

        self.shared.set_state(ConnectionState::Authenticating);

        match self.authenticate().await {
            Ok(()) => {
                self.shared.authenticated.store(true, Ordering::Release);
                self.shared.set_state(ConnectionState::Ready);
                info!("RCON session authenticated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "RCON handshake failed");
                self.disconnect().await;
                Err(e)
            }
        }
    }

    /// Send the AUTH packet and await its correlated reply.
    async fn authenticate(&self) -> Result<()> {
        let id = self.shared.allocate_id();
        self.shared.auth_id.store(id, Ordering::Release);

        let rx = self.register(id).await;
        if let Err(e) = self.write_packet(Packet::auth(id, &self.config.password)).await {
            self.shared.pending.lock().await.remove(&id);
            return Err(e);
        }

        let outcome = match tokio::time::timeout(self.config.timeout, rx).await {
            Ok(Ok(result)) => result.map(|_| ()),
            Ok(Err(_)) => Err(RconError::ConnectionClosed),
            Err(_) => {
                self.shared.pending.lock().await.remove(&id);
                Err(RconError::Timeout)
            }
        };

        self.shared.auth_id.store(0, Ordering::Release);
        outcome
    }

    /// Execute one command and await its reply payload.
    ///
    /// Fails fast with [`RconError::NotConnected`] unless the session is
    /// `Ready`. Each call gets a distinct request id; concurrent calls are
    /// resolved independently even when the server replies out of order.
    /// On timeout the pending entry is removed, so a late reply finds no
    /// waiter and is dropped by the reader.
    #[instrument(skip(self), fields(command = %command))]
    pub async fn send(&self, command: &str) -> Result<String> {
        if !self.is_connected() {
            return Err(RconError::NotConnected);
        }

        let id = self.shared.allocate_id();
        let rx = self.register(id).await;

        if let Err(e) = self.write_packet(Packet::exec_command(id, command)).await {
            self.shared.pending.lock().await.remove(&id);
            return Err(e);
        }
        debug!(id, "Command sent");

        match tokio::time::timeout(self.config.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(RconError::ConnectionClosed),
            Err(_) => {
                self.shared.pending.lock().await.remove(&id);
                debug!(id, "Command timed out");
                Err(RconError::Timeout)
            }
        }
    }

    /// Close the socket and release all resources.
    ///
    /// Outstanding requests are rejected immediately with
    /// [`RconError::ConnectionClosed`] rather than being left to their
    /// individual timeout timers.
    pub async fn disconnect(&self) {
        if let Some(handle) = self.reader_task.lock().await.take() {
            handle.abort();
        }
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = writer.close().await;
        }
        self.shared.authenticated.store(false, Ordering::Release);
        self.shared.set_state(ConnectionState::Disconnected);
        self.shared.fail_pending(|| RconError::ConnectionClosed).await;
    }

    async fn register(&self, id: i32) -> oneshot::Receiver<Result<String>> {
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().await.insert(id, tx);
        rx
    }

    async fn write_packet(&self, packet: Packet) -> Result<()> {
        let mut guard = self.writer.lock().await;
        match guard.as_mut() {
            Some(writer) => writer.send(packet).await,
            None => Err(RconError::NotConnected),
        }
    }
}

/// Dedicated reader: decodes frames off the socket and resolves the
/// matching pending request. Runs until the socket errors or closes, then
/// marks the session disconnected and rejects whatever is still in flight.
async fn reader_loop(mut framed: FramedRead<OwnedReadHalf, PacketCodec>, shared: Arc<Shared>) {
    while let Some(next) = framed.next().await {
        match next {
            Ok(packet) => route_reply(&shared, packet).await,
            Err(e) => {
                warn!(error = %e, "Socket read failed");
                break;
            }
        }
    }

    debug!("Reader task exiting, connection closed");
    shared.authenticated.store(false, Ordering::Release);
    shared.set_state(ConnectionState::Disconnected);
    shared.fail_pending(|| RconError::ConnectionClosed).await;
}

/// Match one decoded packet against the pending map.
///
/// EXEC_COMMAND replies and AUTH_RESPONSE share the numeric type 2, so a
/// reply's meaning is decided by which pending entry its id matches (the
/// handshake waiter while authenticating, a command waiter once ready),
/// never by the type field alone. A reply with id = -1 is the server's
/// authentication rejection and routes to the handshake waiter.
async fn route_reply(shared: &Shared, packet: Packet) {
    if !packet.is_auth_response() && !packet.is_response_value() {
        debug!(id = packet.id, ptype = packet.ptype, "Ignoring unknown packet type");
        return;
    }

    let (key, result) = if packet.id == AUTH_FAILURE_ID {
        (
            shared.auth_id.load(Ordering::Acquire),
            Err(RconError::AuthenticationFailed),
        )
    } else {
        (packet.id, Ok(packet.payload))
    };

    match shared.pending.lock().await.remove(&key) {
        Some(tx) => {
            // Receiver may have timed out between our lookup and this send.
            let _ = tx.send(result);
        }
        None => {
            // Stray or duplicate reply; nobody is waiting for it.
            debug!(id = packet.id, "Dropping unmatched reply");
        }
    }
}
