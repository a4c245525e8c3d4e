//! RCON packet type and binary wire format.
//!
//! Wire layout (all integers little-endian):
//! ```text
//! [Length(4)] [RequestId(4)] [Type(4)] [Payload(N)] [0x00] [0x00]
//! ```
//! `Length` counts everything after itself: 4 (id) + 4 (type) + N + 2.

use bytes::{BufMut, BytesMut};

/// Client-to-server authentication request carrying the shared password.
pub const TYPE_AUTH: i32 = 3;

/// Server reply to an AUTH packet. Numerically identical to
/// [`TYPE_EXEC_COMMAND`]; the connection phase decides which meaning applies.
pub const TYPE_AUTH_RESPONSE: i32 = 2;

/// Client-to-server command execution request.
pub const TYPE_EXEC_COMMAND: i32 = 2;

/// Server reply to an EXEC_COMMAND packet.
pub const TYPE_RESPONSE_VALUE: i32 = 0;

/// Request id the server uses to signal a failed authentication.
pub const AUTH_FAILURE_ID: i32 = -1;

/// Smallest legal value of the length field: id + type + two trailing NULs.
pub const MIN_PACKET_LENGTH: usize = 10;

/// A single RCON frame.
///
/// Replies echo the id of the originating request, which is what the
/// session layer correlates on. The payload is free text; the protocol has
/// no structured response format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub ptype: i32,
    pub payload: String,
}

impl Packet {
    pub fn auth(id: i32, password: &str) -> Self {
        Self {
            id,
            ptype: TYPE_AUTH,
            payload: password.to_string(),
        }
    }

    pub fn exec_command(id: i32, command: &str) -> Self {
        Self {
            id,
            ptype: TYPE_EXEC_COMMAND,
            payload: command.to_string(),
        }
    }

    pub fn is_auth_response(&self) -> bool {
        self.ptype == TYPE_AUTH_RESPONSE
    }

    pub fn is_response_value(&self) -> bool {
        self.ptype == TYPE_RESPONSE_VALUE
    }

    /// Serialize into the length-prefixed wire frame.
    pub fn to_bytes(&self) -> BytesMut {
        let payload = self.payload.as_bytes();
        let length = MIN_PACKET_LENGTH + payload.len();

        let mut buf = BytesMut::with_capacity(4 + length);
        buf.put_i32_le(length as i32);
        buf.put_i32_le(self.id);
        buf.put_i32_le(self.ptype);
        buf.put_slice(payload);
        buf.put_u8(0);
        buf.put_u8(0);
        buf
    }

    /// Try to parse one frame from the front of `buf`.
    ///
    /// Returns `None` while the buffer holds less than a complete frame
    /// (fewer than 4 bytes, or fewer than `4 + length` bytes). On success
    /// returns the packet together with the total number of bytes the frame
    /// occupied, so the caller can drop exactly that prefix.
    ///
    /// Parsing is best-effort: malformed UTF-8 decodes lossily and a length
    /// field smaller than [`MIN_PACKET_LENGTH`] yields an empty payload.
    /// Framing only ever "fails" because more bytes are still in flight.
    pub fn from_bytes(buf: &[u8]) -> Option<(Self, usize)> {
        if buf.len() < 4 {
            return None;
        }

        let length = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]).max(0) as usize;
        let total = 4 + length;
        // The id and type fields must be readable even when a degenerate
        // length field claims a shorter frame.
        if buf.len() < total || buf.len() < 12 {
            return None;
        }

        let id = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let ptype = i32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);

        // Payload spans offset 12 up to the two trailing NULs.
        let payload_end = total.saturating_sub(2).max(12);
        let payload = String::from_utf8_lossy(&buf[12..payload_end]).into_owned();

        Some((Self { id, ptype, payload }, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encode_layout() {
        let pkt = Packet::exec_command(7, "list");
        let bytes = pkt.to_bytes();

        // length = 4 + 4 + 4 + 2 = 14
        assert_eq!(&bytes[0..4], &14i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &7i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..16], b"list");
        assert_eq!(&bytes[16..18], &[0, 0]);
    }

    #[test]
    fn roundtrip() {
        let pkt = Packet::auth(1, "sekret");
        let bytes = pkt.to_bytes();
        let (decoded, consumed) = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, pkt);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn roundtrip_empty_payload() {
        let pkt = Packet {
            id: 42,
            ptype: TYPE_RESPONSE_VALUE,
            payload: String::new(),
        };
        let bytes = pkt.to_bytes();
        assert_eq!(bytes.len(), 4 + MIN_PACKET_LENGTH);
        let (decoded, _) = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.payload, "");
    }

    #[test]
    fn incomplete_header() {
        assert!(Packet::from_bytes(&[0x0e, 0x00, 0x00]).is_none());
    }

    #[test]
    fn incomplete_body() {
        let bytes = Packet::exec_command(3, "tps").to_bytes();
        for cut in 0..bytes.len() {
            assert!(Packet::from_bytes(&bytes[..cut]).is_none(), "cut at {cut}");
        }
        assert!(Packet::from_bytes(&bytes).is_some());
    }

    #[test]
    fn auth_failure_id_roundtrips() {
        let pkt = Packet {
            id: AUTH_FAILURE_ID,
            ptype: TYPE_AUTH_RESPONSE,
            payload: String::new(),
        };
        let (decoded, _) = Packet::from_bytes(&pkt.to_bytes()).unwrap();
        assert_eq!(decoded.id, -1);
        assert!(decoded.is_auth_response());
    }

    #[test]
    fn lossy_utf8_payload() {
        let mut bytes = Packet::exec_command(9, "ok").to_bytes().to_vec();
        // Corrupt a payload byte into an invalid UTF-8 sequence.
        bytes[12] = 0xFF;
        let (decoded, _) = Packet::from_bytes(&bytes).unwrap();
        assert!(decoded.payload.contains('\u{FFFD}'));
    }

    #[test]
    fn undersized_length_yields_empty_payload() {
        // length = 8 claims a frame too short to carry the trailing NULs.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&8i32.to_le_bytes());
        bytes.extend_from_slice(&5i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        let (decoded, consumed) = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.payload, "");
        assert_eq!(consumed, 12);
    }
}
