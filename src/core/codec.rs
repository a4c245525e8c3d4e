//! Tokio codec for framing RCON packets over a byte stream.
//!
//! The decoder implements the receive-buffer reassembly rule: a frame is
//! only consumed once all of its bytes have arrived, so arbitrary chunk
//! splits (including one byte at a time) never produce a partial parse.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::packet::Packet;
use crate::error::RconError;

pub struct PacketCodec;

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = RconError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, RconError> {
        match Packet::from_bytes(src) {
            Some((packet, consumed)) => {
                src.advance(consumed);
                Ok(Some(packet))
            }
            None => {
                // Not enough bytes yet; hint the expected frame size when
                // the length prefix is already readable.
                if src.len() >= 4 {
                    let length =
                        i32::from_le_bytes([src[0], src[1], src[2], src[3]]).max(0) as usize;
                    src.reserve((4 + length).saturating_sub(src.len()));
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = RconError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), RconError> {
        dst.extend_from_slice(&packet.to_bytes());
        Ok(())
    }
}
