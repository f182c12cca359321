/*
 *  protocol.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Payload -> headered, checksummed, 4 KiB-chunked packet sequence
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::payload::GifPayload;

/// Packet header size on the wire.
pub const PACKET_HEADER_LEN: usize = 16;

/// Payload bytes per chunk, headers excluded.
pub const CHUNK_PAYLOAD_MAX: usize = 4096;

const PROTOCOL_MARKER: u8 = 0x01;

// "display image" command tail, header bytes 13..16
const DISPLAY_OPCODE: [u8; 3] = [0x05, 0x00, 0x0D];

/// Position of a chunk within a transfer; the panel reassembles on this
/// flag alone, there are no sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFlag {
    /// First chunk of a transfer.
    First,
    /// Every subsequent chunk.
    Continuation,
}

impl ChunkFlag {
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::First => 0x00,
            Self::Continuation => 0x02,
        }
    }
}

/// The fixed 16-byte header prepended to every chunk.
///
/// `total_len` and `checksum` describe the whole payload and repeat
/// unchanged in every chunk of one transfer; only `chunk_len` and `flag`
/// vary per packet. All multi-byte fields are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Bytes in this packet, header included.
    pub chunk_len: u16,
    pub flag: ChunkFlag,
    /// Whole-transfer length field, see [`total_length`].
    pub total_len: u32,
    /// CRC-32 of the entire payload.
    pub checksum: u32,
}

impl PacketHeader {
    pub fn encode(&self) -> [u8; PACKET_HEADER_LEN] {
        let mut header = [0u8; PACKET_HEADER_LEN];
        header[0..2].copy_from_slice(&self.chunk_len.to_le_bytes());
        header[2] = PROTOCOL_MARKER;
        header[3] = 0x00;
        header[4] = self.flag.as_byte();
        header[5..9].copy_from_slice(&self.total_len.to_le_bytes());
        header[9..13].copy_from_slice(&self.checksum.to_le_bytes());
        header[13..16].copy_from_slice(&DISPLAY_OPCODE);
        header
    }
}

/// CRC-32 over the full payload; identical in every chunk of a transfer.
pub fn payload_checksum(payload: &[u8]) -> u32 {
    crc32fast::hash(payload)
}

/// The header's whole-transfer length field: payload length plus *twice*
/// the header length. The panel rejects transfers framed with a single
/// header's worth, so the doubled term is kept byte-exact even though the
/// format documentation never explains it.
pub fn total_length(payload_len: usize) -> u32 {
    (payload_len + 2 * PACKET_HEADER_LEN) as u32
}

/// Splits a payload into transport packets: 16-byte header plus at most
/// 4096 payload bytes each, emitted in ascending chunk order. Stripping
/// the headers and concatenating the chunks reconstructs the payload.
pub fn frame_payload(payload: &GifPayload) -> Vec<Vec<u8>> {
    let bytes = payload.bytes();
    let checksum = payload_checksum(bytes);
    let total_len = total_length(bytes.len());

    let mut packets = Vec::with_capacity(bytes.len().div_ceil(CHUNK_PAYLOAD_MAX));
    for (index, chunk) in bytes.chunks(CHUNK_PAYLOAD_MAX).enumerate() {
        let header = PacketHeader {
            chunk_len: (PACKET_HEADER_LEN + chunk.len()) as u16,
            flag: if index == 0 { ChunkFlag::First } else { ChunkFlag::Continuation },
            total_len,
            checksum,
        };
        let mut packet = Vec::with_capacity(PACKET_HEADER_LEN + chunk.len());
        packet.extend_from_slice(&header.encode());
        packet.extend_from_slice(chunk);
        packets.push(packet);
    }
    packets
}
