/*
 *  session.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Paced delivery of a framed packet sequence over the link
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

use std::time::Duration;

use log::debug;
use tokio::time::sleep;

use crate::error::BeamError;
use crate::payload::GifPayload;
use crate::protocol;
use crate::transport::Transport;

/// Pacing between successive chunk writes. The panel's receive buffer
/// drops data when chunks arrive faster than this.
pub const CHUNK_PACING: Duration = Duration::from_millis(500);

/// What a completed transfer wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    bytes_written: usize,
    chunks_written: usize,
}

impl TransferReceipt {
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn chunks_written(&self) -> usize {
        self.chunks_written
    }
}

/// One payload transmission: owns the framed packet sequence for its
/// lifetime and writes it out in ascending chunk order.
///
/// The session holds `&mut` access to the link while running, so no other
/// command can interleave with a transfer on the same connection. Pacing is
/// an awaited timer, never a thread block. There is no resume: any failure
/// aborts, and the caller restarts the whole transfer.
pub struct TransferSession {
    packets: Vec<Vec<u8>>,
    pacing: Duration,
}

impl TransferSession {
    /// Frames `payload` for transport with the default [`CHUNK_PACING`].
    pub fn new(payload: &GifPayload) -> Self {
        Self { packets: protocol::frame_payload(payload), pacing: CHUNK_PACING }
    }

    /// Overrides the inter-chunk pacing. Zero disables the wait entirely
    /// (tests, loopback links).
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    /// Writes every packet to the link, one write per packet, pacing
    /// between successive writes.
    ///
    /// Fails with [`BeamError::NotConnected`] before any write when the
    /// link is down, and with [`BeamError::Transfer`] (carrying the chunk
    /// index) when a write fails mid-sequence.
    pub async fn run<T: Transport>(self, link: &mut T) -> Result<TransferReceipt, BeamError> {
        if !link.is_connected() {
            return Err(BeamError::NotConnected);
        }

        let total = self.packets.len();
        let mut bytes_written = 0usize;
        for (index, packet) in self.packets.iter().enumerate() {
            link.write(packet)
                .await
                .map_err(|source| BeamError::Transfer { chunk_index: index, source })?;
            bytes_written += packet.len();
            debug!("chunk {}/{} written ({} bytes)", index + 1, total, packet.len());

            if index + 1 < total && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }
        }

        Ok(TransferReceipt { bytes_written, chunks_written: total })
    }
}
