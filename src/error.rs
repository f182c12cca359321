/*
 *  error.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the encoder and transfer pipeline
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

use thiserror::Error;

use crate::transport::TransportError;

/// Everything that can go wrong between source media and the panel.
///
/// All variants are terminal for the operation that raised them; retry
/// policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum BeamError {
    /// The source bytes did not decode as any supported image format.
    #[error("undecodable source image: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// The source decoded but yielded no frames.
    #[error("source media contains no frames")]
    NoFrames,

    /// A frame buffer with the wrong pixel count was offered to the panel model.
    #[error("frame buffer holds {actual} pixels, the panel needs {expected}")]
    BadFrameSize { expected: usize, actual: usize },

    /// Marquee text must contain at least one character.
    #[error("text must not be empty")]
    EmptyText,

    /// A fill color that does not parse as #RRGGBB.
    #[error("malformed color {0:?}, expected #RRGGBB")]
    BadColor(String),

    /// An operation needing a live link was attempted while disconnected.
    #[error("not connected to a panel")]
    NotConnected,

    /// The requested address did not show up in the connect-time scan.
    #[error("device {address} not found during connect scan")]
    DeviceNotFound { address: String },

    /// A chunk write failed mid-session. The transfer is aborted and the
    /// panel is left with a partial payload; callers must restart the
    /// whole transfer.
    #[error("transfer aborted, chunk {chunk_index} failed to send")]
    Transfer {
        chunk_index: usize,
        #[source]
        source: TransportError,
    },

    /// The GIF container writer failed.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] gif::EncodingError),

    /// A link-layer failure outside a transfer (scan, connect, command write).
    #[error(transparent)]
    Link(#[from] TransportError),
}
