/*
 *  payload.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame sequence -> palette-reduced GIF payload bytes
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

use std::borrow::Cow;

use color_quant::NeuQuant;
use gif::{DisposalMethod, Encoder, Repeat};
use log::debug;

use crate::error::BeamError;
use crate::frame::{Animation, Frame, PANEL_SIZE};

/// Palette ceiling per frame; one slot stays reserved per the display
/// format's convention.
pub const MAX_PALETTE_COLORS: usize = 255;

// NeuQuant sampling factor; 1 = highest quality, cheap at 1024 px per frame.
const QUANT_SAMPLE_FAC: i32 = 1;

// GIF stores frame delays in centiseconds.
const GIF_DELAY_UNIT_MS: u32 = 10;

/// The encoded device payload: a self-contained GIF byte sequence.
///
/// This is the wire-visible artifact outer layers hand to the protocol
/// framer unmodified; its byte length is what gets checksummed and chunked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifPayload(Vec<u8>);

impl GifPayload {
    /// Wraps pre-encoded GIF bytes produced elsewhere.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Serializes a frame sequence into the panel's GIF payload.
///
/// A length-1 sequence becomes a plain still image. Longer sequences carry
/// their per-frame delays, loop forever, and clear to background between
/// frames so stale pixels never ghost through. No compression tuning is
/// attempted; the transfer layer chunks whatever comes out.
pub fn encode_animation(animation: &Animation) -> Result<GifPayload, BeamError> {
    let side = PANEL_SIZE as u16;
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, side, side, &[])?;
        if !animation.is_still() {
            encoder.set_repeat(Repeat::Infinite)?;
        }
        for timed in animation.frames() {
            let (indices, palette) = quantize(timed.frame());
            let mut frame = gif::Frame::default();
            frame.width = side;
            frame.height = side;
            frame.buffer = Cow::Owned(indices);
            frame.palette = Some(palette);
            if !animation.is_still() {
                frame.delay = (timed.duration_ms() / GIF_DELAY_UNIT_MS).min(u32::from(u16::MAX)) as u16;
                frame.dispose = DisposalMethod::Background;
            }
            encoder.write_frame(&frame)?;
        }
    }
    debug!("encoded {} frame(s) into {} payload bytes", animation.frame_count(), out.len());
    Ok(GifPayload(out))
}

// Adaptive palette per frame: NeuQuant over the frame's (opaque) RGBA
// pixels, then every pixel mapped to its nearest palette index.
fn quantize(frame: &Frame) -> (Vec<u8>, Vec<u8>) {
    let rgba = frame.rgba_bytes();
    let quant = NeuQuant::new(QUANT_SAMPLE_FAC, MAX_PALETTE_COLORS, &rgba);
    let indices = rgba.chunks_exact(4).map(|px| quant.index_of(px) as u8).collect();
    (indices, quant.color_map_rgb())
}
