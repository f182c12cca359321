/*
 *  frame.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel frame and timed frame-sequence model
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

use crate::error::BeamError;

/// Edge length of the panel in pixels. Everything downstream of the
/// normalizers assumes this exact geometry.
pub const PANEL_SIZE: usize = 32;

/// Pixels per frame (row-major).
pub const PANEL_PIXELS: usize = PANEL_SIZE * PANEL_SIZE;

/// Shortest per-frame hold the panel handles gracefully.
pub const MIN_FRAME_MS: u32 = 20;

/// Hold applied when source timing is missing or below [`MIN_FRAME_MS`].
pub const DEFAULT_FRAME_MS: u32 = 100;

/// One 32x32 RGB frame, row-major, opaque. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<[u8; 3]>,
}

impl Frame {
    /// An all-black frame.
    pub fn black() -> Self {
        Self { pixels: vec![[0, 0, 0]; PANEL_PIXELS] }
    }

    /// Builds a frame from row-major RGB triples; the buffer must hold
    /// exactly [`PANEL_PIXELS`] entries.
    pub fn from_pixels(pixels: Vec<[u8; 3]>) -> Result<Self, BeamError> {
        if pixels.len() != PANEL_PIXELS {
            return Err(BeamError::BadFrameSize {
                expected: PANEL_PIXELS,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    // Internal constructor for renderers that produce the buffer themselves.
    pub(crate) fn from_vec(pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(PANEL_PIXELS, pixels.len());
        Self { pixels }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * PANEL_SIZE + x]
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// The frame flattened to RGBA bytes (alpha forced opaque), the layout
    /// the palette quantizer wants.
    pub fn rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PANEL_PIXELS * 4);
        for [r, g, b] in &self.pixels {
            out.extend_from_slice(&[*r, *g, *b, 0xFF]);
        }
        out
    }
}

/// A frame plus how long the panel should hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedFrame {
    frame: Frame,
    duration_ms: u32,
}

impl TimedFrame {
    /// Pairs a frame with a hold time. Sub-[`MIN_FRAME_MS`] values come from
    /// broken source metadata and are replaced with [`DEFAULT_FRAME_MS`], so
    /// every stored duration satisfies the panel's floor.
    pub fn new(frame: Frame, duration_ms: u32) -> Self {
        let duration_ms = if duration_ms < MIN_FRAME_MS {
            DEFAULT_FRAME_MS
        } else {
            duration_ms
        };
        Self { frame, duration_ms }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

/// Sanitizes a source-frame duration: missing or sub-floor timing falls back
/// to [`DEFAULT_FRAME_MS`].
pub fn sanitize_duration(duration_ms: Option<u32>) -> u32 {
    match duration_ms {
        Some(ms) if ms >= MIN_FRAME_MS => ms,
        _ => DEFAULT_FRAME_MS,
    }
}

/// An ordered, non-empty frame sequence. Length 1 is a still image and
/// carries no duration semantics downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<TimedFrame>,
}

impl Animation {
    /// A single-frame (still) sequence.
    pub fn still(frame: Frame) -> Self {
        Self { frames: vec![TimedFrame::new(frame, DEFAULT_FRAME_MS)] }
    }

    /// Builds a sequence from timed frames; at least one frame is required.
    pub fn new(frames: Vec<TimedFrame>) -> Result<Self, BeamError> {
        if frames.is_empty() {
            return Err(BeamError::NoFrames);
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_still(&self) -> bool {
        self.frames.len() == 1
    }
}
