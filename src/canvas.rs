/*
 *  canvas.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed 32x32 RGB draw target for the text renderer
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

use core::convert::Infallible;

use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::frame::{Frame, PANEL_PIXELS, PANEL_SIZE};

/// A panel-sized framebuffer for embedded-graphics.
///
/// Text and primitives draw into it through the `DrawTarget` impl; pixels
/// landing outside the 32x32 area are clipped, which is what lets the
/// marquee anchor glyphs partially (or fully) off-panel while scrolling.
#[derive(Debug, Clone)]
pub struct PanelCanvas {
    buf: Vec<Rgb888>,
}

impl PanelCanvas {
    /// A canvas cleared to opaque black, the panel's background.
    pub fn new() -> Self {
        Self { buf: vec![Rgb888::new(0, 0, 0); PANEL_PIXELS] }
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < PANEL_SIZE && y < PANEL_SIZE {
                return Some(y * PANEL_SIZE + x);
            }
        }
        None
    }

    /// Freezes the canvas into an immutable panel frame.
    pub fn into_frame(self) -> Frame {
        let pixels = self.buf.iter().map(|c| [c.r(), c.g(), c.b()]).collect();
        Frame::from_vec(pixels)
    }
}

impl Default for PanelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for PanelCanvas {
    fn size(&self) -> Size {
        Size::new(PANEL_SIZE as u32, PANEL_SIZE as u32)
    }
}

impl DrawTarget for PanelCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
