/*
 *  marquee.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text -> static or scrolling frame sequence
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

use embedded_graphics::mono_font::ascii::FONT_6X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::debug;

use crate::canvas::PanelCanvas;
use crate::error::BeamError;
use crate::frame::{Animation, Frame, TimedFrame, PANEL_SIZE};

/// Horizontal advance per scroll frame.
pub const SCROLL_STEP_PX: i32 = 2;

/// Hold time for every scroll frame.
pub const SCROLL_FRAME_MS: u32 = 100;

/// Rendered width of `text` in the display font (6 px glyph advance).
pub fn text_pixel_width(text: &str) -> u32 {
    let advance = FONT_6X13.character_size.width + FONT_6X13.character_spacing;
    text.chars().count() as u32 * advance
}

/// Renders `text` in `color` as a panel animation.
///
/// Text that fits the 32 px width becomes one centered static frame. Longer
/// text scrolls right-to-left: the anchor starts at x = +32 (just off the
/// right edge) and steps down past x = -width, giving ceil((32 + width) / 2)
/// frames at [`SCROLL_FRAME_MS`] each.
pub fn text_animation(text: &str, color: Rgb888) -> Result<Animation, BeamError> {
    if text.is_empty() {
        return Err(BeamError::EmptyText);
    }

    let panel = PANEL_SIZE as i32;
    let width = text_pixel_width(text);
    if width <= PANEL_SIZE as u32 {
        let x = (panel - width as i32) / 2;
        return Ok(Animation::still(render_line(text, color, x)));
    }

    let mut frames = Vec::new();
    let mut x = panel;
    while x > -(width as i32) {
        frames.push(TimedFrame::new(render_line(text, color, x), SCROLL_FRAME_MS));
        x -= SCROLL_STEP_PX;
    }
    debug!("marquee {:?}: {} px wide, {} frames", text, width, frames.len());
    Animation::new(frames)
}

fn render_line(text: &str, color: Rgb888, x: i32) -> Frame {
    let mut canvas = PanelCanvas::new();
    let style = MonoTextStyle::new(&FONT_6X13, color);
    let y = (PANEL_SIZE as i32 - FONT_6X13.character_size.height as i32) / 2;
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
        .draw(&mut canvas)
        .ok(); // drawing into PanelCanvas is infallible
    canvas.into_frame()
}

/// Parses a `#RRGGBB` (or bare `RRGGBB`) fill color.
pub fn parse_color(s: &str) -> Result<Rgb888, BeamError> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(BeamError::BadColor(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| BeamError::BadColor(s.to_string()))
    };
    Ok(Rgb888::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(frame: &Frame) -> Vec<[u8; 3]> {
        frame.pixels().iter().copied().filter(|px| *px != [0, 0, 0]).collect()
    }

    #[test]
    fn short_text_renders_one_centered_frame() {
        let animation = text_animation("HI", Rgb888::new(255, 255, 255)).unwrap();
        assert!(animation.is_still());

        let lit = lit_pixels(animation.frames()[0].frame());
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|px| *px == [255, 255, 255]));
    }

    #[test]
    fn long_text_scrolls_two_px_per_frame() {
        // 10 chars x 6 px = 60 px wide: ceil((32 + 60) / 2) = 46 frames
        let animation = text_animation("0123456789", Rgb888::new(0, 255, 0)).unwrap();
        assert_eq!(46, animation.frame_count());
        assert!(animation.frames().iter().all(|t| t.duration_ms() == SCROLL_FRAME_MS));
    }

    #[test]
    fn first_scroll_frame_starts_off_panel() {
        let animation = text_animation("0123456789", Rgb888::new(0, 255, 0)).unwrap();
        // anchor at x = +32: nothing has entered the panel yet
        assert!(lit_pixels(animation.frames()[0].frame()).is_empty());
        // a few steps in, glyphs are visible
        assert!(!lit_pixels(animation.frames()[4].frame()).is_empty());
    }

    #[test]
    fn fill_color_is_applied() {
        let animation = text_animation("OK", Rgb888::new(10, 200, 30)).unwrap();
        let lit = lit_pixels(animation.frames()[0].frame());
        assert!(lit.iter().all(|px| *px == [10, 200, 30]));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            text_animation("", Rgb888::new(255, 255, 255)),
            Err(BeamError::EmptyText)
        ));
    }

    #[test]
    fn color_parsing() {
        assert_eq!(Rgb888::new(0x00, 0xFF, 0x88), parse_color("#00ff88").unwrap());
        assert_eq!(Rgb888::new(0x12, 0x34, 0x56), parse_color("123456").unwrap());
        assert!(matches!(parse_color("#f00"), Err(BeamError::BadColor(_))));
        assert!(matches!(parse_color("#zzzzzz"), Err(BeamError::BadColor(_))));
    }
}
