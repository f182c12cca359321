/*
 *  normalize.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Source media -> 32x32 opaque frame sequence
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

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, ImageFormat, RgbaImage};
use log::debug;

use crate::error::BeamError;
use crate::frame::{sanitize_duration, Animation, Frame, TimedFrame, PANEL_PIXELS, PANEL_SIZE};

/// Converts arbitrary source media into a panel-ready frame sequence.
///
/// Animated GIF sources keep their per-frame timing (sanitized to the panel's
/// floor); every other decodable format becomes a single still frame. Each
/// frame is resized to 32x32 with Lanczos resampling and alpha-composited
/// onto opaque black.
pub fn normalize_media(data: &[u8]) -> Result<Animation, BeamError> {
    if matches!(image::guess_format(data), Ok(ImageFormat::Gif)) {
        normalize_gif(data)
    } else {
        normalize_still(data)
    }
}

fn normalize_gif(data: &[u8]) -> Result<Animation, BeamError> {
    let decoder = GifDecoder::new(Cursor::new(data))?;
    let frames = decoder.into_frames().collect_frames()?;
    if frames.is_empty() {
        return Err(BeamError::NoFrames);
    }
    debug!("normalizing {}-frame gif source", frames.len());

    let mut timed = Vec::with_capacity(frames.len());
    for source in frames {
        let (numer, denom) = source.delay().numer_denom_ms();
        let duration_ms = if denom == 0 { None } else { Some(numer / denom) };
        let frame = panel_frame(&source.into_buffer());
        timed.push(TimedFrame::new(frame, sanitize_duration(duration_ms)));
    }
    Animation::new(timed)
}

fn normalize_still(data: &[u8]) -> Result<Animation, BeamError> {
    let rgba = image::load_from_memory(data)?.to_rgba8();
    debug!("normalizing {}x{} still source", rgba.width(), rgba.height());
    Ok(Animation::still(panel_frame(&rgba)))
}

// Resize to the panel geometry, then merge transparency into opaque black.
// The panel has no alpha; the frame's own alpha channel is the blend mask
// onto the black background.
fn panel_frame(rgba: &RgbaImage) -> Frame {
    let resized = imageops::resize(rgba, PANEL_SIZE as u32, PANEL_SIZE as u32, FilterType::Lanczos3);
    let mut pixels = Vec::with_capacity(PANEL_PIXELS);
    for px in resized.pixels() {
        let [r, g, b, a] = px.0;
        let a = u16::from(a);
        pixels.push([
            ((u16::from(r) * a) / 255) as u8,
            ((u16::from(g) * a) / 255) as u8,
            ((u16::from(b) * a) / 255) as u8,
        ]);
    }
    Frame::from_vec(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba};

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn gif_bytes(frame_delays_cs: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut out, 8, 8, &[]).unwrap();
            encoder.set_repeat(gif::Repeat::Infinite).unwrap();
            for (i, delay) in frame_delays_cs.iter().enumerate() {
                let shade = (i * 40) as u8;
                let rgb = vec![shade; 8 * 8 * 3];
                let mut frame = gif::Frame::from_rgb(8, 8, &rgb);
                frame.delay = *delay;
                encoder.write_frame(&frame).unwrap();
            }
        }
        out
    }

    #[test]
    fn still_source_yields_single_opaque_frame() {
        let img = RgbaImage::from_pixel(64, 48, Rgba([255, 0, 0, 255]));
        let animation = normalize_media(&png_bytes(img)).unwrap();

        assert!(animation.is_still());
        let px = animation.frames()[0].frame().pixel(16, 16);
        assert!(px[0] > 200 && px[1] < 40 && px[2] < 40, "expected red, got {px:?}");
    }

    #[test]
    fn transparent_pixels_composite_to_black() {
        let img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 0]));
        let animation = normalize_media(&png_bytes(img)).unwrap();
        let frame = animation.frames()[0].frame();
        assert!(frame.pixels().iter().all(|px| *px == [0, 0, 0]));
    }

    #[test]
    fn partial_alpha_blends_linearly() {
        // 50% white over black lands near mid gray
        let img = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 128]));
        let animation = normalize_media(&png_bytes(img)).unwrap();
        let px = animation.frames()[0].frame().pixel(10, 10);
        assert!(px[0] >= 120 && px[0] <= 136, "expected mid gray, got {px:?}");
    }

    #[test]
    fn gif_durations_are_sanitized() {
        // 10ms, 150ms, 100ms in source: the sub-floor frame is raised to 100
        let animation = normalize_media(&gif_bytes(&[1, 15, 10])).unwrap();
        let durations: Vec<u32> = animation.frames().iter().map(|t| t.duration_ms()).collect();
        assert_eq!(vec![100, 150, 100], durations);
    }

    #[test]
    fn single_frame_gif_is_a_still() {
        let animation = normalize_media(&gif_bytes(&[10])).unwrap();
        assert!(animation.is_still());
    }

    #[test]
    fn undecodable_source_is_rejected() {
        let result = normalize_media(b"definitely not an image");
        assert!(matches!(result, Err(BeamError::InvalidImage(_))));
    }
}
