/*
 *  lib.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
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

//! # Pixbeam
//!
//! Protocol encoder and media pipeline for 32x32 BLE LED matrix panels.
//!
//! Source images, animations, or text are normalized into 32x32
//! palette-reduced frame sequences, serialized as a GIF payload, framed into
//! the panel's 16-byte-headered 4 KiB chunk protocol (CRC-32 over the whole
//! payload, continuation flags), and written to a pluggable [`Transport`]
//! with inter-chunk pacing. Small fixed-layout commands (power, clock sync,
//! refresh) bypass the framing entirely.
//!
//! The link layer itself (adapter discovery, GATT plumbing) lives outside
//! this crate; implement [`Transport`] to bring your own.

pub mod canvas;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod marquee;
pub mod normalize;
pub mod payload;
pub mod protocol;
pub mod session;
pub mod transport;

pub use canvas::PanelCanvas;
pub use device::Device;
pub use error::BeamError;
pub use frame::{Animation, Frame, TimedFrame, DEFAULT_FRAME_MS, MIN_FRAME_MS, PANEL_SIZE};
pub use payload::GifPayload;
pub use session::{TransferReceipt, TransferSession, CHUNK_PACING};
pub use transport::{DiscoveredDevice, MemoryLink, Transport, TransportError};
