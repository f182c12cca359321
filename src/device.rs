/*
 *  device.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Owned panel handle: scan, connect, commands, show pipelines
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

use chrono::{Datelike, Timelike};
use embedded_graphics::pixelcolor::Rgb888;
use log::info;

use crate::commands;
use crate::error::BeamError;
use crate::marquee;
use crate::normalize;
use crate::payload::{self, GifPayload};
use crate::session::{TransferReceipt, TransferSession, CHUNK_PACING};
use crate::transport::{is_supported_name, DiscoveredDevice, Transport};

/// Scan window used to verify an address before connecting.
const CONNECT_SCAN: Duration = Duration::from_secs(2);

/// An owned handle to one panel over one link.
///
/// The handle owns its `Transport` by value and takes `&mut self` for every
/// operation, so command and transfer issuance on a connection is serialized
/// by construction. Drop it (or call `disconnect`) to release the link.
pub struct Device<T: Transport> {
    link: T,
    pacing: Duration,
}

impl<T: Transport> Device<T> {
    pub fn new(link: T) -> Self {
        Self { link, pacing: CHUNK_PACING }
    }

    /// Overrides the inter-chunk pacing used by transfers.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Scans for panels, filtered to supported advertised names.
    /// Zero matches is an empty list, not an error.
    pub async fn scan(&mut self, timeout: Duration) -> Result<Vec<DiscoveredDevice>, BeamError> {
        let mut found = self.link.scan(timeout).await?;
        found.retain(|d| is_supported_name(&d.name));
        info!("scan found {} panel(s)", found.len());
        Ok(found)
    }

    /// Connects to a panel by address.
    ///
    /// Runs a short verification scan first and fails with
    /// [`BeamError::DeviceNotFound`] when the address is not in range, then
    /// powers the panel on -- it wakes dark after a fresh connect.
    pub async fn connect(&mut self, address: &str) -> Result<(), BeamError> {
        let nearby = self.link.scan(CONNECT_SCAN).await?;
        if !nearby.iter().any(|d| d.address == address) {
            return Err(BeamError::DeviceNotFound { address: address.to_string() });
        }
        self.link.connect(address).await?;
        info!("connected to {address}");
        self.set_power(true).await
    }

    pub async fn disconnect(&mut self) -> Result<(), BeamError> {
        self.link.disconnect().await?;
        Ok(())
    }

    pub async fn set_power(&mut self, on: bool) -> Result<(), BeamError> {
        self.write_command(&commands::power(on)).await
    }

    /// Pushes a local timestamp to the panel clock.
    pub async fn sync_clock<Tm: Datelike + Timelike>(&mut self, now: &Tm) -> Result<(), BeamError> {
        self.write_command(&commands::clock_sync(now)).await
    }

    pub async fn sync_clock_now(&mut self) -> Result<(), BeamError> {
        self.write_command(&commands::clock_sync_now()).await
    }

    /// Writes the refresh pair so the panel redraws from its buffer.
    pub async fn refresh(&mut self) -> Result<(), BeamError> {
        for packet in commands::refresh() {
            self.write_command(&packet).await?;
        }
        Ok(())
    }

    /// Normalizes and shows a still or animated source image.
    pub async fn show_media(&mut self, data: &[u8]) -> Result<TransferReceipt, BeamError> {
        let animation = normalize::normalize_media(data)?;
        let payload = payload::encode_animation(&animation)?;
        self.send_payload(&payload).await
    }

    /// Renders and shows text, static or scrolling as width demands.
    pub async fn show_text(&mut self, text: &str, color: Rgb888) -> Result<TransferReceipt, BeamError> {
        let animation = marquee::text_animation(text, color)?;
        let payload = payload::encode_animation(&animation)?;
        self.send_payload(&payload).await
    }

    /// Transfers an already-encoded payload, then refreshes the panel.
    pub async fn send_payload(&mut self, payload: &GifPayload) -> Result<TransferReceipt, BeamError> {
        let receipt = TransferSession::new(payload)
            .with_pacing(self.pacing)
            .run(&mut self.link)
            .await?;
        self.refresh().await?;
        Ok(receipt)
    }

    async fn write_command(&mut self, packet: &[u8]) -> Result<(), BeamError> {
        if !self.link.is_connected() {
            return Err(BeamError::NotConnected);
        }
        self.link.write(packet).await?;
        Ok(())
    }
}
