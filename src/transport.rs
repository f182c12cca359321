/*
 *  transport.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wireless link capability consumed by the protocol core
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

use thiserror::Error;

/// Advertised-name prefixes of panels this protocol speaks to.
pub const SUPPORTED_NAME_PREFIXES: [&str; 2] = ["IDM-", "LEDnetWF"];

/// Returns whether an advertised device name looks like a supported panel.
pub fn is_supported_name(name: &str) -> bool {
    SUPPORTED_NAME_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Error type for link-layer operations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no usable wireless adapter: {0}")]
    Adapter(String),
    #[error("link is not connected")]
    NotConnected,
    #[error("connect to {address} failed: {reason}")]
    Connect { address: String, reason: String },
    #[error("link write failed: {0}")]
    Write(String),
}

/// A peripheral seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub name: String,
    pub address: String,
    /// Received signal strength in dBm.
    pub rssi: i16,
}

/// The wireless link the core writes packets through.
///
/// Implementations own all connection state; the core only checks
/// `is_connected()` as a precondition and never retries on its own.
/// Scanning with zero matches is an empty result, not an error.
#[allow(async_fn_in_trait)]
pub trait Transport {
    fn is_connected(&self) -> bool;

    async fn scan(&mut self, timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError>;

    async fn connect(&mut self, address: &str) -> Result<(), TransportError>;

    /// Writes one packet. Fails with [`TransportError::NotConnected`] when
    /// no link is up.
    async fn write(&mut self, packet: &[u8]) -> Result<(), TransportError>;

    async fn disconnect(&mut self) -> Result<(), TransportError>;
}

/// In-memory transport for testing without hardware.
///
/// Records every packet written so tests (and dry runs) can verify chunk
/// order and content. `fail_at` makes the n-th write fail, which is how the
/// abort-on-chunk-failure path gets exercised.
#[derive(Debug, Default)]
pub struct MemoryLink {
    connected: bool,
    writes: Vec<Vec<u8>>,
    nearby: Vec<DiscoveredDevice>,
    fail_at: Option<usize>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the peripherals a scan will report.
    pub fn with_nearby(mut self, nearby: Vec<DiscoveredDevice>) -> Self {
        self.nearby = nearby;
        self
    }

    /// Makes the `index`-th write (0-based) fail.
    pub fn fail_write_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }
}

impl Transport for MemoryLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn scan(&mut self, _timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError> {
        Ok(self.nearby.clone())
    }

    async fn connect(&mut self, _address: &str) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }

    async fn write(&mut self, packet: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        if self.fail_at == Some(self.writes.len()) {
            return Err(TransportError::Write("simulated link fault".into()));
        }
        self.writes.push(packet.to_vec());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_filter_admits_known_prefixes() {
        assert!(is_supported_name("IDM-32x32"));
        assert!(is_supported_name("LEDnetWF0100"));
        assert!(!is_supported_name("JBL Flip 5"));
        assert!(!is_supported_name(""));
    }
}
