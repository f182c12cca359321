/*
 *  config.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  YAML config + CLI override layering
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

use std::{fs, path::{Path, PathBuf}};

use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marquee::parse_color;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// e.g. "info" | "debug"
    pub log_level: Option<String>,
    /// panel link settings
    pub device: Option<DeviceConfig>,
    /// text rendering defaults
    pub text: Option<TextConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceConfig {
    /// default panel address for connects, e.g. "AA:BB:CC:DD:EE:FF"
    pub address: Option<String>,
    /// inter-chunk pacing override in milliseconds (0 disables pacing)
    pub chunk_pacing_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextConfig {
    /// default marquee fill color, "#RRGGBB"
    pub color: Option<String>,
}

/// CLI-sourced overrides. All fields are Options so we can layer them over
/// YAML (highest precedence wins).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub address: Option<String>,
    pub chunk_pacing_ms: Option<u64>,
    pub color: Option<String>,
}

/// Public entry point: read YAML (explicit path or search), merge, apply
/// overrides, validate.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = path {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_overrides(&mut cfg, overrides);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/pixbeam/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/pixbeam/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/pixbeam.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["pixbeam.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.device, src.device) {
        (None, Some(c)) => dst.device = Some(c),
        (Some(d), Some(s)) => merge_device(d, s),
        _ => {}
    }
    match (&mut dst.text, src.text) {
        (None, Some(c)) => dst.text = Some(c),
        (Some(d), Some(s)) => merge_text(d, s),
        _ => {}
    }
}

fn merge_device(dst: &mut DeviceConfig, src: DeviceConfig) {
    if src.address.is_some()         { dst.address = src.address; }
    if src.chunk_pacing_ms.is_some() { dst.chunk_pacing_ms = src.chunk_pacing_ms; }
}

fn merge_text(dst: &mut TextConfig, src: TextConfig) {
    if src.color.is_some() { dst.color = src.color; }
}

fn apply_overrides(cfg: &mut Config, ov: &Overrides) {
    if ov.log_level.is_some() { cfg.log_level = ov.log_level.clone(); }

    if (ov.address.is_some() || ov.chunk_pacing_ms.is_some()) && cfg.device.is_none() {
        cfg.device = Some(DeviceConfig::default());
    }
    if let Some(device) = cfg.device.as_mut() {
        if ov.address.is_some()         { device.address = ov.address.clone(); }
        if ov.chunk_pacing_ms.is_some() { device.chunk_pacing_ms = ov.chunk_pacing_ms; }
    }

    if ov.color.is_some() && cfg.text.is_none() {
        cfg.text = Some(TextConfig::default());
    }
    if let Some(text) = cfg.text.as_mut() {
        if ov.color.is_some() { text.color = ov.color.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(device) = cfg.device.as_ref() {
        if let Some(ms) = device.chunk_pacing_ms {
            if ms > 10_000 {
                return Err(ConfigError::Validation("device chunk_pacing_ms must be 0..=10000".into()));
            }
        }
    }
    if let Some(text) = cfg.text.as_ref() {
        if let Some(color) = text.color.as_ref() {
            if parse_color(color).is_err() {
                return Err(ConfigError::Validation(format!(
                    "text color must be #RRGGBB, got {color:?}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_yaml_values() {
        let mut cfg = Config {
            log_level: Some("info".into()),
            device: Some(DeviceConfig { address: Some("AA:AA".into()), chunk_pacing_ms: Some(500) }),
            text: None,
        };
        let ov = Overrides {
            log_level: Some("debug".into()),
            chunk_pacing_ms: Some(0),
            color: Some("#ff0000".into()),
            ..Default::default()
        };
        apply_overrides(&mut cfg, &ov);

        assert_eq!(Some("debug".into()), cfg.log_level);
        let device = cfg.device.unwrap();
        assert_eq!(Some("AA:AA".into()), device.address);
        assert_eq!(Some(0), device.chunk_pacing_ms);
        assert_eq!(Some("#ff0000".into()), cfg.text.unwrap().color);
    }

    #[test]
    fn validation_rejects_silly_pacing_and_bad_colors() {
        let cfg = Config {
            device: Some(DeviceConfig { address: None, chunk_pacing_ms: Some(60_000) }),
            ..Default::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        let cfg = Config {
            text: Some(TextConfig { color: Some("red".into()) }),
            ..Default::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_is_option_by_option() {
        let mut dst = Config {
            log_level: Some("info".into()),
            device: Some(DeviceConfig { address: Some("AA:AA".into()), chunk_pacing_ms: None }),
            text: None,
        };
        let src = Config {
            log_level: None,
            device: Some(DeviceConfig { address: None, chunk_pacing_ms: Some(250) }),
            text: Some(TextConfig { color: Some("#00ff00".into()) }),
        };
        merge(&mut dst, src);

        let device = dst.device.unwrap();
        assert_eq!(Some("AA:AA".into()), device.address);
        assert_eq!(Some(250), device.chunk_pacing_ms);
        assert_eq!(Some("#00ff00".into()), dst.text.unwrap().color);
        assert_eq!(Some("info".into()), dst.log_level);
    }
}
