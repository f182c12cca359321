/*
 *  main.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Offline encoder CLI: media/text/commands -> framed packets
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

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueHint};
use env_logger::Env;
use log::info;

use pixbeam::{commands, config, marquee, normalize, payload, protocol};

#[derive(Debug, Parser)]
#[command(name = "pixbeam", about = "Encode images, animations and text for 32x32 BLE LED matrix panels")]
struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode an image or animation into framed display packets
    Image {
        path: PathBuf,
        /// Write raw packet bytes here instead of printing hex
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Encode a text marquee into framed display packets
    Text {
        message: String,
        /// Fill color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Emit the panel power command packet
    Power {
        /// Power the panel off instead of on
        #[arg(long)]
        off: bool,
    },
    /// Emit a clock-sync packet for the current local time
    Clock,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = config::Overrides {
        log_level: cli.log_level.clone(),
        ..Default::default()
    };
    let cfg = config::load(cli.config.as_deref(), &overrides)?;

    env_logger::Builder::from_env(
        Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")),
    )
    .init();

    match cli.command {
        Command::Image { path, out } => {
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let animation = normalize::normalize_media(&data)?;
            let encoded = payload::encode_animation(&animation)?;
            info!(
                "{}: {} frame(s), {} payload bytes",
                path.display(),
                animation.frame_count(),
                encoded.len()
            );
            emit_packets(&protocol::frame_payload(&encoded), out.as_deref())?;
        }
        Command::Text { message, color, out } => {
            let color = color
                .or_else(|| cfg.text.as_ref().and_then(|t| t.color.clone()))
                .unwrap_or_else(|| "#ffffff".to_string());
            let fill = marquee::parse_color(&color)?;
            let animation = marquee::text_animation(&message, fill)?;
            let encoded = payload::encode_animation(&animation)?;
            info!(
                "{:?}: {} frame(s), {} payload bytes",
                message,
                animation.frame_count(),
                encoded.len()
            );
            emit_packets(&protocol::frame_payload(&encoded), out.as_deref())?;
        }
        Command::Power { off } => {
            println!("{}", hex(&commands::power(!off)));
        }
        Command::Clock => {
            println!("{}", hex(&commands::clock_sync_now()));
        }
    }

    Ok(())
}

/// Writes packets as raw bytes to `out`, or prints one hex line per packet.
fn emit_packets(packets: &[Vec<u8>], out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            for packet in packets {
                file.write_all(packet)?;
            }
            let bytes: usize = packets.iter().map(Vec::len).sum();
            info!("wrote {} packet(s), {} bytes, to {}", packets.len(), bytes, path.display());
        }
        None => {
            for (index, packet) in packets.iter().enumerate() {
                println!("packet {:>3}  {}", index, hex(packet));
            }
        }
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}
