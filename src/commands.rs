/*
 *  commands.rs
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-layout single-packet commands: power, clock, refresh
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

use chrono::{Datelike, Local, Timelike};

// Command selector in the clock packet's fourth byte.
const CLOCK_SELECTOR: u8 = 0x80;

/// The panel power packet: `05 00 07 01 xx`.
pub fn power(on: bool) -> [u8; 5] {
    [0x05, 0x00, 0x07, 0x01, on as u8]
}

/// The clock-sync packet for a given local timestamp.
///
/// Field bytes are year mod 256, month (1-12), day of month, weekday with
/// 1 = Monday through 7 = Sunday, then hour, minute, second. The weekday
/// convention is the one the panel has been observed to accept; vendor
/// documentation does not state it.
pub fn clock_sync<T: Datelike + Timelike>(now: &T) -> [u8; 11] {
    [
        0x0B,
        0x00,
        0x01,
        CLOCK_SELECTOR,
        (now.year() & 0xFF) as u8,
        now.month() as u8,
        now.day() as u8,
        now.weekday().number_from_monday() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    ]
}

/// Clock sync for the current local time.
pub fn clock_sync_now() -> [u8; 11] {
    clock_sync(&Local::now().naive_local())
}

/// The post-upload refresh pair, written back-to-back to make the panel
/// redraw from the freshly transferred payload.
pub fn refresh() -> [Vec<u8>; 2] {
    [vec![0x04, 0x00, 0x03, 0x80], vec![0x05, 0x00, 0x04, 0x80, 0x50]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn power_packets_match_wire_captures() {
        assert_eq!([0x05, 0x00, 0x07, 0x01, 0x01], power(true));
        assert_eq!([0x05, 0x00, 0x07, 0x01, 0x00], power(false));
    }

    #[test]
    fn clock_sync_encodes_each_field_as_a_byte() {
        // Monday 2024-01-15 10:30:45; 2024 mod 256 = 0xE8
        let when = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap();
        assert_eq!(
            [0x0B, 0x00, 0x01, 0x80, 0xE8, 0x01, 0x0F, 0x01, 0x0A, 0x1E, 0x2D],
            clock_sync(&when)
        );
    }

    #[test]
    fn clock_sync_weekday_runs_monday_to_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(7, clock_sync(&sunday)[7]);
    }

    #[test]
    fn refresh_is_the_fixed_two_packet_pair() {
        let [first, second] = refresh();
        assert_eq!(vec![0x04, 0x00, 0x03, 0x80], first);
        assert_eq!(vec![0x05, 0x00, 0x04, 0x80, 0x50], second);
    }
}
