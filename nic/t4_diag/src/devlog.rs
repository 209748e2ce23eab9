// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Firmware device log view.
//!
//! The whole log region is captured in one read and replayed
//! chronologically: the oldest surviving entry is found by sequence
//! number, and never-written slots produce no output at all, wherever in
//! the ring they sit.

use crate::DiagError;
use ringscan::RingCursor;
use std::fmt;
use t4_defs::devlog::DEVLOG_PARAMS;
use t4_defs::devlog::DevlogEntry;
use zerocopy::FromBytes;

/// A parsed snapshot of the firmware device log.
pub struct Devlog {
    entries: Vec<DevlogEntry>,
    cursor: RingCursor,
}

impl Devlog {
    /// Parses a raw copy of the log region and locates its oldest entry.
    pub fn new(data: &[u8]) -> Result<Self, DiagError> {
        let record = size_of::<DevlogEntry>();
        if data.len() % record != 0 {
            return Err(DiagError::CaptureSize {
                expected: data.len().next_multiple_of(record),
                actual: data.len(),
            });
        }
        let entries = data
            .chunks_exact(record)
            .map(|chunk| {
                DevlogEntry::read_from_bytes(chunk).map_err(|_| DiagError::CaptureSize {
                    expected: record,
                    actual: chunk.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let cursor = RingCursor::scan(&entries);
        Ok(Self { entries, cursor })
    }

    /// Number of slots in the log.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Renders the log oldest-first. Unwritten slots emit nothing.
    pub fn write_to(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            w,
            "{:>10}  {:>15}  {:>8}  {:>8}  Message",
            "Seq#", "Tstamp", "Level", "Facility"
        )?;
        for physical in self.cursor.iter() {
            let e = &self.entries[physical];
            if e.timestamp() == 0 {
                continue;
            }
            write!(
                w,
                "{:10}  {:15}  {:>8}  {:>8}  ",
                e.seqno(),
                e.timestamp(),
                e.level().as_str().unwrap_or("UNKNOWN"),
                e.facility().as_str().unwrap_or("UNKNOWN"),
            )?;
            let message = format_message(e);
            w.write_str(&message)?;
            if !message.ends_with('\n') {
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Devlog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Expands the firmware's printf-style message against the entry's
/// parameters.
///
/// Firmware messages only ever interpolate integers, so just the integer
/// conversions are interpreted: `%x`/`%X`, `%u`/`%d`, optional zero-pad
/// and width, `l` length modifiers, and `%%`. Anything else passes
/// through literally so a surprising message still renders.
fn format_message(e: &DevlogEntry) -> String {
    let fmt = String::from_utf8_lossy(e.fmt_bytes()).into_owned();
    let mut out = String::new();
    let mut params = 0..DEVLOG_PARAMS;
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = String::from("%");
        let mut zero_pad = false;
        let mut width = 0usize;
        while let Some(&d) = chars.peek() {
            if d == '0' && width == 0 {
                zero_pad = true;
            } else if d.is_ascii_digit() {
                width = width * 10 + d as usize - '0' as usize;
            } else {
                break;
            }
            spec.push(d);
            chars.next();
        }
        while chars.peek() == Some(&'l') {
            spec.push('l');
            chars.next();
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(conv @ ('x' | 'X' | 'u' | 'd')) => {
                let value = params.next().map(|i| e.param(i)).unwrap_or(0);
                let digits = match conv {
                    'x' => format!("{value:x}"),
                    'X' => format!("{value:X}"),
                    _ => format!("{value}"),
                };
                if zero_pad {
                    out.push_str(&format!("{digits:0>width$}"));
                } else {
                    out.push_str(&format!("{digits:>width$}"));
                }
            }
            Some(other) => {
                // Unknown conversion: emit it untouched, parameters intact.
                out.push_str(&spec);
                out.push(other);
            }
            None => out.push_str(&spec),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use t4_defs::devlog::DevlogFacility;
    use t4_defs::devlog::DevlogLevel;
    use zerocopy::IntoBytes;

    fn raw(entries: &[DevlogEntry]) -> Vec<u8> {
        entries.iter().flat_map(|e| e.as_bytes().to_vec()).collect()
    }

    fn entry(seqno: u32, timestamp: u64, fmt: &str, params: [u32; 8]) -> DevlogEntry {
        DevlogEntry::new(
            seqno,
            timestamp,
            DevlogLevel::INFO,
            DevlogFacility::MAC,
            fmt,
            params,
        )
    }

    fn unwritten() -> DevlogEntry {
        DevlogEntry::new(
            0,
            0,
            DevlogLevel(0),
            DevlogFacility(0),
            "",
            [0; 8],
        )
    }

    #[test]
    fn replays_in_sequence_order() {
        // Ring wrapped: the oldest entry sits in the middle, and a hole
        // (slot 2) produces no output line.
        let log = raw(&[
            entry(5, 500, "e", [0; 8]),
            entry(3, 300, "c", [0; 8]),
            unwritten(),
            entry(4, 400, "d", [0; 8]),
        ]);
        let devlog = Devlog::new(&log).unwrap();
        assert_eq!(devlog.capacity(), 4);
        let expected = concat!(
            "      Seq#           Tstamp     Level  Facility  Message\n",
            "         3              300      INFO       MAC  c\n",
            "         4              400      INFO       MAC  d\n",
            "         5              500      INFO       MAC  e\n",
        );
        assert_eq!(devlog.to_string(), expected);
    }

    #[test]
    fn all_empty_log_renders_header_only() {
        let log = raw(&vec![unwritten(); 16]);
        let devlog = Devlog::new(&log).unwrap();
        assert_eq!(devlog.to_string().lines().count(), 1);
    }

    #[test]
    fn truncated_region_is_rejected() {
        let log = raw(&[entry(1, 1, "x", [0; 8])]);
        assert!(matches!(
            Devlog::new(&log[..100]),
            Err(DiagError::CaptureSize { .. })
        ));
    }

    #[test]
    fn message_interpolation() {
        let e = entry(1, 1, "port %u link %08x rc %d %% %q", [3, 0xabcd, 7, 9, 0, 0, 0, 0]);
        assert_eq!(format_message(&e), "port 3 link 0000abcd rc 7 % %q");
    }

    #[test]
    fn long_modifiers_and_width() {
        let e = entry(1, 1, "addr %llx pad %4u end", [0xbeef, 42, 0, 0, 0, 0, 0, 0]);
        assert_eq!(format_message(&e), "addr beef pad   42 end");
    }
}
