// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Firmware device log wire format.
//!
//! The firmware keeps a circular log in adapter memory; the driver reads
//! the whole region in one shot and replays it host-side. Every multi-byte
//! field is big-endian on the wire, so the struct stores raw words and the
//! accessors convert.

use ringscan::RingEntry;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

/// Number of 32-bit parameters carried by each log entry.
pub const DEVLOG_PARAMS: usize = 8;

/// Byte length of the message format string in each entry.
pub const DEVLOG_FMT_LEN: usize = 64;

/// One slot of the firmware device log, as it sits in adapter memory.
#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DevlogEntry {
    timestamp: u64,
    seqno: u32,
    reserved1: u16,
    level: u8,
    facility: u8,
    fmt: [u8; DEVLOG_FMT_LEN],
    params: [u32; DEVLOG_PARAMS],
    reserved2: [u32; 4],
}

const _: () = assert!(size_of::<DevlogEntry>() == 128);

impl DevlogEntry {
    /// Builds a wire-format entry, converting to big-endian. Intended for
    /// snapshot producers and tests; the firmware writes the real thing.
    pub fn new(
        seqno: u32,
        timestamp: u64,
        level: DevlogLevel,
        facility: DevlogFacility,
        fmt: &str,
        params: [u32; DEVLOG_PARAMS],
    ) -> Self {
        let mut fmt_buf = [0; DEVLOG_FMT_LEN];
        fmt_buf[..fmt.len()].copy_from_slice(fmt.as_bytes());
        Self {
            timestamp: timestamp.to_be(),
            seqno: seqno.to_be(),
            reserved1: 0,
            level: level.0,
            facility: facility.0,
            fmt: fmt_buf,
            params: params.map(u32::to_be),
            reserved2: [0; 4],
        }
    }

    /// The write timestamp; zero marks a slot never written.
    pub fn timestamp(&self) -> u64 {
        u64::from_be(self.timestamp)
    }

    /// The entry's sequence number.
    pub fn seqno(&self) -> u32 {
        u32::from_be(self.seqno)
    }

    /// The entry's severity.
    pub fn level(&self) -> DevlogLevel {
        DevlogLevel(self.level)
    }

    /// The firmware subsystem that wrote the entry.
    pub fn facility(&self) -> DevlogFacility {
        DevlogFacility(self.facility)
    }

    /// Message parameter `i`.
    pub fn param(&self, i: usize) -> u32 {
        u32::from_be(self.params[i])
    }

    /// The printf-style message format, up to its NUL terminator.
    pub fn fmt_bytes(&self) -> &[u8] {
        let len = self.fmt.iter().position(|&b| b == 0).unwrap_or(self.fmt.len());
        &self.fmt[..len]
    }
}

impl RingEntry for DevlogEntry {
    fn seqno(&self) -> u32 {
        self.seqno()
    }
    fn timestamp(&self) -> u64 {
        self.timestamp()
    }
}

/// Severity of a device log entry. An open set: firmware newer than this
/// table renders as `UNKNOWN` rather than failing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DevlogLevel(pub u8);

impl DevlogLevel {
    /// Adapter is unusable.
    pub const EMERG: Self = Self(0);
    /// Immediate attention required.
    pub const CRIT: Self = Self(1);
    /// Error condition.
    pub const ERR: Self = Self(2);
    /// Normal but significant.
    pub const NOTICE: Self = Self(3);
    /// Informational.
    pub const INFO: Self = Self(4);
    /// Debug chatter.
    pub const DEBUG: Self = Self(5);

    /// Display name, if the level is known.
    pub fn as_str(&self) -> Option<&'static str> {
        Some(match *self {
            Self::EMERG => "EMERG",
            Self::CRIT => "CRIT",
            Self::ERR => "ERR",
            Self::NOTICE => "NOTICE",
            Self::INFO => "INFO",
            Self::DEBUG => "DEBUG",
            _ => return None,
        })
    }
}

/// The firmware subsystem a device log entry came from. Open set, like
/// [`DevlogLevel`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DevlogFacility(pub u8);

#[expect(missing_docs)] // the facility names speak for themselves
impl DevlogFacility {
    pub const CORE: Self = Self(0x00);
    pub const CF: Self = Self(0x01);
    pub const SCHED: Self = Self(0x02);
    pub const TIMER: Self = Self(0x04);
    pub const RES: Self = Self(0x06);
    pub const HW: Self = Self(0x08);
    pub const FLR: Self = Self(0x10);
    pub const DMAQ: Self = Self(0x12);
    pub const PHY: Self = Self(0x14);
    pub const MAC: Self = Self(0x16);
    pub const PORT: Self = Self(0x18);
    pub const VI: Self = Self(0x1a);
    pub const FILTER: Self = Self(0x1c);
    pub const ACL: Self = Self(0x1e);
    pub const TM: Self = Self(0x20);
    pub const QFC: Self = Self(0x22);
    pub const DCB: Self = Self(0x24);
    pub const ETH: Self = Self(0x26);
    pub const OFLD: Self = Self(0x28);
    pub const RI: Self = Self(0x2a);
    pub const ISCSI: Self = Self(0x2c);
    pub const FCOE: Self = Self(0x2e);
    pub const FOISCSI: Self = Self(0x30);
    pub const FOFCOE: Self = Self(0x32);

    /// Display name, if the facility is known.
    pub fn as_str(&self) -> Option<&'static str> {
        Some(match *self {
            Self::CORE => "CORE",
            Self::CF => "CF",
            Self::SCHED => "SCHED",
            Self::TIMER => "TIMER",
            Self::RES => "RES",
            Self::HW => "HW",
            Self::FLR => "FLR",
            Self::DMAQ => "DMAQ",
            Self::PHY => "PHY",
            Self::MAC => "MAC",
            Self::PORT => "PORT",
            Self::VI => "VI",
            Self::FILTER => "FILTER",
            Self::ACL => "ACL",
            Self::TM => "TM",
            Self::QFC => "QFC",
            Self::DCB => "DCB",
            Self::ETH => "ETH",
            Self::OFLD => "OFLD",
            Self::RI => "RI",
            Self::ISCSI => "ISCSI",
            Self::FCOE => "FCOE",
            Self::FOISCSI => "FOISCSI",
            Self::FOFCOE => "FOFCOE",
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_byte_order() {
        let e = DevlogEntry::new(
            0x0102_0304,
            0x1122_3344_5566_7788,
            DevlogLevel::INFO,
            DevlogFacility::MAC,
            "link %u up",
            [7, 0, 0, 0, 0, 0, 0, 0],
        );
        let bytes = e.as_bytes();
        // Big-endian on the wire: most significant byte first.
        assert_eq!(&bytes[0..8], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
        assert_eq!(&bytes[8..12], &[0x01, 0x02, 0x03, 0x04]);

        let decoded = DevlogEntry::read_from_bytes(bytes).unwrap();
        assert_eq!(decoded.seqno(), 0x0102_0304);
        assert_eq!(decoded.timestamp(), 0x1122_3344_5566_7788);
        assert_eq!(decoded.param(0), 7);
        assert_eq!(decoded.fmt_bytes(), b"link %u up");
    }

    #[test]
    fn unknown_level_and_facility() {
        assert_eq!(DevlogLevel(9).as_str(), None);
        assert_eq!(DevlogFacility(0xff).as_str(), None);
        assert_eq!(DevlogLevel::NOTICE.as_str(), Some("NOTICE"));
        assert_eq!(DevlogFacility::FOFCOE.as_str(), Some("FOFCOE"));
    }
}
