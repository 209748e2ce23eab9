// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mailbox command/reply log view.
//!
//! Unlike the device log, this ring lives host-side: the driver records
//! every mailbox access and keeps the cursor of the next slot to reuse,
//! so the cursor *is* the oldest entry and no sequence-number scan is
//! needed.

use ringscan::RingCursor;
use std::fmt;
use t4_defs::mbox::MboxCmd;

/// The driver's log of firmware mailbox commands and replies.
pub struct MboxLog {
    entries: Vec<MboxCmd>,
    cursor: usize,
}

impl MboxLog {
    /// An empty log of `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![MboxCmd::UNUSED; size],
            cursor: 0,
        }
    }

    /// Records one mailbox access, overwriting the oldest slot once the
    /// ring has wrapped.
    pub fn record(&mut self, cmd: MboxCmd) {
        self.entries[self.cursor] = cmd;
        self.cursor += 1;
        if self.cursor == self.entries.len() {
            self.cursor = 0;
        }
    }

    /// Number of slots in the log.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Renders the log oldest-first. Unused slots emit nothing.
    ///
    /// The log is not locked against concurrent recording; a command
    /// caught mid-update may render torn. Snapshot the log first if that
    /// matters.
    pub fn write_to(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            w,
            "{:>10}  {:>15}  {:>5}  {:>5}  Command/Reply",
            "Seq#", "Tstamp", "Atime", "Etime"
        )?;
        let cursor = RingCursor::new(self.cursor, self.entries.len());
        for physical in cursor.iter() {
            let entry = &self.entries[physical];
            if entry.timestamp == 0 {
                continue;
            }
            write!(
                w,
                "{:10}  {:15}  {:5}  {:5}",
                entry.seqno, entry.timestamp, entry.access, entry.execute
            )?;
            for flit in entry.cmd {
                write!(w, "  {:08x} {:08x}", (flit >> 32) as u32, flit as u32)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

impl fmt::Display for MboxLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(seqno: u32, first_flit: u64) -> MboxCmd {
        MboxCmd {
            cmd: [first_flit, 0, 0, 0, 0, 0, 0, 0],
            timestamp: 1000 + seqno as u64,
            seqno,
            access: 12,
            execute: -1,
        }
    }

    #[test]
    fn replays_from_cursor() {
        let mut log = MboxLog::new(3);
        for seqno in 0..5 {
            log.record(cmd(seqno, 0x1122_3344_5566_7788));
        }
        // Slots now hold seqnos [3, 4, 2] with the cursor at slot 2.
        let out = log.to_string();
        let seqs: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(seqs, ["2", "3", "4"]);
        assert!(out.contains("  11223344 55667788"));
        assert!(out.contains("     12     -1"));
    }

    #[test]
    fn unused_slots_are_silent() {
        let mut log = MboxLog::new(8);
        log.record(cmd(7, 0));
        let out = log.to_string();
        assert_eq!(out.lines().count(), 2);

        let empty = MboxLog::new(8);
        assert_eq!(empty.to_string().lines().count(), 1);
    }
}
