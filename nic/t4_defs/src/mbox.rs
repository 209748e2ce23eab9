// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Firmware mailbox command records.

/// Size of a firmware mailbox in bytes.
pub const MBOX_LEN: usize = 64;

/// One logged mailbox command or reply, in host byte order.
///
/// The driver appends one of these per mailbox access; slot reuse makes the
/// log circular. A zero timestamp marks a slot that was never used.
#[derive(Debug, Copy, Clone)]
pub struct MboxCmd {
    /// The command flits, as written to (or read back from) the mailbox.
    pub cmd: [u64; MBOX_LEN / 8],
    /// Host timestamp of the access; zero for an unused slot.
    pub timestamp: u64,
    /// Sequence number of the access.
    pub seqno: u32,
    /// Microseconds spent waiting for mailbox ownership; negative on
    /// timeout.
    pub access: i16,
    /// Microseconds spent waiting for the command to complete; negative on
    /// timeout.
    pub execute: i16,
}

impl MboxCmd {
    /// An unused slot.
    pub const UNUSED: Self = Self {
        cmd: [0; MBOX_LEN / 8],
        timestamp: 0,
        seqno: 0,
        access: 0,
        execute: 0,
    };
}
