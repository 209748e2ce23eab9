// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! ULP RX logic-analyzer view.

use crate::DiagError;
use crate::filled_table;
use crate::word;
use rowtab::Row;
use rowtab::Table;
use std::fmt;
use t4_defs::ULPRX_LA_SIZE;

/// The ULP RX logic-analyzer capture.
pub fn ulprx_la(data: &[u8]) -> Result<Table, DiagError> {
    filled_table(ULPRX_LA_SIZE, 8 * 4, true, show_ulprx_la, data)
}

fn show_ulprx_la(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => {
            writeln!(w, "      Pcmd        Type   Message                Data")
        }
        Row::Data { bytes, .. } => {
            let p = |i| word(bytes, i);
            writeln!(
                w,
                "{:08x}{:08x}  {:4x}  {:08x}  {:08x}{:08x}{:08x}{:08x}",
                p(1),
                p(0),
                p(2),
                p(3),
                p(7),
                p(6),
                p(5),
                p(4)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_header() {
        let mut data = vec![0u8; ULPRX_LA_SIZE * 32];
        data[0..4].copy_from_slice(&0xdead_beef_u32.to_ne_bytes());
        let tab = ulprx_la(&data).unwrap();
        let out = tab.to_string();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("      Pcmd        Type   Message                Data")
        );
        assert_eq!(
            lines.next(),
            Some("00000000deadbeef     0  00000000  00000000000000000000000000000000")
        );
        assert_eq!(out.lines().count(), 1 + ULPRX_LA_SIZE);
    }
}
