// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! TP (protocol engine) logic-analyzer view.

use crate::DiagError;
use crate::dword;
use crate::filled_table;
use bitfmt::FieldDesc;
use rowtab::Row;
use rowtab::Table;
use std::fmt;
use t4_defs::TPLA_SIZE;
use t4_defs::regs::TpDbgLaConfig;
use t4_defs::tp_la::TP_LA0;
use t4_defs::tp_la::TP_LA1;
use t4_defs::tp_la::TP_LA2;

/// Set in the first capture word when the event carries an MPS VF
/// classification, selecting the [`TP_LA2`] layout for the second word.
const VF_CLASSIFICATION: u64 = 1 << 17;

/// The TP logic-analyzer capture, in whichever of the three capture modes
/// `config` selects.
pub fn tp_la(config: TpDbgLaConfig, data: &[u8]) -> Result<Table, DiagError> {
    match config.mode() {
        2 => filled_table(TPLA_SIZE / 2, 2 * 8, false, show_tp_la_2, data),
        3 => filled_table(TPLA_SIZE / 2, 2 * 8, false, show_tp_la_3, data),
        _ => filled_table(TPLA_SIZE, 8, false, show_tp_la, data),
    }
}

// The constant tables are well-formed, so a decode failure can only be a
// formatter failure.
fn put_fields(w: &mut dyn fmt::Write, word: u64, fields: &[FieldDesc]) -> fmt::Result {
    w.write_str(&bitfmt::decode(word, fields).map_err(|_| fmt::Error)?)
}

fn show_tp_la(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => Ok(()),
        Row::Data { bytes, .. } => put_fields(w, dword(bytes, 0), TP_LA0),
    }
}

fn show_tp_la_2(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => Ok(()),
        Row::Data { index, bytes } => {
            if index != 0 {
                writeln!(w)?;
            }
            put_fields(w, dword(bytes, 0), TP_LA0)?;
            // The capture pads the final event with an all-ones word.
            let second = dword(bytes, 1);
            if index < TPLA_SIZE / 2 - 1 || second != u64::MAX {
                put_fields(w, second, TP_LA0)?;
            }
            Ok(())
        }
    }
}

fn show_tp_la_3(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => Ok(()),
        Row::Data { index, bytes } => {
            if index != 0 {
                writeln!(w)?;
            }
            let first = dword(bytes, 0);
            put_fields(w, first, TP_LA0)?;
            let second = dword(bytes, 1);
            if index < TPLA_SIZE / 2 - 1 || second != u64::MAX {
                let table = if first & VF_CLASSIFICATION != 0 {
                    TP_LA2
                } else {
                    TP_LA1
                };
                put_fields(w, second, table)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(words: &[u64]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn single_word_mode() {
        let data = capture(&[0; TPLA_SIZE]);
        let tab = tp_la(TpDbgLaConfig::new(), &data).unwrap();
        assert_eq!(tab.rows(), TPLA_SIZE);
        let out = tab.to_string();
        assert!(out.contains("RcfOpCodeOut: 0"));
        assert!(out.contains("TxCongestion: 0"));
    }

    #[test]
    fn mode_three_selects_second_word_table() {
        let mut words = vec![0u64; TPLA_SIZE];
        // Event 0: plain CPL trace; event 1: VF classification.
        words[0] = 0;
        words[1] = 0xff_u64 << 56;
        words[2] = VF_CLASSIFICATION;
        words[3] = 0xff_u64 << 56;
        let data = capture(&words);
        let tab = tp_la(TpDbgLaConfig::new().with_mode(3), &data).unwrap();
        assert_eq!(tab.rows(), TPLA_SIZE / 2);

        let mut first_row = String::new();
        let mut second_row = String::new();
        show_tp_la_3(&mut first_row, tab.entry(0).unwrap()).unwrap();
        show_tp_la_3(&mut second_row, tab.entry(1).unwrap()).unwrap();
        // CplCmdIn is common to both layouts, but only TP_LA2 decodes the
        // MPS fields and only TP_LA1 decodes CplCmdOut.
        assert!(first_row.contains("CplCmdIn: 255"));
        assert!(first_row.contains("CplCmdOut: 0"));
        assert!(!first_row.contains("MpsVf"));
        assert!(second_row.contains("CplCmdIn: 255"));
        assert!(second_row.contains("MpsVfVld: 0"));
        assert!(!second_row.contains("CplCmdOut"));
    }

    #[test]
    fn final_all_ones_word_is_suppressed() {
        let mut words = vec![0u64; TPLA_SIZE];
        words[TPLA_SIZE - 1] = u64::MAX;
        let data = capture(&words);
        let tab = tp_la(TpDbgLaConfig::new().with_mode(2), &data).unwrap();

        let mut last = String::new();
        let pos = tab.rows() - 1;
        if let Some(row) = tab.entry(pos) {
            show_tp_la_2(&mut last, row).unwrap();
        }
        // One decoded word plus the separating blank line; the padding
        // word produces nothing.
        assert_eq!(last.matches("RcfOpCodeOut").count(), 1);

        // An all-ones second word mid-capture is real data and decodes.
        let mut words = vec![0u64; TPLA_SIZE];
        words[1] = u64::MAX;
        let data = capture(&words);
        let tab = tp_la(TpDbgLaConfig::new().with_mode(2), &data).unwrap();
        let mut first = String::new();
        if let Some(row) = tab.entry(0) {
            show_tp_la_2(&mut first, row).unwrap();
        }
        assert_eq!(first.matches("RcfOpCodeOut").count(), 2);
    }
}
