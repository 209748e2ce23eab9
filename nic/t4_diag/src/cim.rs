// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CIM (embedded microprocessor) views: logic-analyzer captures, queue
//! dumps, and queue configuration.

use crate::AdapterParams;
use crate::DiagError;
use crate::filled_table;
use crate::word;
use rowtab::Row;
use rowtab::ShowFn;
use rowtab::Table;
use std::fmt;
use std::fmt::Write;
use t4_defs::CIM_IBQ_SIZE;
use t4_defs::CIM_MALA_SIZE;
use t4_defs::CIM_NUM_IBQ;
use t4_defs::CIM_NUM_OBQ_T5;
use t4_defs::CIM_OBQ_SIZE;
use t4_defs::CIM_PIFLA_SIZE;
use t4_defs::ChipVersion;
use t4_defs::regs::CimQueuePktCnt;
use t4_defs::regs::CimQueueRdAddr;
use t4_defs::regs::CimQueueRemFlits;
use t4_defs::regs::CimQueueWrAddr;
use t4_defs::regs::UpDbgLaCfg;

/// The CIM logic-analyzer capture.
///
/// Row geometry and decoding depend on the chip revision and on whether
/// the analyzer was configured to capture program-counter values only.
pub fn cim_la(params: &AdapterParams, cfg: UpDbgLaCfg, data: &[u8]) -> Result<Table, DiagError> {
    let (rows, width, show): (usize, usize, ShowFn) = if params.chip == ChipVersion::T6 {
        // +1 to account for integer division of cim_la_size/10
        (
            params.cim_la_size / 10 + 1,
            10 * 4,
            if cfg.capture_pc_only() {
                show_cim_la_pc_t6
            } else {
                show_cim_la_t6
            },
        )
    } else {
        (
            params.cim_la_size / 8,
            8 * 4,
            if cfg.capture_pc_only() {
                show_cim_la_3in1
            } else {
                show_cim_la
            },
        )
    };
    filled_table(rows, width, true, show, data)
}

fn show_cim_la(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => {
            writeln!(w, "Status   Data      PC     LS0Stat  LS0Addr             LS0Data")
        }
        Row::Data { bytes, .. } => {
            let p = |i| word(bytes, i);
            writeln!(
                w,
                "  {:02x}  {:x}{:07x} {:x}{:07x} {:08x} {:08x} {:08x}{:08x}{:08x}{:08x}",
                (p(0) >> 4) & 0xff,
                p(0) & 0xf,
                p(1) >> 4,
                p(1) & 0xf,
                p(2) >> 4,
                p(2) & 0xf,
                p(3),
                p(4),
                p(5),
                p(6),
                p(7)
            )
        }
    }
}

// In PC-only mode the analyzer packs three samples into each row.
fn show_cim_la_3in1(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(w, "Status   Data      PC"),
        Row::Data { bytes, .. } => {
            let p = |i| word(bytes, i);
            writeln!(w, "  {:02x}   {:08x} {:08x}", p(5) & 0xff, p(6), p(7))?;
            writeln!(
                w,
                "  {:02x}   {:02x}{:06x} {:02x}{:06x}",
                (p(3) >> 8) & 0xff,
                p(3) & 0xff,
                p(4) >> 8,
                p(4) & 0xff,
                p(5) >> 8
            )?;
            writeln!(
                w,
                "  {:02x}   {:x}{:07x} {:x}{:07x}",
                (p(0) >> 4) & 0xff,
                p(0) & 0xf,
                p(1) >> 4,
                p(1) & 0xf,
                p(2) >> 4
            )
        }
    }
}

fn show_cim_la_t6(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(
            w,
            "Status   Inst    Data      PC     LS0Stat  LS0Addr  LS0Data  LS1Stat  LS1Addr  LS1Data"
        ),
        Row::Data { bytes, .. } => {
            let p = |i| word(bytes, i);
            writeln!(
                w,
                "  {:02x}   {:04x}{:04x} {:04x}{:04x} {:04x}{:04x} {:08x} {:08x} {:08x} {:08x} {:08x} {:08x}",
                (p(9) >> 16) & 0xff,
                p(9) & 0xffff,
                p(8) >> 16,
                p(8) & 0xffff,
                p(7) >> 16,
                p(7) & 0xffff,
                p(6) >> 16,
                p(2),
                p(1),
                p(0),
                p(5),
                p(4),
                p(3)
            )
        }
    }
}

fn show_cim_la_pc_t6(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(w, "Status   Inst    Data      PC"),
        Row::Data { bytes, .. } => {
            let p = |i| word(bytes, i);
            writeln!(
                w,
                "  {:02x}   {:08x} {:08x} {:08x}",
                p(3) & 0xff,
                p(2),
                p(1),
                p(0)
            )?;
            writeln!(
                w,
                "  {:02x}   {:02x}{:06x} {:02x}{:06x} {:02x}{:06x}",
                (p(6) >> 8) & 0xff,
                p(6) & 0xff,
                p(5) >> 8,
                p(5) & 0xff,
                p(4) >> 8,
                p(4) & 0xff,
                p(3) >> 8
            )?;
            writeln!(
                w,
                "  {:02x}   {:04x}{:04x} {:04x}{:04x} {:04x}{:04x}",
                (p(9) >> 16) & 0xff,
                p(9) & 0xffff,
                p(8) >> 16,
                p(8) & 0xffff,
                p(7) >> 16,
                p(7) & 0xffff,
                p(6) >> 16
            )
        }
    }
}

/// The CIM PIF logic-analyzer capture: inbound samples first, then the
/// outbound half with its own column layout.
pub fn cim_pif_la(data: &[u8]) -> Result<Table, DiagError> {
    filled_table(2 * CIM_PIFLA_SIZE, 6 * 4, true, show_cim_pif_la, data)
}

fn show_cim_pif_la(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(w, "Cntl ID DataBE   Addr                 Data"),
        Row::Data { index, bytes } => {
            let p = |i| word(bytes, i);
            if index < CIM_PIFLA_SIZE {
                writeln!(
                    w,
                    " {:02x}  {:02x}  {:04x}  {:08x} {:08x}{:08x}{:08x}{:08x}",
                    (p(5) >> 22) & 0xff,
                    (p(5) >> 16) & 0x3f,
                    p(5) & 0xffff,
                    p(4),
                    p(3),
                    p(2),
                    p(1),
                    p(0)
                )
            } else {
                if index == CIM_PIFLA_SIZE {
                    writeln!(w, "\nCntl ID               Data")?;
                }
                writeln!(
                    w,
                    " {:02x}  {:02x} {:08x}{:08x}{:08x}{:08x}",
                    (p(4) >> 6) & 0xff,
                    p(4) & 0x3f,
                    p(3),
                    p(2),
                    p(1),
                    p(0)
                )
            }
        }
    }
}

/// The CIM MA logic-analyzer capture.
pub fn cim_ma_la(data: &[u8]) -> Result<Table, DiagError> {
    filled_table(2 * CIM_MALA_SIZE, 5 * 4, true, show_cim_ma_la, data)
}

fn show_cim_ma_la(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(w),
        Row::Data { index, bytes } => {
            let p = |i| word(bytes, i);
            if index < CIM_MALA_SIZE {
                writeln!(w, "{:02x}{:08x}{:08x}{:08x}{:08x}", p(4), p(3), p(2), p(1), p(0))
            } else {
                if index == CIM_MALA_SIZE {
                    writeln!(w, "\nCnt ID Tag UE       Data       RDY VLD")?;
                }
                writeln!(
                    w,
                    "{:3} {:2}  {:x}   {} {:08x}{:08x}  {}   {}",
                    (p(2) >> 10) & 0xff,
                    (p(2) >> 7) & 7,
                    (p(2) >> 3) & 0xf,
                    (p(2) >> 2) & 1,
                    (p(1) >> 2) | ((p(2) & 3) << 30),
                    (p(0) >> 2) | ((p(1) & 3) << 30),
                    (p(0) >> 1) & 1,
                    p(0) & 1
                )
            }
        }
    }
}

fn show_cim_q(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => Ok(()),
        Row::Data { index, bytes } => {
            let p = |i| word(bytes, i);
            writeln!(
                w,
                "{:#06x}: {:08x} {:08x} {:08x} {:08x}",
                index * 16,
                p(0),
                p(1),
                p(2),
                p(3)
            )
        }
    }
}

/// A CIM inbound queue dump.
pub fn cim_ibq(data: &[u8]) -> Result<Table, DiagError> {
    filled_table(CIM_IBQ_SIZE, 4 * 4, false, show_cim_q, data)
}

/// A CIM outbound queue dump.
///
/// Outbound queues return however much was actually captured, so the
/// table is opened at maximum capacity and trimmed to the valid length.
pub fn cim_obq(data: &[u8]) -> Result<Table, DiagError> {
    let rows = 6 * CIM_OBQ_SIZE;
    let width = 4 * 4;
    if data.len() > rows * width {
        return Err(DiagError::CaptureSize {
            expected: rows * width,
            actual: data.len(),
        });
    }
    let mut tab = Table::new(rows, width, false, show_cim_q)?;
    tab.buf_mut()[..data.len()].copy_from_slice(data);
    tab.trim(data.len() / width)?;
    Ok(tab)
}

/// Pre-read register state for [`cim_qcfg`].
#[derive(Debug, Clone)]
pub struct CimQueueRegs<'a> {
    /// Base address of each queue, IBQs then OBQs.
    pub base: &'a [u16],
    /// Size of each queue, IBQs then OBQs.
    pub size: &'a [u16],
    /// Free-capacity threshold of each IBQ.
    pub thres: &'a [u16],
    /// Four status words per queue, IBQs then OBQs.
    pub stat: &'a [u32],
    /// Two shadow write pointers per OBQ.
    pub obq_wr: &'a [u32],
}

const QUEUE_NAMES: [&str; CIM_NUM_IBQ + CIM_NUM_OBQ_T5] = [
    "TP0", "TP1", "ULP", "SGE0", "SGE1", "NC-SI", // IBQs
    "ULP0", "ULP1", "ULP2", "ULP3", "SGE", "NC-SI", "SGE0-RX", "SGE1-RX", // OBQs
];

/// CIM queue configuration and occupancy.
pub fn cim_qcfg(params: &AdapterParams, regs: &CimQueueRegs<'_>) -> Result<String, DiagError> {
    let num_obq = params.chip.cim_num_obq();
    let nq = CIM_NUM_IBQ + num_obq;
    for (what, expected, actual) in [
        ("queue bases", nq, regs.base.len()),
        ("queue sizes", nq, regs.size.len()),
        ("IBQ thresholds", CIM_NUM_IBQ, regs.thres.len()),
        ("status words", 4 * nq, regs.stat.len()),
        ("OBQ write pointers", 2 * num_obq, regs.obq_wr.len()),
    ] {
        if actual != expected {
            return Err(DiagError::CaptureCount {
                what,
                expected,
                actual,
            });
        }
    }

    let mut out = String::new();
    let _ = writeln!(&mut out, "  Queue  Base  Size Thres  RdPtr WrPtr  SOP  EOP Avail");
    for i in 0..CIM_NUM_IBQ {
        let p = &regs.stat[4 * i..];
        let _ = writeln!(
            &mut out,
            "{:>7} {:5x} {:5} {:5} {:6x}  {:4x} {:4} {:4} {:5}",
            QUEUE_NAMES[i],
            regs.base[i],
            regs.size[i],
            regs.thres[i],
            CimQueueRdAddr::from_bits(p[0]).rdaddr(),
            CimQueueWrAddr::from_bits(p[1]).wraddr(),
            CimQueuePktCnt::from_bits(p[3]).sopcnt(),
            CimQueuePktCnt::from_bits(p[3]).eopcnt(),
            CimQueueRemFlits::from_bits(p[2]).remflits() as u32 * 16,
        );
    }
    for i in CIM_NUM_IBQ..nq {
        let p = &regs.stat[4 * i..];
        let wr = &regs.obq_wr[2 * (i - CIM_NUM_IBQ)..];
        let _ = writeln!(
            &mut out,
            "{:>7} {:5x} {:5} {:12x}  {:4x} {:4} {:4} {:5}",
            QUEUE_NAMES[i],
            regs.base[i],
            regs.size[i],
            CimQueueRdAddr::from_bits(p[0]).rdaddr() & 0x3fff,
            wr[0].wrapping_sub(regs.base[i] as u32),
            CimQueuePktCnt::from_bits(p[3]).sopcnt(),
            CimQueuePktCnt::from_bits(p[3]).eopcnt(),
            CimQueueRemFlits::from_bits(p[2]).remflits() as u32 * 16,
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn words(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn cim_la_t5_geometry() {
        let params = AdapterParams::new(ChipVersion::T5);
        let rows = params.cim_la_size / 8;
        let data = vec![0; rows * 32];
        let tab = cim_la(&params, UpDbgLaCfg::new(), &data).unwrap();
        assert_eq!(tab.rows(), rows);
        assert!(tab.has_header());

        // A wrong-size capture never produces a table.
        assert!(matches!(
            cim_la(&params, UpDbgLaCfg::new(), &data[1..]),
            Err(DiagError::CaptureSize { .. })
        ));
    }

    #[test]
    fn cim_la_renders_full_trace() {
        let mut params = AdapterParams::new(ChipVersion::T5);
        params.cim_la_size = 16; // two rows
        let data = words(&[
            0x0000_0ab5, 0x1234_5678, 0x9abc_def0, 1, 2, 3, 4, 5, //
            0x0000_0fff, 0xffff_ffff, 0x0000_0000, 6, 7, 8, 9, 10,
        ]);
        let tab = cim_la(&params, UpDbgLaCfg::new(), &data).unwrap();
        expect![[r#"
            Status   Data      PC     LS0Stat  LS0Addr             LS0Data
              ab  51234567 89abcdef 00000000 00000001 00000002000000030000000400000005
              ff  ffffffff f0000000 00000000 00000006 0000000700000008000000090000000a
        "#]]
        .assert_eq(&tab.to_string());
    }

    #[test]
    fn cim_obq_trims_to_capture() {
        let data = vec![0xa5; 10 * 16];
        let tab = cim_obq(&data).unwrap();
        assert_eq!(tab.rows(), 10);
        assert!(!tab.has_header());
        assert!(tab.get(10).is_none());

        let too_big = vec![0; 6 * CIM_OBQ_SIZE * 16 + 16];
        assert!(cim_obq(&too_big).is_err());
    }

    #[test]
    fn cim_qcfg_renders() {
        let params = AdapterParams::new(ChipVersion::T4);
        let nq = CIM_NUM_IBQ + params.chip.cim_num_obq();
        let base: Vec<u16> = (0..nq as u16).map(|i| i * 0x100).collect();
        let size = vec![128u16; nq];
        let thres = vec![32u16; CIM_NUM_IBQ];
        let stat = vec![0u32; 4 * nq];
        let obq_wr: Vec<u32> = (0..2 * params.chip.cim_num_obq() as u32).collect();
        let out = cim_qcfg(
            &params,
            &CimQueueRegs {
                base: &base,
                size: &size,
                thres: &thres,
                stat: &stat,
                obq_wr: &obq_wr,
            },
        )
        .unwrap();
        assert!(out.starts_with("  Queue  Base  Size Thres  RdPtr WrPtr  SOP  EOP Avail\n"));
        assert_eq!(out.lines().count(), 1 + nq);
        assert!(out.contains("TP0"));
        assert!(out.contains("SGE0"));
    }
}
