// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! MPS classification TCAM view.
//!
//! Each row pairs an X/Y TCAM entry with two classification SRAM words.
//! A bit is matched when exactly one of X/Y is set (value in Y); a row
//! whose X and Y overlap is unprogrammed. T4/T5 expose the TCAM halves as
//! plain 64-bit reads, T6 as three-word indirect readbacks per half.

use crate::AdapterParams;
use crate::DiagError;
use rowtab::Row;
use rowtab::Table;
use std::fmt;
use t4_defs::ChipVersion;
use t4_defs::regs::ClsSramHi;
use t4_defs::regs::ClsSramLo;
use t4_defs::regs::T6ClsSramLo;
use t4_defs::regs::TcamData1;
use t4_defs::regs::TcamData2;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

/// One captured classification row in the T4/T5 form.
#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TcamRow {
    /// Y half of the TCAM entry.
    pub tcamy: u64,
    /// X half of the TCAM entry.
    pub tcamx: u64,
    /// Classification SRAM low word ([`ClsSramLo`]).
    pub cls_lo: u32,
    /// Classification SRAM high word ([`ClsSramHi`]).
    pub cls_hi: u32,
    /// Replication map words, low to high.
    pub rplc: [u32; 8],
    rplc_valid: u8,
    rplc_words: u8,
    _pad: [u8; 6],
}

impl TcamRow {
    /// A captured row. `rplc` carries the replication map when the row
    /// replicates and the map read succeeded.
    pub fn new(tcamy: u64, tcamx: u64, cls_lo: u32, cls_hi: u32, rplc: Option<[u32; 8]>) -> Self {
        Self {
            tcamy,
            tcamx,
            cls_lo,
            cls_hi,
            rplc: rplc.unwrap_or_default(),
            rplc_valid: rplc.is_some() as u8,
            rplc_words: 0,
            _pad: [0; 6],
        }
    }
}

/// One captured classification row in the T6 readback form.
#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct T6TcamRow {
    /// DATA0 readback of the Y half: payload bits 31:0.
    pub tcamy_data0: u32,
    /// DATA1 readback of the Y half ([`TcamData1`]).
    pub tcamy_data1: u32,
    /// DATA2 readback of the Y half ([`TcamData2`]).
    pub tcamy_data2: u32,
    /// DATA0 readback of the X half.
    pub tcamx_data0: u32,
    /// DATA1 readback of the X half.
    pub tcamx_data1: u32,
    /// DATA2 readback of the X half.
    pub tcamx_data2: u32,
    /// Classification SRAM low word ([`T6ClsSramLo`]).
    pub cls_lo: u32,
    /// Classification SRAM high word ([`ClsSramHi`]).
    pub cls_hi: u32,
    /// Replication map words, low to high.
    pub rplc: [u32; 8],
    rplc_valid: u8,
    _pad: [u8; 3],
}

impl T6TcamRow {
    /// A captured row; see [`TcamRow::new`].
    pub fn new(
        tcamy: [u32; 3],
        tcamx: [u32; 3],
        cls_lo: u32,
        cls_hi: u32,
        rplc: Option<[u32; 8]>,
    ) -> Self {
        Self {
            tcamy_data0: tcamy[0],
            tcamy_data1: tcamy[1],
            tcamy_data2: tcamy[2],
            tcamx_data0: tcamx[0],
            tcamx_data1: tcamx[1],
            tcamx_data2: tcamx[2],
            cls_lo,
            cls_hi,
            rplc: rplc.unwrap_or_default(),
            rplc_valid: rplc.is_some() as u8,
            _pad: [0; 3],
        }
    }
}

/// A TCAM capture in whichever form the chip exposes.
pub enum TcamCapture<'a> {
    /// T4/T5: X/Y halves read directly.
    Direct(&'a [TcamRow]),
    /// T6: per-half DATA0/1/2 readbacks.
    Readback(&'a [T6TcamRow]),
}

/// The MPS classification TCAM.
pub fn mps_tcam(params: &AdapterParams, capture: TcamCapture<'_>) -> Result<Table, DiagError> {
    let expected = params.chip.mps_cls_sram_rows();
    match capture {
        TcamCapture::Direct(rows) => {
            if params.chip == ChipVersion::T6 {
                return Err(DiagError::CaptureForm);
            }
            if rows.len() != expected {
                return Err(DiagError::CaptureCount {
                    what: "TCAM rows",
                    expected,
                    actual: rows.len(),
                });
            }
            let width = size_of::<TcamRow>();
            let mut tab = Table::new(rows.len(), width, true, show_tcam)?;
            let rplc_words = if params.mps_rplc_size > 128 { 8 } else { 4 };
            for ((idx, chunk), row) in tab.buf_mut().chunks_exact_mut(width).enumerate().zip(rows)
            {
                let mut r = *row;
                r.rplc_words = rplc_words;
                if ClsSramLo::from_bits(r.cls_lo).replicate() && r.rplc_valid == 0 {
                    tracing::warn!(row = idx, "MPS replication map unavailable");
                }
                chunk.copy_from_slice(r.as_bytes());
            }
            Ok(tab)
        }
        TcamCapture::Readback(rows) => {
            if params.chip != ChipVersion::T6 {
                return Err(DiagError::CaptureForm);
            }
            if rows.len() != expected {
                return Err(DiagError::CaptureCount {
                    what: "TCAM rows",
                    expected,
                    actual: rows.len(),
                });
            }
            let width = size_of::<T6TcamRow>();
            let mut tab = Table::new(rows.len(), width, true, show_tcam_t6)?;
            for ((idx, chunk), row) in tab.buf_mut().chunks_exact_mut(width).enumerate().zip(rows)
            {
                if T6ClsSramLo::from_bits(row.cls_lo).replicate() && row.rplc_valid == 0 {
                    tracing::warn!(row = idx, "MPS replication map unavailable");
                }
                chunk.copy_from_slice(row.as_bytes());
            }
            Ok(tab)
        }
    }
}

/// Recovers the value/mask form of a 48-bit X/Y pair: a bit is cared for
/// when exactly one half has it set, and the value is the Y half.
fn tcam_valmask(x: u64, y: u64) -> ([u8; 6], u64) {
    let mask = (x | y) & 0xffff_ffff_ffff;
    let mut addr = [0u8; 6];
    for (i, b) in addr.iter_mut().enumerate() {
        *b = (y >> (8 * (5 - i))) as u8;
    }
    (addr, mask)
}

fn flag(v: bool) -> char {
    if v { 'Y' } else { 'N' }
}

fn write_replication(
    w: &mut dyn fmt::Write,
    replicate: bool,
    rplc: &[u32; 8],
    words: usize,
) -> fmt::Result {
    if replicate {
        for i in (0..words).rev() {
            write!(w, " {:08x}", rplc[i])?;
        }
        Ok(())
    } else {
        write!(w, "{:1$}", "", 9 * words)
    }
}

fn show_tcam(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { buf } => {
            let wide = TcamRow::read_from_prefix(buf)
                .map(|(r, _)| r.rplc_words > 4)
                .unwrap_or(false);
            if wide {
                writeln!(
                    w,
                    "Idx  Ethernet address     Mask     Vld Ports PF  VF                           \
                     Replication                                    P0 P1 P2 P3  ML"
                )
            } else {
                writeln!(
                    w,
                    "Idx  Ethernet address     Mask     Vld Ports PF  VF              \
                     Replication          P0 P1 P2 P3  ML"
                )
            }
        }
        Row::Data { index, bytes } => {
            let r = TcamRow::read_from_bytes(bytes).map_err(|_| fmt::Error)?;
            if r.tcamx & r.tcamy != 0 {
                return writeln!(w, "{:3}         -", index);
            }
            let (addr, mask) = tcam_valmask(r.tcamx, r.tcamy);
            let lo = ClsSramLo::from_bits(r.cls_lo);
            let hi = ClsSramHi::from_bits(r.cls_hi);
            write!(
                w,
                "{:3} {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x} {:012x}{:>3}   {:#x}{:4}{:4}",
                index,
                addr[0],
                addr[1],
                addr[2],
                addr[3],
                addr[4],
                addr[5],
                mask,
                flag(lo.sram_vld()),
                hi.port_map(),
                lo.pf(),
                if lo.vf_valid() { lo.vf() as i32 } else { -1 },
            )?;
            write_replication(w, lo.replicate(), &r.rplc, r.rplc_words as usize)?;
            writeln!(
                w,
                "{:4}{:3}{:3}{:3} {:#x}",
                lo.prio0(),
                lo.prio1(),
                lo.prio2(),
                lo.prio3(),
                lo.multi_listen(),
            )
        }
    }
}

fn show_tcam_t6(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => writeln!(
            w,
            "Idx  Ethernet address     Mask       VNI   Mask   IVLAN Vld DIP_Hit   Lookup  Port \
             Vld Ports PF  VF                           Replication                             \
                P0 P1 P2 P3  ML"
        ),
        Row::Data { index, bytes } => {
            let r = T6TcamRow::read_from_bytes(bytes).map_err(|_| fmt::Error)?;
            let data1y = TcamData1::from_bits(r.tcamy_data1);
            let data2y = TcamData2::from_bits(r.tcamy_data2);
            let data1x = TcamData1::from_bits(r.tcamx_data1);
            let data2x = TcamData2::from_bits(r.tcamx_data2);
            let tcamy = ((data1y.dmach() as u64) << 32) | r.tcamy_data0 as u64;
            let tcamx = ((data1x.dmach() as u64) << 32) | r.tcamx_data0 as u64;
            if tcamx & tcamy != 0 {
                return writeln!(w, "{:3}         -", index);
            }
            let (addr, mask) = tcam_valmask(tcamx, tcamy);
            let lo = T6ClsSramLo::from_bits(r.cls_lo);
            let hi = ClsSramHi::from_bits(r.cls_hi);
            let vf = if lo.vf_valid() { lo.vf() as i32 } else { -1 };
            write!(
                w,
                "{:3} {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x} {:012x}",
                index, addr[0], addr[1], addr[2], addr[3], addr[4], addr[5], mask,
            )?;
            if data2y.is_inner_lookup() {
                write!(
                    w,
                    " {:06x} {:06x}    -    -   {:>3}      'I'  {:4x}   {:>3}   {:#x}{:4}{:4}",
                    data2y.vni(data1y),
                    data2x.vni(data1x),
                    flag(data2y.dip_hit()),
                    data2y.port_num(),
                    flag(lo.sram_vld()),
                    hi.port_map(),
                    lo.pf(),
                    vf,
                )?;
            } else {
                write!(w, "    -       -   ")?;
                if data2y.vidh2() {
                    write!(w, "{:4}   Y     ", data1y.vidl())?;
                } else {
                    write!(w, "  -    N     ")?;
                }
                write!(
                    w,
                    "-      {:>3}  {:4x}   {:>3}   {:#x}{:4}{:4}",
                    if data2y.lookup_type() != 0 { 'I' } else { 'O' },
                    data2y.port_num(),
                    flag(lo.sram_vld()),
                    hi.port_map(),
                    lo.pf(),
                    vf,
                )?;
            }
            write_replication(w, lo.replicate(), &r.rplc, 8)?;
            writeln!(
                w,
                "{:4}{:3}{:3}{:3} {:#x}",
                lo.prio0(),
                lo.prio1(),
                lo.prio2(),
                lo.prio3(),
                lo.multi_listen(),
            )
        }
    }
}
