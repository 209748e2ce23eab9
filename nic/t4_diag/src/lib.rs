// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Snapshot-based diagnostic views of Terminator NIC internals.
//!
//! Each view takes an already-captured copy of some piece of ASIC or
//! firmware state — a logic-analyzer buffer, a queue dump, the TCAM, the
//! device log — together with the [`AdapterParams`] describing the chip,
//! and renders it as structured text. Tabular state comes back as a
//! [`rowtab::Table`] so a paging front end can serve it incrementally;
//! the rest renders in one shot.
//!
//! Nothing here touches hardware. The snapshot provider decides how the
//! raw bytes are captured (and how capture races are serialized); views
//! assume each snapshot is internally consistent. Views fail only on
//! snapshot *shape* — a buffer that does not match the view's geometry —
//! never on content: unprogrammed rows, unknown enumerators, and missing
//! metadata all render gracefully.

pub mod cim;
pub mod devlog;
pub mod mbox;
pub mod meminfo;
pub mod mps;
pub mod rss;
pub mod tp;
pub mod ulprx;

use bitfmt::FieldError;
use rowtab::ShowFn;
use rowtab::Table;
use rowtab::TableError;
use t4_defs::ChipVersion;
use thiserror::Error;

/// Errors from constructing a diagnostic view.
#[derive(Debug, Error)]
pub enum DiagError {
    /// Table allocation or trimming failed.
    #[error("table paging error: {0}")]
    Table(#[from] TableError),
    /// A field descriptor was malformed.
    #[error("field descriptor error: {0}")]
    Field(#[from] FieldError),
    /// The capture buffer does not match the view's geometry.
    #[error("capture is {actual} bytes, expected {expected}")]
    CaptureSize {
        /// Byte length the view's geometry requires.
        expected: usize,
        /// Byte length actually supplied.
        actual: usize,
    },
    /// The capture was taken in a form another chip revision exposes.
    #[error("capture form does not match the chip revision")]
    CaptureForm,
    /// A captured array has the wrong number of elements.
    #[error("capture has {actual} {what}, expected {expected}")]
    CaptureCount {
        /// What was being counted.
        what: &'static str,
        /// Element count the view's geometry requires.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
}

/// Chip-instance configuration shared by every view.
///
/// An immutable value captured once per diagnostic session; views never
/// consult globals.
#[derive(Debug, Copy, Clone)]
pub struct AdapterParams {
    /// The ASIC revision.
    pub chip: ChipVersion,
    /// Depth of the CIM logic-analyzer capture, in 32-bit words.
    pub cim_la_size: usize,
    /// Number of VFs with RSS configuration state.
    pub vf_count: usize,
    /// Width of the MPS replication map in bits.
    pub mps_rplc_size: usize,
}

impl AdapterParams {
    /// Parameters with the stock capacities of `chip`.
    pub fn new(chip: ChipVersion) -> Self {
        Self {
            chip,
            cim_la_size: 2048,
            vf_count: 128,
            mps_rplc_size: if chip == ChipVersion::T4 { 128 } else { 256 },
        }
    }
}

/// Builds a table of `rows` rows of `width` bytes filled from `data`,
/// which must match the geometry exactly.
pub(crate) fn filled_table(
    rows: usize,
    width: usize,
    has_header: bool,
    show: ShowFn,
    data: &[u8],
) -> Result<Table, DiagError> {
    if data.len() != rows * width {
        return Err(DiagError::CaptureSize {
            expected: rows * width,
            actual: data.len(),
        });
    }
    let mut tab = Table::new(rows, width, has_header, show)?;
    tab.buf_mut().copy_from_slice(data);
    Ok(tab)
}

/// 32-bit word `i` of a row, native-endian.
pub(crate) fn word(bytes: &[u8], i: usize) -> u32 {
    u32::from_ne_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap())
}

/// 64-bit word `i` of a row, native-endian.
pub(crate) fn dword(bytes: &[u8], i: usize) -> u64 {
    u64::from_ne_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap())
}

/// 16-bit word `i` of a row, native-endian.
pub(crate) fn half(bytes: &[u8], i: usize) -> u16 {
    u16::from_ne_bytes(bytes[i * 2..i * 2 + 2].try_into().unwrap())
}

/// `"yes"`/`"no"`, for the configuration views.
pub(crate) fn yesno(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}
