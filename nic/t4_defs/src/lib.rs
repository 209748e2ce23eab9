// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Chip-defined constants and layouts for Chelsio Terminator NICs.
//!
//! Everything in this crate is dictated by the hardware or the firmware:
//! per-revision capture geometries, register bit assignments, and the wire
//! formats of the structures the diagnostic views decode. No logic lives
//! here beyond field accessors.

pub mod devlog;
pub mod mbox;
pub mod regs;
pub mod tp_la;

/// A Terminator ASIC revision.
///
/// Capture geometry and several register layouts differ per revision, so
/// every view takes the revision as part of its configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChipVersion {
    /// Terminator 4.
    T4,
    /// Terminator 5.
    T5,
    /// Terminator 6.
    T6,
}

impl ChipVersion {
    /// Number of CIM outbound queues on this revision.
    pub fn cim_num_obq(self) -> usize {
        if self == ChipVersion::T4 {
            CIM_NUM_OBQ
        } else {
            CIM_NUM_OBQ_T5
        }
    }

    /// Number of MPS classification TCAM/SRAM rows on this revision.
    pub fn mps_cls_sram_rows(self) -> usize {
        if self == ChipVersion::T4 {
            NUM_MPS_CLS_SRAM_L_INSTANCES
        } else {
            NUM_MPS_T5_CLS_SRAM_L_INSTANCES
        }
    }
}

/// Number of CIM inbound queues.
pub const CIM_NUM_IBQ: usize = 6;
/// Number of CIM outbound queues on T4.
pub const CIM_NUM_OBQ: usize = 6;
/// Number of CIM outbound queues on T5 and later.
pub const CIM_NUM_OBQ_T5: usize = 8;
/// Number of 192-bit rows in the CIM PIF logic-analyzer capture.
pub const CIM_PIFLA_SIZE: usize = 64;
/// Number of 160-bit rows in the CIM MA logic-analyzer capture.
pub const CIM_MALA_SIZE: usize = 64;
/// Number of 128-bit rows in a CIM inbound queue.
pub const CIM_IBQ_SIZE: usize = 128;
/// Number of 128-bit rows in a CIM outbound queue.
pub const CIM_OBQ_SIZE: usize = 128;
/// Number of 64-bit rows in the TP logic-analyzer capture.
pub const TPLA_SIZE: usize = 128;
/// Number of 256-bit rows in the ULP RX logic-analyzer capture.
pub const ULPRX_LA_SIZE: usize = 512;
/// Number of entries in the RSS lookup table.
pub const RSS_NENTRIES: usize = 2048;
/// MPS classification TCAM/SRAM rows on T4.
pub const NUM_MPS_CLS_SRAM_L_INSTANCES: usize = 336;
/// MPS classification TCAM/SRAM rows on T5 and later.
pub const NUM_MPS_T5_CLS_SRAM_L_INSTANCES: usize = 512;
