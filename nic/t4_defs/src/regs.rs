// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Register bit layouts consumed by the diagnostic views.
//!
//! Only the registers the views actually decode are defined, and only down
//! to the fields they read. Values arrive as already-captured 32-bit words;
//! nothing here touches the device.

use bitfield_struct::bitfield;

/// UP_DBG_LA_CFG: CIM logic-analyzer capture configuration.
#[bitfield(u32)]
pub struct UpDbgLaCfg {
    /// Capture write pointer.
    #[bits(12)]
    pub wr_ptr: u16,

    #[bits(18)]
    _reserved: u32,

    /// Capture program-counter values only, dropping the load/store trace.
    pub capture_pc_only: bool,

    /// Capture enable.
    pub enable: bool,
}

/// TP_DBG_LA_CONFIG: TP logic-analyzer capture configuration.
#[bitfield(u32)]
pub struct TpDbgLaConfig {
    #[bits(14)]
    _reserved: u32,

    /// Capture mode: 0/1 one 64-bit word per event, 2 two words per event,
    /// 3 two words with a command-dependent second-word layout.
    #[bits(2)]
    pub mode: u8,

    /// Event filter mask.
    #[bits(16)]
    pub filter_mask: u16,
}

/// First status word of a CIM queue: the read pointer.
#[bitfield(u32)]
pub struct CimQueueRdAddr {
    /// Read pointer within the queue memory.
    #[bits(14)]
    pub rdaddr: u16,

    #[bits(18)]
    _reserved: u32,
}

/// Second status word of a CIM queue: the write pointer.
#[bitfield(u32)]
pub struct CimQueueWrAddr {
    /// Write pointer within the queue memory.
    #[bits(14)]
    pub wraddr: u16,

    #[bits(18)]
    _reserved: u32,
}

/// Third status word of a CIM queue: remaining free space.
#[bitfield(u32)]
pub struct CimQueueRemFlits {
    /// Free queue capacity in 16-byte flits.
    #[bits(13)]
    pub remflits: u16,

    #[bits(19)]
    _reserved: u32,
}

/// Fourth status word of a CIM queue: packet boundary counters.
#[bitfield(u32)]
pub struct CimQueuePktCnt {
    /// End-of-packet count.
    #[bits(12)]
    pub eopcnt: u16,

    #[bits(4)]
    _reserved: u16,

    /// Start-of-packet count.
    #[bits(12)]
    pub sopcnt: u16,

    #[bits(4)]
    _reserved2: u16,
}

/// TP_RSS_PF_MAP: per-PF lookup-table index assignments.
#[bitfield(u32)]
pub struct RssPfMap {
    /// Packed 3-bit lookup-table index per PF; use [`RssPfMap::pf_lkpidx`].
    #[bits(24)]
    pub map: u32,

    /// Width of the lookup-table index in use.
    #[bits(2)]
    pub lkpidx_size: u8,

    #[bits(6)]
    _reserved: u8,
}

impl RssPfMap {
    /// Lookup-table index assigned to `pf`.
    pub fn pf_lkpidx(&self, pf: usize) -> u32 {
        (self.into_bits() >> (3 * pf as u32)) & 0x7
    }
}

/// TP_RSS_PF_MSK: packed 4-bit mask size per PF.
#[bitfield(u32)]
pub struct RssPfMask {
    /// Packed mask sizes; use [`RssPfMask::pf_mask_size`].
    pub mask: u32,
}

impl RssPfMask {
    /// Hash mask size of `pf`.
    pub fn pf_mask_size(&self, pf: usize) -> u32 {
        (self.into_bits() >> (4 * pf as u32)) & 0xf
    }
}

/// TP_RSS_PF_CONFIG: per-PF RSS behavior.
#[bitfield(u32)]
pub struct RssPfConfig {
    /// Default response queue for channel 0.
    #[bits(10)]
    pub ch0_default_queue: u16,

    /// Default response queue for channel 1.
    #[bits(10)]
    pub ch1_default_queue: u16,

    /// Hash the 2-tuple of IPv4 packets.
    pub ip4_two_tuple_en: bool,
    /// Hash the 4-tuple of IPv4 TCP packets.
    pub ip4_four_tuple_en: bool,
    /// Hash the 2-tuple of IPv6 packets.
    pub ip6_two_tuple_en: bool,
    /// Hash the 4-tuple of IPv6 TCP packets.
    pub ip6_four_tuple_en: bool,
    /// Hash the 4-tuple of UDP packets.
    pub udp_four_tuple_en: bool,

    /// Width of the inner VF field in VF-forwarded interrupts.
    #[bits(3)]
    pub ivf_width: u8,

    /// Include the port in the lookup.
    pub prt_enable: bool,
    /// Include the channel in the lookup.
    pub chn_enable: bool,
    /// Enable the PF mapping.
    pub map_enable: bool,

    _reserved: bool,
}

/// TP_RSS_VF_CONFIG high word: per-VF RSS behavior.
#[bitfield(u32)]
pub struct RssVfConfig {
    /// Default response queue.
    #[bits(10)]
    pub default_queue: u16,

    /// Secret key index.
    #[bits(4)]
    pub key_index: u8,

    /// Hash UDP packets.
    pub enable_udp_hash: bool,
    /// Hash the 2-tuple of IPv4 packets.
    pub ip4_two_tuple_en: bool,
    /// Hash the 4-tuple of IPv4 TCP packets.
    pub ip4_four_tuple_en: bool,
    /// Hash the 2-tuple of IPv6 packets.
    pub ip6_two_tuple_en: bool,
    /// Hash the 4-tuple of IPv6 TCP packets.
    pub ip6_four_tuple_en: bool,
    /// Hash the microprocessor-bound queue.
    pub up_enable: bool,
    /// Extract the VLAN tag before hashing.
    pub vlan_extract: bool,

    /// Lookup-table index.
    #[bits(3)]
    pub lkp_index: u8,

    /// Include the port in the lookup.
    pub prt_enable: bool,
    /// Include the channel in the lookup.
    pub chn_enable: bool,

    #[bits(6)]
    _reserved: u8,
}

/// MPS classification SRAM low word, T4/T5 layout.
#[bitfield(u32)]
pub struct ClsSramLo {
    /// Matching VF, valid when [`ClsSramLo::vf_valid`].
    #[bits(7)]
    pub vf: u8,

    /// The VF field is in use.
    pub vf_valid: bool,

    /// Matching PF.
    #[bits(3)]
    pub pf: u8,

    /// Replicate matches across the replication map.
    pub replicate: bool,

    /// The row is programmed.
    pub sram_vld: bool,

    /// Priority for port 0.
    #[bits(3)]
    pub prio0: u8,
    /// Priority for port 1.
    #[bits(3)]
    pub prio1: u8,
    /// Priority for port 2.
    #[bits(3)]
    pub prio2: u8,
    /// Priority for port 3.
    #[bits(3)]
    pub prio3: u8,

    /// Multi-listen group.
    #[bits(4)]
    pub multi_listen: u8,

    #[bits(3)]
    _reserved: u8,
}

/// MPS classification SRAM low word, T6 layout (wider VF space).
#[bitfield(u32)]
pub struct T6ClsSramLo {
    /// Matching VF, valid when [`T6ClsSramLo::vf_valid`].
    #[bits(9)]
    pub vf: u16,

    /// The VF field is in use.
    pub vf_valid: bool,

    /// Matching PF.
    #[bits(3)]
    pub pf: u8,

    /// Replicate matches across the replication map.
    pub replicate: bool,

    /// The row is programmed.
    pub sram_vld: bool,

    /// Priority for port 0.
    #[bits(3)]
    pub prio0: u8,
    /// Priority for port 1.
    #[bits(3)]
    pub prio1: u8,
    /// Priority for port 2.
    #[bits(3)]
    pub prio2: u8,
    /// Priority for port 3.
    #[bits(3)]
    pub prio3: u8,

    /// Multi-listen group.
    #[bits(4)]
    pub multi_listen: u8,

    _reserved: bool,
}

/// MPS classification SRAM high word.
#[bitfield(u32)]
pub struct ClsSramHi {
    /// Destination port map.
    #[bits(4)]
    pub port_map: u8,

    #[bits(28)]
    _reserved: u32,
}

/// MPS_CLS_TCAM_DATA1 readback: the upper TCAM payload bits.
#[bitfield(u32)]
pub struct TcamData1 {
    /// MAC address bits 47:32.
    #[bits(16)]
    pub dmach: u16,

    /// VLAN id, or VNI bits 11:0 for inner-header rows.
    #[bits(12)]
    pub vidl: u16,

    #[bits(4)]
    _reserved: u8,
}

/// MPS_CLS_TCAM_DATA2_CTL readback: lookup classification bits.
#[bitfield(u32)]
pub struct TcamData2 {
    /// VNI bits 22:16 for inner-header rows.
    #[bits(7)]
    pub vidh1: u8,

    /// VLAN-valid for outer rows; VNI bit 23 for inner rows.
    pub vidh2: bool,

    /// Destination-IP hit qualifier (inner rows).
    pub dip_hit: bool,

    /// Lookup type: 0 matches the outer header, nonzero (and not all ones)
    /// the inner header.
    #[bits(2)]
    pub lookup_type: u8,

    /// Ingress port qualifier.
    #[bits(4)]
    pub port_num: u8,

    #[bits(17)]
    _reserved: u32,
}

impl TcamData2 {
    /// Whether this row matches on the inner (encapsulated) header.
    pub fn is_inner_lookup(&self) -> bool {
        self.lookup_type() != 0 && self.lookup_type() != 0x3
    }

    /// The 24-bit virtual network identifier of an inner-header row.
    pub fn vni(&self, data1: TcamData1) -> u32 {
        ((self.vidh2() as u32) << 23) | ((self.vidh1() as u32) << 16) | data1.vidl() as u32
    }
}
