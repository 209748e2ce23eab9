// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! RSS views: the lookup table and the per-PF / per-VF configuration.

use crate::AdapterParams;
use crate::DiagError;
use crate::filled_table;
use crate::half;
use crate::word;
use crate::yesno;
use rowtab::Row;
use rowtab::Table;
use std::fmt;
use t4_defs::RSS_NENTRIES;
use t4_defs::regs::RssPfConfig;
use t4_defs::regs::RssPfMap;
use t4_defs::regs::RssPfMask;
use t4_defs::regs::RssVfConfig;

/// The RSS lookup table, eight 16-bit entries per line.
pub fn rss(data: &[u8]) -> Result<Table, DiagError> {
    filled_table(RSS_NENTRIES / 8, 8 * 2, false, show_rss, data)
}

fn show_rss(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => Ok(()),
        Row::Data { index, bytes } => {
            let e = |i| half(bytes, i);
            writeln!(
                w,
                "{:4}:  {:4}  {:4}  {:4}  {:4}  {:4}  {:4}  {:4}  {:4}",
                index * 8,
                e(0),
                e(1),
                e(2),
                e(3),
                e(4),
                e(5),
                e(6),
                e(7)
            )
        }
    }
}

/// Number of physical functions with RSS configuration.
pub const RSS_NUM_PF: usize = 8;

/// Per-PF RSS configuration.
///
/// The shared map and mask registers apply to every PF, so they are
/// replicated into each row record alongside that PF's own configuration
/// word.
pub fn rss_pf_config(
    map: RssPfMap,
    mask: RssPfMask,
    configs: &[RssPfConfig],
) -> Result<Table, DiagError> {
    if configs.len() != RSS_NUM_PF {
        return Err(DiagError::CaptureCount {
            what: "PF configuration words",
            expected: RSS_NUM_PF,
            actual: configs.len(),
        });
    }
    let mut tab = Table::new(RSS_NUM_PF, 3 * 4, true, show_rss_pf_config)?;
    for (pf, row) in tab.buf_mut().chunks_exact_mut(3 * 4).enumerate() {
        row[0..4].copy_from_slice(&map.into_bits().to_ne_bytes());
        row[4..8].copy_from_slice(&mask.into_bits().to_ne_bytes());
        row[8..12].copy_from_slice(&configs[pf].into_bits().to_ne_bytes());
    }
    Ok(tab)
}

fn show_rss_pf_config(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { buf } => {
            // The map width is global state; pull it out of the first row.
            let map = RssPfMap::from_bits(word(buf, 0));
            writeln!(w, "PF Map Index Size = {}\n", map.lkpidx_size())?;
            writeln!(
                w,
                "     RSS              PF   VF    Hash Tuple Enable         Default"
            )?;
            writeln!(
                w,
                "     Enable       IPF Mask Mask  IPv6      IPv4      UDP   Queue"
            )?;
            writeln!(
                w,
                " PF  Map Chn Prt  Map Size Size  Four Two  Four Two  Four  Ch1  Ch0"
            )
        }
        Row::Data { index, bytes } => {
            let map = RssPfMap::from_bits(word(bytes, 0));
            let mask = RssPfMask::from_bits(word(bytes, 1));
            let config = RssPfConfig::from_bits(word(bytes, 2));
            writeln!(
                w,
                "{:3}  {:>3} {:>3} {:>3}  {:3}  {:3}  {:3}   {:>3} {:>3}   {:>3} {:>3}   {:>3}  {:3}  {:3}",
                index,
                yesno(config.map_enable()),
                yesno(config.chn_enable()),
                yesno(config.prt_enable()),
                map.pf_lkpidx(index),
                mask.pf_mask_size(index),
                config.ivf_width(),
                yesno(config.ip6_four_tuple_en()),
                yesno(config.ip6_two_tuple_en()),
                yesno(config.ip4_four_tuple_en()),
                yesno(config.ip4_two_tuple_en()),
                yesno(config.udp_four_tuple_en()),
                config.ch1_default_queue(),
                config.ch0_default_queue()
            )
        }
    }
}

/// Per-VF RSS configuration: one `(VFL, VFH)` register pair per VF.
pub fn rss_vf_config(
    params: &AdapterParams,
    vf_config: &[(u32, u32)],
) -> Result<Table, DiagError> {
    if vf_config.len() != params.vf_count {
        return Err(DiagError::CaptureCount {
            what: "VF configuration pairs",
            expected: params.vf_count,
            actual: vf_config.len(),
        });
    }
    let mut tab = Table::new(params.vf_count, 2 * 4, true, show_rss_vf_config)?;
    for (vf, row) in tab.buf_mut().chunks_exact_mut(2 * 4).enumerate() {
        let (vfl, vfh) = vf_config[vf];
        row[0..4].copy_from_slice(&vfl.to_ne_bytes());
        row[4..8].copy_from_slice(&vfh.to_ne_bytes());
    }
    Ok(tab)
}

fn show_rss_vf_config(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
    match row {
        Row::Header { .. } => {
            writeln!(w, "     RSS                     Hash Tuple Enable")?;
            writeln!(
                w,
                "     Enable   IVF  Dis  Enb  IPv6      IPv4      UDP    Def  Secret Key"
            )?;
            writeln!(
                w,
                " VF  Chn Prt  Map  VLAN  uP  Four Two  Four Two  Four   Que  Idx       Hash"
            )
        }
        Row::Data { index, bytes } => {
            let vfl = word(bytes, 0);
            let vfh = RssVfConfig::from_bits(word(bytes, 1));
            writeln!(
                w,
                "{:3}  {:>3} {:>3}  {:3}   {:>3} {:>3}   {:>3} {:>3}   {:>3}  {:>3}   {:>3}  {:4}  {:3} {:#10x}",
                index,
                yesno(vfh.chn_enable()),
                yesno(vfh.prt_enable()),
                vfh.lkp_index(),
                yesno(vfh.vlan_extract()),
                yesno(vfh.up_enable()),
                yesno(vfh.ip6_four_tuple_en()),
                yesno(vfh.ip6_two_tuple_en()),
                yesno(vfh.ip4_four_tuple_en()),
                yesno(vfh.ip4_two_tuple_en()),
                yesno(vfh.enable_udp_hash()),
                vfh.default_queue(),
                vfh.key_index(),
                vfl
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use t4_defs::ChipVersion;

    #[test]
    fn rss_table_lines() {
        let mut data = vec![0u8; RSS_NENTRIES * 2];
        data[0..2].copy_from_slice(&513u16.to_ne_bytes());
        let tab = rss(&data).unwrap();
        let out = tab.to_string();
        assert_eq!(out.lines().count(), RSS_NENTRIES / 8);
        assert!(out.starts_with("   0:   513     0     0     0     0     0     0     0\n"));
        assert!(out.contains("\n   8:     0"));
    }

    #[test]
    fn pf_config_header_reports_map_width() {
        let map = RssPfMap::new().with_lkpidx_size(2).with_map(0o1234_5670);
        let mask = RssPfMask::new().with_mask(0x8765_4321);
        let configs = [RssPfConfig::new()
            .with_map_enable(true)
            .with_ch0_default_queue(3); RSS_NUM_PF];
        let tab = rss_pf_config(map, mask, &configs).unwrap();
        let out = tab.to_string();
        assert!(out.starts_with("PF Map Index Size = 2\n\n"));
        // PF 1's three-bit lookup index and four-bit mask size. Lines 0-4
        // are the caption, the blank separator, and the column titles.
        let line: &str = out.lines().nth(6).unwrap();
        expect!["  1  yes  no  no    7    2    0    no  no    no  no    no    0    3"]
            .assert_eq(line);
    }

    #[test]
    fn vf_config_row_count_must_match() {
        let params = AdapterParams::new(ChipVersion::T5);
        assert!(rss_vf_config(&params, &[(0, 0); 3]).is_err());

        let pairs = vec![(0xdead_beef, RssVfConfig::new().with_chn_enable(true).into_bits());
            params.vf_count];
        let tab = rss_vf_config(&params, &pairs).unwrap();
        assert_eq!(tab.rows(), params.vf_count);
        let out = tab.to_string();
        assert!(out.contains("0xdeadbeef"));
        assert!(out.lines().count() == 3 + params.vf_count);
    }
}
