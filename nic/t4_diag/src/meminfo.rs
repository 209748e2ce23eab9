// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Adapter memory topology view.
//!
//! The snapshot provider decodes the memory-enable and BAR registers into
//! the list of populated memories and the hardware regions carved out of
//! them; this view sorts everything by base address and renders each
//! region's extent. A region's end is bounded by the next region (or the
//! enclosing memory), the same way the hardware allocates them.

use std::fmt::Write;

/// A populated adapter memory or a region carved out of one.
#[derive(Debug, Copy, Clone)]
pub struct MemRegion {
    /// Display name.
    pub name: &'static str,
    /// First byte address.
    pub base: u32,
    /// One past the last byte address; zero for regions whose extent is
    /// bounded by their neighbor.
    pub limit: u32,
}

fn size_string(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes;
    let mut unit = 0;
    while unit < UNITS.len() - 1 && value >= 1024 && value % 1024 == 0 {
        value /= 1024;
        unit += 1;
    }
    format!("{} {}", value, UNITS[unit])
}

fn write_region(out: &mut String, name: &str, from: u32, to: u32) {
    let _ = writeln!(
        out,
        "{:15} {:#x}-{:#x} [{}]",
        name,
        from,
        to,
        size_string(to as u64 - from as u64 + 1)
    );
}

/// Renders the memory map: each populated memory, then every region that
/// falls inside it, in address order.
pub fn meminfo(avail: &[MemRegion], regions: &[MemRegion]) -> String {
    let mut avail = avail.to_vec();
    let mut regions = regions.to_vec();
    avail.sort_by_key(|m| m.base);
    regions.sort_by_key(|m| m.base);

    let mut out = String::new();
    for (i, mem) in avail.iter().enumerate() {
        if i != 0 {
            let _ = writeln!(out);
        }
        write_region(&mut out, mem.name, mem.base, mem.limit - 1);
        for (j, region) in regions.iter().enumerate() {
            if region.base < mem.base || region.base >= mem.limit {
                continue;
            }
            let bound = regions
                .get(j + 1)
                .map(|next| next.base)
                .unwrap_or(mem.limit)
                .min(mem.limit);
            let to = if region.limit != 0 {
                region.limit.min(bound)
            } else {
                bound
            };
            if to <= region.base {
                continue;
            }
            write_region(&mut out, region.name, region.base, to - 1);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn sorts_and_bounds_regions() {
        let avail = [
            MemRegion {
                name: "EDC1:",
                base: 0x4000_0000,
                limit: 0x4400_0000,
            },
            MemRegion {
                name: "EDC0:",
                base: 0,
                limit: 0x4000_0000,
            },
        ];
        let regions = [
            MemRegion {
                name: "Timers:",
                base: 0x2_0000,
                limit: 0,
            },
            MemRegion {
                name: "TCBs:",
                base: 0x1000,
                limit: 0,
            },
            MemRegion {
                name: "Rx FL:",
                base: 0x4000_1000,
                limit: 0x4000_2000,
            },
        ];
        expect![[r#"
            EDC0:           0x0-0x3fffffff [1 GiB]
            TCBs:           0x1000-0x1ffff [124 KiB]
            Timers:         0x20000-0x3fffffff [1048448 KiB]

            EDC1:           0x40000000-0x43ffffff [64 MiB]
            Rx FL:          0x40001000-0x40001fff [4 KiB]
        "#]]
        .assert_eq(&meminfo(&avail, &regions));
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(meminfo(&[], &[]), "");
    }
}
