// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Paginated access to fixed-geometry row tables.
//!
//! Hardware captures (logic-analyzer buffers, queue dumps, lookup tables)
//! arrive as one contiguous blob of `rows * width` bytes. A [`Table`] owns
//! such a blob and presents it to a paging consumer one logical position at
//! a time: an optional synthetic header row first, then each data row in
//! order, rendered through a per-table callback. Random access by logical
//! position is also supported, so a front end can resume mid-table.
//!
//! The table is a snapshot: it is filled once, right after construction,
//! and never re-read from the device. Captures of variable length are read
//! into a maximum-capacity table and then cut down with [`Table::trim`].

use std::fmt;
use thiserror::Error;

/// Errors from table construction and trimming.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The row buffer could not be allocated.
    #[error("failed to allocate {0} byte row buffer")]
    OutOfMemory(usize),
    /// `trim` was asked to grow the table.
    #[error("cannot trim a {rows} row table up to {requested} rows")]
    TrimGrow {
        /// The requested new row count.
        requested: usize,
        /// The current row count.
        rows: usize,
    },
}

/// One logical position of a [`Table`].
#[derive(Debug)]
pub enum Row<'a> {
    /// The synthetic header position, yielded once before any data row when
    /// the table was opened with `has_header`.
    ///
    /// Most renderers emit fixed column titles here and ignore `buf`. A few
    /// derive caption text from the capture itself (the PF map width of the
    /// RSS PF table, for instance), so the header position exposes the whole
    /// row buffer read-only.
    Header {
        /// The table's entire row buffer.
        buf: &'a [u8],
    },
    /// A data row.
    Data {
        /// Row index, in `[0, rows)`.
        index: usize,
        /// The row's bytes, exactly `width` long.
        bytes: &'a [u8],
    },
}

/// Renders one logical position as text.
///
/// A plain function pointer; any per-row context a renderer needs must be
/// embedded in the row bytes. A renderer may emit any number of lines
/// (including none) for a position.
pub type ShowFn = fn(&mut dyn fmt::Write, Row<'_>) -> fmt::Result;

/// An owned `rows x width` byte snapshot with paginated, rendered access.
pub struct Table {
    buf: Vec<u8>,
    rows: usize,
    width: usize,
    skip_first: bool,
    show: ShowFn,
}

impl Table {
    /// Allocates a zeroed table of `rows` rows of `width` bytes each.
    ///
    /// The caller fills [`Table::buf_mut`] with the capture afterwards; if
    /// the capture read fails the caller simply drops the table, so a
    /// partially filled table is never observable.
    pub fn new(
        rows: usize,
        width: usize,
        has_header: bool,
        show: ShowFn,
    ) -> Result<Self, TableError> {
        let len = rows * width;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| TableError::OutOfMemory(len))?;
        buf.resize(len, 0);
        Ok(Self {
            buf,
            rows,
            width,
            skip_first: has_header,
            show,
        })
    }

    /// The row buffer, for the post-construction fill.
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Number of data rows currently visible.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of each row in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether position 0 is a synthetic header.
    pub fn has_header(&self) -> bool {
        self.skip_first
    }

    /// Total number of logical positions (data rows plus the header).
    pub fn positions(&self) -> usize {
        self.rows + self.skip_first as usize
    }

    /// Shrinks the visible row count to `new_rows`, irreversibly.
    ///
    /// Fails (leaving the table unchanged) if `new_rows` would grow the
    /// table.
    pub fn trim(&mut self, new_rows: usize) -> Result<(), TableError> {
        if new_rows > self.rows {
            return Err(TableError::TrimGrow {
                requested: new_rows,
                rows: self.rows,
            });
        }
        self.rows = new_rows;
        Ok(())
    }

    /// The data row at logical position `pos`, or `None` once past the end.
    ///
    /// The header consumes logical position 0 without consuming a physical
    /// row, so on a headered table `get(0)` is `None` and `get(1)` is row 0.
    pub fn get(&self, pos: usize) -> Option<&[u8]> {
        let index = pos.checked_sub(self.skip_first as usize)?;
        if index >= self.rows {
            return None;
        }
        Some(&self.buf[index * self.width..][..self.width])
    }

    /// The logical position `pos` as a [`Row`], header included.
    pub fn entry(&self, pos: usize) -> Option<Row<'_>> {
        if self.skip_first && pos == 0 {
            return Some(Row::Header { buf: &self.buf });
        }
        let index = pos - self.skip_first as usize;
        Some(Row::Data {
            index,
            bytes: self.get(pos)?,
        })
    }

    /// Iterates the logical positions in order.
    pub fn iter(&self) -> Rows<'_> {
        Rows { tab: self, pos: 0 }
    }

    /// Renders every logical position to `w`.
    pub fn write_to(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        for row in self.iter() {
            (self.show)(w, row)?;
        }
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Sequential iterator over a [`Table`]'s logical positions.
pub struct Rows<'a> {
    tab: &'a Table,
    pos: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Row<'a>> {
        let row = self.tab.entry(self.pos)?;
        self.pos += 1;
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_hex(w: &mut dyn fmt::Write, row: Row<'_>) -> fmt::Result {
        match row {
            Row::Header { .. } => writeln!(w, "A  B"),
            Row::Data { index, bytes } => writeln!(w, "{index}: {:02x}", bytes[0]),
        }
    }

    fn filled(rows: usize, width: usize, has_header: bool) -> Table {
        let mut t = Table::new(rows, width, has_header, show_hex).unwrap();
        for (i, b) in t.buf_mut().iter_mut().enumerate() {
            *b = i as u8;
        }
        t
    }

    #[test]
    fn get_positions() {
        let t = filled(4, 8, false);
        for pos in 0..4 {
            let row = t.get(pos).unwrap();
            assert_eq!(row.len(), 8);
            assert_eq!(row[0], (pos * 8) as u8);
        }
        assert!(t.get(4).is_none());
    }

    #[test]
    fn header_consumes_one_position() {
        let t = filled(4, 8, true);
        // Position 0 is the header, not a data row.
        assert!(t.get(0).is_none());
        assert!(matches!(t.entry(0), Some(Row::Header { .. })));
        assert_eq!(t.get(1).unwrap()[0], 0);
        assert_eq!(t.get(4).unwrap()[0], 24);
        assert!(t.get(5).is_none());
        assert_eq!(t.positions(), 5);
    }

    #[test]
    fn trim_shrinks_only() {
        let mut t = filled(4, 8, false);
        assert_eq!(
            t.trim(5),
            Err(TableError::TrimGrow {
                requested: 5,
                rows: 4
            })
        );
        assert_eq!(t.rows(), 4);

        t.trim(2).unwrap();
        assert_eq!(t.rows(), 2);
        assert!(t.get(1).is_some());
        assert!(t.get(2).is_none());

        // A second trim cannot grow back.
        assert!(t.trim(3).is_err());
        t.trim(0).unwrap();
        assert!(t.get(0).is_none());
    }

    #[test]
    fn get_matches_iteration() {
        let t = filled(3, 4, true);
        let mut pos = 0;
        for row in t.iter() {
            match row {
                Row::Header { .. } => assert!(t.get(pos).is_none()),
                Row::Data { index, bytes } => {
                    assert_eq!(index, pos - 1);
                    assert_eq!(t.get(pos).unwrap().as_ptr(), bytes.as_ptr());
                }
            }
            pos += 1;
        }
        assert_eq!(pos, t.positions());
    }

    #[test]
    fn renders_in_order() {
        let t = filled(2, 2, true);
        let mut out = String::new();
        t.write_to(&mut out).unwrap();
        assert_eq!(out, "A  B\n0: 00\n1: 02\n");
        assert_eq!(out, t.to_string());
    }

    #[test]
    fn zero_rows() {
        let t = filled(0, 16, true);
        assert!(t.get(0).is_none());
        assert!(t.get(1).is_none());
        assert_eq!(t.to_string(), "A  B\n");
    }
}
