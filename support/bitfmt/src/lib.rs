// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Declarative decoding of packed register words into labeled text.
//!
//! Logic-analyzer captures pack dozens of single-bit and narrow fields into
//! each 64-bit word. Rather than hand-writing a shift-and-mask per field,
//! a view declares an ordered table of [`FieldDesc`]s and [`decode`]s the
//! word against it, producing `name: value` pairs word-wrapped to the
//! classic 79-column terminal width with an 8-space continuation indent.
//!
//! Decoding is pure text formatting: the same word and table always produce
//! byte-identical output.

use thiserror::Error;

/// Width at which a line is broken before appending the next field.
pub const WRAP_COLUMN: usize = 79;

/// Visible width of the continuation indent.
pub const INDENT: usize = 8;

/// A named bit-range within a 64-bit word.
///
/// `start` is the bit offset of the field's least significant bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    /// Display name of the field.
    pub name: &'static str,
    /// Bit offset of the least significant bit.
    pub start: u32,
    /// Width of the field in bits; never zero.
    pub width: u32,
}

/// Errors from malformed field descriptors.
///
/// The constant tables shipped with the chip definitions never trip these;
/// they exist because the decoder is exposed generically.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A descriptor had `width == 0`.
    #[error("field {0:?} has zero width")]
    ZeroWidth(&'static str),
    /// A descriptor extended past bit 63.
    #[error("field {name:?} spans bits {start}..{end}, past the 64-bit word", end = .start + .width)]
    OutOfRange {
        /// Display name of the offending field.
        name: &'static str,
        /// Bit offset of the field.
        start: u32,
        /// Width of the field.
        width: u32,
    },
}

impl FieldDesc {
    /// Extracts this field's value from `word`.
    fn extract(&self, word: u64) -> u64 {
        let mask = if self.width >= 64 {
            u64::MAX
        } else {
            (1 << self.width) - 1
        };
        (word >> self.start) & mask
    }
}

/// Renders `word` against `fields`, one `name: decimal` pair per field.
///
/// A line break is inserted *before* any field whose text would push the
/// running line width to [`WRAP_COLUMN`] or past it; a field appended right
/// at the boundary may still overhang, matching the flush-after behavior
/// the column layout was tuned for. The output always ends in a newline.
pub fn decode(word: u64, fields: &[FieldDesc]) -> Result<String, FieldError> {
    let mut out = String::new();
    let mut line_size = 0;
    for field in fields {
        if field.width == 0 {
            return Err(FieldError::ZeroWidth(field.name));
        }
        if field.start.checked_add(field.width).is_none_or(|end| end > 64) {
            return Err(FieldError::OutOfRange {
                name: field.name,
                start: field.start,
                width: field.width,
            });
        }
        let text = format!("{}: {}", field.name, field.extract(word));
        if line_size + text.len() >= WRAP_COLUMN {
            out.push('\n');
            out.push_str(&" ".repeat(INDENT));
            line_size = INDENT;
        }
        out.push_str(&text);
        out.push(' ');
        line_size += text.len() + 1;
    }
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_labels() {
        let fields = [FieldDesc {
            name: "X",
            start: 4,
            width: 4,
        }];
        assert_eq!(decode(0xa5, &fields).unwrap(), "X: 10 \n");
    }

    #[test]
    fn full_word_field() {
        let fields = [FieldDesc {
            name: "All",
            start: 0,
            width: 64,
        }];
        assert_eq!(
            decode(u64::MAX, &fields).unwrap(),
            format!("All: {} \n", u64::MAX)
        );
    }

    #[test]
    fn deterministic() {
        let fields = [
            FieldDesc {
                name: "Lo",
                start: 0,
                width: 8,
            },
            FieldDesc {
                name: "Hi",
                start: 56,
                width: 8,
            },
        ];
        let word = 0x1234_5678_9abc_def0;
        assert_eq!(decode(word, &fields).unwrap(), decode(word, &fields).unwrap());
    }

    #[test]
    fn wraps_before_79_columns() {
        // 16 single-bit fields named wide enough to overflow one line.
        let fields: Vec<FieldDesc> = (0..16)
            .map(|start| FieldDesc {
                name: "SomeLongerName",
                start,
                width: 1,
            })
            .collect();
        let out = decode(u64::MAX, &fields).unwrap();
        assert!(out.ends_with('\n'));
        let lines: Vec<&str> = out.trim_end_matches('\n').split('\n').collect();
        assert!(lines.len() > 1, "expected wrapping, got {out:?}");
        for line in &lines[1..] {
            assert!(line.starts_with("        "));
        }
        // The break happens before the field that would reach the limit, so
        // no line is long by more than one trailing field.
        for line in &lines {
            assert!(line.len() < WRAP_COLUMN + "SomeLongerName: 1 ".len());
        }
    }

    #[test]
    fn rejects_bad_descriptors() {
        assert_eq!(
            decode(
                0,
                &[FieldDesc {
                    name: "Z",
                    start: 3,
                    width: 0,
                }]
            ),
            Err(FieldError::ZeroWidth("Z"))
        );
        assert_eq!(
            decode(
                0,
                &[FieldDesc {
                    name: "Over",
                    start: 60,
                    width: 8,
                }]
            ),
            Err(FieldError::OutOfRange {
                name: "Over",
                start: 60,
                width: 8,
            })
        );
    }
}
