//! Parse failure reporting with row/column positions.

use thiserror::Error;

/// Position of a parse failure inside the source buffer.
///
/// `offset` is one byte past the first byte not consumed by a successful
/// production. The row counter treats every `\` as covering two bytes,
/// which approximates skipping escaped characters in string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Error at row {row}, column: {column} ({offset} bytes into json)")]
pub struct ParseError {
    pub row: u32,
    pub column: usize,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn at(src: &[u8], offset: usize) -> Self {
        let mut i = 0usize;
        let mut row = 1u32;
        let mut row_start = 0usize;
        while i < offset {
            match src.get(i) {
                Some(b'\\') => i += 2,
                Some(b'\n') => {
                    i += 1;
                    row += 1;
                    row_start = i;
                }
                Some(_) => i += 1,
                None => break,
            }
        }
        ParseError {
            row,
            column: i - row_start + 1,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row() {
        let e = ParseError::at(b"{,}", 2);
        assert_eq!(e.row, 1);
        assert_eq!(e.column, 3);
    }

    #[test]
    fn test_rows_counted_by_newline() {
        let e = ParseError::at(b"{\n1\n2x", 6);
        assert_eq!(e.row, 3);
        assert_eq!(e.column, 3);
    }

    #[test]
    fn test_backslash_skips_two_bytes() {
        // The backslash covers itself and the following newline, so no row
        // advance happens for that newline.
        let e = ParseError::at(b"\\\nabc", 5);
        assert_eq!(e.row, 1);
    }

    #[test]
    fn test_display_format() {
        let e = ParseError::at(b"x", 1);
        assert_eq!(
            e.to_string(),
            "Error at row 1, column: 2 (1 bytes into json)"
        );
    }
}
