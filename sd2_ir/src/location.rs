//! Source locations.
//!
//! Unlike a compiler that defers line/column recovery to a line-offset table built
//! after the fact, SD2's lexer tracks line and column live as it scans, so every
//! token, event, value, and error can carry its own [`Location`] directly.

use std::fmt;

/// A single point in the source: 1-based line, 1-based column, 0-based byte offset.
///
/// Layout: 12 bytes total (three `u32`s). Locations are immutable once created.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    /// Location of the very first code unit of a source: line 1, column 1, offset 0.
    pub const START: Location = Location {
        line: 1,
        column: 1,
        offset: 0,
    };

    #[inline]
    pub const fn new(line: u32, column: u32, offset: u32) -> Self {
        debug_assert!(line >= 1, "line is 1-based");
        debug_assert!(column >= 1, "column is 1-based");
        Location {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_one_one_zero() {
        assert_eq!(Location::START, Location::new(1, 1, 0));
    }

    #[test]
    fn display_is_line_colon_column() {
        assert_eq!(format!("{}", Location::new(3, 7, 40)), "3:7");
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(Location::new(2, 4, 10), Location::new(2, 4, 10));
        assert_ne!(Location::new(2, 4, 10), Location::new(2, 5, 10));
    }
}
