//! The external error-record contract (spec.md §6 "Error record").

use crate::error_code::ErrorCode;
use sd2_ir::Location;
use std::fmt;

/// A structured parse/lex/resolution error, never a bare string.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ErrorRecord {
    pub code: ErrorCode,
    pub message: String,
    pub location: Location,
}

impl ErrorRecord {
    pub fn new(code: ErrorCode, message: impl Into<String>, location: Location) -> Self {
        ErrorRecord {
            code,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.location, self.message)
    }
}

impl std::error::Error for ErrorRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_location_and_message() {
        let rec = ErrorRecord::new(ErrorCode::E2101, "qualifier without arguments", Location::new(4, 10, 30));
        assert_eq!(rec.to_string(), "E2101 at 4:10: qualifier without arguments");
    }
}
