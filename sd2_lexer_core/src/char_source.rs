//! The abstract character source the cursor pulls from (spec.md §6).

/// A pull interface over a stream of UTF-16 code units.
///
/// Implementors yield one code unit per call and a negative value at EOF.
/// The core does not validate encoding beyond accepting what the source
/// yields — lone surrogates are passed through as the Unicode replacement
/// character by [`Cursor`] rather than rejected.
pub trait CharSource {
    /// Returns the next UTF-16 code unit, or a negative value at EOF.
    fn next_code_unit(&mut self) -> i32;
}
