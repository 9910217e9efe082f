use crate::input::Haystack;
use crate::util::is_word_byte;

/// Represents the four possible starting configurations of a DFA search.
///
/// The starting configuration is determined by inspecting the byte
/// immediately preceding the start of the search (or, for a reverse
/// search, immediately following it). Distinct start states are needed
/// because that byte decides which assertions hold at the very first
/// position: the beginning of the haystack, the beginning of a line, or
/// one side of a word boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Start {
    /// This occurs when the starting position is not any of the other
    /// options.
    NonWordByte = 0,
    /// This occurs when the byte immediately preceding the start of the
    /// search is an ASCII word byte.
    WordByte = 1,
    /// This occurs when the starting position of the search corresponds to
    /// the beginning of the haystack.
    Text = 2,
    /// This occurs when the byte immediately preceding the start of the
    /// search is a line terminator.
    Line = 3,
}

impl Start {
    /// Return the total number of starting configurations.
    pub(crate) fn count() -> usize {
        4
    }

    /// Returns the starting configuration for the given search parameters.
    /// If the given offset range is not valid, then this panics.
    pub(crate) fn from_position_fwd<H: Haystack + ?Sized>(
        haystack: &H,
        start: usize,
        end: usize,
    ) -> Start {
        assert!(start <= end && end <= haystack.len());
        if start == 0 {
            Start::Text
        } else if haystack.byte(start - 1) == b'\n' {
            Start::Line
        } else if is_word_byte(haystack.byte(start - 1)) {
            Start::WordByte
        } else {
            Start::NonWordByte
        }
    }

    /// Returns the starting configuration for a reverse search with the
    /// given parameters. If the given offset range is not valid, then this
    /// panics.
    pub(crate) fn from_position_rev<H: Haystack + ?Sized>(
        haystack: &H,
        start: usize,
        end: usize,
    ) -> Start {
        assert!(start <= end && end <= haystack.len());
        if end == haystack.len() {
            Start::Text
        } else if haystack.byte(end) == b'\n' {
            Start::Line
        } else if is_word_byte(haystack.byte(end)) {
            Start::WordByte
        } else {
            Start::NonWordByte
        }
    }

    /// Return this starting configuration as an integer. It is guaranteed
    /// to be less than `Start::count()`.
    pub(crate) fn as_usize(&self) -> usize {
        *self as usize
    }
}
