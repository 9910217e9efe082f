/// The kind of match semantics to use for a search.
///
/// The default match kind is `FirstMatch`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchKind {
    /// Report the first match found, where "first" obeys the priority order
    /// of the instruction program. For programs compiled from a regex in
    /// the usual way, this corresponds to the match a backtracking engine
    /// would find, i.e., leftmost-first or "preference order" semantics.
    FirstMatch,
    /// Report the longest possible match, corresponding to POSIX
    /// leftmost-longest semantics.
    LongestMatch,
}

impl MatchKind {
    /// Returns true if and only if a search should keep scanning past the
    /// point where a match instruction first becomes live. Under longest
    /// match semantics, lower priority instructions may still grow the
    /// match, so determinization must not cut them off.
    pub(crate) fn continue_past_first_match(&self) -> bool {
        *self == MatchKind::LongestMatch
    }
}

impl Default for MatchKind {
    fn default() -> MatchKind {
        MatchKind::FirstMatch
    }
}

/// A representation of a match reported by a search.
///
/// The offsets reported are byte offsets into the haystack searched, with
/// `start <= end`. The match itself is the half-open range `[start, end)`.
/// Both offsets always fall on valid split points of whatever encoding the
/// program was compiled for; for programs compiled from Unicode patterns
/// over UTF-8 haystacks, they are always on `char` boundaries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Match {
    /// The start offset of the match, inclusive.
    start: usize,
    /// The end offset of the match, exclusive.
    end: usize,
}

impl Match {
    /// Create a new match from a byte offset span.
    ///
    /// This panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Match {
        assert!(start <= end);
        Match { start, end }
    }

    /// The starting position of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The ending position of the match.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the match as a range of byte offsets.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }

    /// Returns true if and only if this match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
