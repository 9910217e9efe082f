use crate::util::alphabet::ByteClassSet;

/// A zero-width assertion that can appear in an instruction program.
///
/// Assertions match positions between bytes rather than bytes themselves.
/// During determinization they split into two halves: the half that depends
/// only on what has already been read is recorded as a fact about the DFA
/// state, while the half that depends on the next byte is resolved when
/// that byte arrives.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Look {
    /// The previous position is either the beginning of the haystack or a
    /// `\n` byte.
    StartLine = 1 << 0,
    /// The next position is either the end of the haystack or a `\n` byte.
    EndLine = 1 << 1,
    /// The previous position is the beginning of the haystack.
    StartText = 1 << 2,
    /// The next position is the end of the haystack.
    EndText = 1 << 3,
    /// Exactly one of the previous and next positions is adjacent to an
    /// ASCII word byte.
    WordBoundary = 1 << 4,
    /// The negation of `WordBoundary`: either both sides are word bytes or
    /// neither is.
    WordBoundaryNegate = 1 << 5,
}

impl Look {
    /// Flip the assertion as if the haystack were reversed. Programs meant
    /// to be run backward over the input carry assertions already flipped
    /// this way.
    pub fn reversed(&self) -> Look {
        match *self {
            Look::StartLine => Look::EndLine,
            Look::EndLine => Look::StartLine,
            Look::StartText => Look::EndText,
            Look::EndText => Look::StartText,
            Look::WordBoundary => Look::WordBoundary,
            Look::WordBoundaryNegate => Look::WordBoundaryNegate,
        }
    }

    /// Split the given byte classes so that bytes this assertion can
    /// distinguish land in distinct classes.
    pub(crate) fn add_to_byteset(&self, set: &mut ByteClassSet) {
        match *self {
            Look::StartText | Look::EndText => {}
            Look::StartLine | Look::EndLine => {
                set.set_range(b'\n', b'\n');
            }
            Look::WordBoundary | Look::WordBoundaryNegate => {
                set.set_range(b'_', b'_');
                set.set_range(b'0', b'9');
                set.set_range(b'a', b'z');
                set.set_range(b'A', b'Z');
            }
        }
    }
}

/// A set of assertions.
///
/// This is used to track which assertions a DFA state has observed to hold
/// ("have") and which assertions its pending instructions are blocked on
/// ("need").
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct LookSet {
    bits: u8,
}

impl LookSet {
    /// Return a new empty set.
    pub fn empty() -> LookSet {
        LookSet::default()
    }

    /// Return true if and only if this set has no assertions in it.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Insert the given assertion into this set.
    pub fn insert(&mut self, look: Look) {
        self.bits |= look as u8;
    }

    /// Return true if and only if the given assertion is in this set.
    pub fn contains(&self, look: Look) -> bool {
        self.bits & (look as u8) != 0
    }

    /// Clear this set such that it has no assertions in it.
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Subtract the given set from this set, in place.
    pub fn subtract(&mut self, other: LookSet) {
        self.bits &= !other.bits;
    }

    /// Intersect the given set with this set, in place.
    pub fn intersect(&mut self, other: LookSet) {
        self.bits &= other.bits;
    }
}

impl core::fmt::Debug for LookSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut members = vec![];
        for &look in &[
            Look::StartLine,
            Look::EndLine,
            Look::StartText,
            Look::EndText,
            Look::WordBoundary,
            Look::WordBoundaryNegate,
        ] {
            if self.contains(look) {
                members.push(look);
            }
        }
        f.debug_list().entries(members).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookset_basics() {
        let mut set = LookSet::empty();
        assert!(set.is_empty());
        set.insert(Look::StartText);
        set.insert(Look::WordBoundary);
        assert!(set.contains(Look::StartText));
        assert!(set.contains(Look::WordBoundary));
        assert!(!set.contains(Look::EndText));

        let mut other = LookSet::empty();
        other.insert(Look::StartText);
        set.subtract(other);
        assert!(!set.contains(Look::StartText));
        assert!(set.contains(Look::WordBoundary));

        set.intersect(LookSet::empty());
        assert!(set.is_empty());
    }

    #[test]
    fn reversed_swaps_text_and_line() {
        assert_eq!(Look::EndText, Look::StartText.reversed());
        assert_eq!(Look::StartText, Look::EndText.reversed());
        assert_eq!(Look::EndLine, Look::StartLine.reversed());
        assert_eq!(Look::StartLine, Look::EndLine.reversed());
        assert_eq!(Look::WordBoundary, Look::WordBoundary.reversed());
        assert_eq!(
            Look::WordBoundaryNegate,
            Look::WordBoundaryNegate.reversed(),
        );
    }
}
