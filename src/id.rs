/// A state identifier specifically tailored for lazy DFAs.
///
/// A lazy state id logically represents a pointer to a DFA state. In
/// practice, by limiting the number of DFA states it can address, it
/// reserves some bits of its representation to pack in additional
/// information about the state it points to. Namely, whether the state is
/// yet to be computed ("unknown"), whether it is the dead state from which
/// no transition ever leaves, and whether it is a match state. Tags let the
/// search loop test for all special cases with a single branch on
/// `is_tagged` while untagged transitions stay on the hot path.
///
/// The identifier's untagged value, shifted by the alphabet stride, is a
/// direct index into the cache's transition table.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub(crate) struct LazyStateID(u32);

impl LazyStateID {
    const MAX_BIT: usize = 31;

    const MASK_UNKNOWN: usize = 1 << LazyStateID::MAX_BIT;
    const MASK_DEAD: usize = 1 << (LazyStateID::MAX_BIT - 1);
    const MASK_MATCH: usize = 1 << (LazyStateID::MAX_BIT - 2);

    /// The maximum untagged value of a lazy state id.
    pub(crate) const MAX: usize = LazyStateID::MASK_MATCH - 1;

    /// Create a new lazy state id.
    ///
    /// The given id must not exceed `LazyStateID::MAX`. Callers are
    /// responsible for clearing the cache before ids run out, which keeps
    /// this constructor infallible in practice.
    pub(crate) fn new(id: usize) -> LazyStateID {
        debug_assert!(id <= LazyStateID::MAX);
        LazyStateID(id as u32)
    }

    /// Return the identifier for the canonical unknown state. Transition
    /// table slots start out pointing here; taking such a transition is
    /// what triggers computing the real target state. Its untagged value
    /// is zero, which is why the first transition table row is reserved
    /// as a sentinel.
    pub(crate) fn unknown() -> LazyStateID {
        LazyStateID(LazyStateID::MASK_UNKNOWN as u32)
    }

    /// Return this identifier with the unknown tag set.
    #[cfg(test)]
    pub(crate) fn to_unknown(self) -> LazyStateID {
        LazyStateID(self.0 | LazyStateID::MASK_UNKNOWN as u32)
    }

    /// Return this identifier with the dead tag set.
    pub(crate) fn to_dead(self) -> LazyStateID {
        LazyStateID(self.0 | LazyStateID::MASK_DEAD as u32)
    }

    /// Return this identifier with the match tag set.
    pub(crate) fn to_match(self) -> LazyStateID {
        LazyStateID(self.0 | LazyStateID::MASK_MATCH as u32)
    }

    /// Return the underlying value of this id, with all tags cleared. The
    /// result is a valid index derived from the state's position in the
    /// cache, except for the unknown and dead sentinels.
    pub(crate) fn as_usize_untagged(self) -> usize {
        self.0 as usize & LazyStateID::MAX
    }

    /// Returns true if and only if this id carries any tag at all. Untagged
    /// ids are ordinary computed non-match states.
    pub(crate) fn is_tagged(self) -> bool {
        self.0 as usize > LazyStateID::MAX
    }

    /// Returns true if and only if this id points at a state that has not
    /// been computed yet.
    pub(crate) fn is_unknown(self) -> bool {
        self.0 as usize & LazyStateID::MASK_UNKNOWN > 0
    }

    /// Returns true if and only if this id points at the dead state.
    pub(crate) fn is_dead(self) -> bool {
        self.0 as usize & LazyStateID::MASK_DEAD > 0
    }

    /// Returns true if and only if this id points at a match state.
    pub(crate) fn is_match(self) -> bool {
        self.0 as usize & LazyStateID::MASK_MATCH > 0
    }
}

#[cfg(test)]
mod tests {
    use super::LazyStateID;

    #[test]
    fn tags() {
        let sid = LazyStateID::new(5);
        assert!(!sid.is_tagged());
        assert!(!sid.is_match());
        assert_eq!(5, sid.as_usize_untagged());

        let msid = sid.to_match();
        assert!(msid.is_tagged());
        assert!(msid.is_match());
        assert!(!msid.is_dead());
        assert!(!msid.is_unknown());
        assert_eq!(5, msid.as_usize_untagged());

        assert!(LazyStateID::unknown().is_unknown());
        assert!(LazyStateID::unknown().is_tagged());
        assert_eq!(0, LazyStateID::unknown().as_usize_untagged());

        let dead = LazyStateID::new(1 << 4).to_dead();
        assert!(dead.is_dead());
        assert!(!dead.is_unknown());
        assert_eq!(1 << 4, dead.as_usize_untagged());

        let unk = LazyStateID::new(7).to_unknown();
        assert!(unk.is_unknown());
        assert_eq!(7, unk.as_usize_untagged());
    }
}
