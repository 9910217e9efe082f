use crate::error::BuildError;
use crate::util::alphabet::{ByteClassSet, ByteClasses};
use crate::util::look::Look;

/// A single instruction in a compiled program.
///
/// Instructions refer to one another by their position in the program's
/// instruction sequence. The order of `Split` alternatives is significant:
/// `next1` has higher priority than `next2`, and a search under
/// [`MatchKind::FirstMatch`](crate::MatchKind::FirstMatch) semantics
/// prefers the path through `next1` whenever both could match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Inst {
    /// Consume a single byte in the inclusive range `[lo, hi]`, then go to
    /// `next`.
    ByteRange { lo: u8, hi: u8, next: usize },
    /// Fork execution, preferring `next1` over `next2`. Consumes nothing.
    Split { next1: usize, next2: usize },
    /// Match the given zero-width assertion at the current position, then
    /// go to `next`. Consumes nothing.
    Look { look: Look, next: usize },
    /// Stop with a match ending at the current position.
    Match,
}

/// A compiled instruction program, ready to be searched.
///
/// A program is pure data produced by an external regex compiler. This
/// crate does not know or care what pattern it came from; validation only
/// checks structural integrity, namely that every instruction reference
/// lands inside the program and that byte ranges are not inverted.
///
/// Two search-relevant details are the compiler's responsibility, not this
/// crate's:
///
/// * Unanchored searching is expressed in the program itself, by prefixing
///   it with a non-greedy `(?s:.)*?` loop built from `Split` and
///   `ByteRange` instructions.
/// * Programs intended to be run backward over the haystack (to find the
///   start of a match whose end is known) are compiled from the reversed
///   pattern, with every assertion already flipped via [`Look::reversed`].
///   The engine runs such a program exactly like a forward one, just over
///   the bytes in reverse order.
///
/// Construction also precomputes the byte equivalence classes of the
/// program, which determine the alphabet the lazy DFA transitions over.
#[derive(Clone, Debug)]
pub struct Program {
    insts: Vec<Inst>,
    start: usize,
    byte_classes: ByteClasses,
    has_word_boundary: bool,
    has_anchor: bool,
    unanchored_start: bool,
}

impl Program {
    /// Validate the given instructions and build a program that starts
    /// execution at the instruction at index `start`.
    pub fn new(insts: Vec<Inst>, start: usize) -> Result<Program, BuildError> {
        if insts.is_empty() {
            return Err(BuildError::empty());
        }
        if start >= insts.len() {
            return Err(BuildError::invalid_start(start, insts.len()));
        }
        let len = insts.len();
        let check = |inst: usize, next: usize| {
            if next >= len {
                Err(BuildError::invalid_ref(inst, next, len))
            } else {
                Ok(())
            }
        };

        let mut set = ByteClassSet::empty();
        let mut has_word_boundary = false;
        let mut has_anchor = false;
        for (i, inst) in insts.iter().enumerate() {
            match *inst {
                Inst::ByteRange { lo, hi, next } => {
                    if lo > hi {
                        return Err(BuildError::invalid_range(i, lo, hi));
                    }
                    check(i, next)?;
                    set.set_range(lo, hi);
                }
                Inst::Split { next1, next2 } => {
                    check(i, next1)?;
                    check(i, next2)?;
                }
                Inst::Look { look, next } => {
                    check(i, next)?;
                    look.add_to_byteset(&mut set);
                    match look {
                        Look::WordBoundary | Look::WordBoundaryNegate => {
                            has_word_boundary = true;
                        }
                        _ => {
                            has_anchor = true;
                        }
                    }
                }
                Inst::Match => {}
            }
        }
        let unanchored_start = match insts[start] {
            Inst::Split { next2, .. } => match insts[next2] {
                Inst::ByteRange { lo: 0x00, hi: 0xFF, next } => next == start,
                _ => false,
            },
            _ => false,
        };
        Ok(Program {
            insts,
            start,
            byte_classes: set.byte_classes(),
            has_word_boundary,
            has_anchor,
            unanchored_start,
        })
    }

    /// Return the total number of instructions in this program.
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// Return the position of the instruction at which execution starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Return the instruction at the given position.
    ///
    /// This panics when `id >= self.len()`.
    pub fn get(&self, id: usize) -> &Inst {
        &self.insts[id]
    }

    /// Return the byte equivalence classes computed for this program.
    ///
    /// Two bytes in the same class are interchangeable: swapping one for
    /// the other anywhere in a haystack never changes the result of a
    /// search with this program.
    pub fn byte_classes(&self) -> &ByteClasses {
        &self.byte_classes
    }

    /// Returns true if and only if this program contains a word boundary
    /// assertion.
    pub(crate) fn has_word_boundary(&self) -> bool {
        self.has_word_boundary
    }

    /// Returns true if and only if this program contains a text or line
    /// anchor assertion.
    pub(crate) fn has_anchor(&self) -> bool {
        self.has_anchor
    }

    /// Returns true if and only if this program begins with the
    /// conventional unanchored scan prefix: a split that prefers the
    /// pattern proper, with an alternate branch consuming any byte and
    /// looping back to the start. Recognizing the prefix lets longest
    /// match searches drop threads that would start a new match after an
    /// earlier match has already been seen.
    pub(crate) fn unanchored_start(&self) -> bool {
        self.unanchored_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(bytes: &[u8]) -> Vec<Inst> {
        let mut insts: Vec<Inst> = bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| Inst::ByteRange { lo: b, hi: b, next: i + 1 })
            .collect();
        insts.push(Inst::Match);
        insts
    }

    #[test]
    fn validates_structure() {
        assert!(Program::new(lit(b"abc"), 0).is_ok());
        assert!(Program::new(vec![], 0).is_err());
        assert!(Program::new(lit(b"a"), 9).is_err());
        assert!(Program::new(
            vec![Inst::ByteRange { lo: 0, hi: 0, next: 5 }],
            0
        )
        .is_err());
        assert!(Program::new(
            vec![Inst::ByteRange { lo: 9, hi: 3, next: 1 }, Inst::Match],
            0
        )
        .is_err());
        assert!(Program::new(
            vec![Inst::Split { next1: 1, next2: 7 }, Inst::Match],
            0
        )
        .is_err());
    }

    #[test]
    fn analysis_flags() {
        let p = Program::new(lit(b"a"), 0).unwrap();
        assert!(!p.has_word_boundary());
        assert!(!p.has_anchor());

        let p = Program::new(
            vec![
                Inst::Look { look: Look::WordBoundary, next: 1 },
                Inst::Match,
            ],
            0,
        )
        .unwrap();
        assert!(p.has_word_boundary());
        assert!(!p.has_anchor());

        let p = Program::new(
            vec![Inst::Look { look: Look::StartLine, next: 1 }, Inst::Match],
            0,
        )
        .unwrap();
        assert!(!p.has_word_boundary());
        assert!(p.has_anchor());
    }

    #[test]
    fn detects_unanchored_scan_prefix() {
        // (?s:.)*?a
        let p = Program::new(
            vec![
                Inst::Split { next1: 2, next2: 1 },
                Inst::ByteRange { lo: 0x00, hi: 0xFF, next: 0 },
                Inst::ByteRange { lo: b'a', hi: b'a', next: 3 },
                Inst::Match,
            ],
            0,
        )
        .unwrap();
        assert!(p.unanchored_start());

        // a|b, anchored, also starts with a split
        let p = Program::new(
            vec![
                Inst::Split { next1: 1, next2: 2 },
                Inst::ByteRange { lo: b'a', hi: b'a', next: 3 },
                Inst::ByteRange { lo: b'b', hi: b'b', next: 3 },
                Inst::Match,
            ],
            0,
        )
        .unwrap();
        assert!(!p.unanchored_start());

        let p = Program::new(lit(b"a"), 0).unwrap();
        assert!(!p.unanchored_start());
    }

    #[test]
    fn byte_classes_reflect_ranges() {
        let p = Program::new(lit(b"ab"), 0).unwrap();
        let classes = p.byte_classes();
        assert_ne!(classes.get(b'a'), classes.get(b'b'));
        assert_eq!(classes.get(b'c'), classes.get(b'z'));
        // a, b, everything below a, between b and 255, plus EOI.
        assert_eq!(5, classes.alphabet_len());
    }
}
