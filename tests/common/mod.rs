// Test-only pattern layer. The crate under test consumes compiled
// instruction programs, so the tests need a way to produce realistic ones:
// a tiny pattern AST, a compiler from that AST to a `Program`, and a
// pattern reverser for building the reverse program of a session.

use std::sync::Arc;

use regex_lazydfa::{Inst, Look, MatchKind, Program, SearchSession};

#[derive(Clone, Debug)]
pub enum Pat {
    /// A literal byte sequence. An empty literal matches the empty string.
    Lit(Vec<u8>),
    /// A set of inclusive byte ranges.
    Class(Vec<(u8, u8)>),
    /// A concatenation.
    Cat(Vec<Pat>),
    /// An alternation, in preference order.
    Alt(Vec<Pat>),
    /// Zero or more repetitions. The flag is whether it is greedy.
    Star(Box<Pat>, bool),
    /// One or more repetitions, greedy.
    Plus(Box<Pat>),
    /// Zero or one, greedy.
    Opt(Box<Pat>),
    /// A zero-width assertion.
    Look(Look),
}

pub fn lit(s: &str) -> Pat {
    Pat::Lit(s.as_bytes().to_vec())
}

pub fn class(ranges: &[(u8, u8)]) -> Pat {
    Pat::Class(ranges.to_vec())
}

/// Any byte except a line terminator, like an ordinary `.`.
pub fn dot() -> Pat {
    class(&[(0x00, b'\n' - 1), (b'\n' + 1, 0xFF)])
}

pub fn cat(pats: Vec<Pat>) -> Pat {
    Pat::Cat(pats)
}

pub fn alt(pats: Vec<Pat>) -> Pat {
    Pat::Alt(pats)
}

pub fn star(pat: Pat, greedy: bool) -> Pat {
    Pat::Star(Box::new(pat), greedy)
}

pub fn plus(pat: Pat) -> Pat {
    Pat::Plus(Box::new(pat))
}

pub fn opt(pat: Pat) -> Pat {
    Pat::Opt(Box::new(pat))
}

pub fn look(look: Look) -> Pat {
    Pat::Look(look)
}

/// The pattern matching the reverse of every string `pat` matches, with
/// assertions flipped. Compiling this yields the reverse program of a
/// session.
pub fn reverse(pat: &Pat) -> Pat {
    match *pat {
        Pat::Lit(ref bytes) => {
            Pat::Lit(bytes.iter().rev().copied().collect())
        }
        Pat::Class(ref ranges) => Pat::Class(ranges.clone()),
        Pat::Cat(ref pats) => {
            Pat::Cat(pats.iter().rev().map(reverse).collect())
        }
        Pat::Alt(ref pats) => Pat::Alt(pats.iter().map(reverse).collect()),
        Pat::Star(ref p, greedy) => {
            Pat::Star(Box::new(reverse(p)), greedy)
        }
        Pat::Plus(ref p) => Pat::Plus(Box::new(reverse(p))),
        Pat::Opt(ref p) => Pat::Opt(Box::new(reverse(p))),
        Pat::Look(l) => Pat::Look(l.reversed()),
    }
}

/// Compile a pattern to a program. When `unanchored` is true, the program
/// is prefixed with the conventional non-greedy any-byte loop so that
/// matches may start anywhere.
pub fn compile(pat: &Pat, unanchored: bool) -> Program {
    let mut c = Compiler { insts: vec![Inst::Match] };
    let entry = c.compile_to(pat, 0);
    let start = if unanchored {
        let split = c.insts.len();
        c.insts.push(Inst::Split { next1: entry, next2: split + 1 });
        c.insts.push(Inst::ByteRange { lo: 0x00, hi: 0xFF, next: split });
        split
    } else {
        entry
    };
    Program::new(c.insts, start).unwrap()
}

struct Compiler {
    insts: Vec<Inst>,
}

impl Compiler {
    /// Emit instructions for `pat` that continue at `next` once the
    /// pattern has matched, returning the entry point.
    fn compile_to(&mut self, pat: &Pat, next: usize) -> usize {
        match *pat {
            Pat::Lit(ref bytes) => {
                let mut cur = next;
                for &b in bytes.iter().rev() {
                    cur = self.push(Inst::ByteRange {
                        lo: b,
                        hi: b,
                        next: cur,
                    });
                }
                cur
            }
            Pat::Class(ref ranges) => {
                assert!(!ranges.is_empty());
                let mut entries = vec![];
                for &(lo, hi) in ranges.iter() {
                    entries.push(self.push(Inst::ByteRange {
                        lo,
                        hi,
                        next,
                    }));
                }
                self.alternate(entries)
            }
            Pat::Cat(ref pats) => {
                let mut cur = next;
                for p in pats.iter().rev() {
                    cur = self.compile_to(p, cur);
                }
                cur
            }
            Pat::Alt(ref pats) => {
                assert!(!pats.is_empty());
                let entries: Vec<usize> = pats
                    .iter()
                    .map(|p| self.compile_to(p, next))
                    .collect();
                self.alternate(entries)
            }
            Pat::Star(ref p, greedy) => {
                let split = self.push(Inst::Split { next1: 0, next2: 0 });
                let body = self.compile_to(p, split);
                self.insts[split] = if greedy {
                    Inst::Split { next1: body, next2: next }
                } else {
                    Inst::Split { next1: next, next2: body }
                };
                split
            }
            Pat::Plus(ref p) => {
                let split = self.push(Inst::Split { next1: 0, next2: 0 });
                let body = self.compile_to(p, split);
                self.insts[split] =
                    Inst::Split { next1: body, next2: next };
                body
            }
            Pat::Opt(ref p) => {
                let body = self.compile_to(p, next);
                self.push(Inst::Split { next1: body, next2: next })
            }
            Pat::Look(l) => self.push(Inst::Look { look: l, next }),
        }
    }

    /// Chain the given entry points into a preference ordered alternation.
    fn alternate(&mut self, entries: Vec<usize>) -> usize {
        let mut iter = entries.into_iter().rev();
        let mut cur = iter.next().unwrap();
        for entry in iter {
            cur = self.push(Inst::Split { next1: entry, next2: cur });
        }
        cur
    }

    fn push(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.insts.len() - 1
    }
}

/// Build a search session for the given pattern with a default cache
/// budget.
pub fn session(pat: &Pat, kind: MatchKind) -> SearchSession {
    session_with_budget(pat, kind, 0)
}

pub fn session_with_budget(
    pat: &Pat,
    kind: MatchKind,
    cache_capacity: usize,
) -> SearchSession {
    let forward = compile(pat, true);
    let reverse_prog = compile(&reverse(pat), false);
    SearchSession::new(
        Arc::new(forward),
        Arc::new(reverse_prog),
        kind,
        cache_capacity,
    )
}

/// Search and return the match offsets as a pair.
pub fn find<H: regex_lazydfa::Haystack + ?Sized>(
    session: &SearchSession,
    haystack: &H,
) -> Option<(usize, usize)> {
    session.find(haystack).map(|m| (m.start(), m.end()))
}
