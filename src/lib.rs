/*!
A lazy DFA search engine for precompiled regex instruction programs.

This crate is the matching core of a regex engine: it takes a compiled
instruction [`Program`] (produced by an external parser/compiler) and an
input byte sequence, and decides whether and where a match occurs. It does
so by determinizing the program on the fly: DFA states are built from sets
of simultaneously live instructions only as input bytes actually demand
them, and cached for reuse across searches.

Finding full match offsets takes two passes. A forward [`DFA`] built from
the program locates the end of a match; a reverse `DFA` built from the
separately compiled reversed program then walks backward from that end to
pin the start. [`SearchSession`] owns both halves and enforces that they
are only ever used together:

```
use regex_lazydfa::{Inst, MatchKind, Program, SearchSession};
use std::sync::Arc;

// The program for `a+`, with a non-greedy `.*?` prefix for unanchored
// searching. (Real programs come from an external compiler.)
let forward = Program::new(
    vec![
        Inst::Split { next1: 2, next2: 1 },
        Inst::ByteRange { lo: 0x00, hi: 0xFF, next: 0 },
        Inst::ByteRange { lo: b'a', hi: b'a', next: 3 },
        Inst::Split { next1: 2, next2: 4 },
        Inst::Match,
    ],
    0,
)?;
// `a+` reversed is itself; no prefix, since the reverse scan is anchored
// at the match end.
let reverse = Program::new(
    vec![
        Inst::ByteRange { lo: b'a', hi: b'a', next: 1 },
        Inst::Split { next1: 0, next2: 2 },
        Inst::Match,
    ],
    0,
)?;

let session = SearchSession::new(
    Arc::new(forward),
    Arc::new(reverse),
    MatchKind::FirstMatch,
    0, // default cache budget
);
let m = session.find("xxaaay").unwrap();
assert_eq!((m.start(), m.end()), (2, 5));
# Ok::<(), regex_lazydfa::BuildError>(())
```

There is no pattern syntax anywhere in this crate: programs are data. See
[`Program`] for the instruction set and its invariants, and [`MatchKind`]
for the difference between leftmost-first and leftmost-longest searching.
*/

pub use crate::{
    dfa::DFA,
    error::BuildError,
    input::Haystack,
    program::{Inst, Program},
    search::SearchSession,
    util::{
        alphabet::ByteClasses,
        look::{Look, LookSet},
        matchtypes::{Match, MatchKind},
    },
};

#[macro_use]
mod macros;

mod dfa;
mod error;
mod id;
mod input;
mod program;
mod search;
mod util;
