/*!
Search routines coupling a forward and a reverse lazy DFA.

A DFA scan in one direction can only report one edge of a match: running
the forward program yields the position where the match ends, and nothing
else. To recover the full offsets, the span up to that end is scanned
again, backward, with a DFA built from the separately compiled reverse
program. The reverse scan is always run under longest match semantics and
keeps the last (that is, leftmost) match position it sees, which is what
pins the start correctly for both match kinds.
*/

use std::sync::Arc;

use crate::dfa::{Lazy, DFA};
use crate::id::LazyStateID;
use crate::input::Haystack;
use crate::program::Program;
use crate::util::matchtypes::{Match, MatchKind};
use crate::util::MATCH_OFFSET;

/// A forward/reverse pair of lazy DFAs over the same pattern, ready to
/// run searches.
///
/// This is the main entry point of the crate. See the crate documentation
/// for a complete example.
#[derive(Debug)]
pub struct SearchSession {
    forward: DFA,
    reverse: DFA,
}

impl SearchSession {
    /// Create a new session from a forward program and the corresponding
    /// reverse program.
    ///
    /// The two programs must come from the same pattern: `reverse` is the
    /// compilation of the reversed pattern, with assertions flipped via
    /// [`Look::reversed`](crate::Look::reversed), and without any
    /// unanchored scan prefix. Handing in programs from different
    /// patterns does not cause memory unsafety, but searches may report
    /// nonsensical offsets or panic.
    ///
    /// `kind` selects the match semantics of the forward scan. The
    /// reverse DFA always runs under longest match semantics; having
    /// found where a match ends, the session must find where that match
    /// *first* could have started, regardless of how its end was chosen.
    ///
    /// `cache_capacity` bounds the state cache of each DFA, in bytes,
    /// with `0` selecting a default. See [`DFA::new`].
    pub fn new(
        forward: Arc<Program>,
        reverse: Arc<Program>,
        kind: MatchKind,
        cache_capacity: usize,
    ) -> SearchSession {
        SearchSession {
            forward: DFA::new(forward, kind, cache_capacity),
            reverse: DFA::new(
                reverse,
                MatchKind::LongestMatch,
                cache_capacity,
            ),
        }
    }

    /// Return the offsets of the first match in the haystack, if one
    /// exists.
    pub fn find<H: Haystack + ?Sized>(
        &self,
        haystack: &H,
    ) -> Option<Match> {
        self.find_at(haystack, 0)
    }

    /// Like `find`, but begin the search at the given byte offset.
    ///
    /// Assertions are still evaluated against the full haystack: a `^`
    /// does not match at `start` unless `start` is `0` or follows a line
    /// terminator, and a word boundary at `start` sees the byte before
    /// it. This panics when `start > haystack.len()`.
    pub fn find_at<H: Haystack + ?Sized>(
        &self,
        haystack: &H,
        start: usize,
    ) -> Option<Match> {
        assert!(
            start <= haystack.len(),
            "search start {} exceeds haystack length {}",
            start,
            haystack.len(),
        );
        find(&self.forward, &self.reverse, haystack, start)
    }

    /// Returns true if and only if the haystack contains a match. This
    /// runs only the forward scan.
    pub fn is_match<H: Haystack + ?Sized>(&self, haystack: &H) -> bool {
        let mut cache = self.forward.lock_cache();
        let mut lazy = Lazy::new(&self.forward, &mut cache);
        find_fwd(&mut lazy, haystack, 0, haystack.len()).is_some()
    }

    /// Return the forward DFA of this session, e.g. to inspect its cache
    /// statistics.
    pub fn forward(&self) -> &DFA {
        &self.forward
    }

    /// Return the reverse DFA of this session.
    pub fn reverse(&self) -> &DFA {
        &self.reverse
    }
}

/// Run a complete two-pass search.
pub(crate) fn find<H: Haystack + ?Sized>(
    forward: &DFA,
    reverse: &DFA,
    haystack: &H,
    start: usize,
) -> Option<Match> {
    let end = {
        let mut cache = forward.lock_cache();
        let mut lazy = Lazy::new(forward, &mut cache);
        find_fwd(&mut lazy, haystack, start, haystack.len())?
    };
    let mut cache = reverse.lock_cache();
    let mut lazy = Lazy::new(reverse, &mut cache);
    let match_start = match find_rev(&mut lazy, haystack, start, end) {
        Some(match_start) => match_start,
        // The reverse program must accept some suffix of a span the
        // forward program matched. Failing to is a bug in the program
        // pair handed to the session.
        None => panic!(
            "reverse scan found no start for a match ending at {}",
            end,
        ),
    };
    debug_assert!(match_start <= end);
    Some(Match::new(match_start, end))
}

/// Scan forward through `haystack[start..end]` and return the end offset
/// of the match, if any.
///
/// Because matches are delayed by one byte, a match state entered at
/// position `at` reports a match ending at `at - 1`, and one final
/// transition on the end of input sentinel is needed after the last byte.
/// The last match offset recorded wins; earlier records are from
/// higher priority instructions whose matches were extended.
fn find_fwd<H: Haystack + ?Sized>(
    lazy: &mut Lazy<'_>,
    haystack: &H,
    start: usize,
    end: usize,
) -> Option<usize> {
    let mut sid = lazy.start_state_forward(haystack, start, end);
    let mut last_match = None;
    let mut at = start;
    while at < end {
        sid = lazy.next_state(sid, haystack.byte(at));
        at += 1;
        if sid.is_tagged() {
            if sid.is_match() {
                last_match = Some(at - MATCH_OFFSET);
            } else if sid.is_dead() {
                return last_match;
            }
        }
    }
    eoi_fwd(lazy, haystack, end, sid).or(last_match)
}

/// Scan backward through `haystack[start..end]` and return the start
/// offset of the leftmost match ending at `end`, if any.
fn find_rev<H: Haystack + ?Sized>(
    lazy: &mut Lazy<'_>,
    haystack: &H,
    start: usize,
    end: usize,
) -> Option<usize> {
    let mut sid = lazy.start_state_reverse(haystack, start, end);
    let mut last_match = None;
    let mut at = end;
    while at > start {
        at -= 1;
        sid = lazy.next_state(sid, haystack.byte(at));
        if sid.is_tagged() {
            if sid.is_match() {
                last_match = Some(at + MATCH_OFFSET);
            } else if sid.is_dead() {
                return last_match;
            }
        }
    }
    eoi_rev(lazy, haystack, start, sid).or(last_match)
}

/// Resolve the transition past the last position of a forward scan. When
/// the scan runs to the end of the haystack this is the end of input
/// sentinel; for a scan capped before the end, it is the actual next
/// byte, so that line and word assertions see what is really there.
fn eoi_fwd<H: Haystack + ?Sized>(
    lazy: &mut Lazy<'_>,
    haystack: &H,
    end: usize,
    sid: LazyStateID,
) -> Option<usize> {
    let sid = if end < haystack.len() {
        lazy.next_state(sid, haystack.byte(end))
    } else {
        lazy.next_eoi_state(sid)
    };
    if sid.is_match() {
        Some(end)
    } else {
        None
    }
}

/// The reverse analogue of `eoi_fwd`: the position before `start` is the
/// end of input for the reverse DFA only when `start` is `0`.
fn eoi_rev<H: Haystack + ?Sized>(
    lazy: &mut Lazy<'_>,
    haystack: &H,
    start: usize,
    sid: LazyStateID,
) -> Option<usize> {
    let sid = if start > 0 {
        lazy.next_state(sid, haystack.byte(start - 1))
    } else {
        lazy.next_eoi_state(sid)
    };
    if sid.is_match() {
        Some(start)
    } else {
        None
    }
}

