/*!
A DFA that is built at search time, on demand, from an instruction program.

A DFA state is an ordered set of simultaneously live instruction positions
along with some facts about the position in the haystack at which the set
was created. States are only ever built when a search actually needs to
follow a transition that has not been seen before, and every state built is
cached, so the cost of determinization is amortized across searches. The
cache is bounded: when it grows past its capacity, it is wiped and
determinization starts over from whatever state the search is currently in.

Two representational details permeate everything here:

* Matches are delayed by one byte. A state carries the match tag when the
  *previous* state's instruction set contained a match instruction. The
  search compensates by reporting matches one position back, and by feeding
  the DFA one extra sentinel "byte" after the end of input. The delay is
  what makes end-of-text assertions expressible as ordinary transitions.

* Transitions are defined over byte equivalence classes rather than bytes,
  so a state's transition row has one entry per class (plus the end of
  input sentinel), padded to a power of two so that row offsets can be
  computed with shifts.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::id::LazyStateID;
use crate::input::Haystack;
use crate::program::{Inst, Program};
use crate::util::alphabet::Unit;
use crate::util::is_word_byte;
use crate::util::look::{Look, LookSet};
use crate::util::matchtypes::MatchKind;
use crate::util::sparse_set::{SparseSet, SparseSets};
use crate::util::start::Start;

/// The default cache capacity, in bytes, used when none is given.
const DEFAULT_CACHE_CAPACITY: usize = 2 * (1 << 20);

/// The number of non-sentinel states the cache must always have room for.
/// The capacity handed to `DFA::new` is raised to at least this much, which
/// guarantees that clearing the cache always makes enough room to continue
/// the search in progress.
const MIN_STATES: usize = 5;

/// A sentinel in a state's instruction list separating instructions by the
/// haystack position at which the unanchored scan prefix spawned them.
/// Only longest match determinization produces marks. When a match has
/// been seen, everything at or beyond the next mark corresponds to a match
/// starting later than one already found, and is cut.
const MARK: usize = usize::MAX;

/// A DFA built lazily from an instruction program.
///
/// A `DFA` runs its program in one direction only and reports just one
/// offset of a match (the end for a program compiled forward, the start
/// for a program compiled in reverse). Pairing the two directions into a
/// full search is the job of [`SearchSession`](crate::SearchSession).
///
/// The cache of computed states lives behind a mutex inside the DFA, so a
/// `DFA` is cheap to share across threads, but searches that race on the
/// same `DFA` serialize on its cache.
#[derive(Debug)]
pub struct DFA {
    program: Arc<Program>,
    kind: MatchKind,
    stride2: usize,
    cache_capacity: usize,
    cache: Mutex<Cache>,
}

impl DFA {
    /// Build a new lazy DFA for the given program and match semantics.
    ///
    /// `cache_capacity` is the approximate limit, in bytes, on the memory
    /// used for cached DFA states. A capacity of `0` selects a default of
    /// 2MiB. Capacities too small to make progress are silently raised to
    /// a working minimum, so construction cannot fail.
    pub fn new(
        program: Arc<Program>,
        kind: MatchKind,
        cache_capacity: usize,
    ) -> DFA {
        let alphabet_len = program.byte_classes().alphabet_len();
        let stride2 =
            alphabet_len.next_power_of_two().trailing_zeros() as usize;
        let mut capacity = if cache_capacity == 0 {
            DEFAULT_CACHE_CAPACITY
        } else {
            cache_capacity
        };
        let min = minimum_cache_capacity(&program, stride2);
        if capacity < min {
            capacity = min;
        }
        let cache = Cache::new(&program);
        let dfa = DFA {
            program,
            kind,
            stride2,
            cache_capacity: capacity,
            cache: Mutex::new(cache),
        };
        Lazy::new(&dfa, &mut dfa.lock_cache()).init();
        log::debug!(
            "lazy DFA built: {} instructions, alphabet len {}, \
             cache capacity {} bytes",
            dfa.program.len(),
            alphabet_len,
            dfa.cache_capacity,
        );
        dfa
    }

    /// Return the match semantics this DFA was built with.
    pub fn match_kind(&self) -> MatchKind {
        self.kind
    }

    /// Return the program this DFA runs.
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// Return the approximate number of bytes currently used by the state
    /// cache.
    pub fn cache_memory_usage(&self) -> usize {
        self.lock_cache().memory_usage()
    }

    /// Return the number of times the state cache has been cleared because
    /// it grew past its capacity.
    pub fn cache_clear_count(&self) -> usize {
        self.lock_cache().clear_count
    }

    /// Acquire the cache for a search. A panicked search cannot corrupt
    /// anything durable, since the cache holds only derived data, but it
    /// can leave it half updated. So a poisoned cache is reinitialized
    /// instead of propagating the poison.
    pub(crate) fn lock_cache(&self) -> MutexGuard<'_, Cache> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                Lazy::new(self, &mut guard).init();
                guard
            }
        }
    }
}

/// An execution context pairing a DFA with exclusive access to its cache.
///
/// All transition lookups go through here. Misses fall back to
/// determinization and install the computed state before returning it.
pub(crate) struct Lazy<'a> {
    dfa: &'a DFA,
    cache: &'a mut Cache,
}

impl<'a> Lazy<'a> {
    pub(crate) fn new(dfa: &'a DFA, cache: &'a mut Cache) -> Lazy<'a> {
        Lazy { dfa, cache }
    }

    /// Follow the transition out of `current` on the given haystack byte.
    pub(crate) fn next_state(
        &mut self,
        current: LazyStateID,
        byte: u8,
    ) -> LazyStateID {
        let class = self.dfa.program.byte_classes().get(byte) as usize;
        let sid = self.cache.trans[current.as_usize_untagged() + class];
        if !sid.is_unknown() {
            return sid;
        }
        self.cache_next_state(current, Unit::u8(byte))
    }

    /// Follow the transition out of `current` on the end of input
    /// sentinel. Searches do this exactly once, after the last byte of
    /// the span being searched.
    pub(crate) fn next_eoi_state(
        &mut self,
        current: LazyStateID,
    ) -> LazyStateID {
        let classes = self.dfa.program.byte_classes();
        let eoi = classes.eoi();
        let offset =
            current.as_usize_untagged() + classes.get_by_unit(eoi);
        let sid = self.cache.trans[offset];
        if !sid.is_unknown() {
            return sid;
        }
        self.cache_next_state(current, eoi)
    }

    /// Return the start state for a forward search over the given span.
    pub(crate) fn start_state_forward<H: Haystack + ?Sized>(
        &mut self,
        haystack: &H,
        start: usize,
        end: usize,
    ) -> LazyStateID {
        self.start_state(Start::from_position_fwd(haystack, start, end))
    }

    /// Return the start state for a reverse search over the given span.
    pub(crate) fn start_state_reverse<H: Haystack + ?Sized>(
        &mut self,
        haystack: &H,
        start: usize,
        end: usize,
    ) -> LazyStateID {
        self.start_state(Start::from_position_rev(haystack, start, end))
    }

    fn start_state(&mut self, config: Start) -> LazyStateID {
        let sid = self.cache.starts[config.as_usize()];
        if !sid.is_unknown() {
            return sid;
        }
        let dfa = self.dfa;
        let facts = Facts::start(config, &dfa.program);
        self.cache.sparses.clear();
        let mut insts = vec![];
        epsilon_closure(
            &dfa.program,
            dfa.kind,
            dfa.program.start(),
            facts.look_have,
            &mut self.cache.stack,
            &mut self.cache.sparses.set1,
            &mut insts,
        );
        let state = mk_state(&dfa.program, dfa.kind, insts, facts);
        // Matches are delayed by one byte, so a start state can never be a
        // match state, not even for a pattern matching the empty string.
        debug_assert!(!state.facts.is_match());
        let sid = self.add_state(state, None);
        self.cache.starts[config.as_usize()] = sid;
        sid
    }

    /// Compute, install and return the target of the transition out of
    /// `current` on `unit`.
    fn cache_next_state(
        &mut self,
        mut current: LazyStateID,
        unit: Unit,
    ) -> LazyStateID {
        let dfa = self.dfa;
        let index = current.as_usize_untagged() >> dfa.stride2;
        let current_state = Arc::clone(&self.cache.states[index]);
        let state = next(
            &dfa.program,
            dfa.kind,
            &mut self.cache.sparses,
            &mut self.cache.stack,
            &mut self.cache.scratch,
            &current_state,
            unit,
        );
        let next_id =
            self.add_state(state, Some((&current_state, &mut current)));
        self.set_transition(current, unit, next_id);
        next_id
    }

    /// Add the given state to the cache, clearing the cache first if it
    /// has no room left. When a clear happens mid-transition, the state
    /// the search is currently in is reinstalled and `current` is
    /// repointed at its new identifier, so the caller can record the
    /// transition against the right row.
    fn add_state(
        &mut self,
        state: State,
        current: Option<(&Arc<State>, &mut LazyStateID)>,
    ) -> LazyStateID {
        if let Some(&sid) = self.cache.states_to_id.get(&state) {
            return sid;
        }
        if self.must_clear(&state) {
            self.clear_cache();
            if let Some((current_state, current_sid)) = current {
                *current_sid = self.install(State::clone(current_state));
            }
        }
        self.install(state)
    }

    /// Returns true if adding the given state would grow the cache past
    /// its capacity, or exhaust the identifier space.
    fn must_clear(&self, state: &State) -> bool {
        let next_index = self.cache.states.len() << self.dfa.stride2;
        if next_index > LazyStateID::MAX {
            return true;
        }
        let row = (1 << self.dfa.stride2)
            * core::mem::size_of::<LazyStateID>();
        let new = row
            + state.memory_usage()
            + 2 * core::mem::size_of::<Arc<State>>();
        self.cache.memory_usage() + new > self.dfa.cache_capacity
    }

    fn clear_cache(&mut self) {
        self.cache.clear_count += 1;
        log::trace!(
            "lazy DFA cache cleared (count: {}, states at clear: {})",
            self.cache.clear_count,
            self.cache.states.len(),
        );
        self.init();
    }

    /// Unconditionally install the given state and return its identifier.
    fn install(&mut self, state: State) -> LazyStateID {
        if let Some(&sid) = self.cache.states_to_id.get(&state) {
            return sid;
        }
        let index = self.cache.states.len();
        let mut sid = LazyStateID::new(index << self.dfa.stride2);
        if state.facts.is_match() {
            sid = sid.to_match();
        }
        self.push_row();
        self.cache.states_memory += state.memory_usage();
        let state = Arc::new(state);
        self.cache.states.push(Arc::clone(&state));
        self.cache.states_to_id.insert(state, sid);
        sid
    }

    fn set_transition(
        &mut self,
        from: LazyStateID,
        unit: Unit,
        to: LazyStateID,
    ) {
        let offset = from.as_usize_untagged()
            + self.dfa.program.byte_classes().get_by_unit(unit);
        self.cache.trans[offset] = to;
    }

    fn push_row(&mut self) {
        let len = self.cache.trans.len();
        self.cache.trans.resize(
            len + (1 << self.dfa.stride2),
            LazyStateID::unknown(),
        );
    }

    /// Bring the cache to its initial state: empty except for the two
    /// sentinel rows. Row 0 backs the unknown sentinel, so that no
    /// computed state ever has an untagged value of zero. Row 1 is the
    /// dead state, which transitions to itself on every input.
    pub(crate) fn init(&mut self) {
        self.cache.trans.clear();
        self.cache.states.clear();
        self.cache.states_to_id.clear();
        self.cache.states_memory = 0;
        for slot in self.cache.starts.iter_mut() {
            *slot = LazyStateID::unknown();
        }

        let dead = Arc::new(State::dead());
        self.push_row();
        self.cache.states.push(Arc::clone(&dead));

        let stride = 1 << self.dfa.stride2;
        let dead_id = LazyStateID::new(stride).to_dead();
        self.push_row();
        self.cache.states.push(Arc::clone(&dead));
        for slot in self.cache.trans[stride..].iter_mut() {
            *slot = dead_id;
        }
        self.cache.states_to_id.insert(dead, dead_id);
    }
}

/// The mutable scratch space and state cache of a lazy DFA.
#[derive(Debug)]
pub(crate) struct Cache {
    /// The transition table, as a flat row-major sequence of rows of
    /// `1 << stride2` entries each. Entries are identifiers of other
    /// states, or the unknown sentinel for transitions not yet computed.
    trans: Vec<LazyStateID>,
    /// The start state for each starting configuration, or the unknown
    /// sentinel if not yet computed.
    starts: Vec<LazyStateID>,
    /// Every computed state, indexed by transition table row.
    states: Vec<Arc<State>>,
    /// A map from computed state to identifier, for deduplication.
    states_to_id: HashMap<Arc<State>, LazyStateID>,
    /// Scratch space for determinization.
    sparses: SparseSets,
    /// Scratch stack for epsilon closure traversal.
    stack: Vec<usize>,
    /// Scratch list for rebuilding a state's instruction list when newly
    /// satisfied assertions force its closure to be recomputed.
    scratch: Vec<usize>,
    /// The heap memory used by the states themselves, tracked as states
    /// are installed.
    states_memory: usize,
    /// The number of times this cache has been cleared.
    clear_count: usize,
}

impl Cache {
    fn new(program: &Program) -> Cache {
        Cache {
            trans: vec![],
            starts: vec![LazyStateID::unknown(); Start::count()],
            states: vec![],
            states_to_id: HashMap::new(),
            sparses: SparseSets::new(program.len()),
            stack: vec![],
            scratch: vec![],
            states_memory: 0,
            clear_count: 0,
        }
    }

    /// Return the approximate memory usage of this cache, in bytes.
    pub(crate) fn memory_usage(&self) -> usize {
        const ID_SIZE: usize = core::mem::size_of::<LazyStateID>();
        self.trans.len() * ID_SIZE
            + self.starts.len() * ID_SIZE
            + self.states.len() * 2 * core::mem::size_of::<Arc<State>>()
            + self.states_memory
    }
}

/// A DFA state: an ordered set of live instruction positions, plus facts
/// about how the set was reached.
///
/// The order of `insts` is the priority order inherited from the program,
/// which is what makes first match semantics work. The list holds byte
/// range and match instructions that are live, assertion instructions
/// whose satisfaction is still undecided, and (under longest match
/// semantics) `MARK` separators.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct State {
    insts: Vec<usize>,
    facts: Facts,
}

impl State {
    /// The dead state: no live instructions, nothing can match.
    fn dead() -> State {
        State { insts: vec![], facts: Facts::default() }
    }

    fn memory_usage(&self) -> usize {
        core::mem::size_of::<State>()
            + self.insts.len() * core::mem::size_of::<usize>()
    }
}

/// Position facts attached to a DFA state.
///
/// `look_have` records assertions known to hold at the position where the
/// state was created, and `look_need` records the assertions that the
/// state's undecided assertion instructions are waiting on. States whose
/// instruction lists are equal but whose facts differ are distinct states.
/// To keep that from fragmenting the cache, facts are canonicalized: when
/// nothing is waiting on an assertion, `look_have` is cleared.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
struct Facts {
    bools: u8,
    look_have: LookSet,
    look_need: LookSet,
}

impl Facts {
    define_bool!(0, is_match, set_is_match);
    define_bool!(1, from_word, set_from_word);

    /// The facts holding at the beginning of a search with the given
    /// starting configuration. Facts irrelevant to the program are left
    /// unset so that starting configurations the program cannot tell
    /// apart share a start state.
    fn start(config: Start, program: &Program) -> Facts {
        let mut facts = Facts::default();
        match config {
            Start::NonWordByte => {}
            Start::WordByte => {
                if program.has_word_boundary() {
                    facts.set_from_word(true);
                }
            }
            Start::Text => {
                if program.has_anchor() {
                    facts.look_have.insert(Look::StartText);
                    facts.look_have.insert(Look::StartLine);
                }
            }
            Start::Line => {
                if program.has_anchor() {
                    facts.look_have.insert(Look::StartLine);
                }
            }
        }
        facts
    }
}

/// Compute the state reached from the given state on the given input unit.
fn next(
    program: &Program,
    kind: MatchKind,
    sparses: &mut SparseSets,
    stack: &mut Vec<usize>,
    scratch: &mut Vec<usize>,
    state: &State,
    unit: Unit,
) -> State {
    sparses.clear();
    scratch.clear();

    // Which assertions does this unit satisfy at the current position?
    let mut look_have = state.facts.look_have;
    if unit.is_eoi() {
        look_have.insert(Look::EndText);
        look_have.insert(Look::EndLine);
    } else if unit.as_u8() == Some(b'\n') {
        look_have.insert(Look::EndLine);
    }
    if program.has_word_boundary() {
        let to_word = unit.as_u8().map_or(false, is_word_byte);
        if state.facts.from_word() != to_word {
            look_have.insert(Look::WordBoundary);
        } else {
            look_have.insert(Look::WordBoundaryNegate);
        }
    }

    // If an assertion some instruction was waiting on just became true,
    // the closure of this state is incomplete and must be recomputed with
    // the richer set of facts. Otherwise the stored list is already the
    // full closure and can be used as is.
    let mut gained = look_have;
    gained.subtract(state.facts.look_have);
    gained.intersect(state.facts.look_need);
    let current: &[usize] = if gained.is_empty() {
        &state.insts
    } else {
        for &id in state.insts.iter() {
            if id == MARK {
                push_mark(scratch);
            } else {
                epsilon_closure(
                    program,
                    kind,
                    id,
                    look_have,
                    stack,
                    &mut sparses.set1,
                    scratch,
                );
            }
        }
        &scratch[..]
    };

    // Facts for the position after `unit` is consumed.
    let mut facts = Facts::default();
    if let Some(b) = unit.as_u8() {
        if program.has_anchor() && b == b'\n' {
            facts.look_have.insert(Look::StartLine);
        }
        if program.has_word_boundary() && is_word_byte(b) {
            facts.set_from_word(true);
        }
    }

    let mut insts = vec![];
    for &id in current.iter() {
        if id == MARK {
            // Everything past this point was spawned at a later haystack
            // position. Once a match is in hand, such instructions could
            // only produce matches that are not leftmost.
            if facts.is_match() {
                break;
            }
            push_mark(&mut insts);
            continue;
        }
        match *program.get(id) {
            Inst::ByteRange { lo, hi, next } => {
                if let Some(b) = unit.as_u8() {
                    if lo <= b && b <= hi {
                        epsilon_closure(
                            program,
                            kind,
                            next,
                            facts.look_have,
                            stack,
                            &mut sparses.set2,
                            &mut insts,
                        );
                    }
                }
            }
            Inst::Match => {
                facts.set_is_match(true);
                if !kind.continue_past_first_match() {
                    break;
                }
            }
            Inst::Split { .. } | Inst::Look { .. } => {}
        }
    }
    mk_state(program, kind, insts, facts)
}

/// Follow all epsilon transitions reachable from `start_id` under the
/// given assertion facts, appending every live instruction encountered to
/// `list` in priority order. `set` carries visited-membership across calls
/// so that repeated closures into the same list never duplicate an
/// instruction.
///
/// Assertion instructions are appended even when they cannot be followed
/// yet; they are the hooks by which a later transition, carrying richer
/// facts, resumes the closure.
fn epsilon_closure(
    program: &Program,
    kind: MatchKind,
    start_id: usize,
    look_have: LookSet,
    stack: &mut Vec<usize>,
    set: &mut SparseSet,
    list: &mut Vec<usize>,
) {
    debug_assert!(stack.is_empty());
    stack.push(start_id);
    while let Some(mut id) = stack.pop() {
        loop {
            if id == MARK {
                push_mark(list);
                break;
            }
            if !set.insert(id) {
                break;
            }
            match *program.get(id) {
                Inst::ByteRange { .. } | Inst::Match => {
                    list.push(id);
                    break;
                }
                Inst::Split { next1, next2 } => {
                    stack.push(next2);
                    if kind.continue_past_first_match()
                        && id == program.start()
                        && program.unanchored_start()
                    {
                        // Separate instructions spawned by this scan
                        // restart from those of earlier positions.
                        stack.push(MARK);
                    }
                    id = next1;
                }
                Inst::Look { look, next } => {
                    list.push(id);
                    if look_have.contains(look) {
                        id = next;
                    } else {
                        break;
                    }
                }
            }
        }
    }
}

/// Finish a state under construction: trim instructions that can never
/// influence the search, derive `look_need` and canonicalize the facts.
fn mk_state(
    program: &Program,
    kind: MatchKind,
    mut insts: Vec<usize>,
    mut facts: Facts,
) -> State {
    // Under first match semantics, nothing after a match instruction can
    // run. Under longest match semantics, same-position instructions
    // still extend the match, but later-position ones (past a mark) do
    // not.
    let mut saw_match = false;
    let mut keep = insts.len();
    for (i, &id) in insts.iter().enumerate() {
        if saw_match && (kind == MatchKind::FirstMatch || id == MARK) {
            keep = i;
            break;
        }
        if id != MARK {
            if let Inst::Match = *program.get(id) {
                saw_match = true;
            }
        }
    }
    insts.truncate(keep);
    while insts.last() == Some(&MARK) {
        insts.pop();
    }

    // A state with no live instructions and no match can never go
    // anywhere. Drop whatever facts were gathered on the way in so that it
    // interns to the dead sentinel and searches fail fast.
    if insts.is_empty() && !facts.is_match() {
        return State::dead();
    }

    let mut look_need = LookSet::empty();
    for &id in insts.iter() {
        if id == MARK {
            continue;
        }
        if let Inst::Look { look, .. } = *program.get(id) {
            look_need.insert(look);
        }
    }
    facts.look_need = look_need;
    if facts.look_need.is_empty() {
        facts.look_have = LookSet::empty();
    }
    State { insts, facts }
}

fn push_mark(list: &mut Vec<usize>) {
    match list.last() {
        None | Some(&MARK) => {}
        Some(_) => list.push(MARK),
    }
}

/// The smallest usable cache capacity for the given program: room for the
/// sentinel states plus `MIN_STATES` maximally sized real states.
fn minimum_cache_capacity(program: &Program, stride2: usize) -> usize {
    const ID_SIZE: usize = core::mem::size_of::<LazyStateID>();
    let stride = 1 << stride2;
    // A state's list can hold every instruction once, plus a mark per
    // instruction in the worst case.
    let state_size = core::mem::size_of::<State>()
        + 2 * program.len() * core::mem::size_of::<usize>()
        + 2 * core::mem::size_of::<Arc<State>>();
    (2 + MIN_STATES) * (stride * ID_SIZE + state_size)
        + Start::count() * ID_SIZE
}
