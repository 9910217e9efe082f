/// A pairing of sparse sets, as used during determinization.
///
/// Computing the transition out of a DFA state can require two membership
/// sets at once: one deduplicating the recomputed closure of the current
/// state and one deduplicating the instruction list of the next state.
#[derive(Debug)]
pub(crate) struct SparseSets {
    pub(crate) set1: SparseSet,
    pub(crate) set2: SparseSet,
}

impl SparseSets {
    /// Create a new pair of sparse sets, each with the given capacity.
    pub(crate) fn new(capacity: usize) -> SparseSets {
        SparseSets {
            set1: SparseSet::new(capacity),
            set2: SparseSet::new(capacity),
        }
    }

    /// Clear both sparse sets.
    pub(crate) fn clear(&mut self) {
        self.set1.clear();
        self.set2.clear();
    }
}

/// A sparse set used for representing ordered sets of instruction
/// positions.
///
/// This supports constant time addition and membership testing while
/// preserving insertion order, which is how instruction priority is
/// carried through determinization. Clearing the set is constant time
/// regardless of capacity, since membership is tracked through a
/// generation-free dense/sparse index pair.
///
/// The data structure is well known and can be found in several places.
/// The sparse array is never initialized, so reads from it before a
/// corresponding write are garbage, but that garbage is only ever used
/// after validating it against the dense array.
#[derive(Clone)]
pub(crate) struct SparseSet {
    /// The number of elements currently in this set.
    len: usize,
    /// Dense contains the ids in the order in which they were inserted.
    dense: Vec<usize>,
    /// Sparse maps ids to their location in dense.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Create a new sparse set with the given capacity.
    ///
    /// Sparse sets have a fixed size and can never grow. Attempting to
    /// insert an id greater than or equal to the capacity panics.
    pub(crate) fn new(capacity: usize) -> SparseSet {
        SparseSet { len: 0, dense: vec![0; capacity], sparse: vec![0; capacity] }
    }

    /// Returns the number of ids in this set.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if and only if this set is empty.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert the given id into this set and return true if it was new.
    ///
    /// If the id was already in this set, this is a no-op.
    pub(crate) fn insert(&mut self, id: usize) -> bool {
        if self.contains(id) {
            return false;
        }
        let index = self.len;
        self.dense[index] = id;
        self.sparse[id] = index;
        self.len += 1;
        true
    }

    /// Returns true if and only if this set contains the given id.
    pub(crate) fn contains(&self, id: usize) -> bool {
        let index = self.sparse[id];
        index < self.len() && self.dense[index] == id
    }

    /// Clear this set such that it has no members.
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns an iterator over all ids in this set, in insertion order.
    pub(crate) fn iter(&self) -> core::slice::Iter<'_, usize> {
        self.dense[..self.len()].iter()
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let elements: Vec<usize> = self.iter().copied().collect();
        f.debug_tuple("SparseSet").field(&elements).finish()
    }
}
