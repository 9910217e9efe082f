/*!
Byte oriented alphabets, and in particular, equivalence classes over bytes.

The DFAs in this crate never transition directly on bytes. Instead, the
bytes that an instruction program can actually distinguish are partitioned
into equivalence classes, and transitions are defined over class
identifiers. Since a typical program distinguishes only a handful of byte
ranges, this shrinks each state's transition row from 256 entries to
something much smaller, which matters a lot when states are built lazily
and cached under a memory budget.

The alphabet also contains one sentinel that is not a byte at all: the
"end of input" unit. Searches feed it to the DFA exactly once, after the
last byte, so that end-of-text assertions can resolve.
*/

/// Unit represents a single unit of input for DFA based regex engines.
///
/// It is either a byte, represented by its equivalence class, or a sentinel
/// representing the end of input.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) enum Unit {
    U8(u8),
    EOI(u16),
}

impl Unit {
    /// Create a new unit from a byte.
    pub(crate) fn u8(byte: u8) -> Unit {
        Unit::U8(byte)
    }

    /// Create a new unit representing the end of input, where the alphabet
    /// contains the given number of byte equivalence classes.
    pub(crate) fn eoi(num_byte_equiv_classes: usize) -> Unit {
        Unit::EOI(num_byte_equiv_classes as u16)
    }

    /// If this unit is a byte, return it.
    pub(crate) fn as_u8(self) -> Option<u8> {
        match self {
            Unit::U8(b) => Some(b),
            Unit::EOI(_) => None,
        }
    }

    /// Returns true if and only if this unit is the end of input sentinel.
    pub(crate) fn is_eoi(self) -> bool {
        match self {
            Unit::EOI(_) => true,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Unit::U8(b) => write!(f, "{:?}", b as char),
            Unit::EOI(_) => write!(f, "EOI"),
        }
    }
}

/// A representation of byte oriented equivalence classes.
///
/// This maps every possible byte value to its equivalence class identifier.
/// Class identifiers are contiguous and start at `0`. Bytes in the same
/// class are guaranteed to never discriminate between a match and a
/// non-match for the program the classes were computed from.
#[derive(Clone, Copy)]
pub struct ByteClasses([u8; 256]);

impl ByteClasses {
    /// Creates a new set of equivalence classes where all bytes are mapped
    /// to the same class.
    pub(crate) fn empty() -> ByteClasses {
        ByteClasses([0; 256])
    }

    /// Set the equivalence class for the given byte.
    pub(crate) fn set(&mut self, byte: u8, class: u8) {
        self.0[byte as usize] = class;
    }

    /// Get the equivalence class for the given byte.
    pub fn get(&self, byte: u8) -> u8 {
        self.0[byte as usize]
    }

    /// Get the equivalence class for the given input unit, as a transition
    /// table column index. The end of input sentinel maps to the last
    /// column.
    pub(crate) fn get_by_unit(&self, unit: Unit) -> usize {
        match unit {
            Unit::U8(b) => self.get(b) as usize,
            Unit::EOI(i) => i as usize,
        }
    }

    /// Return the end of input sentinel for this alphabet.
    pub(crate) fn eoi(&self) -> Unit {
        Unit::eoi(self.alphabet_len() - 1)
    }

    /// Return the total number of elements in the alphabet represented by
    /// these equivalence classes. This is always one more than the number
    /// of byte classes, to account for the end of input sentinel.
    pub fn alphabet_len(&self) -> usize {
        self.0[255] as usize + 1 + 1
    }
}

impl core::fmt::Debug for ByteClasses {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut ranges = vec![];
        let mut start = 0u8;
        for b in 1..=255u16 {
            let b = b as u8;
            if self.get(b) != self.get(start) {
                ranges.push((start, b - 1, self.get(start)));
                start = b;
            }
        }
        ranges.push((start, 255, self.get(start)));
        write!(f, "ByteClasses(")?;
        for (i, (s, e, class)) in ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}-{:?} => {}", *s as char, *e as char, class)?;
        }
        write!(f, ")")
    }
}

/// A partition of bytes into equivalence classes, under construction.
///
/// Byte ranges are added as the program is analyzed, and the final
/// `ByteClasses` map is extracted once all ranges are in.
#[derive(Clone, Debug)]
pub(crate) struct ByteClassSet(ByteSet);

impl ByteClassSet {
    /// Create a new set of byte classes where all bytes are part of the
    /// same equivalence class.
    pub(crate) fn empty() -> Self {
        ByteClassSet(ByteSet::empty())
    }

    /// Indicate the the range of bytes given are distinct from all other
    /// bytes.
    pub(crate) fn set_range(&mut self, start: u8, end: u8) {
        debug_assert!(start <= end);
        if start > 0 {
            self.0.add(start - 1);
        }
        self.0.add(end);
    }

    /// Convert this boundary set into a map from byte to equivalence class
    /// identifier.
    pub(crate) fn byte_classes(&self) -> ByteClasses {
        let mut classes = ByteClasses::empty();
        let mut class = 0u8;
        let mut b = 0u8;
        loop {
            classes.set(b, class);
            if b == 255 {
                break;
            }
            if self.0.contains(b) {
                class += 1;
            }
            b += 1;
        }
        classes
    }
}

/// A simple fixed size bitset over all possible byte values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ByteSet {
    bits: [u128; 2],
}

impl ByteSet {
    pub(crate) fn empty() -> ByteSet {
        ByteSet::default()
    }

    pub(crate) fn add(&mut self, byte: u8) {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits[bucket as usize] |= 1 << bit;
    }

    pub(crate) fn contains(&self, byte: u8) -> bool {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits[bucket as usize] & (1 << bit) > 0
    }
}
