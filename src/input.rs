/// An abstract indexable byte sequence to search.
///
/// The engine only ever needs two things from its input: a total length and
/// random-access byte reads. It never assumes a particular backing encoding
/// beyond "bytes", although programs compiled from Unicode patterns encode
/// their character classes as UTF-8 byte sequences and so match
/// byte-accurately against UTF-8 text.
///
/// Implementations are provided for `[u8]` and `str`.
pub trait Haystack {
    /// The total number of bytes in this haystack.
    fn len(&self) -> usize;

    /// The byte at the given offset.
    ///
    /// This panics when `at >= self.len()`.
    fn byte(&self, at: usize) -> u8;

    /// Returns true if and only if this haystack is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Haystack for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn byte(&self, at: usize) -> u8 {
        self[at]
    }
}

impl Haystack for str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn byte(&self, at: usize) -> u8 {
        self.as_bytes()[at]
    }
}

impl Haystack for Vec<u8> {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn byte(&self, at: usize) -> u8 {
        self[at]
    }
}

#[cfg(test)]
mod tests {
    use super::Haystack;

    #[test]
    fn str_reads_utf8_bytes() {
        let h = "日";
        assert_eq!(3, Haystack::len(h));
        assert_eq!(0xE6, h.byte(0));
    }

    #[test]
    fn slice_reads() {
        let h = &b"abc"[..];
        assert_eq!(3, Haystack::len(h));
        assert_eq!(b'c', h.byte(2));
        assert!(!h.is_empty());
    }
}
