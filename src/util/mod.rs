pub(crate) mod alphabet;
pub(crate) mod look;
pub(crate) mod matchtypes;
pub(crate) mod sparse_set;
pub(crate) mod start;

/// The offset, in bytes, that a match is delayed by in the DFAs built by
/// this crate. A state only reports a match for positions one byte back
/// from where the corresponding set of instructions contained a match
/// instruction. The delay is what lets end-of-text assertions resolve: the
/// final transition on the end-of-input sentinel can still produce a match
/// state even though no byte remains to be read.
pub(crate) const MATCH_OFFSET: usize = 1;

/// Returns true if and only if the given byte is considered a word
/// character. This only applies to ASCII.
pub(crate) fn is_word_byte(byte: u8) -> bool {
    match byte {
        b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' => true,
        _ => false,
    }
}
