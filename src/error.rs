/// An error that occurs when an instruction program fails validation.
///
/// A `BuildError` always indicates a bug in the program compiler upstream
/// of this crate. Searching never produces errors: "no match" is expressed
/// by `None`, and an internal forward/reverse inconsistency panics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildError {
    kind: ErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    /// The program contains no instructions.
    Empty,
    /// The start index does not refer to an instruction.
    InvalidStart { start: usize, len: usize },
    /// An instruction refers to a position outside the program.
    InvalidRef { inst: usize, next: usize, len: usize },
    /// A byte range instruction has `lo > hi`.
    InvalidRange { inst: usize, lo: u8, hi: u8 },
}

impl BuildError {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn empty() -> BuildError {
        BuildError { kind: ErrorKind::Empty }
    }

    pub(crate) fn invalid_start(start: usize, len: usize) -> BuildError {
        BuildError { kind: ErrorKind::InvalidStart { start, len } }
    }

    pub(crate) fn invalid_ref(
        inst: usize,
        next: usize,
        len: usize,
    ) -> BuildError {
        BuildError { kind: ErrorKind::InvalidRef { inst, next, len } }
    }

    pub(crate) fn invalid_range(inst: usize, lo: u8, hi: u8) -> BuildError {
        BuildError { kind: ErrorKind::InvalidRange { inst, lo, hi } }
    }
}

impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            ErrorKind::Empty => {
                write!(f, "instruction program is empty")
            }
            ErrorKind::InvalidStart { start, len } => write!(
                f,
                "start index {} is out of bounds for a program of {} \
                 instructions",
                start, len,
            ),
            ErrorKind::InvalidRef { inst, next, len } => write!(
                f,
                "instruction {} refers to position {}, which is out of \
                 bounds for a program of {} instructions",
                inst, next, len,
            ),
            ErrorKind::InvalidRange { inst, lo, hi } => write!(
                f,
                "instruction {} has an inverted byte range \
                 \\x{:02X}-\\x{:02X}",
                inst, lo, hi,
            ),
        }
    }
}
