//! Error types for Mach-O parsing and editing.
//!
//! Every fallible operation in this crate returns [`crate::Result`], which
//! uses the [`enum@Error`] type below. Parse errors are raised eagerly while
//! decoding, before any view of the input is handed to the caller; mutation
//! errors are raised before any state is changed, so a failed call leaves
//! the container exactly as it was.

use thiserror::Error;

/// The error type for Mach-O container operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure while reading or writing a file (CLI paths only; the
    /// library itself operates on in-memory buffers).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first four bytes match none of the recognized magics.
    #[error("unrecognized magic: {magic:#010x}")]
    BadMagic {
        /// The value read big-endian from offset 0.
        magic: u32,
    },

    /// A declared region extends beyond the actual buffer.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    Truncated {
        /// End of the region being accessed.
        needed: usize,
        /// Total bytes available.
        available: usize,
    },

    /// A load command declares a size below the 8-byte minimum.
    #[error("load command {index} has invalid size {size} (minimum 8)")]
    InvalidCommandSize {
        /// Position of the command in the table.
        index: usize,
        /// The declared cmdsize.
        size: u32,
    },

    /// A load command's span exceeds the declared command region or the file.
    #[error("load command {index} at offset {offset:#x} extends beyond the command region")]
    CommandOverflow {
        /// Position of the command in the table.
        index: usize,
        /// File offset of the command within the slice.
        offset: usize,
    },

    /// A segment command declares more section records than fit inside its
    /// own declared size.
    #[error("segment '{segment}' declares {nsects} sections but its command is only {cmdsize} bytes")]
    SectionOverflow {
        /// Name of the offending segment.
        segment: String,
        /// Declared section count.
        nsects: u32,
        /// Declared size of the owning command.
        cmdsize: u32,
    },

    /// A fat header declares an architecture count outside `1..=1000`.
    #[error("invalid fat arch count: {count}")]
    InvalidSliceCount {
        /// The declared nfat_arch.
        count: u32,
    },

    /// A fat slice's span is inconsistent with the file.
    #[error("fat slice {index} out of bounds: offset {offset:#x}, size {size:#x}, file size {file_size:#x}")]
    SliceOutOfBounds {
        /// Index of the slice in the fat header.
        index: usize,
        /// Declared slice offset.
        offset: u64,
        /// Declared slice size.
        size: u64,
        /// Actual file length.
        file_size: u64,
    },

    /// A fat slice declares a zero size.
    #[error("fat slice {index} has zero size")]
    ZeroSizeSlice {
        /// Index of the slice in the fat header.
        index: usize,
    },

    /// A fat slice declares an unusable alignment exponent.
    #[error("fat slice {index} has invalid alignment exponent {align}")]
    InvalidSliceAlign {
        /// Index of the slice in the fat header.
        index: usize,
        /// The declared exponent.
        align: u32,
    },

    /// A UUID string is not 32 hexadecimal digits (hyphens ignored).
    #[error("invalid UUID string {value:?} (expected 32 hex digits)")]
    InvalidUuid {
        /// The rejected input.
        value: String,
    },

    /// A segment name is empty or longer than the 16-byte field allows.
    #[error("invalid segment name {name:?} (must be 1 to 16 bytes)")]
    InvalidSegmentName {
        /// The rejected name.
        name: String,
    },

    /// An injected segment carries no payload bytes.
    #[error("segment payload is empty")]
    EmptySegmentData,

    /// A code-signature command is already present.
    #[error("binary already has a code signature command")]
    DuplicateSignature,

    /// A slice index is outside the fat container's slice table.
    #[error("slice index {index} out of range (slice count: {count})")]
    SliceIndex {
        /// The requested index.
        index: usize,
        /// Number of slices in the container.
        count: usize,
    },

    /// Slice selection attempted on a thin (single-architecture) binary.
    #[error("not a fat binary")]
    NotFat,
}

/// A specialized Result type for Mach-O container operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a truncation error for an access ending at `needed`.
    #[inline]
    pub fn truncated(needed: usize, available: usize) -> Self {
        Error::Truncated { needed, available }
    }
}
