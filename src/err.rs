use thiserror::Error;

/// Decode failures, each carrying the byte offset at which it was detected.
///
/// The cursor cannot resynchronize after structural corruption, so every
/// variant here aborts the decode.  Recoverable conditions (string length
/// mismatches, nonzero reserved fields, unknown property tags, nonzero
/// checkpoint padding) are reported through the `log` facade instead and
/// decoding continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not an XCOM save: expected file version 0x10 but got {found:#x}")]
    FormatVersionMismatch { found: u32 },

    #[error("no compressed chunk at offset {offset:#x}: magic {found:#010x}")]
    ChunkMagicMismatch { offset: usize, found: u32 },

    #[error("failed to decompress chunk at offset {offset:#x}: {detail}")]
    Decompression { offset: usize, detail: String },

    #[error("chunk at offset {offset:#x} decompressed to {actual} bytes, header declared {expected}")]
    DecompressedSizeMismatch {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("expected \"None\" sentinel at offset {offset:#x}, found {found:?}")]
    MissingSentinel { offset: usize, found: String },

    #[error("{type_name} at offset {offset:#x} declares size {found}, expected {expected}")]
    PropertySizeMismatch {
        offset: usize,
        type_name: &'static str,
        expected: u32,
        found: u32,
    },

    #[error(
        "static array index {index} for {name:?} at offset {offset:#x} is out of sequence (expected {expected})"
    )]
    StaticArrayIndexOutOfSequence {
        offset: usize,
        name: String,
        index: u32,
        expected: u32,
    },

    #[error("name table entry at offset {offset:#x} has a nonzero guard field")]
    NonZeroGuard { offset: usize },

    #[error("nonzero name table length {len} at offset {offset:#x}; not part of the strategy save layout")]
    UnexpectedNameTable { offset: usize, len: u32 },

    #[error("actor template table at offset {offset:#x} has {count} entries, expected none")]
    UnexpectedNonEmptyTable { offset: usize, count: u32 },

    #[error("read of {wanted} bytes at offset {offset:#x} overruns the buffer ({available} available)")]
    BufferOverrun {
        offset: usize,
        wanted: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
