//! Error taxonomy shared by the frame encoder and decoder.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller asked for a level other than 0 (auto), 1 or 2.
    #[error("level must be either 1 or 2, got {raw}")]
    InvalidLevel { raw: i32 },

    /// A working buffer could not be reserved.
    #[error("out of memory: could not reserve {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The block codec wrote nothing for a non-empty input.
    #[error("could not compress")]
    CompressionFailed,

    /// The frame is too short or its declared length is implausible.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("could not decompress: expected {expected} bytes, got {actual}")]
    DecompressionFailed { expected: usize, actual: usize },

    /// The input length does not fit the u32 length prefix.
    #[error("input of {len} bytes exceeds the frame length prefix")]
    InputTooLarge { len: usize },
}
