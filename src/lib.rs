//! Self-framing FastLZ codec.
//!
//! A frame is the original length as a little-endian `u32`, followed by a
//! single compressed block:
//!
//! ```text
//! +----------------+---------------------------+
//! | length (u32le) | block payload             |
//! +----------------+---------------------------+
//! ```
//!
//! The block codec is pluggable through [`BlockCodec`]; [`compress`] and
//! [`decompress`] use the bundled [`FastLz`] implementation.

#![forbid(unsafe_code)]

// Definitions
pub mod definitions {

    // Every frame begins with the original (uncompressed) length, stored as a
    // little-endian u32, followed by the block produced by the block codec.
    pub const LEN_PREFIX_SIZE: usize = 4;

    // Inputs shorter than this are compressed at level 1 when no level is
    // given, larger ones at level 2.
    pub const AUTO_LEVEL_THRESHOLD: usize = 65_536;

    // Fixed slack added on top of the 5% expansion allowance.
    pub const COMPRESS_SLACK: usize = 2;

    // A declared length may be at most this many times the payload length.
    pub const MAX_COMPRESSION_RATIO: u64 = 256;

    // Extra byte allocated past the declared length on decode.
    pub const DECOMPRESS_SLACK: usize = 1;

    //
    // A FastLZ block is a sequence of instructions. The top 3 bits of the
    // first byte carry the block level minus one; they are masked off before
    // that byte is interpreted as an instruction.
    //
    // For an instruction byte c:
    // - If c >> 5 == 0, the next 1 + c bytes are literal bytes.
    // - Otherwise it is a match. Level 1: the length is 2 + (c >> 5), where a
    //   value of 7 is extended by one more byte. The distance is
    //   1 + ((c & 31) << 8 | next byte).
    // - Level 2 extends the length with a run of 255 bytes and uses a
    //   distance byte of 255 with (c & 31) == 31 as an escape for a 16 bit
    //   far distance, biased by MAX_L2_DISTANCE.
    //
    pub const MAX_COPY: usize = 32;
    pub const MAX_LEN: usize = 264;
    pub const MAX_L1_DISTANCE: usize = 8192;
    pub const MAX_L2_DISTANCE: usize = 8191;
    pub const MAX_FAR_DISTANCE: usize = 65535 + MAX_L2_DISTANCE - 1;

    pub const HASH_LOG: u32 = 13;
    pub const HASH_SIZE: usize = 1 << HASH_LOG;
    pub const HASH_MASK: u32 = (HASH_SIZE as u32) - 1;

    pub const LEVEL_TAG_SHIFT: u8 = 5;
}

pub mod error;
pub use self::error::{Error, Result};

mod level;
pub use self::level::Level;

// FastLZ block compressor and decompressor
mod compress;
mod decompress;

// Block codecs
pub mod block;
pub use self::block::{BlockCodec, BlockLevel, FastLz};

// Frame encoder
mod encode;
pub use self::encode::{compress, compress_with_raw_level, max_compressed_len};

// Frame decoder
mod decode;
pub use self::decode::{decompress, decompressed_len};

/// Crate version, as recorded in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame encoder/decoder over an injected block codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec<B = FastLz> {
    block: B,
}

impl<B: BlockCodec> Codec<B> {
    pub fn new(block: B) -> Codec<B> {
        Codec { block }
    }

    pub fn block(&self) -> &B {
        &self.block
    }
}
