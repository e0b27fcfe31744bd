//! The block codec seam used by the frame layer.

use crate::compress;
use crate::decompress;

/// A level already resolved from [`Level`](crate::Level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockLevel {
    Fast,
    HighRatio,
}

impl BlockLevel {
    /// FastLZ level number, 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            BlockLevel::Fast => 1,
            BlockLevel::HighRatio => 2,
        }
    }
}

/// Single-block compressor/decompressor pair.
///
/// Both methods write into a caller-sized buffer and report how many bytes
/// they wrote. The frame layer sizes `output` and judges the result:
/// `compress_block` returning 0 for a non-empty input is a failure, and
/// `decompress_block` succeeds only if it fills `output` exactly.
pub trait BlockCodec {
    fn compress_block(&self, level: BlockLevel, input: &[u8], output: &mut [u8]) -> usize;

    /// `output` is exactly as long as the expected decompressed length.
    fn decompress_block(&self, input: &[u8], output: &mut [u8]) -> usize;
}

impl<T: BlockCodec + ?Sized> BlockCodec for &T {
    fn compress_block(&self, level: BlockLevel, input: &[u8], output: &mut [u8]) -> usize {
        (**self).compress_block(level, input, output)
    }

    fn decompress_block(&self, input: &[u8], output: &mut [u8]) -> usize {
        (**self).decompress_block(input, output)
    }
}

/// FastLZ level 1 and level 2 blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastLz;

impl BlockCodec for FastLz {
    fn compress_block(&self, level: BlockLevel, input: &[u8], output: &mut [u8]) -> usize {
        compress::compress_block(level, input, output)
    }

    fn decompress_block(&self, input: &[u8], output: &mut [u8]) -> usize {
        decompress::decompress_block(input, output)
    }
}
