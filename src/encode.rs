use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use crate::block::{BlockCodec, FastLz};
use crate::definitions::*;
use crate::error::{Error, Result};
use crate::level::Level;
use crate::Codec;

// max_compressed_len returns the size of the buffer a frame is encoded into:
// the length prefix, the input grown by 5% (rounded up) and a fixed slack.
pub fn max_compressed_len(src_len: usize) -> usize {
    LEN_PREFIX_SIZE + src_len + src_len.div_ceil(20) + COMPRESS_SLACK
}

/// Compress `src` into a frame with the bundled FastLZ codec.
pub fn compress(src: &[u8], level: Level) -> Result<Vec<u8>> {
    Codec::new(FastLz).compress(src, level)
}

/// Like [`compress`], taking the integer level of the original API
/// (0 = auto, 1, 2).
pub fn compress_with_raw_level(src: &[u8], level: i32) -> Result<Vec<u8>> {
    compress(src, Level::from_raw(level)?)
}

impl<B: BlockCodec> Codec<B> {
    /// Compress `src` into a length-prefixed frame.
    ///
    /// # Errors
    /// - `InputTooLarge` if `src` is longer than `u32::MAX` bytes.
    /// - `OutOfMemory` if the output buffer cannot be reserved.
    /// - `CompressionFailed` if the block codec writes nothing for a
    ///   non-empty input, or claims more than the buffer holds.
    pub fn compress(&self, src: &[u8], level: Level) -> Result<Vec<u8>> {
        let block_level = level.resolve(src.len());
        let src_len = u32::try_from(src.len()).map_err(|_| Error::InputTooLarge { len: src.len() })?;

        let capacity = max_compressed_len(src.len());
        let mut dst: Vec<u8> = Vec::new();
        dst.try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { requested: capacity })?;
        dst.resize(capacity, 0);
        trace!(
            "compress: {} bytes at level {}, buffer {} bytes",
            src.len(),
            block_level.number(),
            capacity
        );

        // Start the frame with the original length.
        LittleEndian::write_u32(&mut dst[..LEN_PREFIX_SIZE], src_len);

        let payload = &mut dst[LEN_PREFIX_SIZE..];
        let written = self.block().compress_block(block_level, src, payload);
        if (written == 0 && !src.is_empty()) || written > payload.len() {
            return Err(Error::CompressionFailed);
        }

        dst.truncate(LEN_PREFIX_SIZE + written);
        trace!("compress: frame of {} bytes", dst.len());
        Ok(dst)
    }

    /// Like [`Codec::compress`], taking the integer level of the original
    /// API.
    pub fn compress_raw(&self, src: &[u8], level: i32) -> Result<Vec<u8>> {
        self.compress(src, Level::from_raw(level)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockLevel;
    use std::cell::Cell;

    // Copies input through unchanged and records the level it was given.
    #[derive(Default)]
    struct Echo {
        seen: Cell<Option<BlockLevel>>,
    }

    impl BlockCodec for Echo {
        fn compress_block(&self, level: BlockLevel, input: &[u8], output: &mut [u8]) -> usize {
            self.seen.set(Some(level));
            output[..input.len()].copy_from_slice(input);
            input.len()
        }

        fn decompress_block(&self, input: &[u8], output: &mut [u8]) -> usize {
            let n = input.len().min(output.len());
            output[..n].copy_from_slice(&input[..n]);
            n
        }
    }

    struct Broken(usize);

    impl BlockCodec for Broken {
        fn compress_block(&self, _: BlockLevel, _: &[u8], _: &mut [u8]) -> usize {
            self.0
        }

        fn decompress_block(&self, _: &[u8], _: &mut [u8]) -> usize {
            self.0
        }
    }

    #[test]
    fn buffer_bound() {
        assert_eq!(max_compressed_len(0), 6);
        assert_eq!(max_compressed_len(1), 8);
        assert_eq!(max_compressed_len(20), 27);
        assert_eq!(max_compressed_len(21), 29);
        assert_eq!(max_compressed_len(100), 111);
    }

    #[test]
    fn frame_with_echo_codec() {
        let codec = Codec::new(Echo::default());
        let frame = codec.compress(b"hello", Level::Auto).unwrap();
        assert_eq!(frame, b"\x05\x00\x00\x00hello");
        assert_eq!(codec.block().seen.get(), Some(BlockLevel::Fast));
    }

    #[test]
    fn auto_level_by_size() {
        let codec = Codec::new(Echo::default());
        codec.compress(&vec![1u8; 65_535], Level::Auto).unwrap();
        assert_eq!(codec.block().seen.get(), Some(BlockLevel::Fast));
        codec.compress(&vec![1u8; 65_536], Level::Auto).unwrap();
        assert_eq!(codec.block().seen.get(), Some(BlockLevel::HighRatio));
        codec.compress(b"x", Level::HighRatio).unwrap();
        assert_eq!(codec.block().seen.get(), Some(BlockLevel::HighRatio));
    }

    #[test]
    fn raw_levels() {
        let codec = Codec::new(Echo::default());
        assert_eq!(codec.compress_raw(b"abc", 3), Err(Error::InvalidLevel { raw: 3 }));
        assert!(codec.compress_raw(b"abc", 0).is_ok());
        assert!(codec.compress_raw(b"abc", 2).is_ok());
    }

    #[test]
    fn zero_output_fails_only_for_non_empty_input() {
        let codec = Codec::new(Broken(0));
        assert_eq!(codec.compress(b"abc", Level::Fast), Err(Error::CompressionFailed));
        assert_eq!(codec.compress(b"", Level::Fast).unwrap(), [0u8; 4]);
    }

    #[test]
    fn overlong_output_fails() {
        let codec = Codec::new(Broken(1 << 20));
        assert_eq!(codec.compress(b"abc", Level::Fast), Err(Error::CompressionFailed));
    }
}
