use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::block::{BlockCodec, FastLz};
use crate::definitions::*;
use crate::error::{Error, Result};
use crate::Codec;

// decompressed_len returns the original length recorded in a frame's prefix.
pub fn decompressed_len(src: &[u8]) -> Result<u32> {
    if src.len() < LEN_PREFIX_SIZE {
        debug!("decompress: frame of {} bytes has no length prefix", src.len());
        return Err(Error::InvalidInput { reason: "frame shorter than length prefix" });
    }
    Ok(LittleEndian::read_u32(&src[..LEN_PREFIX_SIZE]))
}

// output_capacity is the declared length plus the decode slack.
fn output_capacity(expected: usize) -> Result<usize> {
    expected
        .checked_add(DECOMPRESS_SLACK)
        .ok_or(Error::OutOfMemory { requested: expected })
}

/// Decompress a frame produced by [`compress`](crate::compress).
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    Codec::new(FastLz).decompress(src)
}

impl<B: BlockCodec> Codec<B> {
    /// Validate and decompress a length-prefixed frame.
    ///
    /// The declared length is checked against the payload before anything
    /// is allocated: a frame claiming more than 256 times its payload size
    /// is rejected. This is a plausibility filter, not an integrity check;
    /// the only other check is that the block decompresses to exactly the
    /// declared length.
    ///
    /// # Errors
    /// - `InvalidInput` if the frame is shorter than the prefix or the
    ///   declared length is implausible.
    /// - `OutOfMemory` if the output buffer cannot be reserved.
    /// - `DecompressionFailed` if the block yields a different length.
    pub fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        let declared = decompressed_len(src)?;
        let payload = &src[LEN_PREFIX_SIZE..];

        if u64::from(declared) > MAX_COMPRESSION_RATIO * payload.len() as u64 {
            debug!(
                "decompress: declared length {} implausible for {} payload bytes",
                declared,
                payload.len()
            );
            return Err(Error::InvalidInput { reason: "declared length exceeds maximum ratio" });
        }

        let expected = declared as usize;
        let capacity = output_capacity(expected)?;
        let mut dst: Vec<u8> = Vec::new();
        dst.try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { requested: capacity })?;
        dst.resize(capacity, 0);

        let actual = self.block().decompress_block(payload, &mut dst[..expected]);
        if actual != expected {
            debug!("decompress: expected {} bytes, block produced {}", expected, actual);
            return Err(Error::DecompressionFailed { expected, actual });
        }

        dst.truncate(expected);
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockLevel;

    struct Fixed(usize);

    impl BlockCodec for Fixed {
        fn compress_block(&self, _: BlockLevel, _: &[u8], _: &mut [u8]) -> usize {
            0
        }

        fn decompress_block(&self, _: &[u8], output: &mut [u8]) -> usize {
            self.0.min(output.len())
        }
    }

    fn frame(declared: u32, payload: &[u8]) -> Vec<u8> {
        let mut f = declared.to_le_bytes().to_vec();
        f.extend_from_slice(payload);
        f
    }

    #[test]
    fn short_frames() {
        for len in 0..LEN_PREFIX_SIZE {
            let src = vec![0u8; len];
            assert!(matches!(decompressed_len(&src), Err(Error::InvalidInput { .. })));
            assert!(matches!(decompress(&src), Err(Error::InvalidInput { .. })));
        }
    }

    #[test]
    fn prefix_is_little_endian() {
        assert_eq!(decompressed_len(&[0x0a, 0, 0, 0]), Ok(10));
        assert_eq!(decompressed_len(&[0x01, 0x02, 0x03, 0x04, 0xff]), Ok(0x0403_0201));
    }

    #[test]
    fn ratio_boundary() {
        let codec = Codec::new(Fixed(usize::MAX));
        // 256 bytes per payload byte is allowed, one more is not.
        assert_eq!(codec.decompress(&frame(512, b"xy")).unwrap().len(), 512);
        assert!(matches!(
            codec.decompress(&frame(513, b"xy")),
            Err(Error::InvalidInput { .. })
        ));
        // Nothing but the empty output fits an empty payload.
        assert!(matches!(codec.decompress(&frame(1, b"")), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn length_mismatch() {
        let codec = Codec::new(Fixed(3));
        assert_eq!(
            codec.decompress(&frame(4, b"abcd")),
            Err(Error::DecompressionFailed { expected: 4, actual: 3 })
        );
        assert_eq!(codec.decompress(&frame(3, b"abc")).unwrap(), [0u8; 3]);
    }

    #[test]
    fn capacity_overflow_is_out_of_memory() {
        assert_eq!(output_capacity(10), Ok(11));
        assert_eq!(
            output_capacity(usize::MAX),
            Err(Error::OutOfMemory { requested: usize::MAX })
        );
    }

    #[test]
    fn empty_frame() {
        assert_eq!(decompress(&[0, 0, 0, 0]).unwrap(), Vec::<u8>::new());
    }
}
