use crate::block::BlockLevel;
use crate::definitions::*;

// decompress_block reads the FastLZ block src into dst and returns the length
// written. Returns 0 if the block is empty, carries an unknown level, or
// would read or write out of bounds.
pub fn decompress_block(src: &[u8], dst: &mut [u8]) -> usize {
    let level = match src.first().map(|b| b >> LEVEL_TAG_SHIFT) {
        Some(0) => BlockLevel::Fast,
        Some(1) => BlockLevel::HighRatio,
        _ => return 0,
    };
    decompress_level(level, src, dst).unwrap_or(0)
}

fn decompress_level(level: BlockLevel, src: &[u8], dst: &mut [u8]) -> Option<usize> {
    let (mut s, mut d): (usize, usize) = (1, 0);
    let mut ctrl = (src[0] & 31) as usize;

    loop {
        if ctrl >= 32 {
            // Match
            let mut length = (ctrl >> 5) - 1;
            let ofs = (ctrl & 31) << 8;

            if length == 7 - 1 {
                match level {
                    BlockLevel::Fast => {
                        length += *src.get(s)? as usize;
                        s += 1;
                    }
                    BlockLevel::HighRatio => loop {
                        let code = *src.get(s)?;
                        s += 1;
                        length += code as usize;
                        if code != 255 {
                            break;
                        }
                    },
                }
            }

            let code = *src.get(s)? as usize;
            s += 1;
            let mut offset = ofs + code + 1;
            length += 3;

            // 16 bit far distance
            if level == BlockLevel::HighRatio && code == 255 && ofs == 31 << 8 {
                let far = src.get(s..s + 2)?;
                s += 2;
                offset = ((far[0] as usize) << 8 | far[1] as usize) + MAX_L2_DISTANCE + 1;
            }

            let end = d + length;
            if offset > d || end > dst.len() {
                return None;
            }
            // Byte by byte, the source may overlap the bytes being written.
            while d < end {
                dst[d] = dst[d - offset];
                d += 1;
            }
        } else {
            // Literal run
            let length = ctrl + 1;
            if d + length > dst.len() || s + length > src.len() {
                return None;
            }
            dst[d..d + length].copy_from_slice(&src[s..s + length]);
            d += length;
            s += length;
        }

        // A single trailing byte cannot hold an instruction and is ignored.
        if s + 1 >= src.len() {
            break;
        }
        ctrl = src[s] as usize;
        s += 1;
    }

    Some(d)
}
