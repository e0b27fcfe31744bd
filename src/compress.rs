use byteorder::{ByteOrder, LittleEndian};

use crate::block::BlockLevel;
use crate::definitions::*;

// Inputs shorter than this are emitted as a single literal run.
const MIN_MATCH_INPUT: usize = 13;

// Marks a hash slot whose candidate is too far away to match.
const NO_MATCH: u32 = 0x100_0000;

// max_block_len returns the largest block FastLZ can produce for src_len
// input bytes: one control byte per literal run of MAX_COPY bytes.
pub fn max_block_len(src_len: usize) -> usize {
    src_len + src_len.div_ceil(MAX_COPY) + 1
}

// compress_block writes the FastLZ block of src into dst and returns the
// length written, or 0 if dst is shorter than max_block_len.
pub fn compress_block(level: BlockLevel, src: &[u8], dst: &mut [u8]) -> usize {
    if src.is_empty() || dst.len() < max_block_len(src.len()) {
        return 0;
    }

    let n = compress_level(level, src, dst);

    // The block level lives in the top bits of the first control byte.
    if level == BlockLevel::HighRatio {
        dst[0] |= 1 << LEVEL_TAG_SHIFT;
    }
    n
}

fn compress_level(level: BlockLevel, src: &[u8], dst: &mut [u8]) -> usize {
    if src.len() < MIN_MATCH_INPUT {
        return emit_literals(dst, 0, src);
    }

    let max_distance = match level {
        BlockLevel::Fast => MAX_L1_DISTANCE,
        BlockLevel::HighRatio => MAX_FAR_DISTANCE,
    };

    // Matches are never extended into the last 4 bytes, and no new match
    // starts in the last 13.
    let ip_bound = src.len() - 4;
    let ip_limit = src.len() - MIN_MATCH_INPUT;

    let mut table: Vec<u32> = vec![0; HASH_SIZE];

    let mut d: usize = 0;
    let mut anchor: usize = 0;
    let mut ip: usize = 2;

    while ip < ip_limit {
        // Look for a 3 byte sequence seen before.
        let mut candidate;
        let mut distance;
        loop {
            let seq = read_u24(src, ip);
            let h = hash(seq);
            candidate = table[h] as usize;
            table[h] = ip as u32;
            distance = ip - candidate;
            let cmp = if distance < max_distance {
                read_u24(src, candidate)
            } else {
                NO_MATCH
            };
            if ip >= ip_limit {
                break;
            }
            ip += 1;
            if seq == cmp {
                break;
            }
        }
        if ip >= ip_limit {
            break;
        }
        ip -= 1;

        // Level 2 far matches need 5 matching bytes to pay for the longer
        // encoding.
        if level == BlockLevel::HighRatio
            && distance >= MAX_L2_DISTANCE
            && (src[candidate + 3] != src[ip + 3] || src[candidate + 4] != src[ip + 4])
        {
            ip += 1;
            continue;
        }

        // Emit any pending literal bytes.
        if ip > anchor {
            d = emit_literals(dst, d, &src[anchor..ip]);
        }

        // Extend the match as far as possible.
        let len = match_len(src, candidate + 3, ip + 3, ip_bound);
        d = match level {
            BlockLevel::Fast => emit_match_level1(dst, d, len, distance),
            BlockLevel::HighRatio => emit_match_level2(dst, d, len, distance),
        };

        // The match covers len + 2 bytes; hash the two positions after it.
        ip += len;
        let seq = LittleEndian::read_u32(&src[ip..]);
        table[hash(seq & 0xff_ffff)] = ip as u32;
        ip += 1;
        table[hash(seq >> 8)] = ip as u32;
        ip += 1;
        anchor = ip;
    }

    emit_literals(dst, d, &src[anchor..])
}

#[inline]
fn read_u24(src: &[u8], i: usize) -> u32 {
    LittleEndian::read_u24(&src[i..])
}

#[inline]
fn hash(seq: u32) -> usize {
    ((seq.wrapping_mul(2_654_435_769) >> (32 - HASH_LOG)) & HASH_MASK) as usize
}

// match_len counts the bytes compared at p and q before the first mismatch,
// including the mismatching byte, without letting q reach bound.
fn match_len(src: &[u8], mut p: usize, mut q: usize, bound: usize) -> usize {
    let start = p;
    while q < bound {
        let same = src[p] == src[q];
        p += 1;
        q += 1;
        if !same {
            break;
        }
    }
    p - start
}

// emit_literals writes lit as runs of at most MAX_COPY bytes, each preceded
// by its length minus one, and returns the new write position.
fn emit_literals(dst: &mut [u8], mut d: usize, lit: &[u8]) -> usize {
    for run in lit.chunks(MAX_COPY) {
        dst[d] = (run.len() - 1) as u8;
        dst[d + 1..d + 1 + run.len()].copy_from_slice(run);
        d += 1 + run.len();
    }
    d
}

fn emit_match_level1(dst: &mut [u8], mut d: usize, mut len: usize, distance: usize) -> usize {
    let distance = distance - 1;
    let hi = (distance >> 8) as u8;
    let lo = distance as u8;

    while len > MAX_LEN - 2 {
        dst[d] = (7 << 5) + hi;
        dst[d + 1] = (MAX_LEN - 2 - 7 - 2) as u8;
        dst[d + 2] = lo;
        d += 3;
        len -= MAX_LEN - 2;
    }

    if len < 7 {
        dst[d] = ((len as u8) << 5) + hi;
        dst[d + 1] = lo;
        d + 2
    } else {
        dst[d] = (7 << 5) + hi;
        dst[d + 1] = (len - 7) as u8;
        dst[d + 2] = lo;
        d + 3
    }
}

fn emit_match_level2(dst: &mut [u8], mut d: usize, mut len: usize, distance: usize) -> usize {
    let mut distance = distance - 1;
    let far = distance >= MAX_L2_DISTANCE;
    if far {
        distance -= MAX_L2_DISTANCE;
    }
    let hi = if far { 31 } else { (distance >> 8) as u8 };

    if len < 7 {
        dst[d] = ((len as u8) << 5) + hi;
        d += 1;
    } else {
        dst[d] = (7 << 5) + hi;
        d += 1;
        len -= 7;
        while len >= 255 {
            dst[d] = 255;
            d += 1;
            len -= 255;
        }
        dst[d] = len as u8;
        d += 1;
    }

    if far {
        dst[d] = 255;
        dst[d + 1] = (distance >> 8) as u8;
        dst[d + 2] = distance as u8;
        d + 3
    } else {
        dst[d] = distance as u8;
        d + 1
    }
}
