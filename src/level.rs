use crate::block::BlockLevel;
use crate::definitions::AUTO_LEVEL_THRESHOLD;
use crate::error::{Error, Result};

/// Compression effort requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Pick by input size: level 1 below 64 KiB, level 2 otherwise.
    #[default]
    Auto,
    /// Level 1, favours speed.
    Fast,
    /// Level 2, favours ratio.
    HighRatio,
}

impl Level {
    /// Map the integer levels of the original API, where 0 means auto.
    pub fn from_raw(raw: i32) -> Result<Level> {
        match raw {
            0 => Ok(Level::Auto),
            1 => Ok(Level::Fast),
            2 => Ok(Level::HighRatio),
            _ => Err(Error::InvalidLevel { raw }),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Level::Auto => 0,
            Level::Fast => 1,
            Level::HighRatio => 2,
        }
    }

    /// Resolve to the block level used for an input of `input_len` bytes.
    pub fn resolve(self, input_len: usize) -> BlockLevel {
        match self {
            Level::Fast => BlockLevel::Fast,
            Level::HighRatio => BlockLevel::HighRatio,
            Level::Auto if input_len < AUTO_LEVEL_THRESHOLD => BlockLevel::Fast,
            Level::Auto => BlockLevel::HighRatio,
        }
    }
}

impl TryFrom<i32> for Level {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Level> {
        Level::from_raw(raw)
    }
}

impl From<BlockLevel> for Level {
    fn from(level: BlockLevel) -> Level {
        match level {
            BlockLevel::Fast => Level::Fast,
            BlockLevel::HighRatio => Level::HighRatio,
        }
    }
}
