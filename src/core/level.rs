//! Bitmask-encoded log event levels
//!
//! Levels are cumulative downward: a more permissive level contains the bit
//! pattern of every stricter level, so `VERBOSE & FATAL == FATAL`. Custom
//! levels compose with plain bit arithmetic (`WARNING | 1 << 10`).

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEventLevel(u32);

impl LogEventLevel {
    pub const OFF: LogEventLevel = LogEventLevel(0);
    pub const FATAL: LogEventLevel = LogEventLevel(1);
    pub const ERROR: LogEventLevel = LogEventLevel(3);
    pub const WARNING: LogEventLevel = LogEventLevel(7);
    pub const INFORMATION: LogEventLevel = LogEventLevel(15);
    pub const DEBUG: LogEventLevel = LogEventLevel(31);
    pub const VERBOSE: LogEventLevel = LogEventLevel(63);

    /// Construct a level from a raw bitmask, e.g. a custom level
    /// built as `LogEventLevel::WARNING.bits() | 1 << 10`.
    pub const fn from_bits(bits: u32) -> Self {
        LogEventLevel(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn to_str(self) -> &'static str {
        match self {
            LogEventLevel::OFF => "OFF",
            LogEventLevel::FATAL => "FATAL",
            LogEventLevel::ERROR => "ERROR",
            LogEventLevel::WARNING => "WARNING",
            LogEventLevel::INFORMATION => "INFORMATION",
            LogEventLevel::DEBUG => "DEBUG",
            LogEventLevel::VERBOSE => "VERBOSE",
            _ => "CUSTOM",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogEventLevel::FATAL => BrightRed,
            LogEventLevel::ERROR => Red,
            LogEventLevel::WARNING => Yellow,
            LogEventLevel::INFORMATION => Green,
            LogEventLevel::DEBUG => Blue,
            _ => BrightBlack,
        }
    }
}

/// Default minimum level enables everything.
impl Default for LogEventLevel {
    fn default() -> Self {
        LogEventLevel::VERBOSE
    }
}

/// True iff every bit required by `level` is present in `min_level`.
///
/// This is the containment check that gives levels their downward-cumulative
/// semantics: `is_enabled(INFORMATION, FATAL)` holds because the information
/// mask contains the fatal bit.
pub fn is_enabled(min_level: LogEventLevel, level: LogEventLevel) -> bool {
    min_level.0 & level.0 == level.0
}

impl BitOr for LogEventLevel {
    type Output = LogEventLevel;

    fn bitor(self, rhs: LogEventLevel) -> LogEventLevel {
        LogEventLevel(self.0 | rhs.0)
    }
}

impl BitAnd for LogEventLevel {
    type Output = LogEventLevel;

    fn bitand(self, rhs: LogEventLevel) -> LogEventLevel {
        LogEventLevel(self.0 & rhs.0)
    }
}

impl fmt::Display for LogEventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            "CUSTOM" => write!(f, "CUSTOM({})", self.0),
            s => write!(f, "{}", s),
        }
    }
}

impl FromStr for LogEventLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(LogEventLevel::OFF),
            "FATAL" => Ok(LogEventLevel::FATAL),
            "ERROR" => Ok(LogEventLevel::ERROR),
            "WARN" | "WARNING" => Ok(LogEventLevel::WARNING),
            "INFO" | "INFORMATION" => Ok(LogEventLevel::INFORMATION),
            "DEBUG" => Ok(LogEventLevel::DEBUG),
            "VERBOSE" => Ok(LogEventLevel::VERBOSE),
            _ => Err(LoggerError::config(
                "LogEventLevel",
                format!("unrecognized level label '{}'", s),
            )),
        }
    }
}

impl From<u32> for LogEventLevel {
    fn from(bits: u32) -> Self {
        LogEventLevel(bits)
    }
}
