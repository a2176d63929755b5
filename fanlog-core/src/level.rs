use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign},
    str::FromStr,
};

use crate::error::FanlogError;

/// Bit set of message categories.
///
/// A message is usually tagged with a single bit, while a filter is any union of
/// bits. Combinations are legal on both sides: a message tagged `WARN | ERR`
/// belongs to both categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u8);

impl LevelMask {
    /// Never logged. Fails every filter test.
    pub const NONE: LevelMask = LevelMask(0);
    pub const INFO: LevelMask = LevelMask(1);
    pub const WARN: LevelMask = LevelMask(1 << 1);
    pub const ERR: LevelMask = LevelMask(1 << 2);
    /// High-volume messages, usually filtered out.
    pub const FREQ: LevelMask = LevelMask(1 << 3);
    pub const ALL: LevelMask = LevelMask((1 << 4) - 1);

    const NAMED: [(LevelMask, &'static str); 4] = [
        (LevelMask::INFO, "INFO"),
        (LevelMask::WARN, "WARN"),
        (LevelMask::ERR, "ERR"),
        (LevelMask::FREQ, "FREQ"),
    ];

    /// Builds a mask from raw bits, rejecting bits outside [`LevelMask::ALL`].
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(LevelMask(bits))
        } else {
            None
        }
    }

    /// Builds a mask from raw bits, dropping unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        LevelMask(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: LevelMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Filter test: does this mask, used as a filter, let `level` through?
    pub const fn admits(self, level: LevelMask) -> bool {
        passes(self, level)
    }
}

/// Returns true when `filter` and `level` share at least one bit.
///
/// This is a bitwise test, not an equality: `ERR` passes `WARN | ERR` but not
/// `INFO`, and `NONE` passes nothing.
pub const fn passes(filter: LevelMask, level: LevelMask) -> bool {
    filter.0 & level.0 != 0
}

impl BitOr for LevelMask {
    type Output = LevelMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for LevelMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LevelMask {
    type Output = LevelMask;
    fn bitand(self, rhs: Self) -> Self::Output {
        LevelMask(self.0 & rhs.0)
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        if *self == LevelMask::ALL {
            return f.write_str("ALL");
        }
        let mut first = true;
        for (mask, name) in Self::NAMED {
            if self.contains(mask) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for LevelMask {
    type Err = FanlogError;

    /// Parses names joined by `|` or `,`, case-insensitive: `"warn|err"`, `"all"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = LevelMask::NONE;
        for part in s.split(['|', ',']).map(str::trim) {
            mask |= match part.to_ascii_lowercase().as_str() {
                "none" => LevelMask::NONE,
                "info" => LevelMask::INFO,
                "warn" | "warning" => LevelMask::WARN,
                "err" | "error" => LevelMask::ERR,
                "freq" | "debug" | "trace" => LevelMask::FREQ,
                "all" => LevelMask::ALL,
                _ => return Err(FanlogError::InvalidLevel(s.to_string())),
            };
        }
        Ok(mask)
    }
}

impl From<log::Level> for LevelMask {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LevelMask::ERR,
            log::Level::Warn => LevelMask::WARN,
            log::Level::Info => LevelMask::INFO,
            log::Level::Debug | log::Level::Trace => LevelMask::FREQ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_is_bitwise_and() {
        for f in 0..=15u8 {
            for l in 0..=15u8 {
                let filter = LevelMask::from_bits_truncate(f);
                let level = LevelMask::from_bits_truncate(l);
                assert_eq!(passes(filter, level), f & l != 0, "filter {f} level {l}");
                assert_eq!(filter.admits(level), passes(filter, level));
            }
        }
    }

    #[test]
    fn none_never_passes() {
        for f in 0..=15u8 {
            assert!(!passes(LevelMask::from_bits_truncate(f), LevelMask::NONE));
        }
    }

    #[test]
    fn err_passes_combined_filter_only() {
        assert!(passes(LevelMask::WARN | LevelMask::ERR, LevelMask::ERR));
        assert!(!passes(LevelMask::INFO, LevelMask::ERR));
    }

    #[test]
    fn all_is_union_of_named_bits() {
        assert_eq!(
            LevelMask::ALL,
            LevelMask::INFO | LevelMask::WARN | LevelMask::ERR | LevelMask::FREQ
        );
        assert_eq!(LevelMask::ALL.bits(), 15);
        assert_eq!(LevelMask::ERR.bits(), 4);
        assert_eq!(LevelMask::FREQ.bits(), 8);
    }

    #[test]
    fn from_bits_rejects_unknown_bits() {
        assert_eq!(LevelMask::from_bits(6), Some(LevelMask::WARN | LevelMask::ERR));
        assert_eq!(LevelMask::from_bits(16), None);
        assert_eq!(LevelMask::from_bits_truncate(0x13), LevelMask::from_bits_truncate(3));
    }

    #[test]
    fn display() {
        assert_eq!(LevelMask::NONE.to_string(), "NONE");
        assert_eq!(LevelMask::INFO.to_string(), "INFO");
        assert_eq!((LevelMask::WARN | LevelMask::ERR).to_string(), "WARN|ERR");
        assert_eq!(LevelMask::ALL.to_string(), "ALL");
    }

    #[test]
    fn parse() {
        assert_eq!("info".parse::<LevelMask>().unwrap(), LevelMask::INFO);
        assert_eq!(
            "INFO | Warn,error".parse::<LevelMask>().unwrap(),
            LevelMask::INFO | LevelMask::WARN | LevelMask::ERR
        );
        assert_eq!("all".parse::<LevelMask>().unwrap(), LevelMask::ALL);
        assert_eq!("none".parse::<LevelMask>().unwrap(), LevelMask::NONE);
        assert!(matches!(
            "loud".parse::<LevelMask>(),
            Err(FanlogError::InvalidLevel(s)) if s == "loud"
        ));
    }

    #[test]
    fn from_log_level() {
        assert_eq!(LevelMask::from(log::Level::Error), LevelMask::ERR);
        assert_eq!(LevelMask::from(log::Level::Warn), LevelMask::WARN);
        assert_eq!(LevelMask::from(log::Level::Info), LevelMask::INFO);
        assert_eq!(LevelMask::from(log::Level::Trace), LevelMask::FREQ);
    }
}
