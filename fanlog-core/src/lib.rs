//! # fanlog-core
//! Leveled, filtered, fan-out logging pipeline shared by the fanlog crates.
//!
//! A [`Logger`] holds a level, a filter mask and an ordered chain of
//! [`OutputSink`]s. Callers request a [`MessageComposer`], write into it, and
//! the composed message is submitted once when the composer is dropped.

mod channel;
mod composer;
mod config;
mod error;
mod level;
mod logger;
mod sink;

pub use channel::{ChannelSink, LogEntry};
pub use composer::MessageComposer;
pub use config::{DefaultSink, FANLOG_CONFIG, FanlogConfig, LoggerConfig};
pub use error::{FanlogError, Result};
pub use level::{LevelMask, passes};
pub use logger::Logger;
pub use sink::{ConsoleSink, FileSink, OutputSink};
