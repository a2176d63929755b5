use std::{
    io::{self, Write},
    str::FromStr,
    sync::LazyLock,
};

use derive_from_env::FromEnv;

use crate::{error::FanlogError, level::LevelMask, logger::Logger};

/// What happens to entries while no sink is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultSink {
    /// Entries are dropped.
    #[default]
    None,
    /// Entries go to a console sink until the first sink is added.
    Console,
}

impl FromStr for DefaultSink {
    type Err = FanlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(DefaultSink::None),
            "console" | "stdout" => Ok(DefaultSink::Console),
            _ => Err(FanlogError::InvalidDefaultSink(s.to_string())),
        }
    }
}

/// Defaults read once from `FANLOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "FANLOG")]
#[allow(non_snake_case)]
pub struct FanlogConfig {
    #[from_env(default = "info")]
    pub LEVEL: LevelMask,
    #[from_env(default = "info")]
    pub FILTER: LevelMask,
    #[from_env(default = "none")]
    pub DEFAULT_SINK: DefaultSink,
    #[from_env(default = "true")]
    pub TIMESTAMPS: bool,
    #[from_env(default = "false")]
    pub FLUSH_ON_WRITE: bool,
}

impl Default for FanlogConfig {
    fn default() -> Self {
        Self {
            LEVEL: LevelMask::INFO,
            FILTER: LevelMask::INFO,
            DEFAULT_SINK: DefaultSink::None,
            TIMESTAMPS: true,
            FLUSH_ON_WRITE: false,
        }
    }
}

pub static FANLOG_CONFIG: LazyLock<FanlogConfig> = LazyLock::new(|| {
    FanlogConfig::from_env().unwrap_or_else(|err| {
        let _ = writeln!(
            io::stderr(),
            "fanlog: ignoring invalid FANLOG_* environment: {err}"
        );
        FanlogConfig::default()
    })
});

/// Settings a [`Logger`] is built from.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub(crate) level: LevelMask,
    pub(crate) filter: LevelMask,
    pub(crate) name: Option<String>,
    pub(crate) default_sink: DefaultSink,
    pub(crate) timestamps: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelMask::INFO,
            filter: LevelMask::INFO,
            name: None,
            default_sink: DefaultSink::None,
            timestamps: true,
        }
    }
}

impl LoggerConfig {
    /// Starts from the `FANLOG_*` environment defaults instead of the built-in ones.
    pub fn from_env() -> Self {
        let env = &*FANLOG_CONFIG;
        Self {
            level: env.LEVEL,
            filter: env.FILTER,
            name: None,
            default_sink: env.DEFAULT_SINK,
            timestamps: env.TIMESTAMPS,
        }
    }
    /// Sets the level used by [`Logger::request_default`].
    pub fn with_level(self, level: LevelMask) -> Self {
        Self { level, ..self }
    }
    pub fn with_filter(self, filter: LevelMask) -> Self {
        Self { filter, ..self }
    }
    /// Sets a name shown in every entry prefix.
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
    /// Maybe sets a name
    pub fn maybe_with_name(self, name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            ..self
        }
    }
    pub fn with_default_sink(self, default_sink: DefaultSink) -> Self {
        Self {
            default_sink,
            ..self
        }
    }
    /// Enables or disables the timestamp in entry prefixes.
    pub fn with_timestamps(self, yes: bool) -> Self {
        Self {
            timestamps: yes,
            ..self
        }
    }
    pub fn build(self) -> Logger {
        Logger::with_config(self)
    }
}
