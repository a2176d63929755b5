//! # fanlog
//! Thread-safe leveled logger fanning every message out to console, files and
//! custom sinks.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! fanlog = "0.1.0"
//! ```
//!
//! ```rust
//! use fanlog::logger_config;
//!
//! let _guard = logger_config()
//!     .init_global()
//!     .expect("Unable to install fanlog");
//! log::info!("Hello, world!");
//! // guard flushes every sink when dropped
//! ```
//!
//! ## Composing messages
//! A [`Logger`] hands out one [`MessageComposer`] per log call. Whatever is
//! written into it is submitted once, when it goes out of scope, so messages
//! from concurrent threads never interleave.
//!
//! ```rust
//! use std::fmt::Write;
//! use fanlog::{LevelMask, logger_config};
//!
//! let logger = logger_config()
//!     .with_filter(LevelMask::INFO | LevelMask::WARN | LevelMask::ERR)
//!     .build();
//! write!(logger.request(LevelMask::INFO), "All systems initialized").unwrap();
//! write!(logger.request(LevelMask::WARN), "Phasers damaged").unwrap();
//! write!(logger.request(LevelMask::ERR), "Failed to boot phasers").unwrap();
//! ```
//!
//! ## Logging to files
//! The log file is created if it does not exist and appended to if it does.
//!
//! ```rust
//! use fanlog::logger_config;
//!
//! let path = std::env::temp_dir().join("fanlog_doc_app.log");
//! std::fs::remove_file(&path).ok();
//! let guard = logger_config()
//!     .with_log_file(&path)
//!     .expect("Unable to create log file")
//!     .no_stdout() // disable stdout logging if needed
//!     .init_global()
//!     .expect("Unable to install fanlog");
//!
//! log::info!("Hello, world!");
//! drop(guard); // flushes and closes the file
//! assert!(std::fs::read_to_string(&path).unwrap().ends_with("Hello, world!\n"));
//! ```

use std::{
    fmt::Write as _,
    io::{self, Write as _},
    ops::Deref,
    path::Path,
    sync::{Arc, LazyLock, Mutex, PoisonError, RwLock},
};

use log::{LevelFilter, Log};

pub use fanlog_core::{
    ChannelSink, ConsoleSink, DefaultSink, FANLOG_CONFIG, FanlogError, FileSink, LevelMask,
    LogEntry, Logger, LoggerConfig, MessageComposer, OutputSink, Result, passes,
};

/// Logger receiving records from the `log` macros.
static GLOBAL_LOGGER: LazyLock<RwLock<Option<Arc<Logger>>>> = LazyLock::new(|| RwLock::new(None));

static BRIDGE_INSTALLED: Mutex<bool> = Mutex::new(false);

/// Returns the logger installed by [`ConfigBuilder::init_global`], if any.
pub fn global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn install_bridge() -> Result<()> {
    let mut installed = BRIDGE_INSTALLED
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if !*installed {
        log::set_boxed_logger(Box::new(FanlogBridge))?;
        log::set_max_level(LevelFilter::Trace);
        *installed = true;
    }
    Ok(())
}

/// Forwards `log` records to the global [`Logger`].
///
/// Error, Warn and Info map to the matching levels; Debug and Trace both map
/// to `FREQ`.
struct FanlogBridge;

impl Log for FanlogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        global().is_some_and(|logger| logger.accepts(metadata.level().into()))
    }

    fn log(&self, record: &log::Record) {
        let Some(logger) = global() else {
            return;
        };
        let level = LevelMask::from(record.level());
        if !logger.accepts(level) {
            return;
        }
        let mut composer = logger.request(level);
        let _ = write!(composer, "{}", record.args());
    }

    fn flush(&self) {
        if let Some(logger) = global() {
            let _ = logger.flush();
        }
    }
}

/// Keeps the global logger alive. Dropping it flushes every sink and, if the
/// logger is still the global one, uninstalls it so its files get closed.
pub struct LoggerGuard {
    logger: Arc<Logger>,
}

impl Deref for LoggerGuard {
    type Target = Logger;
    fn deref(&self) -> &Self::Target {
        &self.logger
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        if let Err(err) = self.logger.flush() {
            let _ = writeln!(io::stderr(), "fanlog: flush on shutdown failed: {err}");
        }
        let mut global = GLOBAL_LOGGER
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if global
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &self.logger))
        {
            *global = None;
        }
    }
}

/// Builder for configuring and initializing the logger.
pub struct ConfigBuilder {
    config: LoggerConfig,
    log_file: Option<FileSink>,
    no_stdout: bool,
    sinks: Vec<Box<dyn OutputSink>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            config: LoggerConfig::from_env(),
            log_file: None,
            no_stdout: false,
            sinks: Vec::new(),
        }
    }
}

impl ConfigBuilder {
    /// Builds a standalone logger: console first, then the log file, then extra sinks.
    pub fn build(self) -> Logger {
        let Self {
            config,
            log_file,
            no_stdout,
            sinks,
        } = self;
        let logger = config.build();
        if !no_stdout {
            logger.add_sink(ConsoleSink::new());
        }
        if let Some(log_file) = log_file {
            logger.add_sink(log_file);
        }
        for sink in sinks {
            logger.add_boxed_sink(sink);
        }
        logger
    }

    /// Sets a log file, opened in append mode.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let log_file = FileSink::new(path)?.with_flush_on_write(FANLOG_CONFIG.FLUSH_ON_WRITE);
        Ok(Self {
            log_file: Some(log_file),
            ..self
        })
    }
    /// Maybe sets a log file.
    pub fn maybe_with_log_file<P: AsRef<Path>>(self, path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => self.with_log_file(path),
            None => Ok(self),
        }
    }
    /// Appends a custom sink after the console and file sinks.
    pub fn with_sink<S: OutputSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
    /// Ignore stdout logging
    pub fn no_stdout(self) -> Self {
        Self {
            no_stdout: true,
            ..self
        }
    }
    /// Dynamically set the stdout flag.
    pub fn with_stdout(self, yes: bool) -> Self {
        Self {
            no_stdout: !yes,
            ..self
        }
    }
    /// Sets a log name
    pub fn with_name(self, name: &str) -> Self {
        Self {
            config: self.config.with_name(name),
            ..self
        }
    }
    /// Maybe sets a log name
    pub fn maybe_with_name(self, name: Option<&str>) -> Self {
        Self {
            config: self.config.maybe_with_name(name),
            ..self
        }
    }
    pub fn with_level(self, level: LevelMask) -> Self {
        Self {
            config: self.config.with_level(level),
            ..self
        }
    }
    pub fn with_filter(self, filter: LevelMask) -> Self {
        Self {
            config: self.config.with_filter(filter),
            ..self
        }
    }
    pub fn with_timestamps(self, yes: bool) -> Self {
        Self {
            config: self.config.with_timestamps(yes),
            ..self
        }
    }
    /// Installs the logger as the target of the `log` macros.
    /// Returns a guard that will flush and uninstall the logger when dropped.
    #[must_use = "LoggerGuard must be kept alive to ensure logging works. Do \"let _guard = logger_config().init_global()?;\""]
    pub fn init_global(self) -> Result<LoggerGuard> {
        install_bridge()?;
        let logger = Arc::new(self.build());
        *GLOBAL_LOGGER
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&logger));
        Ok(LoggerGuard { logger })
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
