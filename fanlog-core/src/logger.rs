//! The [`Logger`]: level and filter state plus the ordered sink chain.

use std::{
    fmt::{Display, Write as _},
    io::{self, Write as _},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::Utc;

use crate::{
    composer::MessageComposer,
    config::{DefaultSink, LoggerConfig},
    level::LevelMask,
    sink::{ConsoleSink, OutputSink},
};

struct State {
    level: LevelMask,
    filter: LevelMask,
    sinks: Vec<Box<dyn OutputSink>>,
    /// Receives entries while `sinks` is empty.
    fallback: Option<Box<dyn OutputSink>>,
}

/// Thread-safe leveled logger dispatching every entry to all of its sinks.
///
/// Share it between threads with an `Arc`; every thread requests its own
/// [`MessageComposer`].
///
/// # Examples
///
/// ```
/// use std::fmt::Write;
/// use fanlog_core::{ChannelSink, LevelMask, LoggerConfig};
///
/// let logger = LoggerConfig::default()
///     .with_filter(LevelMask::INFO | LevelMask::WARN)
///     .with_timestamps(false)
///     .build();
/// let (sink, entries) = ChannelSink::new();
/// logger.add_sink(sink);
///
/// write!(logger.request(LevelMask::WARN), "Phasers damaged: {}%", 40).unwrap();
/// write!(logger.request(LevelMask::FREQ), "tick").unwrap();
///
/// assert_eq!(entries.try_recv().unwrap().text, "[WARN] Phasers damaged: 40%\n");
/// assert!(entries.try_recv().is_err());
/// ```
pub struct Logger {
    state: Mutex<State>,
    name: Option<String>,
    timestamps: bool,
    failed_writes: AtomicU64,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// A logger with level and filter `INFO`, timestamps on and no sinks.
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        let LoggerConfig {
            level,
            filter,
            name,
            default_sink,
            timestamps,
        } = config;
        let fallback: Option<Box<dyn OutputSink>> = match default_sink {
            DefaultSink::None => None,
            DefaultSink::Console => Some(Box::new(ConsoleSink::new())),
        };
        Self {
            state: Mutex::new(State {
                level,
                filter,
                sinks: Vec::new(),
                fallback,
            }),
            name,
            timestamps,
            failed_writes: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a composer bound to this logger and `level`.
    ///
    /// Filtering happens when the composer is submitted, so a message can be
    /// built and then dropped. Check [`Logger::accepts`] first when building it
    /// is expensive.
    pub fn request(&self, level: LevelMask) -> MessageComposer<'_> {
        MessageComposer::new(self, level)
    }

    /// Returns a composer bound to the configured current level.
    pub fn request_default(&self) -> MessageComposer<'_> {
        self.request(self.level())
    }

    pub fn accepts(&self, level: LevelMask) -> bool {
        self.state().filter.admits(level)
    }

    /// Formats `text` and writes it to every sink in insertion order.
    ///
    /// The filter is not consulted here; composers do that before calling in.
    /// A failing sink is counted and reported on stderr, and dispatch moves on
    /// to the next one.
    pub fn log(&self, text: &str, level: LevelMask) {
        let mut state = self.state();
        self.dispatch(&mut state, text, level);
    }

    /// Filter check and dispatch under one lock acquisition.
    pub(crate) fn submit(&self, text: &str, level: LevelMask) {
        let mut state = self.state();
        if state.filter.admits(level) {
            self.dispatch(&mut state, text, level);
        }
    }

    fn dispatch(&self, state: &mut State, text: &str, level: LevelMask) {
        let mut entry = self.format_prefix(level);
        entry.push_str(text);
        entry.push('\n');
        if state.sinks.is_empty() {
            if let Some(fallback) = state.fallback.as_mut() {
                let _ = fallback.write(&entry, level);
            }
            return;
        }
        for (index, sink) in state.sinks.iter_mut().enumerate() {
            if let Err(err) = sink.write(&entry, level) {
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
                let _ = writeln!(
                    io::stderr(),
                    "fanlog: sink #{index} failed to write {level} entry: {err}"
                );
            }
        }
    }

    /// Builds the entry header: `[<time> <name> <LEVEL>] `.
    pub fn format_prefix(&self, level: LevelMask) -> String {
        let mut prefix = String::with_capacity(48);
        prefix.push('[');
        if self.timestamps {
            let _ = write!(prefix, "{} ", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"));
        }
        if let Some(name) = &self.name {
            prefix.push_str(name);
            prefix.push(' ');
        }
        let _ = write!(prefix, "{level}] ");
        prefix
    }

    /// Appends a sink at the end of the dispatch chain.
    pub fn add_sink<S: OutputSink + 'static>(&self, sink: S) {
        self.add_boxed_sink(Box::new(sink));
    }

    pub fn add_boxed_sink(&self, sink: Box<dyn OutputSink>) {
        self.state().sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.state().sinks.len()
    }

    pub fn level(&self) -> LevelMask {
        self.state().level
    }

    pub fn set_level(&self, level: LevelMask) {
        self.state().level = level;
    }

    pub fn filter(&self) -> LevelMask {
        self.state().filter
    }

    pub fn set_filter(&self, filter: LevelMask) {
        self.state().filter = filter;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of sink writes that failed since the logger was built.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Flushes every sink, returning the first error after trying them all.
    pub fn flush(&self) -> io::Result<()> {
        let mut state = self.state();
        let mut first_err = None;
        for sink in state.sinks.iter_mut() {
            if let Err(err) = sink.flush() {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn info(&self, message: impl Display) {
        self.request(LevelMask::INFO).push(message);
    }

    pub fn warn(&self, message: impl Display) {
        self.request(LevelMask::WARN).push(message);
    }

    pub fn err(&self, message: impl Display) {
        self.request(LevelMask::ERR).push(message);
    }

    pub fn freq(&self, message: impl Display) {
        self.request(LevelMask::FREQ).push(message);
    }
}
