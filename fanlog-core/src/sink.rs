use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use colored::{ColoredString, Colorize};

use crate::{
    error::{FanlogError, Result},
    level::LevelMask,
};

/// A destination for formatted log entries.
///
/// Sinks are owned by exactly one [`Logger`](crate::Logger), which serializes
/// every call to them behind its own lock. Implementations therefore take
/// `&mut self` and need no internal locking.
pub trait OutputSink: Send {
    /// Records one complete entry, line terminator included.
    fn write(&mut self, entry: &str, level: LevelMask) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes entries to stdout, colored by level.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    colored: bool,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self { colored: true }
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console sink that never emits color escapes.
    pub fn plain() -> Self {
        Self { colored: false }
    }

    fn paint(line: &str, level: LevelMask) -> ColoredString {
        if level.contains(LevelMask::ERR) {
            line.red()
        } else if level.contains(LevelMask::WARN) {
            line.yellow()
        } else if level.contains(LevelMask::INFO) {
            line.green()
        } else {
            line.blue()
        }
    }
}

impl OutputSink for ConsoleSink {
    /// Always succeeds: console failures are not surfaced.
    fn write(&mut self, entry: &str, level: LevelMask) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        let _ = if self.colored {
            let line = entry.strip_suffix('\n').unwrap_or(entry);
            writeln!(stdout, "{}", Self::paint(line, level))
        } else {
            stdout.write_all(entry.as_bytes())
        };
        let _ = stdout.flush();
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stdout().flush();
        Ok(())
    }
}

/// Appends entries to a file.
///
/// The file is opened in append mode when the sink is built and stays open
/// until the sink is dropped, at which point pending bytes are flushed.
pub struct FileSink {
    file: BufWriter<File>,
    path: PathBuf,
    flush_on_write: bool,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| FanlogError::OpenFile {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            file: BufWriter::new(file),
            path,
            flush_on_write: false,
        })
    }

    /// Flush the buffer after every entry instead of only on drop or explicit flush.
    pub fn with_flush_on_write(mut self, yes: bool) -> Self {
        self.flush_on_write = yes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, entry: &str, _level: LevelMask) -> io::Result<()> {
        self.file.write_all(entry.as_bytes())?;
        if self.flush_on_write {
            self.file.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(err) = self.file.flush() {
            let _ = writeln!(
                io::stderr(),
                "fanlog: unable to flush log file {}: {err}",
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_sink_appends_entries_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let mut sink = FileSink::new(&path).unwrap();
        for entry in ["a\n", "b\n", "c\n"] {
            sink.write(entry, LevelMask::INFO).unwrap();
        }
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn file_sink_reopen_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let mut sink = FileSink::new(&path).unwrap();
        sink.write("first\n", LevelMask::INFO).unwrap();
        drop(sink);
        let mut sink = FileSink::new(&path).unwrap();
        sink.write("second\n", LevelMask::WARN).unwrap();
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn file_sink_buffers_until_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let mut sink = FileSink::new(&path).unwrap();
        sink.write("pending\n", LevelMask::INFO).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        sink.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pending\n");
    }

    #[test]
    fn file_sink_flush_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let mut sink = FileSink::new(&path).unwrap().with_flush_on_write(true);
        sink.write("now\n", LevelMask::ERR).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "now\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn file_sink_open_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("test.log");
        match FileSink::new(&path) {
            Err(FanlogError::OpenFile { path: failed, .. }) => assert_eq!(failed, path),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("opening under a missing directory should fail"),
        }
    }

    #[test]
    fn console_sink_always_succeeds() {
        let mut sink = ConsoleSink::new();
        for level in [LevelMask::INFO, LevelMask::WARN, LevelMask::ERR, LevelMask::FREQ] {
            assert!(sink.write("console line\n", level).is_ok());
        }
        assert!(ConsoleSink::plain().write("plain line\n", LevelMask::INFO).is_ok());
        assert!(sink.flush().is_ok());
    }
}
