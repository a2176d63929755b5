use std::fmt::{self, Display, Write};

use crate::{level::LevelMask, logger::Logger};

/// Accumulates the text of one log call and submits it when dropped.
///
/// The composer is bound to one logger and one level. Appending has no side
/// effect; the message reaches the sinks once, when the composer goes out of
/// scope (or on [`submit`](MessageComposer::submit)), and only if the logger's
/// filter admits the level at that moment. It is deliberately not `Clone`.
#[must_use = "the message is submitted when the composer is dropped"]
pub struct MessageComposer<'a> {
    logger: &'a Logger,
    level: LevelMask,
    buffer: String,
    pending: bool,
}

impl<'a> MessageComposer<'a> {
    pub(crate) fn new(logger: &'a Logger, level: LevelMask) -> Self {
        Self {
            logger,
            level,
            buffer: String::new(),
            pending: true,
        }
    }

    /// Appends the display form of `value`.
    pub fn push(&mut self, value: impl Display) -> &mut Self {
        let _ = write!(self.buffer, "{value}");
        self
    }

    pub fn level(&self) -> LevelMask {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Submits now instead of at the end of the scope.
    pub fn submit(mut self) {
        self.finish();
    }

    /// Drops the message without submitting it.
    pub fn discard(mut self) {
        self.pending = false;
    }

    fn finish(&mut self) {
        if std::mem::take(&mut self.pending) {
            self.logger.submit(&self.buffer, self.level);
        }
    }
}

impl Write for MessageComposer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl Drop for MessageComposer<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
