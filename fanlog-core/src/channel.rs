use std::io;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::{level::LevelMask, sink::OutputSink};

/// An entry forwarded by a [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub level: LevelMask,
}

/// Forwards entries to a channel so another part of the program can consume them.
pub struct ChannelSink {
    sender: Sender<LogEntry>,
}

impl ChannelSink {
    /// Creates the sink together with the receiving end of its unbounded channel.
    pub fn new() -> (Self, Receiver<LogEntry>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: Sender<LogEntry>) -> Self {
        Self { sender }
    }
}

impl OutputSink for ChannelSink {
    /// Fails with [`io::ErrorKind::BrokenPipe`] once every receiver is dropped.
    fn write(&mut self, entry: &str, level: LevelMask) -> io::Result<()> {
        self.sender
            .send(LogEntry {
                text: entry.to_string(),
                level,
            })
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "log entry receiver dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_entries() {
        let (mut sink, receiver) = ChannelSink::new();
        sink.write("hello\n", LevelMask::WARN).unwrap();
        assert_eq!(
            receiver.try_recv().unwrap(),
            LogEntry {
                text: "hello\n".into(),
                level: LevelMask::WARN
            }
        );
    }

    #[test]
    fn fails_once_receiver_is_gone() {
        let (mut sink, receiver) = ChannelSink::new();
        drop(receiver);
        let err = sink.write("lost\n", LevelMask::INFO).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn shared_sender() {
        let (sender, receiver) = unbounded();
        let mut first = ChannelSink::from_sender(sender.clone());
        let mut second = ChannelSink::from_sender(sender);
        first.write("1\n", LevelMask::INFO).unwrap();
        second.write("2\n", LevelMask::INFO).unwrap();
        let texts: Vec<_> = receiver.try_iter().map(|e| e.text).collect();
        assert_eq!(texts, ["1\n", "2\n"]);
    }
}
