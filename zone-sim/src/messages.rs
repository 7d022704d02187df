//! The in-game message log shown under the map, and the stderr subscriber
//! for `log` records.

use std::collections::VecDeque;
use std::fmt;
use std::io;

use crossterm::style::{Color, Stylize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use zone_core::Location;

/// Category of a log entry; decides the tag and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKind {
    Combat,
    Move,
    Idle,
    Info,
}

impl MsgKind {
    pub fn tag(self) -> &'static str {
        match self {
            MsgKind::Combat => "COMBAT",
            MsgKind::Move => "MOVE",
            MsgKind::Idle => "IDLE",
            MsgKind::Info => "INFO",
        }
    }

    /// Terminal color of the tag; `None` prints it plain.
    pub fn color(self) -> Option<Color> {
        match self {
            MsgKind::Combat => Some(Color::Red),
            MsgKind::Move => Some(Color::Green),
            MsgKind::Idle => Some(Color::Cyan),
            MsgKind::Info => None,
        }
    }
}

/// A single formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: MsgKind,
    pub square: Option<Location>,
    /// Already upper-cased.
    pub text: String,
}

impl LogEntry {
    pub fn new(kind: MsgKind, square: Option<Location>, text: &str) -> Self {
        Self {
            kind,
            square,
            text: text.trim().to_uppercase(),
        }
    }

    /// The entry with its tag colored for a terminal.
    pub fn styled(&self) -> String {
        let tag = format!("[{}]", self.kind.tag());
        let tag = match self.kind.color() {
            Some(color) => tag.with(color).to_string(),
            None => tag,
        };
        match self.square {
            Some(sq) => format!("{tag} [SQUARE={sq}] {}", self.text),
            None => format!("{tag} {}", self.text),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind.tag())?;
        if let Some(sq) = self.square {
            write!(f, " [SQUARE={sq}]")?;
        }
        write!(f, " {}", self.text)
    }
}

/// The latest `capacity` entries, oldest first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    echo: bool,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            echo: false,
        }
    }

    /// Also print every entry to stdout as it is added, for runs that do not
    /// redraw the screen.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn push(&mut self, kind: MsgKind, square: Option<Location>, text: &str) {
        let entry = LogEntry::new(kind, square, text);
        if self.echo {
            println!("{}", entry.styled());
        }
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `kind`, oldest first.
    pub fn of_kind(&self, kind: MsgKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

/// Filter directive for `level`, in the syntax `RUST_LOG` uses.
fn filter_directive(level: log::LevelFilter) -> String {
    level.to_string().to_lowercase()
}

/// Route `log` records to stderr for the whole process.
///
/// `RUST_LOG` takes precedence over `level` when it is set and valid.
pub fn init_logging(level: log::LevelFilter) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
}
