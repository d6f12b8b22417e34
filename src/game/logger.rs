//! Append-only game log
//!
//! Every entry is kept in memory for the lifetime of the game. In Stdout
//! mode entries at or below the configured verbosity are also printed.

use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, phases, and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - all actions and state changes
    Verbose = 3,
}

impl std::str::FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            other => Err(format!("unknown verbosity level: {other}")),
        }
    }
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Keep entries in the game log only (default)
    #[default]
    Memory,
    /// Also echo entries to stdout
    Stdout,
}

/// Category tag for engine-invariant violations
pub const ENGINE_ERROR: &str = "engine_error";

/// Category tag for decisions made by a controller
pub const CONTROLLER_CHOICE: &str = "controller_choice";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "controller_choice", "engine_error")
    pub category: Option<String>,
}

/// Centralized logger owned by the game state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    entries: Vec<LogEntry>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// All entries so far, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages only, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with the given category
    pub fn with_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.category.as_deref() == Some(category))
    }

    fn record(&mut self, level: VerbosityLevel, message: String, category: Option<&str>) {
        if self.output_mode == OutputMode::Stdout && level <= self.verbosity {
            if level == VerbosityLevel::Minimal {
                println!("{message}");
            } else {
                println!("  {message}");
            }
        }
        self.entries.push(LogEntry {
            level,
            message,
            category: category.map(str::to_string),
        });
    }

    /// Log at Minimal level
    pub fn minimal(&mut self, message: impl Into<String>) {
        self.record(VerbosityLevel::Minimal, message.into(), None);
    }

    /// Log at Normal level
    pub fn normal(&mut self, message: impl Into<String>) {
        self.record(VerbosityLevel::Normal, message.into(), None);
    }

    /// Log at Verbose level
    pub fn verbose(&mut self, message: impl Into<String>) {
        self.record(VerbosityLevel::Verbose, message.into(), None);
    }

    /// Log an engine-invariant violation
    pub fn engine_error(&mut self, message: impl Into<String>) {
        let message = format!("ENGINE ERROR: {}", message.into());
        self.record(VerbosityLevel::Minimal, message, Some(ENGINE_ERROR));
    }

    /// Log a controller decision at Normal level
    pub fn controller_choice(&mut self, controller_name: &str, message: &str) {
        let formatted = format!("{controller_name} chose {message}");
        self.record(VerbosityLevel::Normal, formatted, Some(CONTROLLER_CHOICE));
    }
}
