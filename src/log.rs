//! Leveled logging.
//!
//! A `Logger` is built once in `main` and handed to every component that
//! needs to talk to the operator. Cloning is cheap; clones share the sink.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
enum Sink {
    Stderr,
    Memory(Arc<Mutex<Vec<(Level, String)>>>),
}

#[derive(Clone)]
pub struct Logger {
    level: Level,
    sink: Sink,
}

impl Logger {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            sink: Sink::Stderr,
        }
    }

    /// Debug output is on if `--debug` was given or `DEBUG` is `yes`/`true`.
    pub fn from_env(debug_flag: bool) -> Self {
        let debug_env = matches!(std::env::var("DEBUG").as_deref(), Ok("yes") | Ok("true"));
        if debug_flag || debug_env {
            Self::new(Level::Debug)
        } else {
            Self::new(Level::Info)
        }
    }

    /// A logger that keeps records in memory instead of printing them.
    pub fn in_memory(level: Level) -> Self {
        Self {
            level,
            sink: Sink::Memory(Arc::new(Mutex::new(vec![]))),
        }
    }

    /// Records captured so far. Always empty for the stderr sink.
    pub fn records(&self) -> Vec<(Level, String)> {
        match &self.sink {
            Sink::Stderr => vec![],
            Sink::Memory(records) => records.lock().map(|r| r.clone()).unwrap_or_default(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.log(Level::Error, msg);
    }

    fn log(&self, level: Level, msg: impl fmt::Display) {
        if level < self.level {
            return;
        }
        match &self.sink {
            Sink::Stderr => eprintln!("{}", format_line(level, &msg.to_string())),
            Sink::Memory(records) => {
                if let Ok(mut records) = records.lock() {
                    records.push((level, msg.to_string()));
                }
            }
        }
    }
}

fn format_line(level: Level, msg: &str) -> String {
    if level == Level::Info {
        return format!("{} {}", "*".bold().cyan(), msg);
    }
    let severity = match level {
        Level::Warn => level.to_string().yellow().bold(),
        Level::Error => level.to_string().red().bold(),
        _ => level.to_string().normal(),
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{} {}: {}", now, severity, msg)
}
