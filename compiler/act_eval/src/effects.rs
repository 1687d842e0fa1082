//! Captured side effects.
//!
//! Built-ins that would perform observable I/O (console output) and host
//! objects that want their mutations inspected append an [`EffectRecord`]
//! here instead. The log is append-only and ordered; callers read it after
//! a run.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Severity of a console call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleLevel {
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Self::Log),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Debug => "debug",
        }
    }
}

/// Where a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Console(ConsoleLevel),
    /// Appended by a bound host object.
    Host,
}

/// One captured effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectRecord {
    /// Position in the log; strictly increasing.
    pub sequence: u64,
    pub kind: EffectKind,
    /// What the effect applies to (`console`, an element id, ...).
    pub target: String,
    pub message: String,
}

impl fmt::Display for EffectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EffectKind::Console(level) => {
                write!(f, "[{}] {}.{}: {}", self.sequence, self.target, level.as_str(), self.message)
            }
            EffectKind::Host => write!(f, "[{}] {}: {}", self.sequence, self.target, self.message),
        }
    }
}

/// Ordered, append-only effect log.
#[derive(Debug, Default)]
pub struct EffectLog {
    records: Vec<EffectRecord>,
    next_sequence: u64,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its sequence number.
    pub fn record(&mut self, kind: EffectKind, target: &str, message: impl Into<String>) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records.push(EffectRecord {
            sequence,
            kind,
            target: target.to_string(),
            message: message.into(),
        });
        sequence
    }

    pub fn records(&self) -> &[EffectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records. Sequence numbers keep increasing afterwards.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Messages of console records, in order.
    pub fn console_lines(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| matches!(r.kind, EffectKind::Console(_)))
            .map(|r| r.message.clone())
            .collect()
    }

    /// Records whose target is `target`, in order.
    pub fn for_target(&self, target: &str) -> Vec<EffectRecord> {
        self.records
            .iter()
            .filter(|r| r.target == target)
            .cloned()
            .collect()
    }
}

/// The effect log as shared between the engine and host objects.
pub type SharedEffectLog = Arc<Mutex<EffectLog>>;

pub fn shared_effect_log() -> SharedEffectLog {
    Arc::new(Mutex::new(EffectLog::new()))
}
