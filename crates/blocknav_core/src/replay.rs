//! Session recording and replay.
//!
//! Every executed command and every host mutation notice lands in the
//! session's [`NavLog`] with the tick it occurred at. Replaying the log
//! against a host that starts from the same canvas reproduces the
//! session: commands re-execute (faults contribute nothing, as they
//! contributed nothing the first time) and mutation notices re-read the
//! host exactly as the originals did.

use crate::command::Command;
use crate::host::{HostGraph, MutationEvent};
use crate::session::{NavConfig, NavSession};
use blocknav_mirror::{MirrorDigest, MirrorError};
use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// LOG ENTRIES
// =============================================================================

/// One recorded occurrence: a command we executed or a change notice
/// the host sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    Command(Command),
    Mutation(MutationEvent),
}

/// A log entry with the session tick it occurred at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub tick: u64,
    pub entry: LogEntry,
}

// =============================================================================
// NAVIGATION LOG
// =============================================================================

/// Ordered record of one session's inputs.
///
/// `baseline` pins the digest of the mirror the session started from,
/// so a replay can tell whether it is starting from the same canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavLog {
    pub session_id: String,
    pub baseline: Option<MirrorDigest>,
    pub events: Vec<TimestampedEvent>,
}

impl NavLog {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            baseline: None,
            events: Vec::new(),
        }
    }

    /// Record a command. `Noop` is not worth a log entry.
    pub(crate) fn record_command(&mut self, tick: u64, command: Command) {
        if command == Command::Noop {
            return;
        }
        self.events.push(TimestampedEvent {
            tick,
            entry: LogEntry::Command(command),
        });
    }

    pub(crate) fn record_mutation(&mut self, tick: u64, event: MutationEvent) {
        self.events.push(TimestampedEvent {
            tick,
            entry: LogEntry::Mutation(event),
        });
    }

    /// Pin the starting digest. Later syncs keep the original baseline.
    pub(crate) fn set_baseline(&mut self, digest: MirrorDigest) {
        if self.baseline.is_none() {
            self.baseline = Some(digest);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Render the log as one DSL line per event, host notices prefixed.
    ///
    /// ```text
    /// 1 move-down
    /// 2 enter-block
    /// 3 host:connection-joined
    /// ```
    pub fn to_dsl(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            let dsl = match &event.entry {
                LogEntry::Command(command) => command.as_dsl(),
                LogEntry::Mutation(mutation) => format!("host:{}", mutation.as_dsl()),
            };
            out.push_str(&format!("{} {}\n", event.tick, dsl));
        }
        out
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Drive a fresh session through a recorded log.
///
/// The host must start from the canvas the log was recorded against; a
/// baseline digest mismatch is reported but not fatal, since partial
/// replays against edited canvases are still useful for debugging.
pub fn replay<H: HostGraph>(
    host: &mut H,
    log: &NavLog,
    config: NavConfig,
) -> Result<NavSession, MirrorError> {
    let mut session = NavSession::with_session_id(config, log.session_id.clone());
    session.sync(host)?;

    match (log.baseline, session.digest()) {
        (Some(expected), Some(actual)) if expected != actual => {
            warn!(session_id = %log.session_id, "replay baseline digest mismatch");
        }
        _ => {}
    }

    for event in &log.events {
        session.set_tick(event.tick.saturating_sub(1));
        match event.entry {
            LogEntry::Command(command) => {
                // Faults are part of the record; skip and move on.
                let _ = session.execute(host, command);
            }
            LogEntry::Mutation(mutation) => {
                session.on_mutation(host, mutation)?;
            }
        }
    }
    Ok(session)
}
