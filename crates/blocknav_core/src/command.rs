//! Navigation commands - the input protocol of the engine.
//!
//! Commands are what key bindings resolve to and what the session log
//! records. The DSL rendering ("move-up", "jump-to-container 2") is used
//! by logs, tests and debugging dumps.

use blocknav_mirror::StableId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move to the stacked predecessor (wraps in cycle mode).
    MoveUp,

    /// Move to the stacked successor (wraps in cycle mode).
    MoveDown,

    /// Descend into the first nested statement sequence.
    MoveIn,

    /// Ascend to the block owning the current sequence.
    MoveOut,

    /// Jump to the n-th top-level container (0-based).
    JumpToContainer(u32),

    /// Jump to a block by permanent identity.
    JumpToBlock(StableId),

    /// Jump to the top of the current stack.
    JumpToTop,

    /// Jump to the bottom of the current stack.
    JumpToBottom,

    /// Open a slot session on the current block.
    EnterBlock,

    /// Step to the next slot (wraps).
    SlotNext,

    /// Step to the previous slot (wraps).
    SlotPrev,

    /// Activate the current slot (navigate, jump, or open editor).
    ActivateSlot,

    /// Store the current connection slot, or join it with the stored one.
    PairConnection,

    /// Do nothing (keymap placeholder; skipped by the log).
    Noop,
}

impl Command {
    /// Render as a DSL string.
    pub fn as_dsl(&self) -> String {
        match self {
            Command::MoveUp => "move-up".to_string(),
            Command::MoveDown => "move-down".to_string(),
            Command::MoveIn => "move-in".to_string(),
            Command::MoveOut => "move-out".to_string(),
            Command::JumpToContainer(n) => format!("jump-to-container {n}"),
            Command::JumpToBlock(id) => format!("jump-to-block {id}"),
            Command::JumpToTop => "jump-to-top".to_string(),
            Command::JumpToBottom => "jump-to-bottom".to_string(),
            Command::EnterBlock => "enter-block".to_string(),
            Command::SlotNext => "slot-next".to_string(),
            Command::SlotPrev => "slot-prev".to_string(),
            Command::ActivateSlot => "activate-slot".to_string(),
            Command::PairConnection => "pair-connection".to_string(),
            Command::Noop => "noop".to_string(),
        }
    }

    /// Check if holding the bound key may auto-repeat this command.
    ///
    /// Movement and slot stepping repeat; entering, activating and
    /// pairing require a fresh press each time.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            Command::MoveUp
                | Command::MoveDown
                | Command::MoveIn
                | Command::MoveOut
                | Command::SlotNext
                | Command::SlotPrev
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_dsl())
    }
}

/// Error parsing a command DSL string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized command: {0}")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let head = parts.next().unwrap_or("");
        let arg = parts.next();

        let unrecognized = || ParseCommandError(s.to_string());

        let command = match (head, arg) {
            ("move-up", None) => Command::MoveUp,
            ("move-down", None) => Command::MoveDown,
            ("move-in", None) => Command::MoveIn,
            ("move-out", None) => Command::MoveOut,
            ("jump-to-container", Some(n)) => {
                Command::JumpToContainer(n.parse().map_err(|_| unrecognized())?)
            }
            ("jump-to-block", Some(id)) => {
                Command::JumpToBlock(id.parse().map_err(|_| unrecognized())?)
            }
            ("jump-to-top", None) => Command::JumpToTop,
            ("jump-to-bottom", None) => Command::JumpToBottom,
            ("enter-block", None) => Command::EnterBlock,
            ("slot-next", None) => Command::SlotNext,
            ("slot-prev", None) => Command::SlotPrev,
            ("activate-slot", None) => Command::ActivateSlot,
            ("pair-connection", None) => Command::PairConnection,
            ("noop", None) => Command::Noop,
            _ => return Err(unrecognized()),
        };

        if parts.next().is_some() {
            return Err(unrecognized());
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsl_round_trip() {
        let commands = [
            Command::MoveUp,
            Command::MoveDown,
            Command::MoveIn,
            Command::MoveOut,
            Command::JumpToContainer(2),
            Command::JumpToBlock(12345),
            Command::JumpToTop,
            Command::JumpToBottom,
            Command::EnterBlock,
            Command::SlotNext,
            Command::SlotPrev,
            Command::ActivateSlot,
            Command::PairConnection,
            Command::Noop,
        ];

        for command in commands {
            let dsl = command.as_dsl();
            let parsed: Command = dsl.parse().expect("parse");
            assert_eq!(parsed, command, "round trip of {dsl}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("flip-table".parse::<Command>().is_err());
        assert!("move-up now".parse::<Command>().is_err());
        assert!("jump-to-container".parse::<Command>().is_err());
        assert!("jump-to-container x".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn repeat_policy() {
        assert!(Command::MoveDown.is_repeatable());
        assert!(Command::SlotNext.is_repeatable());
        assert!(!Command::EnterBlock.is_repeatable());
        assert!(!Command::ActivateSlot.is_repeatable());
        assert!(!Command::PairConnection.is_repeatable());
        assert!(!Command::JumpToContainer(0).is_repeatable());
    }
}
