//! Raw keyboard events from the host.

use crate::keyboard::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// One keyboard event as the host delivers it.
///
/// Hosts convert their platform events into this shape before handing
/// them to the processor; repeat detection stays on the host side,
/// where the platform already does it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawInput {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: KeyModifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: KeyModifiers,
    },

    /// Key held and repeating.
    KeyRepeat {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
}

impl RawInput {
    /// Create a key down event with no modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        RawInput::KeyDown {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a key down event with modifiers.
    pub fn key_down_with(key: KeyCode, modifiers: KeyModifiers) -> Self {
        RawInput::KeyDown { key, modifiers }
    }

    /// Create a key up event with no modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        RawInput::KeyUp {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a key repeat event with no modifiers.
    pub fn key_repeat(key: KeyCode) -> Self {
        RawInput::KeyRepeat {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// True for events that can trigger a command.
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            RawInput::KeyDown { .. } | RawInput::KeyRepeat { .. }
        )
    }
}
