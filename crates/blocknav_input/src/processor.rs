//! Raw input to command translation.

use crate::keymap::Keymap;
use crate::keyboard::{KeyCode, KeyModifiers};
use crate::raw::RawInput;
use blocknav_core::Command;

/// Stateless translator from raw key events to navigation commands.
///
/// Key releases never fire. Repeats fire only for commands that make
/// sense held down: a held arrow key walks the stack, a held Enter
/// does not keep re-entering the block.
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    keymap: Keymap,
}

impl InputProcessor {
    /// Processor with the default bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor with a custom keymap.
    pub fn with_keymap(keymap: Keymap) -> Self {
        Self { keymap }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// Translate one raw event. `None` means the event is not ours.
    pub fn process(&self, input: &RawInput) -> Option<Command> {
        match input {
            RawInput::KeyDown { key, modifiers } => self.resolve(*key, *modifiers),
            RawInput::KeyRepeat { key, modifiers } => self
                .resolve(*key, *modifiers)
                .filter(Command::is_repeatable),
            RawInput::KeyUp { .. } => None,
        }
    }

    fn resolve(&self, key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        self.keymap.lookup_key(key, modifiers)?.resolve(key)
    }
}
