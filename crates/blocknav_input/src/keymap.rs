//! Key bindings and the command templates behind them.

use crate::error::InputError;
use crate::keyboard::{KeyCode, KeyModifiers};
use blocknav_core::Command;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key binding entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key.
    pub key: KeyCode,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a binding with no modifiers.
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a binding with modifiers.
    pub fn with_mods(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a binding with Ctrl modifier.
    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::CTRL,
        }
    }

    /// Create a binding with Shift modifier.
    pub fn shift(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    /// Check if this binding matches the given key and modifiers.
    pub fn matches(&self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.key == key && self.modifiers == modifiers
    }
}

/// Command template with optional key-derived parameterization.
///
/// Most bindings are fixed; container jumps take their index from the
/// digit key that fired them, so one template covers ten keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandTemplate {
    /// Fixed command, no parameters.
    Fixed(Command),

    /// Jump to the container named by the pressed digit key.
    ContainerByDigit,
}

impl CommandTemplate {
    /// Check if this template reads a parameter off the key itself.
    pub fn needs_key(&self) -> bool {
        !matches!(self, CommandTemplate::Fixed(_))
    }

    /// Resolve against the key that fired the binding.
    pub fn resolve(&self, key: KeyCode) -> Option<Command> {
        match self {
            CommandTemplate::Fixed(command) => Some(*command),
            CommandTemplate::ContainerByDigit => {
                key.digit_value().map(Command::JumpToContainer)
            }
        }
    }
}

/// Complete keyboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keymap {
    /// Keyboard bindings: KeyBinding → CommandTemplate.
    pub keyboard: HashMap<KeyBinding, CommandTemplate>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.setup_default_bindings();
        keymap
    }
}

impl Keymap {
    /// Create empty keymap with no bindings.
    pub fn empty() -> Self {
        Self {
            keyboard: HashMap::new(),
        }
    }

    /// Set up default key bindings.
    fn setup_default_bindings(&mut self) {
        // Arrow keys for the cursor
        self.keyboard.insert(
            KeyBinding::new(KeyCode::ArrowUp),
            CommandTemplate::Fixed(Command::MoveUp),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::ArrowDown),
            CommandTemplate::Fixed(Command::MoveDown),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::ArrowRight),
            CommandTemplate::Fixed(Command::MoveIn),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::ArrowLeft),
            CommandTemplate::Fixed(Command::MoveOut),
        );

        // WASD alternates
        self.keyboard.insert(
            KeyBinding::new(KeyCode::W),
            CommandTemplate::Fixed(Command::MoveUp),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::S),
            CommandTemplate::Fixed(Command::MoveDown),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::D),
            CommandTemplate::Fixed(Command::MoveIn),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::A),
            CommandTemplate::Fixed(Command::MoveOut),
        );

        // Home/End for stack edges
        self.keyboard.insert(
            KeyBinding::new(KeyCode::Home),
            CommandTemplate::Fixed(Command::JumpToTop),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::End),
            CommandTemplate::Fixed(Command::JumpToBottom),
        );

        // Digit row jumps to containers
        for key in KeyCode::DIGITS {
            self.keyboard
                .insert(KeyBinding::new(key), CommandTemplate::ContainerByDigit);
        }

        // In-node selection
        self.keyboard.insert(
            KeyBinding::new(KeyCode::Enter),
            CommandTemplate::Fixed(Command::EnterBlock),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::Tab),
            CommandTemplate::Fixed(Command::SlotNext),
        );
        self.keyboard.insert(
            KeyBinding::shift(KeyCode::Tab),
            CommandTemplate::Fixed(Command::SlotPrev),
        );
        self.keyboard.insert(
            KeyBinding::new(KeyCode::Space),
            CommandTemplate::Fixed(Command::ActivateSlot),
        );

        // Connection pairing
        self.keyboard.insert(
            KeyBinding::new(KeyCode::C),
            CommandTemplate::Fixed(Command::PairConnection),
        );
    }

    /// Look up the template for a key press.
    pub fn lookup_key(&self, key: KeyCode, modifiers: KeyModifiers) -> Option<&CommandTemplate> {
        let binding = KeyBinding { key, modifiers };
        self.keyboard.get(&binding)
    }

    /// Bind a key to a command template.
    pub fn bind_key(&mut self, binding: KeyBinding, template: CommandTemplate) {
        self.keyboard.insert(binding, template);
    }

    /// Unbind a key.
    pub fn unbind_key(&mut self, binding: &KeyBinding) {
        self.keyboard.remove(binding);
    }

    /// Check that every core operation is still reachable.
    ///
    /// Rebinding is free-form; this is the safety net a host should run
    /// after applying user configuration.
    pub fn validate(&self) -> Result<(), InputError> {
        const REQUIRED: [Command; 9] = [
            Command::MoveUp,
            Command::MoveDown,
            Command::MoveIn,
            Command::MoveOut,
            Command::EnterBlock,
            Command::SlotNext,
            Command::SlotPrev,
            Command::ActivateSlot,
            Command::PairConnection,
        ];

        for required in REQUIRED {
            let bound = self
                .keyboard
                .values()
                .any(|template| matches!(template, CommandTemplate::Fixed(command) if *command == required));
            if !bound {
                return Err(InputError::MissingBinding(required));
            }
        }

        let container_jump = self.keyboard.iter().any(|(binding, template)| {
            template
                .resolve(binding.key)
                .map(|command| matches!(command, Command::JumpToContainer(_)))
                .unwrap_or(false)
        });
        if !container_jump {
            return Err(InputError::NoContainerJump);
        }
        Ok(())
    }
}
