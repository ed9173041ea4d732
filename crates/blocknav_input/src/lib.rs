//! Keyboard input handling for block-canvas navigation.
//!
//! This crate translates host keyboard events into navigation
//! [`Command`](blocknav_core::Command)s. The design ensures:
//!
//! 1. **Host agnostic** - All input flows through RawInput → Command
//! 2. **Rebindable** - Key bindings are configurable via Keymap
//! 3. **Validated** - A rebound keymap can prove every operation is
//!    still reachable
//!
//! # Architecture
//!
//! ```text
//! host key event ──► RawInput ──► InputProcessor ──► Command
//!                                       │
//!                                       ▼
//!                                 Keymap (rebindable)
//! ```
//!
//! # Example
//!
//! ```
//! use blocknav_input::{InputProcessor, KeyCode, RawInput};
//!
//! let processor = InputProcessor::new();
//! let command = processor.process(&RawInput::key_down(KeyCode::ArrowDown));
//! assert!(command.is_some());
//! ```

mod error;
mod keyboard;
mod keymap;
mod processor;
mod raw;

pub use error::InputError;
pub use keyboard::{KeyCode, KeyModifiers};
pub use keymap::{CommandTemplate, KeyBinding, Keymap};
pub use processor::InputProcessor;
pub use raw::RawInput;
