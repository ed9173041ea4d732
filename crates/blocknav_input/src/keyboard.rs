//! Key codes and modifier state.

use serde::{Deserialize, Serialize};

/// Physical keys the navigation layer cares about.
///
/// Hosts translate their platform key events into these; anything not
/// listed here cannot be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Escape,
    Space,
    Tab,
    // Letter alternates for one-handed use
    W,
    A,
    S,
    D,
    C,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
}

impl KeyCode {
    /// The numeric value of a digit key.
    pub fn digit_value(&self) -> Option<u32> {
        match self {
            KeyCode::Digit0 => Some(0),
            KeyCode::Digit1 => Some(1),
            KeyCode::Digit2 => Some(2),
            KeyCode::Digit3 => Some(3),
            KeyCode::Digit4 => Some(4),
            KeyCode::Digit5 => Some(5),
            KeyCode::Digit6 => Some(6),
            KeyCode::Digit7 => Some(7),
            KeyCode::Digit8 => Some(8),
            KeyCode::Digit9 => Some(9),
            _ => None,
        }
    }

    /// All ten digit keys, in order.
    pub const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
}

/// Modifier key state at the time of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        ctrl: false,
        shift: false,
        alt: true,
    };

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn is_none(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_values() {
        assert_eq!(KeyCode::Digit0.digit_value(), Some(0));
        assert_eq!(KeyCode::Digit9.digit_value(), Some(9));
        assert_eq!(KeyCode::ArrowUp.digit_value(), None);

        for (value, key) in KeyCode::DIGITS.iter().enumerate() {
            assert_eq!(key.digit_value(), Some(value as u32));
        }
    }

    #[test]
    fn modifier_builders_compose() {
        let mods = KeyModifiers::CTRL.with_shift();
        assert!(mods.ctrl);
        assert!(mods.shift);
        assert!(!mods.alt);

        assert!(KeyModifiers::NONE.is_none());
        assert!(!KeyModifiers::ALT.is_none());
        assert_eq!(KeyModifiers::default(), KeyModifiers::NONE);
    }
}
