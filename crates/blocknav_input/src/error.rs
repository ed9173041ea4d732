//! Input layer errors.

use blocknav_core::Command;
use thiserror::Error;

/// Configuration problems a host should surface before use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A core operation has no binding left after rebinding.
    #[error("no key binding produces `{0}`")]
    MissingBinding(Command),

    /// No digit key resolves to a container jump.
    #[error("no key is bound to a container jump")]
    NoContainerJump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_command() {
        let err = InputError::MissingBinding(Command::PairConnection);
        assert_eq!(err.to_string(), "no key binding produces `pair-connection`");
    }
}
