//! Non-movement key commands
//!
//! Movement keys go through `InputState`; everything else maps to a one-shot
//! command here.

use crate::consts::LEVEL_UP_OPTION_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Leave the start screen, or restart after game over
    Start,
    Pause,
    ToggleAutopilot,
    ToggleDebugOverlay,
    /// Pick a level-up option (zero-based)
    Choose(usize),
}

/// Map a `KeyboardEvent.key` value to a command
pub fn key_command(key: &str) -> Option<KeyCommand> {
    match key.to_lowercase().as_str() {
        " " | "enter" => Some(KeyCommand::Start),
        "escape" | "p" => Some(KeyCommand::Pause),
        "i" => Some(KeyCommand::ToggleAutopilot),
        "g" => Some(KeyCommand::ToggleDebugOverlay),
        digit => {
            let n: usize = digit.parse().ok()?;
            (1..=LEVEL_UP_OPTION_COUNT)
                .contains(&n)
                .then(|| KeyCommand::Choose(n - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(key_command("Escape"), Some(KeyCommand::Pause));
        assert_eq!(key_command("I"), Some(KeyCommand::ToggleAutopilot));
        assert_eq!(key_command("Enter"), Some(KeyCommand::Start));
        assert_eq!(key_command("w"), None);
    }

    #[test]
    fn test_option_digits() {
        assert_eq!(key_command("1"), Some(KeyCommand::Choose(0)));
        assert_eq!(key_command("3"), Some(KeyCommand::Choose(2)));
        assert_eq!(key_command("4"), None);
        assert_eq!(key_command("0"), None);
    }
}
