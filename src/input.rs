//! Keyboard mapping
//!
//! Turns raw key names (as reported by `KeyboardEvent.key`) into game
//! commands. The simulation never sees keys, only [`Command`]s.

use crate::settings::KeyboardLayout;
use crate::sim::Direction;

/// Discrete command delivered to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
}

/// Map a key to a command for the given layout
pub fn map_key(key: &str, layout: KeyboardLayout) -> Option<Command> {
    let key = key.to_lowercase();
    let (up, left) = match layout {
        KeyboardLayout::Azerty => ("z", "q"),
        KeyboardLayout::Qwerty => ("w", "a"),
    };

    let command = match key.as_str() {
        "arrowup" => Command::Turn(Direction::UP),
        "arrowdown" | "s" => Command::Turn(Direction::DOWN),
        "arrowleft" => Command::Turn(Direction::LEFT),
        "arrowright" | "d" => Command::Turn(Direction::RIGHT),
        " " => Command::TogglePause,
        "r" => Command::Restart,
        k if k == up => Command::Turn(Direction::UP),
        k if k == left => Command::Turn(Direction::LEFT),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_work_on_both_layouts() {
        for layout in [KeyboardLayout::Azerty, KeyboardLayout::Qwerty] {
            assert_eq!(map_key("ArrowUp", layout), Some(Command::Turn(Direction::UP)));
            assert_eq!(map_key("ArrowLeft", layout), Some(Command::Turn(Direction::LEFT)));
            assert_eq!(map_key("ArrowDown", layout), Some(Command::Turn(Direction::DOWN)));
            assert_eq!(map_key("ArrowRight", layout), Some(Command::Turn(Direction::RIGHT)));
        }
    }

    #[test]
    fn test_azerty_letters() {
        let layout = KeyboardLayout::Azerty;
        assert_eq!(map_key("z", layout), Some(Command::Turn(Direction::UP)));
        assert_eq!(map_key("Q", layout), Some(Command::Turn(Direction::LEFT)));
        assert_eq!(map_key("s", layout), Some(Command::Turn(Direction::DOWN)));
        assert_eq!(map_key("d", layout), Some(Command::Turn(Direction::RIGHT)));
        assert_eq!(map_key("w", layout), None);
        assert_eq!(map_key("a", layout), None);
    }

    #[test]
    fn test_qwerty_letters() {
        let layout = KeyboardLayout::Qwerty;
        assert_eq!(map_key("W", layout), Some(Command::Turn(Direction::UP)));
        assert_eq!(map_key("a", layout), Some(Command::Turn(Direction::LEFT)));
        assert_eq!(map_key("z", layout), None);
        assert_eq!(map_key("q", layout), None);
    }

    #[test]
    fn test_control_keys() {
        let layout = KeyboardLayout::default();
        assert_eq!(map_key(" ", layout), Some(Command::TogglePause));
        assert_eq!(map_key("R", layout), Some(Command::Restart));
        assert_eq!(map_key("Enter", layout), None);
    }
}
