//! DOM `KeyboardEvent.key` names to gameplay keys

use crate::sim::{Direction, Key};

/// Map a key name to a gameplay key. Unknown keys are ignored.
pub fn key_from_name(name: &str) -> Option<Key> {
    match name {
        "ArrowRight" | "Right" | "d" | "D" => Some(Key::Move(Direction::Right)),
        "ArrowLeft" | "Left" | "a" | "A" => Some(Key::Move(Direction::Left)),
        " " | "Spacebar" => Some(Key::Start),
        _ => None,
    }
}
