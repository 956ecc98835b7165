//! Directional input state
//!
//! Keys are matched case-insensitively against the bindings. Keyboard and the
//! on-screen D-pad feed the same four flags.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Snapshot of held directions, read by the simulation each step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    /// Unnormalized movement vector in screen space (y grows downward)
    pub fn axis(&self) -> glam::Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        glam::Vec2::new(x as f32, y as f32)
    }
}

/// Key-to-direction bindings, stored lowercased
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |list: &[&str]| list.iter().map(|k| k.to_string()).collect();
        Self {
            up: keys(&["w", "arrowup"]),
            down: keys(&["s", "arrowdown"]),
            left: keys(&["a", "arrowleft"]),
            right: keys(&["d", "arrowright"]),
        }
    }
}

impl KeyBindings {
    /// Direction bound to `key`, if any
    pub fn lookup(&self, key: &str) -> Option<Direction> {
        let key = key.to_lowercase();
        let hit = |list: &[String]| list.iter().any(|k| *k == key);
        if hit(&self.up) {
            Some(Direction::Up)
        } else if hit(&self.down) {
            Some(Direction::Down)
        } else if hit(&self.left) {
            Some(Direction::Left)
        } else if hit(&self.right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Held-key tracker fed by key and D-pad events
///
/// Physical keys are tracked individually, so releasing `w` keeps "up" active
/// while `arrowup` is still held.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held_keys: BTreeSet<String>,
    virtual_held: Directions,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key is bound (so the caller can
    /// suppress the browser default). Auto-repeat of a held key is a no-op.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.bindings.lookup(key).is_none() {
            return false;
        }
        self.held_keys.insert(key.to_lowercase());
        true
    }

    /// Record a key release. Returns true if the key is bound.
    pub fn key_up(&mut self, key: &str) -> bool {
        if self.bindings.lookup(key).is_none() {
            return false;
        }
        self.held_keys.remove(&key.to_lowercase());
        true
    }

    /// On-screen D-pad press/release
    pub fn set_virtual(&mut self, dir: Direction, pressed: bool) {
        self.virtual_held.set(dir, pressed);
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.virtual_held = Directions::default();
    }

    pub fn snapshot(&self) -> Directions {
        let mut dirs = self.virtual_held;
        for key in &self.held_keys {
            if let Some(dir) = self.bindings.lookup(key) {
                dirs.set(dir, true);
            }
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut input = InputState::new();
        assert!(input.key_down("W"));
        assert!(input.key_down("ArrowLeft"));
        let held = input.snapshot();
        assert!(held.up && held.left);
        assert!(!held.down && !held.right);
    }

    #[test]
    fn test_repeat_and_release() {
        let mut input = InputState::new();
        input.key_down("d");
        input.key_down("d");
        assert!(input.snapshot().right);
        input.key_up("D");
        assert_eq!(input.snapshot(), Directions::default());
    }

    #[test]
    fn test_duplicate_bindings_release_independently() {
        let mut input = InputState::new();
        input.key_down("w");
        input.key_down("ArrowUp");
        input.key_up("w");
        assert!(input.snapshot().up);
        input.key_up("arrowup");
        assert!(!input.snapshot().up);
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("q"));
        assert!(!input.key_up(" "));
        assert_eq!(input.snapshot(), Directions::default());
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down("arrowright");
        assert_eq!(input.snapshot().axis(), glam::Vec2::ZERO);
    }

    #[test]
    fn test_virtual_dpad_and_clear() {
        let mut input = InputState::new();
        input.set_virtual(Direction::Down, true);
        assert_eq!(input.snapshot().axis(), glam::Vec2::new(0.0, 1.0));
        input.clear();
        assert_eq!(input.snapshot(), Directions::default());
    }
}
