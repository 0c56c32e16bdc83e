/// Input snapshot read once per tick.
///
/// Front ends push raw events into an [`InputState`] as they arrive; the game
/// only looks at it at the start of each tick, so every tick sees one
/// consistent view regardless of when the events were delivered.

use std::collections::HashSet;

/// Named keys the game reacts to while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: HashSet<Key>,
    /// Last pointer position in playfield coordinates.  Once set it stays set.
    pub pointer: Option<(f32, f32)>,
    /// Primary pointer button held.
    pub pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Replace the held-key set wholesale.
    pub fn set_held(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.held = keys.into_iter().collect();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
        self.pointer_down = true;
    }

    pub fn pointer_released(&mut self) {
        self.pointer_down = false;
    }
}
