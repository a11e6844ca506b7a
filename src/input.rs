//! Input sampling
//!
//! Turns raw key down/up events into held directional intents and
//! edge-triggered one-shot actions. The sampler only mutates its own state;
//! the game decides what an action means for the current phase.

use std::collections::HashSet;

/// Logical keys the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    LetterA,
    LetterD,
    Space,
    /// Demo-mode toggle
    LetterI,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_browser_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "a" | "A" => Some(Key::LetterA),
            "d" | "D" => Some(Key::LetterD),
            " " | "Spacebar" => Some(Key::Space),
            "i" | "I" => Some(Key::LetterI),
            _ => None,
        }
    }

    /// Direction this key steers, if any
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::ArrowLeft | Key::LetterA => Some(Direction::Left),
            Key::ArrowRight | Key::LetterD => Some(Direction::Right),
            _ => None,
        }
    }

    /// Keys whose browser default (page scrolling) must be suppressed
    pub fn suppresses_default(&self) -> bool {
        matches!(self, Key::Space | Key::ArrowLeft | Key::ArrowRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A key transition delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// One-shot actions fired on the up→down edge of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch the ball, or restart after game over
    Primary,
    /// Toggle the autopilot
    ToggleDemo,
}

/// Currently held directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
}

impl Intents {
    /// Net horizontal direction: -1, 0 or 1
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// What the host should do with the raw event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// Call `preventDefault` on the browser event
    pub prevent_default: bool,
    /// Action fired by this event, if any
    pub action: Option<Action>,
}

/// Tracks held keys between frames
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HashSet<Key>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition; returns the fired action (if any)
    pub fn handle(&mut self, event: KeyEvent) -> KeyResponse {
        let action = if event.pressed {
            // Auto-repeat keydowns arrive while the key is already held
            let newly_pressed = self.held.insert(event.key);
            match event.key {
                Key::Space if newly_pressed => Some(Action::Primary),
                Key::LetterI if newly_pressed => Some(Action::ToggleDemo),
                _ => None,
            }
        } else {
            self.held.remove(&event.key);
            None
        };

        KeyResponse {
            prevent_default: event.key.suppresses_default(),
            action,
        }
    }

    /// Directions held right now (keys mapped to one direction are OR'd)
    pub fn intents(&self) -> Intents {
        let mut intents = Intents::default();
        for key in &self.held {
            match key.direction() {
                Some(Direction::Left) => intents.left = true,
                Some(Direction::Right) => intents.right = true,
                None => {}
            }
        }
        intents
    }

    /// Forget all held keys (focus loss, unmount)
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_key_mapping() {
        assert_eq!(Key::from_browser_key("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_browser_key("D"), Some(Key::LetterD));
        assert_eq!(Key::from_browser_key(" "), Some(Key::Space));
        assert_eq!(Key::from_browser_key("Enter"), None);
    }

    #[test]
    fn test_hold_and_release() {
        let mut input = InputSampler::new();
        input.handle(KeyEvent::down(Key::ArrowLeft));
        assert_eq!(
            input.intents(),
            Intents {
                left: true,
                right: false
            }
        );
        assert_eq!(input.intents().axis(), -1.0);

        input.handle(KeyEvent::up(Key::ArrowLeft));
        assert_eq!(input.intents(), Intents::default());
    }

    #[test]
    fn test_aliases_are_ored() {
        let mut input = InputSampler::new();
        input.handle(KeyEvent::down(Key::ArrowLeft));
        input.handle(KeyEvent::down(Key::LetterA));
        input.handle(KeyEvent::up(Key::LetterA));
        assert!(input.intents().left);

        input.handle(KeyEvent::up(Key::ArrowLeft));
        assert!(!input.intents().left);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut input = InputSampler::new();
        input.handle(KeyEvent::down(Key::LetterA));
        input.handle(KeyEvent::down(Key::LetterD));
        assert_eq!(input.intents().axis(), 0.0);
    }

    #[test]
    fn test_primary_is_edge_triggered() {
        let mut input = InputSampler::new();
        let first = input.handle(KeyEvent::down(Key::Space));
        assert_eq!(first.action, Some(Action::Primary));
        assert!(first.prevent_default);

        // Auto-repeat
        let repeat = input.handle(KeyEvent::down(Key::Space));
        assert_eq!(repeat.action, None);
        assert!(repeat.prevent_default);

        input.handle(KeyEvent::up(Key::Space));
        let again = input.handle(KeyEvent::down(Key::Space));
        assert_eq!(again.action, Some(Action::Primary));
    }

    #[test]
    fn test_letters_keep_default() {
        let mut input = InputSampler::new();
        let response = input.handle(KeyEvent::down(Key::LetterA));
        assert!(!response.prevent_default);
        assert_eq!(response.action, None);

        let response = input.handle(KeyEvent::down(Key::LetterI));
        assert_eq!(response.action, Some(Action::ToggleDemo));
    }
}
