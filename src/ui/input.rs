/// Input state tracker.
///
/// Tracks which keys are held so a held arrow keeps moving (rate-limited
/// by the caller), while one-shot keys (undo, restart, confirm) fire only
/// on the initial press.
///
/// Terminals that report Release events get exact hold tracking; others
/// fall back to a timeout since the last Press/Repeat.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::board::Direction;

/// After this long without a Press/Repeat event the key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_UNDO: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z'), KeyCode::Char('u'), KeyCode::Char('U'), KeyCode::Backspace];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// A one-shot command, edge-triggered.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Quit,
    Undo,
    Restart,
    Confirm,
}

pub struct InputState {
    /// Last Press/Repeat per key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    ctrl_c: bool,
    /// Only set once keyboard enhancement is confirmed.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Read every pending terminal event without blocking. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
        }
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Held or freshly pressed movement key. Vertical wins over horizontal.
    pub fn direction(&self) -> Option<Direction> {
        let active = |keys: &[KeyCode]| keys.iter().any(|k| self.is_held(*k) || self.was_pressed(*k));
        if active(KEYS_UP) {
            Some(Direction::Up)
        } else if active(KEYS_DOWN) {
            Some(Direction::Down)
        } else if active(KEYS_LEFT) {
            Some(Direction::Left)
        } else if active(KEYS_RIGHT) {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Was a movement key pressed this frame (as opposed to held)?
    pub fn direction_pressed(&self) -> bool {
        [KEYS_UP, KEYS_DOWN, KEYS_LEFT, KEYS_RIGHT]
            .iter()
            .any(|keys| keys.iter().any(|k| self.was_pressed(*k)))
    }

    /// The first one-shot command pressed this frame, quit first.
    pub fn command(&self) -> Option<Command> {
        let pressed = |keys: &[KeyCode]| keys.iter().any(|k| self.was_pressed(*k));
        if self.ctrl_c || pressed(KEYS_QUIT) {
            Some(Command::Quit)
        } else if pressed(KEYS_UNDO) {
            Some(Command::Undo)
        } else if pressed(KEYS_RESTART) {
            Some(Command::Restart)
        } else if pressed(KEYS_CONFIRM) {
            Some(Command::Confirm)
        } else {
            None
        }
    }

    // ── Internal ──

    fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

impl Default for InputState {
    fn default() -> Self {
        InputState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrow_and_wasd_map_to_directions() {
        let mut s = InputState::new();
        s.record(press(KeyCode::Char('a')), Instant::now());
        assert_eq!(s.direction(), Some(Direction::Left));
        assert!(s.direction_pressed());

        let mut s = InputState::new();
        s.record(press(KeyCode::Down), Instant::now());
        assert_eq!(s.direction(), Some(Direction::Down));
    }

    #[test]
    fn commands_are_edge_triggered() {
        let mut s = InputState::new();
        let now = Instant::now();
        s.record(press(KeyCode::Char('z')), now);
        assert_eq!(s.command(), Some(Command::Undo));
        s.fresh_presses.clear();
        // Repeat while held: no new press.
        s.record(press(KeyCode::Char('z')), now);
        assert_eq!(s.command(), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut s = InputState::new();
        s.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert_eq!(s.command(), Some(Command::Quit));
    }

    #[test]
    fn release_honored_only_when_enabled() {
        let now = Instant::now();
        let mut release = press(KeyCode::Left);
        release.kind = KeyEventKind::Release;

        let mut s = InputState::new();
        s.record(press(KeyCode::Left), now);
        s.record(release, now);
        assert!(s.is_held_at(KeyCode::Left, now));

        s.honor_release = true;
        s.record(release, now);
        assert!(!s.is_held_at(KeyCode::Left, now));
    }
}
