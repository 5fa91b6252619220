/// Events emitted during a session step.
/// The presentation layer consumes these for status messages.

use crate::domain::movement::Effect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Won,
    Died,
    YouDestroyed { x: usize, y: usize },
    Sank { x: usize, y: usize },
    Melted { x: usize, y: usize },
    Opened { x: usize, y: usize },
    Swapped { x: usize, y: usize },
    Transformed { count: usize },
    Undone,
}

impl From<Effect> for GameEvent {
    fn from(e: Effect) -> Self {
        match e {
            Effect::Swapped { x, y } => GameEvent::Swapped { x, y },
            Effect::YouDestroyed { x, y } => GameEvent::YouDestroyed { x, y },
            Effect::Sank { x, y } => GameEvent::Sank { x, y },
            Effect::Melted { x, y } => GameEvent::Melted { x, y },
            Effect::Opened { x, y } => GameEvent::Opened { x, y },
        }
    }
}
