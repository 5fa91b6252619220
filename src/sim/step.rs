/// The step function: advances the world by one move.
///
/// Processing order:
///   1. Rule parse
///   2. Transformations
///   3. MOVE objects travel
///   4. YOU objects travel (push / pull / swap / block)
///   5. Rule parse (words may have moved)
///   6. Transformations
///   7. Interactions (win / kill / sink / melt / open-shut)
///   8. Win / lose check
///
/// Steps 2-4 and 7-8 live in `domain::movement`; this module owns the
/// ordering, undo history and phase changes.

use crate::domain::board::Direction;
use crate::domain::movement::{self, StepOutcome};
use crate::domain::{rules, transform};
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Run one step. `dir == None` re-evaluates the board in place without
/// moving, recording no undo entry. Does nothing outside `Phase::Playing`.
pub fn step(world: &mut WorldState, dir: Option<Direction>) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    let mut effects = Vec::new();

    if dir.is_some() {
        world.push_undo();
        world.moves += 1;
    }

    rules::parse_into(&world.board, &mut world.props, &mut world.transforms);
    let mut transformed = movement::advance(
        &mut world.board, &world.props, &world.transforms, dir, &mut effects,
    );

    rules::parse_into(&world.board, &mut world.props, &mut world.transforms);
    transformed += transform::apply(&mut world.board, &world.transforms);

    let outcome = movement::interact(&mut world.board, &world.props, &mut effects);

    if transformed > 0 {
        events.push(GameEvent::Transformed { count: transformed });
    }
    events.extend(effects.into_iter().map(GameEvent::from));

    // Interactions may have destroyed words; keep the tables in sync for
    // the renderer. The board is not touched.
    world.reparse();

    resolve_outcome(world, outcome, &mut events);
    events
}

/// Undo the last move. Emits `Undone` when something was restored.
pub fn undo(world: &mut WorldState) -> Vec<GameEvent> {
    if world.undo() {
        log::info!("undo to move {}", world.moves);
        vec![GameEvent::Undone]
    } else {
        vec![]
    }
}

// ══════════════════════════════════════════════════════════════
// Win / lose
// ══════════════════════════════════════════════════════════════

fn resolve_outcome(world: &mut WorldState, outcome: StepOutcome, events: &mut Vec<GameEvent>) {
    if outcome.has_won {
        world.phase = Phase::Won;
        log::info!("level {} won in {} moves", world.current_level, world.moves);
        events.push(GameEvent::Won);
    } else if outcome.has_died {
        world.phase = Phase::Dead;
        log::info!("no YOU left on level {}", world.current_level);
        events.push(GameEvent::Died);
    }
}
