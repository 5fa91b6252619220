/// WorldState: the complete snapshot of a running game.
///
/// ## Board and tables
///
/// The board is the only state that survives a step. The property and
/// transform tables are derived from it: `step()` rebuilds them on every
/// call, and `refresh_rules()` does so after load and undo. They are kept
/// here so the renderer can show what the words currently say.
///
/// ## Undo
///
/// Before each move the board is pushed onto a bounded history
/// (`max_undo`, oldest dropped first). Undo pops it and re-derives the
/// tables. Loading, restarting or advancing a level clears the history.

use std::collections::VecDeque;

use crate::config::GameConfig;
use crate::domain::board::Board;
use crate::domain::props::{PropertyTable, TransformTable};
use crate::domain::{rules, transform};
use crate::error::LevelError;

use super::level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    Dead,
    /// Past the last level with wrapping disabled.
    Complete,
}

#[derive(Clone, Debug)]
struct Snapshot {
    board: Board,
    moves: u32,
}

pub struct WorldState {
    // ── Board and derived tables ──
    pub board: Board,
    pub props: PropertyTable,
    pub transforms: TransformTable,

    // ── Meta ──
    pub phase: Phase,
    pub current_level: usize,
    pub total_levels: usize,
    pub level_name: &'static str,
    pub moves: u32,

    // ── Undo ──
    undo: VecDeque<Snapshot>,
    max_undo: usize,

    // ── Progression ──
    wrap_levels: bool,
}

// ── Construction ──

impl WorldState {
    /// Empty world; call `load_level` before stepping.
    pub fn new(config: &GameConfig) -> Self {
        WorldState {
            board: Board::new(0, 0),
            props: PropertyTable::new(),
            transforms: TransformTable::new(),
            phase: Phase::Playing,
            current_level: 0,
            total_levels: level::count(),
            level_name: "",
            moves: 0,
            undo: VecDeque::new(),
            max_undo: config.play.max_undo,
            wrap_levels: config.play.wrap_levels,
        }
    }
}

// ── Levels ──

impl WorldState {
    /// Replace the board with a fresh copy of level `index`.
    pub fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let def = level::get(index)?;
        self.load_board(def.build());
        self.current_level = index;
        self.level_name = def.name;
        log::info!("level {} \"{}\" loaded ({}x{})", index, def.name, def.width, def.height);
        Ok(())
    }

    /// Start from an arbitrary board, outside the level table.
    pub fn load_board(&mut self, board: Board) {
        self.board = board;
        self.undo.clear();
        self.moves = 0;
        self.phase = Phase::Playing;
        self.refresh_rules();
    }

    pub fn restart(&mut self) -> Result<(), LevelError> {
        log::debug!("restarting level {}", self.current_level);
        self.load_level(self.current_level)
    }

    /// Move on to the next level. Past the last one this wraps to level 0,
    /// or sets `Phase::Complete` when wrapping is off.
    pub fn advance(&mut self) -> Result<(), LevelError> {
        let next = self.current_level + 1;
        if next < self.total_levels {
            return self.load_level(next);
        }
        if self.wrap_levels {
            self.load_level(0)
        } else {
            log::info!("all {} levels complete", self.total_levels);
            self.phase = Phase::Complete;
            Ok(())
        }
    }
}

// ── Rules ──

impl WorldState {
    /// Re-derive the tables from the board and apply transformations.
    /// Returns the number of objects transformed.
    pub fn refresh_rules(&mut self) -> usize {
        rules::parse_into(&self.board, &mut self.props, &mut self.transforms);
        transform::apply(&mut self.board, &self.transforms)
    }

    /// Re-derive the tables without touching the board.
    pub fn reparse(&mut self) {
        rules::parse_into(&self.board, &mut self.props, &mut self.transforms);
    }
}

// ── Undo ──

impl WorldState {
    /// Remember the current board. No-op when undo is disabled.
    pub fn push_undo(&mut self) {
        if self.max_undo == 0 {
            return;
        }
        if self.undo.len() >= self.max_undo {
            self.undo.pop_front();
        }
        self.undo.push_back(Snapshot { board: self.board.clone(), moves: self.moves });
    }

    /// Restore the previous board. Works from any phase except `Complete`.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.phase == Phase::Complete {
            return false;
        }
        let Some(snap) = self.undo.pop_back() else { return false };
        self.board = snap.board;
        self.moves = snap.moves;
        self.phase = Phase::Playing;
        self.refresh_rules();
        true
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
