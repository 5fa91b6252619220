//! wordpush: a word-rule block-pushing puzzle engine.
//!
//! `domain` holds the rule engine (parse, transform, move) as pure
//! functions over a `Board`. `sim` wraps it in a playable session with
//! levels, undo and events. `ui` is the crossterm front-end.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
pub mod ui;
