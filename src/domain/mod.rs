pub mod board;
pub mod kind;
pub mod movement;
pub mod props;
pub mod rules;
pub mod transform;
