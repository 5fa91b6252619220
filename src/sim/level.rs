/// Built-in levels.
///
/// Each level is a compiled, row-major table of kinds, one object per
/// cell (`__` = nothing). The play area is the bounding box of the
/// occupied cells, so the outer wall ring also fences the level.
///
/// ## Legend
///   WL/BA/RK/FL/WA = Wall, Baba, Rock, Flag, Water
///   TW/TB/TR/TF/TA = the matching noun words, IS = `IS`
///   YO/ST/PU/WI/SK = YOU, STOP, PUSH, WIN, SINK

use crate::domain::board::Board;
use crate::domain::kind::ObjectKind::{self, *};
use crate::error::LevelError;

pub struct LevelDef {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub data: &'static [ObjectKind],
}

impl LevelDef {
    /// Fresh board for this level, play area computed.
    pub fn build(&self) -> Board {
        Board::from_kinds(self.width, self.height, self.data)
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

pub fn count() -> usize {
    LEVELS.len()
}

pub fn get(index: usize) -> Result<&'static LevelDef, LevelError> {
    LEVELS.get(index).ok_or(LevelError::UnknownLevel { index, count: LEVELS.len() })
}

// ══════════════════════════════════════════════════════════════
// Level table
// ══════════════════════════════════════════════════════════════

const __: ObjectKind = Empty;
const WL: ObjectKind = Wall;
const BA: ObjectKind = Baba;
const RK: ObjectKind = Rock;
const FL: ObjectKind = Flag;
const WA: ObjectKind = Water;
const IS: ObjectKind = TextIs;
const TW: ObjectKind = TextWall;
const TB: ObjectKind = TextBaba;
const TR: ObjectKind = TextRock;
const TF: ObjectKind = TextFlag;
const TA: ObjectKind = TextWater;
const YO: ObjectKind = TextYou;
const ST: ObjectKind = TextStop;
const PU: ObjectKind = TextPush;
const WI: ObjectKind = TextWin;
const SK: ObjectKind = TextSink;

#[rustfmt::skip]
const FIRST_STEPS: [ObjectKind; 77] = [
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
    WL, TB, IS, YO, __, __, TF, IS, WI, __, WL,
    WL, __, __, __, __, __, __, __, __, __, WL,
    WL, __, BA, __, __, __, __, __, FL, __, WL,
    WL, __, __, __, __, __, __, __, __, __, WL,
    WL, TW, IS, ST, __, __, __, __, __, __, WL,
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
];

#[rustfmt::skip]
const ROCK_ROW: [ObjectKind; 77] = [
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
    WL, TB, IS, YO, __, TR, IS, PU, __, __, WL,
    WL, __, __, __, __, __, RK, __, __, __, WL,
    WL, __, BA, __, __, __, RK, __, FL, __, WL,
    WL, __, __, __, __, __, RK, __, __, __, WL,
    WL, TW, IS, ST, __, TF, IS, WI, __, __, WL,
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
];

#[rustfmt::skip]
const RIVER: [ObjectKind; 77] = [
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
    WL, TB, IS, YO, __, __, WA, TW, IS, ST, WL,
    WL, TR, IS, PU, __, __, WA, __, __, __, WL,
    WL, BA, __, RK, __, __, WA, __, FL, __, WL,
    WL, TA, IS, SK, __, __, WA, __, __, __, WL,
    WL, TF, IS, WI, __, __, WA, __, __, __, WL,
    WL, WL, WL, WL, WL, WL, WL, WL, WL, WL, WL,
];

static LEVELS: [LevelDef; 3] = [
    LevelDef { name: "First Steps", width: 11, height: 7, data: &FIRST_STEPS },
    LevelDef { name: "Rock Row", width: 11, height: 7, data: &ROCK_ROW },
    LevelDef { name: "River", width: 11, height: 7, data: &RIVER },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kind::Status;
    use crate::domain::rules;

    #[test]
    fn every_level_has_consistent_dimensions() {
        for l in LEVELS.iter() {
            assert_eq!(l.data.len(), l.width * l.height, "{}", l.name);
        }
    }

    #[test]
    fn every_level_has_you_and_win() {
        for l in LEVELS.iter() {
            let board = l.build();
            let (props, _) = rules::parse(&board);
            assert!(board.count_where(|k| props.get(k).you) > 0, "{} has no YOU", l.name);
            assert!(!props.kinds_with(Status::Win).is_empty(), "{} has no WIN", l.name);
        }
    }

    #[test]
    fn wall_ring_spans_the_board() {
        let b = get(0).unwrap().build();
        assert_eq!((b.play_min_x, b.play_min_y), (0, 0));
        assert_eq!((b.play_max_x, b.play_max_y), (10, 6));
    }

    #[test]
    fn unknown_index_is_an_error() {
        assert_eq!(get(count()).err(), Some(LevelError::UnknownLevel { index: 3, count: 3 }));
    }
}
