/// Object kinds and their classification.
/// Every question the rule grammar asks about a kind (is it a word? which
/// noun does it name? which flag does it grant?) is answered here with an
/// exhaustive match, so the grammar stays auditable in one place.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseKindError;

/// Number of distinct kinds. Per-kind tables are sized by this.
pub const KIND_COUNT: usize = 42;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ObjectKind {
    // ── Physical ──
    Baba,
    Wall,
    Rock,
    Flag,
    Lava,
    Goop,
    Love,
    Empty,        // "nothing": never stored by loaders, target of EMPTY IS X
    Key,
    Door,
    Water,
    Ice,
    Box,

    // ── Nouns (words naming a physical kind) ──
    TextBaba,
    TextWall,
    TextRock,
    TextFlag,
    TextLava,
    TextGoop,
    TextLove,
    TextEmpty,
    TextKey,
    TextDoor,
    TextWater,
    TextIce,
    TextBox,

    // ── Connectives ──
    TextIs,
    TextAnd,

    // ── Status words ──
    TextPush,
    TextStop,
    TextWin,
    TextYou,
    TextSink,
    TextKill,
    TextSwap,
    TextHot,
    TextMelt,
    TextMove,
    TextOpen,
    TextShut,
    TextFloat,
    TextPull,
}

/// A behavior flag that a status word grants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Status {
    You,
    Push,
    Stop,
    Win,
    Sink,
    Kill,
    Swap,
    Hot,
    Melt,
    Move,
    Open,
    Shut,
    Float,
    Pull,
}

use ObjectKind::*;

impl ObjectKind {
    /// Every kind in ordinal order.
    pub const ALL: [ObjectKind; KIND_COUNT] = [
        Baba, Wall, Rock, Flag, Lava, Goop, Love, Empty, Key, Door, Water, Ice, Box,
        TextBaba, TextWall, TextRock, TextFlag, TextLava, TextGoop, TextLove,
        TextEmpty, TextKey, TextDoor, TextWater, TextIce, TextBox,
        TextIs, TextAnd,
        TextPush, TextStop, TextWin, TextYou, TextSink, TextKill, TextSwap,
        TextHot, TextMelt, TextMove, TextOpen, TextShut, TextFloat, TextPull,
    ];

    /// First word ordinal. Everything at or above it is a word.
    const FIRST_WORD: ObjectKind = TextBaba;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<ObjectKind> {
        Self::ALL.get(idx).copied()
    }

    /// Is this an on-board word token rather than a physical thing?
    #[inline]
    pub fn is_word(self) -> bool {
        self.index() >= Self::FIRST_WORD.index()
    }

    /// Can this word stand on the left of IS?
    pub fn is_subject_word(self) -> bool {
        self.noun().is_some()
    }

    /// Does this word name a behavior flag?
    pub fn is_status_word(self) -> bool {
        self.status().is_some()
    }

    /// Can this word stand on the right of IS? (status or noun)
    pub fn is_predicate_word(self) -> bool {
        self.is_status_word() || self.is_subject_word()
    }

    /// The physical kind a noun word names.
    pub fn noun(self) -> Option<ObjectKind> {
        match self {
            TextBaba => Some(Baba),
            TextWall => Some(Wall),
            TextRock => Some(Rock),
            TextFlag => Some(Flag),
            TextLava => Some(Lava),
            TextGoop => Some(Goop),
            TextLove => Some(Love),
            TextEmpty => Some(Empty),
            TextKey => Some(Key),
            TextDoor => Some(Door),
            TextWater => Some(Water),
            TextIce => Some(Ice),
            TextBox => Some(Box),
            _ => None,
        }
    }

    /// The flag a status word grants.
    pub fn status(self) -> Option<Status> {
        match self {
            TextPush => Some(Status::Push),
            TextStop => Some(Status::Stop),
            TextWin => Some(Status::Win),
            TextYou => Some(Status::You),
            TextSink => Some(Status::Sink),
            TextKill => Some(Status::Kill),
            TextSwap => Some(Status::Swap),
            TextHot => Some(Status::Hot),
            TextMelt => Some(Status::Melt),
            TextMove => Some(Status::Move),
            TextOpen => Some(Status::Open),
            TextShut => Some(Status::Shut),
            TextFloat => Some(Status::Float),
            TextPull => Some(Status::Pull),
            _ => None,
        }
    }

    /// Stable display/parse name.
    pub fn name(self) -> &'static str {
        match self {
            Baba => "Baba",
            Wall => "Wall",
            Rock => "Rock",
            Flag => "Flag",
            Lava => "Lava",
            Goop => "Goop",
            Love => "Love",
            Empty => "Empty",
            Key => "Key",
            Door => "Door",
            Water => "Water",
            Ice => "Ice",
            Box => "Box",
            TextBaba => "Text_Baba",
            TextWall => "Text_Wall",
            TextRock => "Text_Rock",
            TextFlag => "Text_Flag",
            TextLava => "Text_Lava",
            TextGoop => "Text_Goop",
            TextLove => "Text_Love",
            TextEmpty => "Text_Empty",
            TextKey => "Text_Key",
            TextDoor => "Text_Door",
            TextWater => "Text_Water",
            TextIce => "Text_Ice",
            TextBox => "Text_Box",
            TextIs => "Text_Is",
            TextAnd => "Text_And",
            TextPush => "Text_Push",
            TextStop => "Text_Stop",
            TextWin => "Text_Win",
            TextYou => "Text_You",
            TextSink => "Text_Sink",
            TextKill => "Text_Kill",
            TextSwap => "Text_Swap",
            TextHot => "Text_Hot",
            TextMelt => "Text_Melt",
            TextMove => "Text_Move",
            TextOpen => "Text_Open",
            TextShut => "Text_Shut",
            TextFloat => "Text_Float",
            TextPull => "Text_Pull",
        }
    }
}

impl Status {
    pub fn name(self) -> &'static str {
        match self {
            Status::You => "YOU",
            Status::Push => "PUSH",
            Status::Stop => "STOP",
            Status::Win => "WIN",
            Status::Sink => "SINK",
            Status::Kill => "KILL",
            Status::Swap => "SWAP",
            Status::Hot => "HOT",
            Status::Melt => "MELT",
            Status::Move => "MOVE",
            Status::Open => "OPEN",
            Status::Shut => "SHUT",
            Status::Float => "FLOAT",
            Status::Pull => "PULL",
        }
    }
}

impl Default for ObjectKind {
    fn default() -> Self {
        Empty
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .ok_or_else(|| ParseKindError(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_table() {
        for (i, k) in ObjectKind::ALL.iter().enumerate() {
            assert_eq!(k.index(), i);
            assert_eq!(ObjectKind::from_index(i), Some(*k));
        }
        assert_eq!(ObjectKind::from_index(KIND_COUNT), None);
    }

    #[test]
    fn word_boundary() {
        assert!(!Box.is_word());
        assert!(!Empty.is_word());
        assert!(TextBaba.is_word());
        assert!(TextIs.is_word());
        assert!(TextPull.is_word());
    }

    #[test]
    fn every_word_is_exactly_one_family() {
        for k in ObjectKind::ALL.iter().copied().filter(|k| k.is_word()) {
            let families = [k.is_subject_word(), k.is_status_word(), matches!(k, TextIs | TextAnd)];
            assert_eq!(families.iter().filter(|b| **b).count(), 1, "{k}");
        }
    }

    #[test]
    fn physical_kinds_are_not_grammar() {
        for k in ObjectKind::ALL.iter().copied().filter(|k| !k.is_word()) {
            assert!(!k.is_predicate_word());
            assert_eq!(k.noun(), None);
        }
    }

    #[test]
    fn nouns_point_to_physical_kinds() {
        assert_eq!(TextEmpty.noun(), Some(Empty));
        assert_eq!(TextBox.noun(), Some(Box));
        for k in ObjectKind::ALL {
            if let Some(n) = k.noun() {
                assert!(!n.is_word());
            }
        }
    }

    #[test]
    fn names_parse_back() {
        for k in ObjectKind::ALL {
            assert_eq!(k.name().parse::<ObjectKind>(), Ok(k));
        }
        assert_eq!(" Text_Is ".parse::<ObjectKind>(), Ok(TextIs));
        assert!("Keke".parse::<ObjectKind>().is_err());
    }
}
