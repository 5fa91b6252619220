/// Per-kind derived tables: behavior flags and transformation edges.
///
/// Both are rebuilt from scratch by the rule parser every step and passed
/// explicitly through the pipeline. Neither survives across steps.

use super::kind::{ObjectKind, Status, KIND_COUNT};

/// Max targets one kind can be rewritten into at once.
pub const MAX_TRANSFORMS: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PropertyFlags {
    pub you: bool,
    pub push: bool,
    pub stop: bool,
    pub win: bool,
    pub sink: bool,
    pub kill: bool,
    pub swap: bool,
    pub hot: bool,
    pub melt: bool,
    pub moves: bool,
    pub open: bool,
    pub shut: bool,
    pub floating: bool,
    pub pull: bool,
}

impl PropertyFlags {
    /// Baseline for a kind with no active rule: words are always pushable
    /// and always on the floating layer.
    pub fn baseline(kind: ObjectKind) -> Self {
        let word = kind.is_word();
        PropertyFlags { push: word, floating: word, ..PropertyFlags::default() }
    }

    pub fn set(&mut self, status: Status) {
        match status {
            Status::You => self.you = true,
            Status::Push => self.push = true,
            Status::Stop => self.stop = true,
            Status::Win => self.win = true,
            Status::Sink => self.sink = true,
            Status::Kill => self.kill = true,
            Status::Swap => self.swap = true,
            Status::Hot => self.hot = true,
            Status::Melt => self.melt = true,
            Status::Move => self.moves = true,
            Status::Open => self.open = true,
            Status::Shut => self.shut = true,
            Status::Float => self.floating = true,
            Status::Pull => self.pull = true,
        }
    }

    pub fn has(&self, status: Status) -> bool {
        match status {
            Status::You => self.you,
            Status::Push => self.push,
            Status::Stop => self.stop,
            Status::Win => self.win,
            Status::Sink => self.sink,
            Status::Kill => self.kill,
            Status::Swap => self.swap,
            Status::Hot => self.hot,
            Status::Melt => self.melt,
            Status::Move => self.moves,
            Status::Open => self.open,
            Status::Shut => self.shut,
            Status::Float => self.floating,
            Status::Pull => self.pull,
        }
    }
}

/// Flags for every kind, indexed by ordinal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PropertyTable {
    entries: [PropertyFlags; KIND_COUNT],
}

impl PropertyTable {
    /// All kinds at their baseline.
    pub fn new() -> Self {
        let mut entries = [PropertyFlags::default(); KIND_COUNT];
        for kind in ObjectKind::ALL {
            entries[kind.index()] = PropertyFlags::baseline(kind);
        }
        PropertyTable { entries }
    }

    pub fn reset(&mut self) {
        *self = PropertyTable::new();
    }

    #[inline]
    pub fn get(&self, kind: ObjectKind) -> &PropertyFlags {
        &self.entries[kind.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, kind: ObjectKind) -> &mut PropertyFlags {
        &mut self.entries[kind.index()]
    }

    /// Physical kinds carrying `status`, in ordinal order. Used to list the
    /// rules in effect.
    pub fn kinds_with(&self, status: Status) -> Vec<ObjectKind> {
        ObjectKind::ALL
            .iter()
            .copied()
            .filter(|k| !k.is_word() && self.get(*k).has(status))
            .collect()
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        PropertyTable::new()
    }
}

/// Outgoing transformation edges of one kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TransformEdges {
    count: u8,
    targets: [ObjectKind; MAX_TRANSFORMS],
}

/// Outcome of trying to add an edge.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EdgeInsert {
    Added,
    SelfEdge,
    Duplicate,
    Full,
}

impl TransformEdges {
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn targets(&self) -> &[ObjectKind] {
        &self.targets[..self.len()]
    }

    /// First target: the one chains are followed through.
    pub fn primary(&self) -> Option<ObjectKind> {
        self.targets().first().copied()
    }

    /// Add `target` unless it is `owner` itself, already present, or the
    /// set is full. None of those is an error.
    pub fn insert(&mut self, owner: ObjectKind, target: ObjectKind) -> EdgeInsert {
        if target == owner {
            return EdgeInsert::SelfEdge;
        }
        if self.targets().contains(&target) {
            return EdgeInsert::Duplicate;
        }
        if self.len() >= MAX_TRANSFORMS {
            return EdgeInsert::Full;
        }
        self.targets[self.len()] = target;
        self.count += 1;
        EdgeInsert::Added
    }
}

/// Edges for every kind, indexed by ordinal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransformTable {
    entries: [TransformEdges; KIND_COUNT],
}

impl TransformTable {
    pub fn new() -> Self {
        TransformTable { entries: [TransformEdges::default(); KIND_COUNT] }
    }

    pub fn reset(&mut self) {
        *self = TransformTable::new();
    }

    #[inline]
    pub fn get(&self, kind: ObjectKind) -> &TransformEdges {
        &self.entries[kind.index()]
    }

    pub fn insert(&mut self, from: ObjectKind, to: ObjectKind) -> EdgeInsert {
        self.entries[from.index()].insert(from, to)
    }

    /// Does any kind have an outgoing edge?
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(TransformEdges::is_empty)
    }
}

impl Default for TransformTable {
    fn default() -> Self {
        TransformTable::new()
    }
}
