/// Board: a rectangular grid of cells, each an ordered stack of objects.
///
/// ## Coordinates
///
/// `(x, y)` with `0 <= x < width`, `0 <= y < height`, row-major storage.
/// `cell()` / `cell_mut()` index directly and expect in-bounds input;
/// anything that moves objects goes through `neighbor()`, which also
/// rejects cells outside the play area.
///
/// ## Play area
///
/// `play_min_* ..= play_max_*` is the sub-rectangle where movement and
/// interaction apply. Loaders compute it as the bounding box of the
/// occupied cells (`recompute_play_area`); the whole board when empty.

use super::kind::ObjectKind;

/// Movement direction requested for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// One object on the board. Identity is its kind; duplicates in a cell
/// are indistinguishable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Object {
    pub kind: ObjectKind,
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Object { kind }
    }
}

/// A stack of objects. Index 0 is the bottom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub objects: Vec<Object>,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ObjectKind> + '_ {
        self.objects.iter().map(|o| o.kind)
    }

    pub fn contains(&self, kind: ObjectKind) -> bool {
        self.kinds().any(|k| k == kind)
    }

    /// Topmost object, what a renderer draws last.
    pub fn top(&self) -> Option<ObjectKind> {
        self.objects.last().map(|o| o.kind)
    }

    /// Remove every object matching `pred`, returning them in stack order.
    pub fn take_where(&mut self, mut pred: impl FnMut(ObjectKind) -> bool) -> Vec<Object> {
        let mut taken = Vec::new();
        self.objects.retain(|o| {
            if pred(o.kind) {
                taken.push(*o);
                false
            } else {
                true
            }
        });
        taken
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    pub play_min_x: usize,
    pub play_min_y: usize,
    pub play_max_x: usize,
    pub play_max_y: usize,
}

// ── Construction ──

impl Board {
    /// Empty board; play area covers everything.
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            play_min_x: 0,
            play_min_y: 0,
            play_max_x: width.saturating_sub(1),
            play_max_y: height.saturating_sub(1),
        }
    }

    /// Build from a row-major kind table, one object per entry.
    /// `Empty` entries leave the cell empty. Extra or missing entries are
    /// ignored / left empty. The play area is recomputed.
    pub fn from_kinds(width: usize, height: usize, data: &[ObjectKind]) -> Self {
        let mut board = Board::new(width, height);
        for (i, &kind) in data.iter().take(width * height).enumerate() {
            if kind != ObjectKind::Empty {
                board.cells[i].objects.push(Object::new(kind));
            }
        }
        board.recompute_play_area();
        board
    }
}

// ── Queries ──

impl Board {
    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn in_play_area(&self, x: usize, y: usize) -> bool {
        x >= self.play_min_x && x <= self.play_max_x
            && y >= self.play_min_y && y <= self.play_max_y
    }

    /// The cell one step from `(x, y)` in `dir`, if it is on the board and
    /// inside the play area.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 {
            return None;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if self.in_bounds(nx, ny) && self.in_play_area(nx, ny) {
            Some((nx, ny))
        } else {
            None
        }
    }

    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[y * self.width + x]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        &mut self.cells[y * self.width + x]
    }

    /// All cells with their coordinates, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, c)| (i % w, i / w, c))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Kinds stacked at `(x, y)`, bottom first.
    pub fn kinds_at(&self, x: usize, y: usize) -> Vec<ObjectKind> {
        self.cell(x, y).kinds().collect()
    }

    /// Coordinates of every cell holding at least one object matching
    /// `pred`, row-major, each cell once.
    pub fn positions_where(&self, mut pred: impl FnMut(ObjectKind) -> bool) -> Vec<(usize, usize)> {
        self.iter_cells()
            .filter(|(_, _, c)| c.kinds().any(&mut pred))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Number of objects on the whole board matching `pred`.
    pub fn count_where(&self, mut pred: impl FnMut(ObjectKind) -> bool) -> usize {
        self.cells.iter().flat_map(|c| c.kinds()).filter(|k| pred(*k)).count()
    }
}

// ── Mutation ──

impl Board {
    /// Put an object on top of the stack at `(x, y)`.
    pub fn push(&mut self, x: usize, y: usize, kind: ObjectKind) {
        self.cell_mut(x, y).objects.push(Object::new(kind));
    }

    /// Shrink the play area to the bounding box of occupied cells.
    /// An empty board gets the full rectangle.
    pub fn recompute_play_area(&mut self) {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (x, y, cell) in self.iter_cells() {
            if cell.is_empty() { continue; }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        let (x0, y0, x1, y1) = bounds.unwrap_or((
            0,
            0,
            self.width.saturating_sub(1),
            self.height.saturating_sub(1),
        ));
        self.set_play_area(x0, y0, x1, y1);
    }

    /// Set the play area, clamped to the board.
    pub fn set_play_area(&mut self, min_x: usize, min_y: usize, max_x: usize, max_y: usize) {
        let last_x = self.width.saturating_sub(1);
        let last_y = self.height.saturating_sub(1);
        self.play_max_x = max_x.min(last_x);
        self.play_max_y = max_y.min(last_y);
        self.play_min_x = min_x.min(self.play_max_x);
        self.play_min_y = min_y.min(self.play_max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ObjectKind::*;

    #[test]
    fn from_kinds_skips_empty_and_bounds_play_area() {
        let b = Board::from_kinds(4, 3, &[
            Empty, Empty, Empty, Empty,
            Empty, Baba,  Rock,  Empty,
            Empty, Empty, Flag,  Empty,
        ]);
        assert!(b.cell(0, 0).is_empty());
        assert_eq!(b.kinds_at(1, 1), vec![Baba]);
        assert_eq!((b.play_min_x, b.play_min_y, b.play_max_x, b.play_max_y), (1, 1, 2, 2));
        assert!(b.in_play_area(2, 2));
        assert!(!b.in_play_area(3, 1));
    }

    #[test]
    fn empty_board_plays_everywhere() {
        let mut b = Board::new(3, 2);
        b.recompute_play_area();
        assert_eq!((b.play_min_x, b.play_min_y, b.play_max_x, b.play_max_y), (0, 0, 2, 1));
    }

    #[test]
    fn neighbor_respects_edges_and_play_area() {
        let mut b = Board::new(5, 5);
        assert_eq!(b.neighbor(0, 0, Direction::Left), None);
        assert_eq!(b.neighbor(0, 0, Direction::Up), None);
        assert_eq!(b.neighbor(4, 4, Direction::Right), None);
        assert_eq!(b.neighbor(2, 2, Direction::Down), Some((2, 3)));
        b.set_play_area(1, 1, 3, 3);
        assert_eq!(b.neighbor(3, 2, Direction::Right), None);
        assert_eq!(b.neighbor(2, 2, Direction::Right), Some((3, 2)));
    }

    #[test]
    fn set_play_area_clamps() {
        let mut b = Board::new(3, 3);
        b.set_play_area(5, 0, 99, 99);
        assert_eq!((b.play_min_x, b.play_max_x, b.play_max_y), (2, 2, 2));
    }

    #[test]
    fn take_where_keeps_order_of_rest() {
        let mut c = Cell::default();
        for k in [Rock, Baba, Flag, Baba] {
            c.objects.push(Object::new(k));
        }
        let taken = c.take_where(|k| k == Baba);
        assert_eq!(taken.len(), 2);
        assert_eq!(c.kinds().collect::<Vec<_>>(), vec![Rock, Flag]);
        assert_eq!(c.top(), Some(Flag));
    }

    #[test]
    fn positions_are_unique_per_cell() {
        let mut b = Board::new(3, 1);
        b.push(1, 0, Baba);
        b.push(1, 0, Baba);
        b.push(2, 0, Rock);
        assert_eq!(b.positions_where(|k| k == Baba), vec![(1, 0)]);
        assert_eq!(b.count_where(|k| k == Baba), 2);
    }
}
