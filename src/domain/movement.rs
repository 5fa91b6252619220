/// Movement engine: movers, push chains, swap, pull, and the
/// post-movement interaction pass.
///
/// ## Per-mover resolution (first match wins)
/// ┌───────────────────────────────────────────┬────────────────────────────┐
/// │ Condition at destination D                 │ Result                     │
/// ├───────────────────────────────────────────┼────────────────────────────┤
/// │ D off the board or outside play area       │ refused                    │
/// │ D holds a SWAP object                      │ movers ⇄ SWAP objects      │
/// │ D holds a STOP object                      │ refused                    │
/// │ push chain from D hits a STOP cell         │ refused                    │
/// │ push chain non-empty, no room past its end │ refused                    │
/// │ otherwise                                  │ chain shifts, movers enter │
/// └───────────────────────────────────────────┴────────────────────────────┘
/// None of these checks look at FLOAT: layers only matter for interactions.
///
/// ## Push chain
///
/// Starting at D, a cell joins the chain while it is non-empty, holds a
/// PUSH object and holds no STOP object. The first empty or non-PUSH cell
/// ends it (and may be entered, sharing the tile). Chains move tail first.
///
/// ## Interactions (per cell, per FLOAT layer)
/// ┌──────────────────────────┬────────────────────────────────────┐
/// │ Present on the layer      │ Effect                             │
/// ├──────────────────────────┼────────────────────────────────────┤
/// │ YOU + WIN                 │ level won                          │
/// │ YOU + KILL                │ YOU objects of the layer destroyed │
/// │ SINK, 2+ objects          │ every object of the layer destroyed│
/// │ HOT + MELT                │ MELT objects destroyed             │
/// │ OPEN + SHUT               │ OPEN and SHUT objects destroyed    │
/// └──────────────────────────┴────────────────────────────────────┘
/// Death is global: the step is lost only when no YOU object is left
/// anywhere on the board.

use super::board::{Board, Direction, Object};
use super::kind::ObjectKind;
use super::props::{PropertyFlags, PropertyTable, TransformTable};
use super::transform;

/// Result flags of one step.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StepOutcome {
    pub has_won: bool,
    pub has_died: bool,
}

/// Something the engine did that a presentation layer may care about.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    Swapped { x: usize, y: usize },
    YouDestroyed { x: usize, y: usize },
    Sank { x: usize, y: usize },
    Melted { x: usize, y: usize },
    Opened { x: usize, y: usize },
}

/// Which objects a movement pass moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MoverClass {
    Auto, // MOVE
    You,  // YOU
}

impl MoverClass {
    #[inline]
    fn matches(self, p: &PropertyFlags) -> bool {
        match self {
            MoverClass::Auto => p.moves,
            MoverClass::You => p.you,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Moved {
    Refused,
    Walked,
    Swapped,
}

// ══════════════════════════════════════════════════════════════
// Entry points
// ══════════════════════════════════════════════════════════════

/// Full step with the tables as given: transform, move, interact.
pub fn step(
    board: &mut Board,
    props: &PropertyTable,
    transforms: &TransformTable,
    dir: Option<Direction>,
) -> StepOutcome {
    let mut effects = Vec::new();
    advance(board, props, transforms, dir, &mut effects);
    interact(board, props, &mut effects)
}

/// Transform, then move MOVE objects, then YOU objects.
/// `dir == None` applies the transformations only.
/// Returns the number of objects the transformation touched.
pub fn advance(
    board: &mut Board,
    props: &PropertyTable,
    transforms: &TransformTable,
    dir: Option<Direction>,
    effects: &mut Vec<Effect>,
) -> usize {
    let transformed = transform::apply(board, transforms);

    if let Some(dir) = dir {
        move_pass(board, props, MoverClass::Auto, dir, effects);
        move_pass(board, props, MoverClass::You, dir, effects);
    }
    transformed
}

/// Post-movement interactions plus the global win/death check.
pub fn interact(board: &mut Board, props: &PropertyTable, effects: &mut Vec<Effect>) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    for y in 0..board.height {
        for x in 0..board.width {
            for layer in [false, true] {
                if interact_layer(board, props, x, y, layer, effects) {
                    outcome.has_won = true;
                }
            }
        }
    }

    outcome.has_died = board.count_where(|k| props.get(k).you) == 0;
    outcome
}

// ══════════════════════════════════════════════════════════════
// Movement passes
// ══════════════════════════════════════════════════════════════

/// Per-cell count of mover objects that already moved during this pass.
/// Arrivals are always appended, so in any cell the objects that have
/// not moved yet come before the ones that have.
struct Arrivals {
    width: usize,
    counts: Vec<usize>,
}

impl Arrivals {
    fn new(board: &Board) -> Self {
        Arrivals { width: board.width, counts: vec![0; board.width * board.height] }
    }

    fn get(&self, x: usize, y: usize) -> usize {
        self.counts[y * self.width + x]
    }

    fn add(&mut self, x: usize, y: usize, n: usize) {
        self.counts[y * self.width + x] += n;
    }

    fn sub(&mut self, x: usize, y: usize, n: usize) {
        let c = &mut self.counts[y * self.width + x];
        *c = c.saturating_sub(n);
    }
}

fn mover_count(board: &Board, props: &PropertyTable, class: MoverClass, x: usize, y: usize) -> usize {
    board.cell(x, y).kinds().filter(|k| class.matches(props.get(*k))).count()
}

/// Movers at `(x, y)` that have not moved yet this pass.
fn pending_movers(board: &Board, props: &PropertyTable, class: MoverClass, arrivals: &Arrivals, x: usize, y: usize) -> usize {
    mover_count(board, props, class, x, y).saturating_sub(arrivals.get(x, y))
}

fn move_pass(board: &mut Board, props: &PropertyTable, class: MoverClass, dir: Direction, effects: &mut Vec<Effect>) {
    // Snapshot first: a mover reached later in the scan is not moved twice.
    let movers = board.positions_where(|k| class.matches(props.get(k)));
    let mut arrivals = Arrivals::new(board);

    for (x, y) in movers {
        let moved = try_move(board, props, class, &mut arrivals, x, y, dir);
        if moved == Moved::Swapped {
            effects.push(Effect::Swapped { x, y });
        }
        if class != MoverClass::You {
            continue;
        }
        match moved {
            Moved::Walked => {
                if let Some((bx, by)) = board.neighbor(x, y, dir.reverse()) {
                    pull_into(board, props, class, &mut arrivals, (bx, by), (x, y));
                }
            }
            Moved::Swapped => {
                if let Some(dest) = board.neighbor(x, y, dir) {
                    pull_into(board, props, class, &mut arrivals, (x, y), dest);
                }
            }
            Moved::Refused => {}
        }
    }
}

/// Resolve one mover cell. See the table at the top of this file.
fn try_move(
    board: &mut Board,
    props: &PropertyTable,
    class: MoverClass,
    arrivals: &mut Arrivals,
    x: usize,
    y: usize,
    dir: Direction,
) -> Moved {
    let pending = pending_movers(board, props, class, arrivals, x, y);
    if pending == 0 {
        return Moved::Refused;
    }
    let Some((nx, ny)) = board.neighbor(x, y, dir) else { return Moved::Refused };

    // ── Swap ──
    if board.cell(nx, ny).kinds().any(|k| props.get(k).swap) {
        let movers = take_movers(board, props, class, x, y, pending);
        let (swappers, swapped_movers) =
            take_tracked(board, props, class, arrivals, nx, ny, |k| props.get(k).swap);
        board.cell_mut(nx, ny).objects.extend(movers);
        board.cell_mut(x, y).objects.extend(swappers);
        arrivals.add(nx, ny, pending);
        arrivals.add(x, y, swapped_movers);
        return Moved::Swapped;
    }

    // ── Blocked ──
    if board.cell(nx, ny).kinds().any(|k| props.get(k).stop) {
        return Moved::Refused;
    }

    // ── Push chain ──
    let Some(chain) = build_chain(board, props, nx, ny, dir) else { return Moved::Refused };
    for &(cx, cy) in chain.iter().rev() {
        shift_pushables(board, props, class, arrivals, cx, cy, dir);
    }

    // ── Mover ──
    let movers = take_movers(board, props, class, x, y, pending);
    board.cell_mut(nx, ny).objects.extend(movers);
    arrivals.add(nx, ny, pending);
    Moved::Walked
}

/// Cells that must move for a mover to enter `(sx, sy)`, nearest first.
/// `None` when the move is impossible: a STOP cell in the way, or no room
/// past the last pushable cell.
fn build_chain(board: &Board, props: &PropertyTable, sx: usize, sy: usize, dir: Direction) -> Option<Vec<(usize, usize)>> {
    let mut chain = Vec::new();
    let mut cur = Some((sx, sy));

    while let Some((cx, cy)) = cur {
        let cell = board.cell(cx, cy);
        if cell.is_empty() { break; }
        if cell.kinds().any(|k| props.get(k).stop) { return None; }
        if !cell.kinds().any(|k| props.get(k).push) { break; }
        chain.push((cx, cy));
        cur = board.neighbor(cx, cy, dir);
    }

    if !chain.is_empty() && cur.is_none() {
        return None;
    }
    Some(chain)
}

/// Move every PUSH object at `(x, y)` one cell along `dir`. The caller has
/// checked the destination exists.
fn shift_pushables(
    board: &mut Board,
    props: &PropertyTable,
    class: MoverClass,
    arrivals: &mut Arrivals,
    x: usize,
    y: usize,
    dir: Direction,
) {
    let Some((tx, ty)) = board.neighbor(x, y, dir) else { return };
    let (moving, pushed_movers) = take_tracked(board, props, class, arrivals, x, y, |k| props.get(k).push);
    board.cell_mut(tx, ty).objects.extend(moving);
    arrivals.add(tx, ty, pushed_movers);
}

/// Take the objects matching `pred` from `(x, y)`, keeping the cell's
/// arrival count exact: it drops by the number of already-moved movers
/// that leave. Returns the objects and how many of them are movers.
fn take_tracked(
    board: &mut Board,
    props: &PropertyTable,
    class: MoverClass,
    arrivals: &mut Arrivals,
    x: usize,
    y: usize,
    pred: impl Fn(ObjectKind) -> bool,
) -> (Vec<Object>, usize) {
    // Movers from this index on (in stack order) have already moved.
    let first_arrived = mover_count(board, props, class, x, y).saturating_sub(arrivals.get(x, y));
    let mut seen = 0;
    let mut arrived_taken = 0;
    let taken = board.cell_mut(x, y).take_where(|k| {
        let is_mover = class.matches(props.get(k));
        let arrived = is_mover && seen >= first_arrived;
        if is_mover {
            seen += 1;
        }
        let take = pred(k);
        if take && arrived {
            arrived_taken += 1;
        }
        take
    });
    arrivals.sub(x, y, arrived_taken);
    let movers = taken.iter().filter(|o| class.matches(props.get(o.kind))).count();
    (taken, movers)
}

/// Take the first `n` mover objects from `(x, y)`, in stack order.
fn take_movers(board: &mut Board, props: &PropertyTable, class: MoverClass, x: usize, y: usize, n: usize) -> Vec<Object> {
    let mut left = n;
    board.cell_mut(x, y).take_where(|k| {
        if left > 0 && class.matches(props.get(k)) {
            left -= 1;
            true
        } else {
            false
        }
    })
}

/// Move every PULL object from `from` into `to`. Pulled movers count as moved.
fn pull_into(
    board: &mut Board,
    props: &PropertyTable,
    class: MoverClass,
    arrivals: &mut Arrivals,
    from: (usize, usize),
    to: (usize, usize),
) {
    let (pulled, pulled_movers) =
        take_tracked(board, props, class, arrivals, from.0, from.1, |k| props.get(k).pull);
    board.cell_mut(to.0, to.1).objects.extend(pulled);
    arrivals.add(to.0, to.1, pulled_movers);
}

// ══════════════════════════════════════════════════════════════
// Interactions
// ══════════════════════════════════════════════════════════════

/// Presence flags of one layer of one cell.
#[derive(Default)]
struct LayerView {
    count: usize,
    you: bool,
    win: bool,
    kill: bool,
    sink: bool,
    hot: bool,
    melt: bool,
    open: bool,
    shut: bool,
}

fn layer_view(board: &Board, props: &PropertyTable, x: usize, y: usize, layer: bool) -> LayerView {
    let mut v = LayerView::default();
    for kind in board.cell(x, y).kinds() {
        let p = props.get(kind);
        if p.floating != layer { continue; }
        v.count += 1;
        v.you |= p.you;
        v.win |= p.win;
        v.kill |= p.kill;
        v.sink |= p.sink;
        v.hot |= p.hot;
        v.melt |= p.melt;
        v.open |= p.open;
        v.shut |= p.shut;
    }
    v
}

/// Does some layer of `(x, y)` hold both a YOU and a WIN object?
pub fn wins_at(board: &Board, props: &PropertyTable, x: usize, y: usize) -> bool {
    [false, true].into_iter().any(|layer| {
        let v = layer_view(board, props, x, y, layer);
        v.you && v.win
    })
}

/// Apply one layer's interactions. Returns true on YOU + WIN.
fn interact_layer(
    board: &mut Board,
    props: &PropertyTable,
    x: usize,
    y: usize,
    layer: bool,
    effects: &mut Vec<Effect>,
) -> bool {
    let v = layer_view(board, props, x, y, layer);
    if v.count == 0 {
        return false;
    }
    let on_layer = |k: ObjectKind| props.get(k).floating == layer;
    let cell = board.cell_mut(x, y);

    let won = v.you && v.win;

    if v.you && v.kill {
        cell.take_where(|k| on_layer(k) && props.get(k).you);
        effects.push(Effect::YouDestroyed { x, y });
    }
    // Counted after KILL: a lone SINK object left behind survives.
    if v.sink && cell.kinds().filter(|k| on_layer(*k)).count() > 1 {
        cell.take_where(on_layer);
        effects.push(Effect::Sank { x, y });
    }
    if v.hot && v.melt && !cell.take_where(|k| on_layer(k) && props.get(k).melt).is_empty() {
        effects.push(Effect::Melted { x, y });
    }
    if v.open && v.shut
        && !cell.take_where(|k| on_layer(k) && (props.get(k).open || props.get(k).shut)).is_empty()
    {
        effects.push(Effect::Opened { x, y });
    }

    won
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
