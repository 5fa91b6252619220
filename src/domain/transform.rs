/// Transform resolver: rewrites object kinds according to `X IS Y` rules.
///
/// ## Chains and cycles
///
/// Chains follow the primary (first) edge only: ROCK→WALL→FLAG turns a
/// rock into a flag. The walk marks visited kinds; reaching one twice is
/// a cycle, and a cyclic rule set leaves the object as it was. The walk
/// is bounded by the number of kinds, so it always terminates.
///
/// ## Multi-target rules
///
/// ROCK IS WALL AND ROCK IS FLAG: the rock becomes the resolved primary
/// target and one extra object per secondary edge is added to the cell.
///
/// ## EMPTY IS X
///
/// After the rewrite pass, every cell with no objects gets one X.
///
/// ## X IS EMPTY
///
/// An object whose rule resolves to EMPTY is removed, so its cell can be
/// filled by EMPTY IS X like any other unoccupied cell.

use super::board::{Board, Object};
use super::kind::{ObjectKind, KIND_COUNT};
use super::props::TransformTable;

/// Follow primary edges from `start`. Returns the last kind without an
/// outgoing edge, or `start` when the walk hits a cycle.
pub fn resolve_chain(transforms: &TransformTable, start: ObjectKind) -> ObjectKind {
    let mut visited = [false; KIND_COUNT];
    let mut cur = start;
    loop {
        if visited[cur.index()] {
            return start;
        }
        visited[cur.index()] = true;
        match transforms.get(cur).primary() {
            Some(next) => cur = next,
            None => return cur,
        }
    }
}

/// Apply every transformation to `board` in place. Returns the number of
/// objects whose kind changed or that were created.
pub fn apply(board: &mut Board, transforms: &TransformTable) -> usize {
    if transforms.is_empty() {
        return 0;
    }

    let mut changed = 0;

    for cell in board.cells_mut() {
        let mut extra: Vec<Object> = Vec::new();
        for obj in cell.objects.iter_mut() {
            let edges = transforms.get(obj.kind);
            if edges.is_empty() { continue; }

            let resolved = resolve_chain(transforms, obj.kind);
            if resolved != obj.kind {
                changed += 1;
            }
            obj.kind = resolved;

            // Secondary targets are copied raw, not chain-resolved.
            // Open question: resolved copies would change ROCK IS WALL AND
            // FLAG + FLAG IS KEY levels.
            for &target in &edges.targets()[1..] {
                if target != ObjectKind::Empty {
                    extra.push(Object::new(target));
                }
            }
        }
        changed += extra.len();
        cell.objects.extend(extra);
        cell.objects.retain(|o| o.kind != ObjectKind::Empty);
    }

    let fill = resolve_chain(transforms, ObjectKind::Empty);
    if fill != ObjectKind::Empty {
        for cell in board.cells_mut() {
            if cell.is_empty() {
                cell.objects.push(Object::new(fill));
                changed += 1;
            }
        }
    }

    if changed > 0 {
        log::debug!("transformations touched {changed} object(s)");
    }
    changed
}
