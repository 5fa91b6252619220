/// Rule parser: reads sentences off the board.
///
/// Pure function of the board. Rebuilds the property and transform
/// tables from scratch; no memory of the previous step.
///
/// ## Grammar
///
///   SENTENCE  := SUBJECTS IS PREDICATES
///   SUBJECTS  := NOUN (AND NOUN)*
///   PREDICATES:= PRED (AND PRED)*        PRED := STATUS | NOUN
///
/// ## Token stream (per row, per column)
/// ┌──────────────────────────────────────┬──────────────┐
/// │ Cell content                          │ Token        │
/// ├──────────────────────────────────────┼──────────────┤
/// │ has a word object                     │ first word   │
/// │ empty, or physical objects only       │ gap          │
/// └──────────────────────────────────────┴──────────────┘
/// Gaps split the stream into runs; runs shorter than 3 are dropped.
///
/// ## Effect of one sentence
/// ┌──────────────────────┬──────────────────────────────────────┐
/// │ Predicate             │ Effect on each subject noun N         │
/// ├──────────────────────┼──────────────────────────────────────┤
/// │ status word S         │ props[N].S = true                     │
/// │ noun M, M == N        │ nothing (no self edge)                │
/// │ noun M, already edge  │ nothing (no duplicate)                │
/// │ noun M, 3 edges       │ nothing (capacity)                    │
/// │ noun M otherwise      │ edge N → M                            │
/// └──────────────────────┴──────────────────────────────────────┘
///
/// Rows and columns are scanned independently and their effects add up.
/// Sentences sharing a word are all evaluated; none takes precedence.

use super::board::Board;
use super::kind::ObjectKind;
use super::props::{PropertyTable, TransformTable};

/// Shortest run that can hold a sentence.
const MIN_SENTENCE: usize = 3;

/// Parse `board` into fresh tables.
pub fn parse(board: &Board) -> (PropertyTable, TransformTable) {
    let mut props = PropertyTable::new();
    let mut transforms = TransformTable::new();
    parse_into(board, &mut props, &mut transforms);
    (props, transforms)
}

/// Parse `board` into existing tables, resetting them first.
pub fn parse_into(board: &Board, props: &mut PropertyTable, transforms: &mut TransformTable) {
    props.reset();
    transforms.reset();

    let mut rules = 0usize;

    for y in 0..board.height {
        let line: Vec<Option<ObjectKind>> = (0..board.width).map(|x| token_at(board, x, y)).collect();
        rules += scan_line(&line, props, transforms);
    }
    for x in 0..board.width {
        let line: Vec<Option<ObjectKind>> = (0..board.height).map(|y| token_at(board, x, y)).collect();
        rules += scan_line(&line, props, transforms);
    }

    log::trace!("parsed {rules} rule(s)");
}

/// The token a cell contributes: its first word object, or a gap.
fn token_at(board: &Board, x: usize, y: usize) -> Option<ObjectKind> {
    board.cell(x, y).kinds().find(|k| k.is_word())
}

/// Split a line at gaps and evaluate every run. Returns the number of
/// (subject, predicate) pairs applied.
fn scan_line(line: &[Option<ObjectKind>], props: &mut PropertyTable, transforms: &mut TransformTable) -> usize {
    let mut applied = 0;
    let mut run: Vec<ObjectKind> = Vec::new();
    for token in line.iter().copied().chain(std::iter::once(None)) {
        match token {
            Some(word) => run.push(word),
            None => {
                if run.len() >= MIN_SENTENCE {
                    applied += scan_run(&run, props, transforms);
                }
                run.clear();
            }
        }
    }
    applied
}

/// Evaluate every IS in one gap-free run.
fn scan_run(run: &[ObjectKind], props: &mut PropertyTable, transforms: &mut TransformTable) -> usize {
    let mut applied = 0;
    for p in 0..run.len() {
        if run[p] != ObjectKind::TextIs { continue; }
        let subjects = collect_backward(run, p);
        let predicates = collect_forward(run, p);
        for &subject in &subjects {
            for &predicate in &predicates {
                apply_rule(subject, predicate, props, transforms);
                applied += 1;
            }
        }
    }
    applied
}

/// Nouns left of `run[is_pos]`: `N (AND N)*` read right to left.
fn collect_backward(run: &[ObjectKind], is_pos: usize) -> Vec<ObjectKind> {
    let mut out = Vec::new();
    let mut i = is_pos;
    while i > 0 && run[i - 1].is_subject_word() {
        out.push(run[i - 1]);
        // Need "NOUN AND" further left to continue.
        if i >= 3 && run[i - 2] == ObjectKind::TextAnd {
            i -= 2;
        } else {
            break;
        }
    }
    out
}

/// Predicates right of `run[is_pos]`: `P (AND P)*`.
fn collect_forward(run: &[ObjectKind], is_pos: usize) -> Vec<ObjectKind> {
    let mut out = Vec::new();
    let mut i = is_pos + 1;
    while i < run.len() && run[i].is_predicate_word() {
        out.push(run[i]);
        if i + 2 < run.len() && run[i + 1] == ObjectKind::TextAnd {
            i += 2;
        } else {
            break;
        }
    }
    out
}

/// Apply one `subject IS predicate` pair.
fn apply_rule(subject: ObjectKind, predicate: ObjectKind, props: &mut PropertyTable, transforms: &mut TransformTable) {
    let Some(noun) = subject.noun() else { return };

    if let Some(status) = predicate.status() {
        props.get_mut(noun).set(status);
    } else if let Some(target) = predicate.noun() {
        transforms.insert(noun, target);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kind::ObjectKind::*;
    use crate::domain::props::PropertyFlags;

    /// Helper: one horizontal line of words at row 0, `None` = empty cell.
    fn row(words: &[Option<ObjectKind>]) -> Board {
        let mut b = Board::new(words.len(), 1);
        for (x, w) in words.iter().enumerate() {
            if let Some(k) = w {
                b.push(x, 0, *k);
            }
        }
        b
    }

    fn words(kinds: &[ObjectKind]) -> Board {
        row(&kinds.iter().map(|k| Some(*k)).collect::<Vec<_>>())
    }

    // ── Basic sentences ──

    #[test]
    fn simple_status() {
        let (p, t) = parse(&words(&[TextBaba, TextIs, TextYou]));
        assert!(p.get(Baba).you);
        assert!(!p.get(Baba).push);
        assert!(t.is_empty());
    }

    #[test]
    fn no_sentences_gives_baseline() {
        let (p, t) = parse(&words(&[TextBaba, TextRock, TextYou]));
        assert_eq!(p, PropertyTable::new());
        assert!(t.is_empty());
        assert!(p.get(TextBaba).push && p.get(TextBaba).floating);
    }

    #[test]
    fn multiple_predicates() {
        let (p, _) = parse(&words(&[TextBaba, TextIs, TextYou, TextAnd, TextWin]));
        assert!(p.get(Baba).you);
        assert!(p.get(Baba).win);
    }

    #[test]
    fn multiple_subjects() {
        let (p, _) = parse(&words(&[TextRock, TextAnd, TextWall, TextAnd, TextBox, TextIs, TextPush]));
        assert!(p.get(Rock).push);
        assert!(p.get(Wall).push);
        assert!(p.get(Box).push);
    }

    #[test]
    fn subjects_cross_predicates() {
        let (p, t) = parse(&words(&[TextRock, TextAnd, TextKey, TextIs, TextStop, TextAnd, TextFlag]));
        for k in [Rock, Key] {
            assert!(p.get(k).stop);
            assert_eq!(t.get(k).targets(), &[Flag]);
        }
    }

    #[test]
    fn vertical_sentence() {
        let mut b = Board::new(1, 3);
        b.push(0, 0, TextLava);
        b.push(0, 1, TextIs);
        b.push(0, 2, TextHot);
        let (p, _) = parse(&b);
        assert!(p.get(Lava).hot);
    }

    #[test]
    fn horizontal_and_vertical_add_up() {
        // WALL IS STOP across, WALL IS PUSH down, sharing the WALL word.
        let mut b = Board::new(3, 3);
        b.push(0, 0, TextWall);
        b.push(1, 0, TextIs);
        b.push(2, 0, TextStop);
        b.push(0, 1, TextIs);
        b.push(0, 2, TextPush);
        let (p, _) = parse(&b);
        assert!(p.get(Wall).stop);
        assert!(p.get(Wall).push);
    }

    #[test]
    fn float_word_sets_floating() {
        let (p, _) = parse(&words(&[TextFlag, TextIs, TextFloat]));
        assert!(p.get(Flag).floating);
    }

    // ── Incomplete / malformed ──

    #[test]
    fn gap_breaks_sentence() {
        let (p, _) = parse(&row(&[Some(TextBaba), None, Some(TextIs), Some(TextYou)]));
        assert!(!p.get(Baba).you);
    }

    #[test]
    fn physical_object_is_a_gap() {
        let mut b = words(&[TextBaba, TextIs, TextYou]);
        *b.cell_mut(1, 0) = Default::default();
        b.push(1, 0, Rock);
        let (p, _) = parse(&b);
        assert!(!p.get(Baba).you);
    }

    #[test]
    fn word_under_physical_object_still_reads() {
        let mut b = Board::new(3, 1);
        b.push(0, 0, TextBaba);
        b.push(1, 0, Baba);
        b.push(1, 0, TextIs);
        b.push(2, 0, TextYou);
        let (p, _) = parse(&b);
        assert!(p.get(Baba).you);
    }

    #[test]
    fn is_without_subject_or_predicate() {
        let (p, t) = parse(&words(&[TextIs, TextIs, TextYou]));
        assert_eq!(p, PropertyTable::new());
        assert!(t.is_empty());
        let (p, _) = parse(&words(&[TextBaba, TextIs, TextIs]));
        assert!(!p.get(Baba).you);
    }

    #[test]
    fn status_word_cannot_be_subject() {
        let (p, _) = parse(&words(&[TextYou, TextIs, TextWin]));
        assert_eq!(p, PropertyTable::new());
    }

    #[test]
    fn dangling_and_is_ignored() {
        let (p, _) = parse(&words(&[TextAnd, TextBaba, TextIs, TextYou, TextAnd]));
        assert!(p.get(Baba).you);
        let (p, _) = parse(&words(&[TextBaba, TextIs, TextYou, TextAnd, TextIs]));
        assert!(p.get(Baba).you);
    }

    #[test]
    fn double_and_stops_the_list() {
        let (p, _) = parse(&words(&[TextBaba, TextIs, TextYou, TextAnd, TextAnd, TextWin]));
        assert!(p.get(Baba).you);
        assert!(!p.get(Baba).win);
    }

    #[test]
    fn chained_is_shares_middle_word() {
        // ROCK IS FLAG IS WIN: ROCK→FLAG and FLAG IS WIN.
        let (p, t) = parse(&words(&[TextRock, TextIs, TextFlag, TextIs, TextWin]));
        assert_eq!(t.get(Rock).targets(), &[Flag]);
        assert!(p.get(Flag).win);
        assert!(!p.get(Rock).win);
    }

    // ── Transformations ──

    #[test]
    fn noun_is_noun_registers_edge() {
        let (_, t) = parse(&words(&[TextRock, TextIs, TextWall, TextAnd, TextFlag]));
        assert_eq!(t.get(Rock).targets(), &[Wall, Flag]);
    }

    #[test]
    fn self_transform_ignored() {
        let (_, t) = parse(&words(&[TextRock, TextIs, TextRock]));
        assert!(t.get(Rock).is_empty());
    }

    #[test]
    fn fourth_target_dropped() {
        let (_, t) = parse(&words(&[
            TextRock, TextIs, TextWall, TextAnd, TextFlag, TextAnd, TextKey, TextAnd, TextDoor,
        ]));
        assert_eq!(t.get(Rock).targets(), &[Wall, Flag, Key]);
    }

    #[test]
    fn duplicate_rule_from_both_axes_counts_once() {
        let mut b = Board::new(3, 3);
        b.push(0, 0, TextRock);
        b.push(1, 0, TextIs);
        b.push(2, 0, TextFlag);
        b.push(0, 1, TextIs);
        b.push(0, 2, TextFlag);
        let (_, t) = parse(&b);
        assert_eq!(t.get(Rock).targets(), &[Flag]);
    }

    #[test]
    fn empty_noun() {
        let (_, t) = parse(&words(&[TextEmpty, TextIs, TextRock]));
        assert_eq!(t.get(Empty).targets(), &[Rock]);
    }

    // ── Idempotence ──

    #[test]
    fn parse_into_resets_previous_tables() {
        let mut p = PropertyTable::new();
        let mut t = TransformTable::new();
        parse_into(&words(&[TextBaba, TextIs, TextKey]), &mut p, &mut t);
        assert_eq!(t.get(Baba).targets(), &[Key]);
        parse_into(&words(&[TextBaba, TextIs, TextYou]), &mut p, &mut t);
        assert!(t.is_empty());
        assert!(p.get(Baba).you);
        assert_eq!(*p.get(Key), PropertyFlags::default());
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        fn any_board() -> impl Strategy<Value = Board> {
            (1usize..7, 1usize..7).prop_flat_map(|(w, h)| {
                prop::collection::vec(
                    prop::option::weighted(0.7, (0..crate::domain::kind::KIND_COUNT).prop_map(|i| {
                        ObjectKind::from_index(i).unwrap_or(Empty)
                    })),
                    w * h,
                )
                .prop_map(move |cells| {
                    let mut b = Board::new(w, h);
                    for (i, c) in cells.into_iter().enumerate() {
                        if let Some(k) = c {
                            b.push(i % w, i / w, k);
                        }
                    }
                    b
                })
            })
        }

        proptest! {
            #[test]
            fn parsing_twice_gives_identical_tables(board in any_board()) {
                let first = parse(&board);
                let second = parse(&board);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn words_keep_baseline(board in any_board()) {
                let (p, _) = parse(&board);
                for k in ObjectKind::ALL.iter().copied().filter(|k| k.is_word()) {
                    prop_assert!(p.get(k).push && p.get(k).floating);
                }
            }

            #[test]
            fn no_self_or_duplicate_edges(board in any_board()) {
                let (_, t) = parse(&board);
                for k in ObjectKind::ALL {
                    let targets = t.get(k).targets();
                    prop_assert!(!targets.contains(&k));
                    for (i, a) in targets.iter().enumerate() {
                        prop_assert!(!targets[i + 1..].contains(a));
                    }
                }
            }
        }
    }
}
