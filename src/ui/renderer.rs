/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (array of Cell)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed, batched with
///      `queue!` and flushed once
///   4. Swap front/back
///
/// Each board cell takes two terminal columns and shows the top object of
/// its stack: physical kinds in lower case, words in upper case.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::kind::{ObjectKind, Status};
use crate::domain::movement;
use crate::domain::props::{PropertyTable, TransformTable};
use crate::sim::level;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };
    const WIN_BG: Color = Color::Rgb { r: 70, g: 60, b: 10 };
    const OFF_AREA_BG: Color = Color::Rgb { r: 10, g: 10, b: 14 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from every real cell, so the next flush repaints everything.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Glyphs ──

/// Two-column glyph and color for a kind.
fn glyph(kind: ObjectKind) -> (&'static str, Color) {
    use ObjectKind::*;
    match kind {
        Baba => ("ba", Color::White),
        Wall => ("##", Color::DarkGrey),
        Rock => ("ro", Color::DarkYellow),
        Flag => ("fl", Color::Yellow),
        Lava => ("~~", Color::Red),
        Goop => ("go", Color::DarkGreen),
        Love => ("<3", Color::Magenta),
        Empty => ("  ", Color::White),
        Key => ("ke", Color::Yellow),
        Door => ("do", Color::DarkRed),
        Water => ("~~", Color::Blue),
        Ice => ("ic", Color::Cyan),
        Box => ("bx", Color::DarkYellow),

        TextBaba => ("BA", Color::Magenta),
        TextWall => ("WA", Color::Grey),
        TextRock => ("RO", Color::DarkYellow),
        TextFlag => ("FL", Color::Yellow),
        TextLava => ("LA", Color::Red),
        TextGoop => ("GO", Color::DarkGreen),
        TextLove => ("LO", Color::Magenta),
        TextEmpty => ("EM", Color::Grey),
        TextKey => ("KE", Color::Yellow),
        TextDoor => ("DO", Color::DarkRed),
        TextWater => ("WT", Color::Blue),
        TextIce => ("IC", Color::Cyan),
        TextBox => ("BX", Color::DarkYellow),

        TextIs => ("IS", Color::White),
        TextAnd => ("&&", Color::White),

        TextYou => ("YO", Color::Magenta),
        TextWin => ("WI", Color::Yellow),
        TextStop => ("ST", Color::DarkGreen),
        TextPush => ("PU", Color::DarkYellow),
        TextSink => ("SI", Color::Blue),
        TextKill => ("KI", Color::Red),
        TextSwap => ("SW", Color::Cyan),
        TextHot => ("HO", Color::Red),
        TextMelt => ("ME", Color::Cyan),
        TextMove => ("MO", Color::Green),
        TextOpen => ("OP", Color::Yellow),
        TextShut => ("SH", Color::DarkRed),
        TextFloat => ("FT", Color::Cyan),
        TextPull => ("PL", Color::DarkYellow),
    }
}

/// Sentences currently in effect, e.g. `BABA IS YOU`, `ROCK IS FLAG`.
pub fn rule_lines(props: &PropertyTable, transforms: &TransformTable) -> Vec<String> {
    let mut lines = Vec::new();
    for status in STATUS_ORDER {
        for kind in props.kinds_with(status) {
            lines.push(format!("{} IS {}", kind.name().to_uppercase(), status.name()));
        }
    }
    for kind in ObjectKind::ALL.iter().copied().filter(|k| !k.is_word()) {
        for target in transforms.get(kind).targets() {
            lines.push(format!("{} IS {}", kind.name().to_uppercase(), target.name().to_uppercase()));
        }
    }
    lines
}

const STATUS_ORDER: [Status; 14] = [
    Status::You, Status::Win, Status::Stop, Status::Push, Status::Pull,
    Status::Move, Status::Swap, Status::Sink, Status::Kill, Status::Hot,
    Status::Melt, Status::Open, Status::Shut, Status::Float,
];

// ── Renderer ──

/// Each board cell = 2 terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        self.fit_terminal()?;
        self.front.clear();
        self.compose_hud(world);
        let below = self.compose_board(world);
        self.compose_footer(world, below + 1);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Track terminal size; a change forces a full repaint.
    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    // ── Compose ──

    fn compose_hud(&mut self, w: &WorldState) {
        let hud = format!(
            "WORDPUSH  Level {}/{}: {}   Moves: {}   Undo: {}",
            w.current_level + 1,
            level::count(),
            w.level_name,
            w.moves,
            w.undo_depth(),
        );
        self.front.put_str(MAP_COL, HUD_ROW, &hud, Color::White, Cell::BASE_BG);
    }

    /// Draw the board. Returns the first row below it.
    fn compose_board(&mut self, w: &WorldState) -> usize {
        let b = &w.board;
        for (x, y, cell) in b.iter_cells() {
            let bg = if !b.in_play_area(x, y) {
                Cell::OFF_AREA_BG
            } else if movement::wins_at(b, &w.props, x, y) {
                Cell::WIN_BG
            } else {
                Cell::BASE_BG
            };
            let (text, fg) = match cell.top() {
                Some(kind) => glyph(kind),
                None => (". ", Color::DarkGrey),
            };
            let col = MAP_COL + x * CELL_W;
            self.front.put_str(col, MAP_ROW + y, text, fg, bg);
        }
        MAP_ROW + b.height
    }

    fn compose_footer(&mut self, w: &WorldState, row: usize) {
        let rules = rule_lines(&w.props, &w.transforms);
        let rules = if rules.is_empty() { "(no rules)".to_string() } else { rules.join("  ·  ") };
        self.front.put_str(MAP_COL, row, &rules, Color::Grey, Cell::BASE_BG);

        let (msg, fg) = match w.phase {
            Phase::Playing => ("", Color::White),
            Phase::Won => ("Level clear!  [Enter] next level", Color::Yellow),
            Phase::Dead => ("Nothing is YOU.  [Z] undo  [R] restart", Color::Red),
            Phase::Complete => ("All levels complete!  [Q] quit", Color::Green),
        };
        self.front.put_str(MAP_COL, row + 2, msg, fg, Cell::BASE_BG);

        let help = "[Arrows/WASD] move  [Z/U] undo  [R] restart  [Q/Esc] quit";
        self.front.put_str(MAP_COL, row + 3, help, Color::DarkGrey, Cell::BASE_BG);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Board;
    use crate::domain::kind::ObjectKind::*;
    use crate::domain::rules;

    #[test]
    fn every_glyph_is_two_columns() {
        for k in ObjectKind::ALL {
            assert_eq!(glyph(k).0.chars().count(), CELL_W, "{k:?}");
        }
    }

    #[test]
    fn words_are_upper_case() {
        for k in ObjectKind::ALL.iter().copied().filter(|k| k.is_word()) {
            let g = glyph(k).0;
            assert_eq!(g, g.to_uppercase(), "{k:?}");
        }
    }

    #[test]
    fn rule_lines_list_statuses_then_transforms() {
        let mut b = Board::new(3, 3);
        for (x, k) in [TextBaba, TextIs, TextYou].into_iter().enumerate() {
            b.push(x, 0, k);
        }
        for (x, k) in [TextRock, TextIs, TextFlag].into_iter().enumerate() {
            b.push(x, 2, k);
        }
        let (p, t) = rules::parse(&b);
        assert_eq!(rule_lines(&p, &t), vec!["BABA IS YOU", "ROCK IS FLAG"]);
    }
}
