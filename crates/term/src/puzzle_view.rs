//! PuzzleView: maps a [`PuzzleGame`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). Layout is a function of grid size, tray
//! occupancy and viewport only, so the same [`BoardLayout`] answers mouse hit
//! tests for whatever was last drawn.

use crate::core::{format_elapsed, Annotation, ImageStatus, Phase, Piece, PuzzleGame};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameMode, Rotation, VisualTheme};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Keyboard cursor position to highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMark {
    Cell(usize),
    Tray(usize),
}

/// Transient message shown on the bottom row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub error: bool,
}

/// Front-end state that is not part of the game
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub cursor: Option<CursorMark>,
    pub toast: Option<Toast>,
}

/// What a terminal coordinate points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Cell(usize),
    /// Inside the staging tray; the index is set when over a staged piece
    Tray(Option<usize>),
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Rgb,
    pub muted: Rgb,
    pub border: Rgb,
    pub board_bg: Rgb,
    pub piece_bg: Rgb,
    pub piece_fg: Rgb,
    pub correct_bg: Rgb,
    pub hint_bg: Rgb,
    pub armed_bg: Rgb,
    pub trapped_fg: Rgb,
    pub accent: Rgb,
    pub error: Rgb,
}

impl Palette {
    pub fn for_theme(theme: VisualTheme) -> Self {
        match theme {
            VisualTheme::Classic => Self {
                text: Rgb::new(220, 220, 220),
                muted: Rgb::new(110, 110, 120),
                border: Rgb::new(200, 200, 200),
                board_bg: Rgb::new(30, 30, 40),
                piece_bg: Rgb::new(70, 90, 140),
                piece_fg: Rgb::new(240, 240, 240),
                correct_bg: Rgb::new(40, 130, 70),
                hint_bg: Rgb::new(190, 160, 40),
                armed_bg: Rgb::new(160, 80, 200),
                trapped_fg: Rgb::new(255, 80, 80),
                accent: Rgb::new(255, 210, 90),
                error: Rgb::new(255, 90, 90),
            },
            VisualTheme::Dark => Self {
                text: Rgb::new(190, 190, 190),
                muted: Rgb::new(80, 80, 80),
                border: Rgb::new(120, 120, 120),
                board_bg: Rgb::new(12, 12, 14),
                piece_bg: Rgb::new(45, 45, 60),
                piece_fg: Rgb::new(210, 210, 210),
                correct_bg: Rgb::new(25, 80, 45),
                hint_bg: Rgb::new(120, 100, 20),
                armed_bg: Rgb::new(90, 50, 130),
                trapped_fg: Rgb::new(230, 60, 60),
                accent: Rgb::new(200, 170, 80),
                error: Rgb::new(230, 70, 70),
            },
            VisualTheme::Pastel => Self {
                text: Rgb::new(60, 60, 70),
                muted: Rgb::new(150, 150, 160),
                border: Rgb::new(120, 110, 140),
                board_bg: Rgb::new(245, 240, 250),
                piece_bg: Rgb::new(180, 200, 240),
                piece_fg: Rgb::new(40, 40, 60),
                correct_bg: Rgb::new(170, 225, 180),
                hint_bg: Rgb::new(250, 225, 150),
                armed_bg: Rgb::new(220, 180, 240),
                trapped_fg: Rgb::new(200, 40, 60),
                accent: Rgb::new(150, 90, 180),
                error: Rgb::new(200, 50, 60),
            },
        }
    }
}

/// Terminal cell width of one grid cell (one column is a gap)
const CELL_W: u16 = 6;
/// Width of one tray slot, e.g. `[12] `
const SLOT_W: u16 = 5;
const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 1;

/// Screen geometry for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub grid_size: u16,
    pub cell_w: u16,
    pub cell_h: u16,
    /// Top-left of the board interior
    pub board_x: u16,
    pub board_y: u16,
    /// Top-left of the first tray slot
    pub tray_x: u16,
    pub tray_y: u16,
    pub tray_cols: u16,
    pub tray_rows: u16,
    pub panel_x: u16,
}

impl BoardLayout {
    pub fn compute(grid_size: usize, tray_len: usize) -> Self {
        let grid_size = grid_size.max(1) as u16;
        let cell_h = if grid_size >= 5 { 2 } else { 3 };
        let inner_w = grid_size * CELL_W;
        let inner_h = grid_size * cell_h;
        let tray_cols = (inner_w / SLOT_W).max(1);
        let tray_rows = (tray_len as u16).div_ceil(tray_cols).max(1);
        Self {
            grid_size,
            cell_w: CELL_W,
            cell_h,
            board_x: BOARD_X + 1,
            board_y: BOARD_Y + 1,
            tray_x: BOARD_X + 1,
            // frame bottom, then the tray label row
            tray_y: BOARD_Y + inner_h + 3,
            tray_cols,
            tray_rows,
            panel_x: BOARD_X + inner_w + 5,
        }
    }

    pub fn inner_w(&self) -> u16 {
        self.grid_size * self.cell_w
    }

    pub fn inner_h(&self) -> u16 {
        self.grid_size * self.cell_h
    }

    pub fn cell_origin(&self, cell: usize) -> (u16, u16) {
        let row = cell as u16 / self.grid_size;
        let col = cell as u16 % self.grid_size;
        (self.board_x + col * self.cell_w, self.board_y + row * self.cell_h)
    }

    pub fn slot_origin(&self, index: usize) -> (u16, u16) {
        let index = index as u16;
        (
            self.tray_x + (index % self.tray_cols) * SLOT_W,
            self.tray_y + index / self.tray_cols,
        )
    }

    /// Resolve a terminal coordinate. `tray_len` bounds tray slot hits.
    pub fn hit_test(&self, x: u16, y: u16, tray_len: usize) -> Hit {
        if x >= self.board_x && x < self.board_x + self.inner_w() && y >= self.board_y && y < self.board_y + self.inner_h()
        {
            let col = (x - self.board_x) / self.cell_w;
            let row = (y - self.board_y) / self.cell_h;
            return Hit::Cell((row * self.grid_size + col) as usize);
        }

        // tray area includes its label row
        let tray_top = self.tray_y - 1;
        let tray_bottom = self.tray_y + self.tray_rows;
        if x >= self.tray_x && x < self.tray_x + self.inner_w() && y >= tray_top && y < tray_bottom {
            if y < self.tray_y {
                return Hit::Tray(None);
            }
            let col = (x - self.tray_x) / SLOT_W;
            let index = ((y - self.tray_y) * self.tray_cols + col) as usize;
            return Hit::Tray((col < self.tray_cols && index < tray_len).then_some(index));
        }

        Hit::Outside
    }
}

/// A lightweight terminal renderer for the puzzle.
pub struct PuzzleView {
    palette: Palette,
}

impl Default for PuzzleView {
    fn default() -> Self {
        Self::new(VisualTheme::Classic)
    }
}

impl PuzzleView {
    pub fn new(theme: VisualTheme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Layout for the game as it currently stands
    pub fn layout(&self, game: &PuzzleGame) -> BoardLayout {
        let staged = game.pieces().iter().filter(|p| p.slot.is_staging()).count();
        BoardLayout::compute(game.grid_size(), staged)
    }

    /// Render the game into an existing framebuffer.
    pub fn render_into(&self, game: &PuzzleGame, ui: &ViewState, viewport: Viewport, fb: &mut FrameBuffer) {
        let p = &self.palette;
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::colors(p.text, Rgb::new(0, 0, 0)).into_cell(' '));

        let layout = self.layout(game);
        let snap = game.snapshot();
        let annotations = game.annotations();

        fb.put_str(BOARD_X, 0, "tui-jigsaw", CellStyle::colors(p.accent, Rgb::new(0, 0, 0)).bold());

        // Board frame and empty cells.
        let border = CellStyle::colors(p.border, Rgb::new(0, 0, 0));
        fb.draw_box(BOARD_X, BOARD_Y, layout.inner_w() + 2, layout.inner_h() + 2, border);
        let board = CellStyle::colors(p.muted, p.board_bg);
        fb.fill_rect(layout.board_x, layout.board_y, layout.inner_w(), layout.inner_h(), ' ', board);
        for cell in 0..(layout.grid_size * layout.grid_size) as usize {
            let (x, y) = layout.cell_origin(cell);
            fb.put_char(x + (layout.cell_w - 1) / 2, y + (layout.cell_h - 1) / 2, '·', board);
        }

        // Pieces on the grid, bottom to top.
        for id in game.render_order() {
            let Some((piece, ann)) = find(game.pieces(), &annotations, id) else {
                continue;
            };
            if let Some(cell) = piece.slot.cell() {
                self.draw_grid_piece(fb, &layout, cell, piece, ann, snap.rotation_rule);
            }
        }

        if let Some(cell) = snap.hover_cell {
            let (x, y) = layout.cell_origin(cell);
            let marker = CellStyle::colors(p.accent, p.board_bg).bold();
            fb.put_char(x + layout.cell_w - 1, y, '◆', marker);
        }

        if let Some(CursorMark::Cell(cell)) = ui.cursor {
            let (x, y) = layout.cell_origin(cell);
            let mid = y + (layout.cell_h - 1) / 2;
            let bg = fb.get(x, mid).map(|c| c.style.bg).unwrap_or(p.board_bg);
            let mark = CellStyle::colors(p.accent, bg).bold();
            fb.put_char(x, mid, '>', mark);
            fb.put_char(x + layout.cell_w - 2, mid, '<', mark);
        }

        self.draw_tray(fb, &layout, game, &annotations, ui.cursor);
        self.draw_side_panel(fb, &layout, game);
        self.draw_overlay(fb, &layout, game);

        if let Some(toast) = &ui.toast {
            let color = if toast.error { p.error } else { p.accent };
            let y = viewport.height.saturating_sub(1);
            fb.put_str(BOARD_X, y, &toast.text, CellStyle::colors(color, Rgb::new(0, 0, 0)).bold());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &PuzzleGame, ui: &ViewState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, ui, viewport, &mut fb);
        fb
    }

    fn piece_style(&self, ann: &Annotation) -> CellStyle {
        let p = &self.palette;
        if ann.trapped {
            CellStyle::colors(p.trapped_fg, p.piece_bg).bold()
        } else if ann.dragging || ann.selected {
            CellStyle::colors(p.piece_fg, p.armed_bg).bold()
        } else if ann.show_hint {
            CellStyle::colors(p.piece_fg, p.hint_bg)
        } else if ann.correct {
            CellStyle::colors(p.piece_fg, p.correct_bg)
        } else {
            CellStyle::colors(p.piece_fg, p.piece_bg)
        }
    }

    fn draw_grid_piece(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        cell: usize,
        piece: &Piece,
        ann: &Annotation,
        rotation_rule: bool,
    ) {
        let style = self.piece_style(ann);
        let (x, y) = layout.cell_origin(cell);
        let w = layout.cell_w - 1;
        let h = layout.cell_h - 1;
        fb.fill_rect(x, y, w, h.max(1), ' ', style);
        fb.put_str_centered(x, y + (layout.cell_h - 1) / 2, w, &piece_label(piece, ann, rotation_rule), style);
    }

    fn draw_tray(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        game: &PuzzleGame,
        annotations: &[Annotation],
        cursor: Option<CursorMark>,
    ) {
        let p = &self.palette;
        let staged: Vec<(&Piece, &Annotation)> = game
            .pieces()
            .iter()
            .zip(annotations)
            .filter(|(piece, _)| piece.slot.is_staging())
            .collect();

        let label = CellStyle::colors(p.muted, Rgb::new(0, 0, 0));
        fb.put_str(layout.tray_x, layout.tray_y - 1, &format!("Staging ({})", staged.len()), label);

        if staged.is_empty() {
            let style = if cursor == Some(CursorMark::Tray(0)) {
                label.underline()
            } else {
                label.dim()
            };
            fb.put_str(layout.tray_x, layout.tray_y, "(empty)", style);
            return;
        }

        for (index, (piece, ann)) in staged.into_iter().enumerate() {
            let (x, y) = layout.slot_origin(index);
            let mut style = self.piece_style(ann);
            if cursor == Some(CursorMark::Tray(index)) {
                style = style.underline();
            }
            let text = format!("[{:>2}]", piece.id + 1);
            fb.put_str(x, y, &text, style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, layout: &BoardLayout, game: &PuzzleGame) {
        let p = &self.palette;
        let snap = game.snapshot();
        let key = CellStyle::colors(p.muted, Rgb::new(0, 0, 0));
        let value = CellStyle::colors(p.text, Rgb::new(0, 0, 0)).bold();
        let x = layout.panel_x;
        let mut y = BOARD_Y;

        let mode = if snap.rotation_rule && snap.game_mode != GameMode::Challenge {
            format!("{} +rot", snap.game_mode.as_str())
        } else {
            snap.game_mode.as_str().to_string()
        };
        let time = match snap.time_remaining_secs {
            Some(left) => format!("{} left", format_elapsed(left)),
            None => format_elapsed(snap.time_spent_secs),
        };
        let image = match snap.image {
            ImageStatus::Idle => "none",
            ImageStatus::Loading => "loading",
            ImageStatus::Ready => "ready",
            ImageStatus::Failed => "failed",
        };

        let rows: [(&str, String); 6] = [
            (
                "Difficulty",
                format!("{} {}", snap.difficulty.label(), snap.difficulty.display_name()),
            ),
            ("Mode", mode),
            ("Moves", snap.move_count.to_string()),
            ("Time", time),
            ("Correct", format!("{}/{}", snap.correct_pieces, snap.total_pieces)),
            ("Image", image.to_string()),
        ];
        for (label, text) in rows.iter() {
            fb.put_str(x, y, label, key);
            fb.put_str(x + 12, y, text, value);
            y += 1;
        }

        y += 1;
        let help = [
            "arrows/hjkl  move",
            "space        pick/drop",
            "x            to tray",
            "r            rotate",
            "esc          release",
            "p            pause",
            "?            hint",
            "n            new puzzle",
            "1-4          difficulty",
            "m / t        mode / rotation",
            "^S / ^O      save / load",
            "q            quit",
        ];
        for line in help {
            fb.put_str(x, y, line, key);
            y += 1;
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, layout: &BoardLayout, game: &PuzzleGame) {
        let session = game.session();
        let text = match (session.phase(), game.image_status()) {
            (_, ImageStatus::Loading) => " LOADING IMAGE ",
            (Phase::NotStarted, _) => " PRESS N TO START ",
            (Phase::Paused, _) if session.timed_out() => " TIME'S UP ",
            (Phase::Paused, _) => " PAUSED ",
            (Phase::Complete, _) => " COMPLETE ",
            (Phase::Active, _) => return,
        };
        let style = CellStyle::colors(Rgb::new(0, 0, 0), self.palette.accent).bold();
        let y = layout.board_y + layout.inner_h() / 2;
        fb.put_str_centered(layout.board_x, y, layout.inner_w(), text, style);
    }
}

fn find<'a>(pieces: &'a [Piece], annotations: &'a [Annotation], id: usize) -> Option<(&'a Piece, &'a Annotation)> {
    let index = pieces.iter().position(|p| p.id == id)?;
    Some((&pieces[index], annotations.get(index)?))
}

fn piece_label(piece: &Piece, ann: &Annotation, rotation_rule: bool) -> String {
    let mut label = (piece.id + 1).to_string();
    if rotation_rule {
        label.push(rotation_glyph(piece.rotation));
    }
    if ann.trapped {
        label.push('!');
    }
    label
}

fn rotation_glyph(rotation: Rotation) -> char {
    match rotation {
        Rotation::R0 => '↑',
        Rotation::R90 => '→',
        Rotation::R180 => '↓',
        Rotation::R270 => '←',
    }
}
