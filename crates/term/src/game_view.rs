//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Goal};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, Pos, Special, Tile};

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

/// Front-end state drawn on top of the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Keyboard cursor
    pub cursor: Option<Pos>,
    /// Tile flashing after a rejected tap
    pub pulse: Option<Pos>,
    pub toast: Option<&'a str>,
    pub show_help: bool,
    /// Port of the remote adapter, when it is running
    pub remote_port: Option<u16>,
}

/// Where the board frame lands in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the puzzle board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const HELP_LINES: [&str; 8] = [
    "HOW TO PLAY",
    "",
    "Tap a group of 2+ matching animals.",
    "Pop 5+ for a rocket, 7+ for a bomb.",
    "Tap a rocket or bomb to blast.",
    "Fill both goals before moves run out.",
    "",
    "arrows move  enter tap  ? close",
];

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn layout(&self, board_width: u8, viewport: Viewport) -> Layout {
        let frame_w = (board_width as u16) * self.cell_w + 2;
        let frame_h = (board_width as u16) * self.cell_h + 2;
        Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Board coordinate under the terminal cell `(column, row)`.
    ///
    /// Uses the same layout as rendering, so a mouse click maps back to the
    /// tile drawn there.
    pub fn hit_test(
        &self,
        board_width: u8,
        viewport: Viewport,
        column: u16,
        row: u16,
    ) -> Option<Pos> {
        let layout = self.layout(board_width, viewport);
        let dx = column.checked_sub(layout.start_x + 1)?;
        let dy = row.checked_sub(layout.start_y + 1)?;
        let x = dx / self.cell_w;
        let y = dy / self.cell_h;
        if x >= board_width as u16 || y >= board_width as u16 {
            return None;
        }
        Some((x as i8, y as i8))
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with(snap, &Overlay::default(), viewport, fb);
    }

    pub fn render_into_with(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        if snap.width == 0 {
            return;
        }

        let layout = self.layout(snap.width, viewport);
        let board_px_w = layout.frame_w - 2;
        let board_px_h = layout.frame_h - 2;

        let bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(layout.start_x + 1, layout.start_y + 1, board_px_w, board_px_h, ' ', bg);
        draw_border(fb, layout.start_x, layout.start_y, layout.frame_w, layout.frame_h, border);

        let w = snap.width as i8;
        for y in 0..w {
            for x in 0..w {
                let cell = snap.cell(x, y).flatten();
                let cursor = overlay.cursor == Some((x, y));
                let pulse = overlay.pulse == Some((x, y));
                self.draw_tile(fb, &layout, x as u16, y as u16, cell, cursor, pulse);
            }
        }

        self.draw_side_panel(fb, snap, overlay, viewport, &layout);

        if overlay.show_help {
            draw_help(fb, viewport);
        } else if let Some(text) = overlay.toast {
            draw_toast(fb, &layout, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with(snap, overlay, viewport, &mut fb);
        fb
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        x: u16,
        y: u16,
        cell: Option<Tile>,
        cursor: bool,
        pulse: bool,
    ) {
        let (glyph, mut style) = match cell {
            Some(tile) => {
                let base = color_rgb(tile.color);
                let mut style = CellStyle::new(Rgb::new(20, 20, 24), base);
                if tile.special.is_special() {
                    style.fg = Rgb::new(255, 255, 255);
                    style.bold = true;
                }
                (tile_glyph(tile), style)
            }
            None => (['·', ' '], CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim()),
        };
        if pulse {
            style.bg = style.bg.darken(110);
        }
        if cursor {
            style.bg = style.bg.lighten(110);
            style.bold = true;
        }

        let px = layout.start_x + 1 + x * self.cell_w;
        let py = layout.start_y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        let mid_y = py + self.cell_h / 2;
        for (i, ch) in glyph.iter().enumerate().take(self.cell_w as usize) {
            fb.put_char(px + i as u16, mid_y, *ch, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout.start_x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", label);
        y = y.saturating_add(1);
        let moves_style = if snap.moves_remaining <= 5 {
            CellStyle::new(Rgb::new(240, 110, 90), PANEL_BG).bold()
        } else {
            value
        };
        fb.put_u32(panel_x, y, snap.moves_remaining, moves_style);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.level, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "GOALS", label);
        y = y.saturating_add(1);
        for goal in snap.goals.iter() {
            let goal = Goal::from(*goal);
            let swatch = CellStyle::new(Rgb::new(20, 20, 24), color_rgb(goal.color));
            let glyph = tile_glyph(Tile::plain(goal.color));
            fb.put_char(panel_x, y, glyph[0], swatch);
            fb.put_char(panel_x + 1, y, glyph[1], swatch);
            let mut cx = fb.put_str(panel_x + 3, y, goal.color.animal(), value);
            cx = fb.put_str(cx, y, " ", value);
            cx = fb.put_u32(cx, y, goal.shown_have(), value);
            cx = fb.put_str(cx, y, "/", value);
            fb.put_u32(cx, y, goal.need, value);
            y = y.saturating_add(1);

            draw_progress(fb, panel_x, y, goal.percent(), goal.color);
            y = y.saturating_add(2);
        }

        if snap.busy {
            fb.put_str(panel_x, y, "...", dim);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "REMOTE", label);
        y = y.saturating_add(1);
        match overlay.remote_port {
            Some(port) => {
                let cx = fb.put_str(panel_x, y, "ON :", value);
                fb.put_u32(cx, y, port as u32, value);
            }
            None => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
        y = y.saturating_add(2);

        for line in ["s shuffle  n next", "r reset  ? help", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, dim);
            y = y.saturating_add(1);
        }
    }
}

/// Ten-segment bar followed by the percentage
fn draw_progress(fb: &mut FrameBuffer, x: u16, y: u16, percent: u8, color: Color) {
    let filled = (percent as u16 + 5) / 10;
    let on = CellStyle::new(color_rgb(color), PANEL_BG);
    let off = CellStyle::new(Rgb::new(70, 70, 80), PANEL_BG);
    for i in 0..10u16 {
        let (ch, style) = if i < filled { ('█', on) } else { ('░', off) };
        fb.put_char(x + i, y, ch, style);
    }
    let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
    let cx = fb.put_u32(x + 11, y, percent as u32, value);
    fb.put_char(cx, y, '%', value);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Centered banner across the middle of the board
fn draw_toast(fb: &mut FrameBuffer, layout: &Layout, text: &str) {
    let mid_y = layout.start_y.saturating_add(layout.frame_h / 2);
    let text_w = text.chars().count() as u16 + 2;
    let x = layout
        .start_x
        .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(20, 20, 20)).bold();
    let cx = fb.put_str(x, mid_y, " ", style);
    let cx = fb.put_str(cx, mid_y, text, style);
    fb.put_str(cx, mid_y, " ", style);
}

/// Rules box in the middle of the viewport
fn draw_help(fb: &mut FrameBuffer, viewport: Viewport) {
    let inner_w = HELP_LINES.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let box_w = (inner_w + 4).min(viewport.width);
    let box_h = (HELP_LINES.len() as u16 + 2).min(viewport.height);
    let x = viewport.width.saturating_sub(box_w) / 2;
    let y = viewport.height.saturating_sub(box_h) / 2;

    let body = CellStyle::new(Rgb::new(230, 230, 230), Rgb::new(25, 25, 45));
    fb.fill_rect(x, y, box_w, box_h, ' ', body);
    draw_border(fb, x, y, box_w, box_h, body);
    for (i, line) in HELP_LINES.iter().enumerate() {
        let style = if i == 0 { body.bold() } else { body };
        fb.put_str(x + 2, y + 1 + i as u16, line, style);
    }
}

/// Background color of a tile
pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Red => Rgb::new(220, 70, 70),
        Color::Orange => Rgb::new(240, 150, 50),
        Color::Yellow => Rgb::new(240, 215, 70),
        Color::Green => Rgb::new(90, 190, 90),
        Color::Blue => Rgb::new(70, 130, 220),
        Color::Purple => Rgb::new(160, 100, 210),
    }
}

/// Two-column glyph: the animal for plain tiles, the special otherwise
pub fn tile_glyph(tile: Tile) -> [char; 2] {
    match tile.special {
        Special::Rocket => ['<', '>'],
        Special::Bomb => ['(', ')'],
        Special::None => match tile.color {
            Color::Red => ['F', 'x'],
            Color::Orange => ['T', 'g'],
            Color::Yellow => ['C', 'h'],
            Color::Green => ['F', 'r'],
            Color::Blue => ['P', 'a'],
            Color::Purple => ['O', 'w'],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_distinct() {
        let mut seen = Vec::new();
        for color in Color::ALL {
            let glyph = tile_glyph(Tile::plain(color));
            assert!(!seen.contains(&glyph));
            seen.push(glyph);
        }
        let rocket = tile_glyph(Tile::new(Color::Red, Special::Rocket));
        let bomb = tile_glyph(Tile::new(Color::Red, Special::Bomb));
        assert_ne!(rocket, bomb);
        assert!(!seen.contains(&rocket));
    }

    #[test]
    fn test_hit_test_matches_layout() {
        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        // frame is 22x12, centered: start (29, 6), first tile at (30, 7)
        assert_eq!(view.hit_test(10, viewport, 30, 7), Some((0, 0)));
        assert_eq!(view.hit_test(10, viewport, 31, 7), Some((0, 0)));
        assert_eq!(view.hit_test(10, viewport, 32, 8), Some((1, 1)));
        assert_eq!(view.hit_test(10, viewport, 49, 16), Some((9, 9)));
        assert_eq!(view.hit_test(10, viewport, 29, 7), None);
        assert_eq!(view.hit_test(10, viewport, 50, 7), None);
        assert_eq!(view.hit_test(10, viewport, 30, 17), None);
    }
}
