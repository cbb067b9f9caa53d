//! Paints viewport draw commands into a ratatui buffer
//!
//! Geometry arrives in cell units as `f32`. A cell is covered by a rectangle
//! when the cell's center lies inside it, so adjacent rectangles never share a
//! cell and every rectangle at least one cell tall covers at least one row.
//!
//! Translucent fills are composited over the cell's current background.
//! When a scroll region ends, a scrollbar (track and thumb) is drawn in its
//! rightmost column if the content overflows vertically.

use crate::primitives::display_width::str_width;
use crate::view::draw::{Align, DrawCommand, Rect, Rgba, Vec2};
use crate::view::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// Background assumed for cells that have no RGB background yet
const BASE_BACKGROUND: [u8; 3] = [0, 0, 0];

/// A widget that paints a list of draw commands
pub struct CommandsWidget<'a> {
    commands: &'a [DrawCommand],
    theme: &'a Theme,
}

impl<'a> CommandsWidget<'a> {
    pub fn new(commands: &'a [DrawCommand], theme: &'a Theme) -> Self {
        Self { commands, theme }
    }
}

impl Widget for CommandsWidget<'_> {
    fn render(self, area: CellRect, buf: &mut Buffer) {
        let mut painter = Painter::new(buf, area, self.theme);
        for command in self.commands {
            painter.paint(command);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScrollFrame {
    viewport: Rect,
    offset: Vec2,
    content: Vec2,
}

struct Painter<'a> {
    buf: &'a mut Buffer,
    theme: &'a Theme,
    /// Screen-space clip rectangles; the last one is active
    clips: Vec<Rect>,
    scroll: Option<ScrollFrame>,
}

impl<'a> Painter<'a> {
    fn new(buf: &'a mut Buffer, area: CellRect, theme: &'a Theme) -> Self {
        let bounds = Rect::new(
            area.x as f32,
            area.y as f32,
            area.width as f32,
            area.height as f32,
        );
        Self {
            buf,
            theme,
            clips: vec![bounds],
            scroll: None,
        }
    }

    fn clip(&self) -> Rect {
        self.clips.last().copied().unwrap_or_default()
    }

    /// Map a content-space point to the screen
    fn to_screen(&self, p: Vec2) -> Vec2 {
        match self.scroll {
            Some(frame) => Vec2::new(
                frame.viewport.x + p.x - frame.offset.x,
                frame.viewport.y + p.y - frame.offset.y,
            ),
            None => p,
        }
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        let origin = self.to_screen(Vec2::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.width, rect.height)
    }

    fn paint(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::FillRect { rect, color } => {
                let rect = self.rect_to_screen(*rect);
                self.fill(rect, *color);
            }
            DrawCommand::StrokeRect { rect, color, .. } => {
                let rect = self.rect_to_screen(*rect);
                self.stroke(rect, *color);
            }
            DrawCommand::Code {
                origin,
                line_height,
                lines,
            } => {
                for (k, line) in lines.iter().enumerate() {
                    let at = self.to_screen(Vec2::new(origin.x, origin.y + k as f32 * line_height));
                    let mut col = at.x.round() as i32;
                    let row = at.y.round() as i32;
                    for (kind, text) in line.spans() {
                        let fg = self.theme.span_color(kind);
                        col = self.put_text(col, row, text, fg);
                    }
                }
            }
            DrawCommand::Label {
                rect,
                text,
                color,
                align,
                line_height,
            } => {
                let rect = self.rect_to_screen(*rect);
                self.clips.push(self.clip().intersect(&rect));
                for (k, line) in text.split('\n').enumerate() {
                    let x = match align {
                        Align::Left => rect.x,
                        Align::Right => rect.right() - str_width(line) as f32,
                    };
                    let row = (rect.y + k as f32 * line_height).round() as i32;
                    self.put_text(x.round() as i32, row, line, *color);
                }
                self.clips.pop();
            }
            DrawCommand::BeginScroll {
                viewport,
                offset,
                content,
            } => {
                self.scroll = Some(ScrollFrame {
                    viewport: *viewport,
                    offset: *offset,
                    content: *content,
                });
                self.clips.push(self.clip().intersect(viewport));
            }
            DrawCommand::EndScroll => {
                self.clips.pop();
                if let Some(frame) = self.scroll.take() {
                    self.scrollbar(&frame);
                }
            }
            DrawCommand::PushClip(rect) => {
                let rect = self.rect_to_screen(*rect);
                self.clips.push(self.clip().intersect(&rect));
            }
            DrawCommand::PopClip => {
                // The root clip is the widget area and is never popped
                if self.clips.len() > 1 {
                    self.clips.pop();
                }
            }
            DrawCommand::CopyAffordance { rect } => {
                let rect = self.rect_to_screen(*rect);
                let x = (rect.x + rect.width * 0.5 - 0.5).round() as i32;
                let y = (rect.y + rect.height * 0.5 - 0.5).round() as i32;
                self.put_text(x, y, "⧉", self.theme.line_number);
            }
        }
    }

    /// Cells whose centers lie inside `rect` and the active clip
    fn covered_cells(&self, rect: Rect) -> impl Iterator<Item = (u16, u16)> {
        let rect = rect.intersect(&self.clip());
        let cols = (rect.x - 0.5).ceil().max(0.0) as u16..(rect.right() - 0.5).ceil().max(0.0) as u16;
        let rows = (rect.y - 0.5).ceil().max(0.0) as u16..(rect.bottom() - 0.5).ceil().max(0.0) as u16;
        rows.flat_map(move |y| cols.clone().map(move |x| (x, y)))
    }

    fn fill(&mut self, rect: Rect, color: Rgba) {
        let cells: Vec<_> = self.covered_cells(rect).collect();
        for (x, y) in cells {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                let base = rgb_of(cell.bg).unwrap_or(BASE_BACKGROUND);
                let [r, g, b] = color.over(base);
                cell.set_bg(Color::Rgb(r, g, b));
            }
        }
    }

    /// Terminal cells cannot draw thin outlines, so a stroke brightens and emboldens the cells
    fn stroke(&mut self, rect: Rect, color: Rgba) {
        let cells: Vec<_> = self.covered_cells(rect).collect();
        for (x, y) in cells {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                let base = rgb_of(cell.bg).unwrap_or(BASE_BACKGROUND);
                let [r, g, b] = color.over(base);
                cell.set_bg(Color::Rgb(r, g, b));
                cell.set_style(Style::default().add_modifier(Modifier::BOLD));
            }
        }
    }

    /// Write `text` starting at column `col`, clipped. Returns the column after the text.
    fn put_text(&mut self, mut col: i32, row: i32, text: &str, fg: Rgba) -> i32 {
        let clip = self.clip();
        let inside_row = (row as f32 + 0.5) >= clip.y && (row as f32 + 0.5) < clip.bottom();
        let fg = to_color(fg);
        let mut utf8 = [0u8; 4];
        for ch in text.chars() {
            let width = str_width(ch.encode_utf8(&mut utf8)) as i32;
            if width == 0 {
                continue;
            }
            let fits = (col as f32 + 0.5) >= clip.x && ((col + width) as f32 - 0.5) < clip.right();
            if inside_row && fits && col >= 0 && row >= 0 {
                let (x, y) = (col as u16, row as u16);
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_char(ch).set_fg(fg);
                }
                for extra in 1..width {
                    if let Some(cell) = self.buf.cell_mut((x + extra as u16, y)) {
                        cell.set_symbol("");
                    }
                }
            }
            col += width;
        }
        col
    }

    fn scrollbar(&mut self, frame: &ScrollFrame) {
        let height = frame.viewport.height;
        if frame.content.y <= height || height < 1.0 {
            return;
        }
        let column = Rect::new(frame.viewport.right() - 1.0, frame.viewport.y, 1.0, height);

        let rows = height as usize;
        let thumb_size = ((height / frame.content.y * height).ceil() as usize)
            .max(1)
            .min(((height * 0.8).floor() as usize).max(1));
        let max_offset = (frame.content.y - height).max(1.0);
        let ratio = (frame.offset.y / max_offset).clamp(0.0, 1.0);
        let thumb_start = (ratio * rows.saturating_sub(thumb_size) as f32) as usize;

        let cells: Vec<_> = self.covered_cells(column).collect();
        for (i, (x, y)) in cells.into_iter().enumerate() {
            let thumb = i >= thumb_start && i < thumb_start + thumb_size;
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                let color = if thumb {
                    Color::Gray
                } else {
                    Color::DarkGray
                };
                cell.set_symbol(if thumb { "█" } else { "│" }).set_fg(color);
            }
        }
    }
}

/// Terminal color of an opaque theme color
pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn rgb_of(color: Color) -> Option<[u8; 3]> {
    match color {
        Color::Rgb(r, g, b) => Some([r, g, b]),
        _ => None,
    }
}
