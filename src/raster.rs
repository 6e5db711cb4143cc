// Copyright (c) 2026 rezky_nightky

//! Rasterizes canvas draw calls into a character grid. Canvas units are
//! pixels of a nominal [`CELL_SIZE`] cell; a cell is touched when its center
//! falls inside the shape and the current clip.

use std::ops::Range;

use crossterm::style::Color;
use glam::DVec2;

use crate::canvas::{BlendMode, Canvas, Paint, Rect, Size};
use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::{term_color, Rgba};
use crate::runtime::ColorMode;
use crate::symbols::Glyph;

pub const CELL_SIZE: DVec2 = DVec2::new(8.0, 16.0);

/// Below this the ink is invisible over black and the cell is left alone.
const MIN_ALPHA: f64 = 0.02;
const MAX_LINE_STEPS: f64 = 4096.0;

pub fn canvas_size(cols: u16, rows: u16) -> Size {
    Size::new(cols as f64 * CELL_SIZE.x, rows as f64 * CELL_SIZE.y)
}

fn cell_center(x: u16, y: u16) -> DVec2 {
    (DVec2::new(x as f64, y as f64) + 0.5) * CELL_SIZE
}

fn dot_for(diameter: f64) -> char {
    if diameter <= 2.0 {
        '.'
    } else if diameter < CELL_SIZE.x {
        '•'
    } else {
        '●'
    }
}

fn stroke_for(cells: DVec2) -> char {
    let (ax, ay) = (cells.x.abs(), cells.y.abs());
    if ax == 0.0 && ay == 0.0 {
        '.'
    } else if ax >= 2.0 * ay {
        '-'
    } else if ay >= 2.0 * ax {
        '|'
    } else if (cells.x > 0.0) == (cells.y > 0.0) {
        '\\'
    } else {
        '/'
    }
}

#[derive(Clone, Copy, Debug)]
struct GraphicsState {
    opacity: f64,
    multiply: Rgba,
    blend: BlendMode,
    clip: Option<Rect>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            multiply: Rgba::WHITE,
            blend: BlendMode::Normal,
            clip: None,
        }
    }
}

pub struct TermCanvas<'a> {
    frame: &'a mut Frame,
    mode: ColorMode,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl<'a> TermCanvas<'a> {
    pub fn new(frame: &'a mut Frame, mode: ColorMode) -> Self {
        Self {
            frame,
            mode,
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    fn visible(&self, p: DVec2) -> bool {
        self.state.clip.map_or(true, |clip| clip.contains(p))
    }

    fn cell_of(&self, p: DVec2) -> Option<(u16, u16)> {
        if !p.is_finite() {
            return None;
        }
        let c = (p / CELL_SIZE).floor();
        if c.x < 0.0 || c.y < 0.0 || c.x >= self.frame.width as f64 || c.y >= self.frame.height as f64 {
            return None;
        }
        Some((c.x as u16, c.y as u16))
    }

    fn cell_span(&self, rect: Rect) -> Option<(Range<u16>, Range<u16>)> {
        let bounds = DVec2::new(self.frame.width as f64, self.frame.height as f64);
        let lo = (rect.origin / CELL_SIZE).floor().max(DVec2::ZERO);
        let hi = (rect.max() / CELL_SIZE).ceil().min(bounds);
        if !lo.is_finite() || !hi.is_finite() || hi.x <= lo.x || hi.y <= lo.y {
            return None;
        }
        Some((lo.x as u16..hi.x as u16, lo.y as u16..hi.y as u16))
    }

    /// Terminal color for `color` under the current filter and opacity.
    /// `None` when it is too faint to show.
    fn ink(&self, color: Rgba) -> Option<Option<Color>> {
        let c = color.multiply(self.state.multiply);
        let alpha = c.a as f64 * self.state.opacity;
        if !(alpha >= MIN_ALPHA) {
            return None;
        }
        Some(term_color(self.mode, c.with_alpha(alpha as f32).over_black()))
    }

    fn put(&mut self, p: DVec2, ch: char, color: Rgba) {
        if !self.visible(p) {
            return;
        }
        let Some((x, y)) = self.cell_of(p) else {
            return;
        };
        let Some(fg) = self.ink(color) else {
            return;
        };
        let blend = self.state.blend;
        if let Some(cell) = self.frame.get_mut(x, y) {
            match blend {
                BlendMode::Normal => {
                    cell.ch = ch;
                    cell.fg = fg;
                }
                BlendMode::SourceAtop => {
                    if !cell.is_blank() {
                        cell.fg = fg;
                    }
                }
            }
        }
    }
}

impl Canvas for TermCanvas<'_> {
    type Symbol = Glyph;

    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) {
        let center = rect.center();
        let radii = rect.size.to_vec() * 0.5;
        let diameter = rect.size.width.max(rect.size.height);
        if rect.size.width < CELL_SIZE.x || rect.size.height < CELL_SIZE.y {
            self.put(center, dot_for(diameter), color);
            return;
        }

        let Some((xs, ys)) = self.cell_span(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let q = (cell_center(x, y) - center) / radii;
                if q.length_squared() <= 1.0 {
                    self.put(cell_center(x, y), '●', color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let span = to - from;
        let cells = span / CELL_SIZE;
        let ch = stroke_for(cells);
        let steps = cells.x.abs().max(cells.y.abs()).ceil().min(MAX_LINE_STEPS) as usize;
        if steps == 0 {
            self.put(from, ch, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.put(from + span * t, ch, color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let Some((xs, ys)) = self.cell_span(rect) else {
            return;
        };
        let blend = self.state.blend;
        for y in ys {
            for x in xs.clone() {
                let c = cell_center(x, y);
                if !rect.contains(c) || !self.visible(c) {
                    continue;
                }
                let Some(color) = self.ink(paint.color_at(c)) else {
                    continue;
                };
                let Some(cell) = self.frame.get_mut(x, y) else {
                    continue;
                };
                match blend {
                    BlendMode::Normal => {
                        *cell = Cell {
                            ch: ' ',
                            fg: None,
                            bg: color.or(cell.bg),
                        }
                    }
                    BlendMode::SourceAtop => {
                        if !cell.is_blank() {
                            cell.fg = color;
                        }
                    }
                }
            }
        }
    }

    fn draw_symbol(&mut self, symbol: &Glyph, rect: Rect) {
        match symbol {
            Glyph::Char(ch) => self.put(rect.center(), *ch, Rgba::WHITE),
            Glyph::Stack(chars) => {
                let x = rect.center().x;
                let Some((_, ys)) = self.cell_span(rect) else {
                    return;
                };
                for y in ys {
                    let at = DVec2::new(x, cell_center(0, y).y);
                    if !rect.contains(at) {
                        continue;
                    }
                    let row = ((at.y - rect.origin.y) / CELL_SIZE.y).floor() as usize;
                    if let Some(&ch) = chars.get(row) {
                        self.put(at, ch, Rgba::BLACK);
                    }
                }
            }
        }
    }

    fn save(&mut self) {
        self.saved.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.state.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn set_color_multiply(&mut self, color: Rgba) {
        self.state.multiply = self.state.multiply.multiply(color);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
    }

    fn clip_to(&mut self, rect: Rect) {
        let clip = match self.state.clip {
            Some(current) => current.intersect(&rect),
            None => Some(rect),
        };
        self.state.clip = Some(clip.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE_FG: Option<Color> = Some(Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    });

    fn frame(w: u16, h: u16) -> Frame {
        Frame::new(w, h, None)
    }

    #[test]
    fn terminal_cells_map_to_a_pixel_canvas() {
        assert_eq!(canvas_size(80, 24), Size::new(640.0, 384.0));
    }

    #[test]
    fn small_ellipse_becomes_one_dot() {
        let mut f = frame(10, 5);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.fill_ellipse(Rect::new(16.0, 16.0, 2.0, 2.0), Rgba::WHITE);
        c.fill_ellipse(Rect::new(40.0, 40.0, 3.0, 3.0), Rgba::WHITE);
        c.fill_ellipse(Rect::new(-50.0, 16.0, 2.0, 2.0), Rgba::WHITE);
        assert_eq!(*f.get(2, 1).unwrap(), Cell { ch: '.', fg: WHITE_FG, bg: None });
        assert_eq!(f.get(5, 2).unwrap().ch, '•');
        assert_eq!(f.text().chars().filter(|ch| !ch.is_whitespace()).count(), 2);
    }

    #[test]
    fn large_ellipse_fills_covered_cells() {
        let mut f = frame(6, 3);
        let mut c = TermCanvas::new(&mut f, ColorMode::Mono);
        c.fill_ellipse(Rect::new(0.0, 0.0, 48.0, 48.0), Rgba::WHITE);
        assert_eq!(f.get(2, 1).unwrap().ch, '●');
        assert!(f.get(0, 0).unwrap().is_blank());
    }

    #[test]
    fn lines_pick_a_stroke_by_slope() {
        let mut f = frame(6, 6);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.stroke_line(DVec2::new(0.0, 8.0), DVec2::new(32.0, 8.0), Rgba::WHITE);
        assert_eq!(f.text().lines().next(), Some("----- "));

        let mut f = frame(6, 6);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.stroke_line(DVec2::new(4.0, 8.0), DVec2::new(4.0, 88.0), Rgba::WHITE);
        assert!(f.text().lines().all(|row| row.starts_with('|')));

        assert_eq!(stroke_for(DVec2::new(1.0, 1.0)), '\\');
        assert_eq!(stroke_for(DVec2::new(-1.0, 1.0)), '/');
        assert_eq!(stroke_for(DVec2::ZERO), '.');
    }

    #[test]
    fn non_finite_line_is_dropped() {
        let mut f = frame(4, 4);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.stroke_line(DVec2::new(f64::NAN, 0.0), DVec2::ZERO, Rgba::WHITE);
        assert!(f.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn symbol_is_tinted_and_faded_until_restore() {
        let mut f = frame(4, 1);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.save();
        c.set_color_multiply(Rgba::GREEN);
        c.set_opacity(0.5);
        c.draw_symbol(&Glyph::Char('∑'), Rect::new(0.0, 0.0, 8.0, 8.0));
        c.restore();
        c.draw_symbol(&Glyph::Char('π'), Rect::new(8.0, 0.0, 8.0, 8.0));

        assert_eq!(
            *f.get(0, 0).unwrap(),
            Cell {
                ch: '∑',
                fg: Some(Color::Rgb { r: 26, g: 100, b: 45 }),
                bg: None
            }
        );
        assert_eq!(f.get(1, 0).unwrap().fg, WHITE_FG);
    }

    #[test]
    fn transparent_ink_leaves_cells_alone() {
        let mut f = frame(2, 1);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.set_opacity(0.0);
        c.draw_symbol(&Glyph::Char('x'), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(f.get(0, 0).unwrap().is_blank());
    }

    #[test]
    fn clipped_stack_is_recolored_source_atop() {
        let mut f = frame(2, 4);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        let strip = Rect::new(0.0, 32.0, 8.0, 64.0);
        c.save();
        c.clip_to(strip);
        c.draw_symbol(
            &Glyph::Stack(vec!['a', 'b', 'c', 'd']),
            Rect::new(0.0, 0.0, 8.0, 64.0),
        );
        c.set_blend_mode(BlendMode::SourceAtop);
        c.fill_rect(strip, &Paint::Solid(Rgba::GREEN));
        c.restore();

        assert_eq!(f.text(), "  \n  \nc \nd \n");
        let green = Some(Color::Rgb { r: 52, g: 199, b: 89 });
        assert_eq!(f.get(0, 2).unwrap().fg, green);
        assert_eq!(f.get(0, 3).unwrap().fg, green);
        assert!(f.get(1, 2).unwrap().is_blank());
        assert_eq!(f.get(1, 2).unwrap().fg, None);
    }

    #[test]
    fn stack_without_recolor_stays_black() {
        let mut f = frame(1, 2);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.draw_symbol(&Glyph::Stack(vec!['x', 'y']), Rect::new(0.0, 0.0, 8.0, 32.0));
        assert_eq!(f.get(0, 1).unwrap().ch, 'y');
        assert_eq!(f.get(0, 1).unwrap().fg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }

    #[test]
    fn disjoint_clips_hide_everything() {
        let mut f = frame(4, 4);
        let mut c = TermCanvas::new(&mut f, ColorMode::TrueColor);
        c.clip_to(Rect::new(0.0, 0.0, 8.0, 16.0));
        c.clip_to(Rect::new(16.0, 16.0, 8.0, 16.0));
        c.draw_symbol(&Glyph::Char('x'), Rect::new(0.0, 0.0, 8.0, 16.0));
        c.draw_symbol(&Glyph::Char('y'), Rect::new(16.0, 16.0, 8.0, 16.0));
        assert!(f.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn normal_fill_paints_the_background() {
        let mut f = frame(2, 1);
        let mut c = TermCanvas::new(&mut f, ColorMode::Color16);
        c.fill_rect(Rect::new(0.0, 0.0, 8.0, 16.0), &Paint::Solid(Rgba::rgb(250, 5, 5)));
        assert_eq!(f.get(0, 0).unwrap().bg, Some(Color::Red));
        assert_eq!(f.get(1, 0).unwrap().bg, None);
    }
}
