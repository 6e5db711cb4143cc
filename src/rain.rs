// Copyright (c) 2026 rezky_nightky

use glam::DVec2;
use rand::Rng;

use crate::canvas::{BlendMode, Canvas, DrawCtx, Paint, Rect, Size};
use crate::clock::Pulse;
use crate::element::{uniform, Element};
use crate::palette::Rgba;
use crate::symbols::SymbolKey;

const FALL_RATE: f64 = 100.0;
const HEAD_ALPHA: f32 = 0.1;

pub fn columns_for(space_width: f64, glyph_width: f64) -> usize {
    if !(glyph_width > 0.0) || !space_width.is_finite() {
        return 1;
    }
    let n = (space_width / glyph_width).floor();
    if n >= 1.0 {
        n as usize
    } else {
        1
    }
}

pub fn column_width(space_width: f64, columns: usize) -> f64 {
    space_width.max(0.0) / columns.max(1) as f64
}

/// One vertical strip of digital rain. The glyph stack is drawn over the
/// whole strip and only the window below `offset` shows, tinted by a
/// gradient that brightens toward the bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct RainColumn {
    id: usize,
    width: f64,
    offset: f64,
    tint: Rgba,
}

impl RainColumn {
    pub fn create<R: Rng>(id: usize, glyph_width: f64, space: Size, tint: Rgba, rng: &mut R) -> Self {
        let width = column_width(space.width, columns_for(space.width, glyph_width));
        let offset = restart_offset(space.height, rng) + space.height / 2.0;
        Self {
            id,
            width,
            offset,
            tint,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> usize {
        self.id
    }

    #[cfg(test)]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn strip(&self, space: Size) -> Rect {
        Rect::new(self.width * self.id as f64, self.offset, self.width, space.height)
    }
}

fn restart_offset<R: Rng>(height: f64, rng: &mut R) -> f64 {
    -height * uniform(rng, 1.0, 3.0)
}

impl Element for RainColumn {
    fn advance<R: Rng>(&mut self, space: Size, pulse: Pulse, rng: &mut R) {
        self.offset += pulse.delta * FALL_RATE;
        if self.offset > space.height || !self.offset.is_finite() {
            self.offset = restart_offset(space.height, rng);
        }
    }

    fn render<C: Canvas>(&self, space: Size, _pulse: Pulse, ctx: &mut DrawCtx<'_, C>) {
        let Some(stack) = ctx.symbols.get(&SymbolKey::Index(self.id)) else {
            return;
        };
        let strip = self.strip(space);
        let x = strip.origin.x;

        ctx.canvas.save();
        ctx.canvas.clip_to(strip);
        ctx.canvas
            .draw_symbol(stack, Rect::new(x, 0.0, self.width, space.height));
        ctx.canvas.set_blend_mode(BlendMode::SourceAtop);
        ctx.canvas.fill_rect(
            strip,
            &Paint::LinearGradient {
                from: self.tint.with_alpha(HEAD_ALPHA),
                to: self.tint,
                start: DVec2::new(x, self.offset),
                end: DVec2::new(x, space.height),
            },
        );
        ctx.canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::canvas::recording::{DrawOp, RecordingCanvas};
    use crate::symbols::SymbolTable;

    fn pulse(delta: f64) -> Pulse {
        Pulse {
            elapsed: 0.0,
            delta,
        }
    }

    #[test]
    fn columns_tile_the_width_exactly() {
        assert_eq!(columns_for(640.0, 8.0), 80);
        let w = column_width(640.0, 80);
        assert_eq!(w, 8.0);

        let n = columns_for(100.0, 3.0);
        assert_eq!(n, 33);
        let w = column_width(100.0, n);
        assert!((w * n as f64 - 100.0).abs() < 1e-9);
        assert!(w > 3.0);
    }

    #[test]
    fn narrow_canvas_still_gets_one_column() {
        assert_eq!(columns_for(5.0, 8.0), 1);
        assert_eq!(columns_for(0.0, 8.0), 1);
        assert_eq!(columns_for(100.0, 0.0), 1);
        assert_eq!(column_width(5.0, 1), 5.0);
        assert_eq!(column_width(0.0, 1), 0.0);
    }

    #[test]
    fn initial_offset_sits_above_the_canvas_window() {
        let mut rng = StdRng::seed_from_u64(3);
        let space = Size::new(640.0, 100.0);
        for id in 0..80 {
            let c = RainColumn::create(id, 8.0, space, Rgba::GREEN, &mut rng);
            assert_eq!(c.id(), id);
            assert!((-250.0..=-50.0).contains(&c.offset()), "{}", c.offset());
        }
    }

    #[test]
    fn offset_slides_with_delta_and_resets_past_the_bottom() {
        let mut rng = StdRng::seed_from_u64(3);
        let space = Size::new(80.0, 100.0);
        let mut c = RainColumn {
            id: 2,
            width: 8.0,
            offset: 50.0,
            tint: Rgba::GREEN,
        };
        c.advance(space, pulse(0.5), &mut rng);
        assert_eq!(c.offset(), 100.0);

        c.advance(space, pulse(0.01), &mut rng);
        assert!((-300.0..=-100.0).contains(&c.offset()));
        assert_eq!(c.id(), 2);
    }

    #[test]
    fn zero_height_canvas_stays_finite() {
        let mut rng = StdRng::seed_from_u64(3);
        let space = Size::new(0.0, 0.0);
        let mut c = RainColumn::create(0, 8.0, space, Rgba::GREEN, &mut rng);
        for _ in 0..20 {
            c.advance(space, pulse(1.0 / 60.0), &mut rng);
            assert!(c.offset().is_finite());
        }
    }

    #[test]
    fn render_clips_draws_the_stack_then_tints_it() {
        let space = Size::new(80.0, 100.0);
        let c = RainColumn {
            id: 3,
            width: 8.0,
            offset: 40.0,
            tint: Rgba::GREEN,
        };
        let symbols: SymbolTable<char> = [(SymbolKey::Index(3), 'k')].into_iter().collect();
        let mut canvas = RecordingCanvas::default();
        c.render(space, pulse(0.0), &mut DrawCtx::new(&mut canvas, &symbols));

        let strip = Rect::new(24.0, 40.0, 8.0, 100.0);
        assert_eq!(
            canvas.ops,
            vec![
                DrawOp::Save,
                DrawOp::Clip(strip),
                DrawOp::Symbol('k', Rect::new(24.0, 0.0, 8.0, 100.0)),
                DrawOp::Blend(BlendMode::SourceAtop),
                DrawOp::FillRect(
                    strip,
                    Paint::LinearGradient {
                        from: Rgba::GREEN.with_alpha(0.1),
                        to: Rgba::GREEN,
                        start: DVec2::new(24.0, 40.0),
                        end: DVec2::new(24.0, 100.0),
                    }
                ),
                DrawOp::Restore,
            ]
        );
    }

    #[test]
    fn render_without_a_stack_draws_nothing() {
        let c = RainColumn {
            id: 9,
            width: 8.0,
            offset: 0.0,
            tint: Rgba::GREEN,
        };
        let symbols: SymbolTable<char> = SymbolTable::new();
        let mut canvas = RecordingCanvas::default();
        c.render(
            Size::new(80.0, 100.0),
            pulse(0.0),
            &mut DrawCtx::new(&mut canvas, &symbols),
        );
        assert!(canvas.ops.is_empty());
    }
}
