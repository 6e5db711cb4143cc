// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};
use tracing::{debug, warn};

use crate::canvas::{DrawCtx, Size};
use crate::charset::RainGlyphs;
use crate::config::Settings;
use crate::element::{CreationInput, Effect};
use crate::falling::FallingStar;
use crate::flying::FlyingParticle;
use crate::frame::Frame;
use crate::galaxy::Galaxy;
use crate::hyper_jump::{HyperJump, HyperJumpStyle};
use crate::rain::{columns_for, RainColumn};
use crate::raster::{canvas_size, TermCanvas};
use crate::runtime::EffectKind;
use crate::symbols::{register_tags, Glyph, SymbolKey, SymbolTable};

pub type EffectFactory = Box<dyn FnMut(CreationInput, &mut StdRng) -> Effect>;

fn factory(settings: &Settings) -> EffectFactory {
    let color = settings.color.clone();
    match settings.effect {
        EffectKind::Falling => Box::new(move |input: CreationInput, rng: &mut StdRng| {
            let c = color.pick(rng);
            Effect::Falling(FallingStar::random(input.space, c, rng))
        }),
        EffectKind::HyperCircle | EffectKind::HyperLine => {
            let style = if settings.effect == EffectKind::HyperLine {
                HyperJumpStyle::Line
            } else {
                HyperJumpStyle::Circle
            };
            Box::new(move |input: CreationInput, rng: &mut StdRng| {
                let c = color.pick(rng);
                Effect::HyperJump(HyperJump::random(input.space, style, c, rng))
            })
        }
        EffectKind::Flying => {
            let tags = settings.symbols.clone();
            Box::new(move |_: CreationInput, rng: &mut StdRng| {
                let tag = tags
                    .choose(rng)
                    .map(|t| SymbolKey::from(t.as_str()))
                    .unwrap_or(SymbolKey::Index(0));
                let c = color.pick(rng);
                Effect::Flying(FlyingParticle::spawn(tag, c, rng))
            })
        }
        EffectKind::Matrix => {
            let glyph_width = settings.glyph_size;
            Box::new(move |input: CreationInput, rng: &mut StdRng| {
                let tint = color.pick(rng);
                Effect::Rain(RainColumn::create(
                    input.id,
                    glyph_width,
                    input.space,
                    tint,
                    rng,
                ))
            })
        }
    }
}

/// One run of the selected effect on a terminal of a given size. A resize or
/// a restart request replaces the galaxy wholesale.
pub struct Session {
    settings: Settings,
    seeds: StdRng,
    cols: u16,
    rows: u16,
    space: Size,
    galaxy: Galaxy<Effect, EffectFactory>,
    symbols: SymbolTable<Glyph>,
    rain: Option<RainGlyphs>,
    restarts: u64,
}

struct Parts {
    galaxy: Galaxy<Effect, EffectFactory>,
    symbols: SymbolTable<Glyph>,
    rain: Option<RainGlyphs>,
}

fn build(settings: &Settings, seeds: &mut StdRng, rows: u16, space: Size, now: Instant) -> Parts {
    let (count, symbols, rain) = match settings.effect {
        EffectKind::Matrix => {
            let columns = columns_for(space.width, settings.glyph_size);
            let glyphs = RainGlyphs::new(
                settings.glyph_set,
                columns,
                rows as usize,
                now,
                StdRng::from_rng(seeds),
            );
            let mut table = SymbolTable::new();
            glyphs.fill(&mut table);
            (columns, table, Some(glyphs))
        }
        EffectKind::Flying => {
            let (table, missing) = register_tags(&settings.symbols);
            if !missing.is_empty() {
                warn!(tags = ?missing, "unresolved symbol tags will draw nothing");
            }
            (settings.count, table, None)
        }
        _ => (settings.count, SymbolTable::new(), None),
    };

    let galaxy = Galaxy::new(count, factory(settings), StdRng::from_rng(seeds), now)
        .with_max_delta(settings.max_delta);
    Parts {
        galaxy,
        symbols,
        rain,
    }
}

impl Session {
    pub fn new(settings: Settings, cols: u16, rows: u16, now: Instant) -> Self {
        let mut seeds = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let space = canvas_size(cols, rows);
        let parts = build(&settings, &mut seeds, rows, space, now);
        Self {
            settings,
            seeds,
            cols,
            rows,
            space,
            galaxy: parts.galaxy,
            symbols: parts.symbols,
            rain: parts.rain,
            restarts: 0,
        }
    }

    pub fn restart(&mut self, cols: u16, rows: u16, now: Instant) {
        self.cols = cols;
        self.rows = rows;
        self.space = canvas_size(cols, rows);
        let parts = build(&self.settings, &mut self.seeds, rows, self.space, now);
        self.galaxy = parts.galaxy;
        self.symbols = parts.symbols;
        self.rain = parts.rain;
        self.restarts = self.restarts.saturating_add(1);
        debug!(cols, rows, restarts = self.restarts, "session restarted");
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    #[cfg(test)]
    pub fn space(&self) -> Size {
        self.space
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn galaxy(&self) -> &Galaxy<Effect, EffectFactory> {
        &self.galaxy
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.galaxy.is_paused()
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        self.galaxy.toggle_pause(now);
        debug!(paused = self.galaxy.is_paused(), "pause toggled");
    }

    /// Renders one pulse into `frame`. Returns false, leaving the frame as it
    /// was, while paused.
    pub fn tick(&mut self, now: Instant, frame: &mut Frame) -> bool {
        if self.galaxy.is_paused() {
            return false;
        }
        if self.space.width > 0.0 && self.space.height > 0.0 {
            self.galaxy.appear(self.space);
        }
        if let Some(rain) = self.rain.as_mut() {
            if rain.refresh(now) {
                rain.fill(&mut self.symbols);
            }
        }

        frame.clear();
        let mut canvas = TermCanvas::new(frame, self.settings.color_mode);
        let mut ctx = DrawCtx::new(&mut canvas, &self.symbols);
        self.galaxy.pulse(now, self.space, &mut ctx).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::config::Args;

    fn settings(argv: &[&str]) -> Settings {
        let mut full = vec!["galaxy", "--colormode", "24", "--seed", "7"];
        full.extend_from_slice(argv);
        Settings::from_args(&Args::try_parse_from(full).unwrap()).unwrap()
    }

    fn run(session: &mut Session, frame: &mut Frame, t0: Instant, ticks: u64) {
        for n in 1..=ticks {
            session.tick(t0 + Duration::from_millis(16 * n), frame);
        }
    }

    fn painted(frame: &Frame) -> usize {
        frame.cells().iter().filter(|c| !c.is_blank()).count()
    }

    #[test]
    fn falling_session_builds_its_population_on_first_tick() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&["--count", "25"]), 40, 12, t0);
        assert!(session.galaxy().population().is_none());

        let mut frame = Frame::new(40, 12, None);
        assert!(session.tick(t0, &mut frame));
        assert_eq!(session.galaxy().population().unwrap().len(), 25);

        run(&mut session, &mut frame, t0, 3);
        assert!(painted(&frame) > 0);
    }

    #[test]
    fn matrix_count_follows_the_terminal_width() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&["-e", "matrix", "--size", "16"]), 80, 24, t0);
        let mut frame = Frame::new(80, 24, None);
        session.tick(t0, &mut frame);
        assert_eq!(session.galaxy().population().unwrap().len(), 40);
    }

    #[test]
    fn rain_eventually_shows_glyphs() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&["-e", "rain"]), 20, 6, t0);
        let mut frame = Frame::new(20, 6, None);
        for n in 0..600u64 {
            session.tick(t0 + Duration::from_millis(16 * n), &mut frame);
            if painted(&frame) > 0 {
                return;
            }
        }
        panic!("no rain after 600 ticks");
    }

    #[test]
    fn unknown_symbol_tags_draw_nothing() {
        let t0 = Instant::now();
        let mut session = Session::new(
            settings(&["-e", "flying", "--symbols", "airpodspro"]),
            30,
            10,
            t0,
        );
        let mut frame = Frame::new(30, 10, None);
        run(&mut session, &mut frame, t0, 20);
        assert_eq!(session.galaxy().population().unwrap().len(), 100);
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn paused_tick_leaves_the_frame_alone() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&["-e", "hyper"]), 30, 10, t0);
        let mut frame = Frame::new(30, 10, None);
        run(&mut session, &mut frame, t0, 2);
        let before = frame.clone();

        session.toggle_pause(t0 + Duration::from_millis(40));
        assert!(session.is_paused());
        assert!(!session.tick(t0 + Duration::from_secs(1), &mut frame));
        assert_eq!(frame.cells(), before.cells());
    }

    #[test]
    fn restart_replaces_the_galaxy_at_the_new_size() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&["-e", "warp", "-n", "5"]), 30, 10, t0);
        let mut frame = Frame::new(30, 10, None);
        run(&mut session, &mut frame, t0, 3);
        assert_eq!(session.galaxy().pulses(), 3);

        session.restart(50, 20, t0 + Duration::from_secs(1));
        assert_eq!(session.size(), (50, 20));
        assert_eq!(session.space(), Size::new(400.0, 320.0));
        assert_eq!(session.restarts(), 1);
        assert_eq!(session.galaxy().pulses(), 0);
        assert!(session.galaxy().population().is_none());
    }

    #[test]
    fn zero_sized_terminal_waits_for_a_real_size() {
        let t0 = Instant::now();
        let mut session = Session::new(settings(&[]), 0, 0, t0);
        let mut frame = Frame::new(0, 0, None);
        assert!(session.tick(t0, &mut frame));
        assert!(session.galaxy().population().is_none());
    }
}
