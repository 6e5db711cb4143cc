// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::GalaxyError;
use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(52, 199, 89);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn multiply(self, other: Rgba) -> Self {
        let mul = |x: u8, y: u8| ((x as u16 * y as u16 + 127) / 255) as u8;
        Self {
            r: mul(self.r, other.r),
            g: mul(self.g, other.g),
            b: mul(self.b, other.b),
            a: self.a * other.a,
        }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn over_black(self) -> (u8, u8, u8) {
        let k = self.a.clamp(0.0, 1.0);
        let f = |v: u8| ((v as f32) * k).round().clamp(0.0, 255.0) as u8;
        (f(self.r), f(self.g), f(self.b))
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

pub const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("white", Rgba::WHITE),
    ("black", Rgba::BLACK),
    ("red", Rgba::rgb(255, 59, 48)),
    ("orange", Rgba::rgb(255, 149, 0)),
    ("yellow", Rgba::rgb(255, 204, 0)),
    ("green", Rgba::GREEN),
    ("mint", Rgba::rgb(0, 199, 190)),
    ("teal", Rgba::rgb(48, 176, 199)),
    ("cyan", Rgba::rgb(50, 173, 230)),
    ("blue", Rgba::rgb(0, 122, 255)),
    ("indigo", Rgba::rgb(88, 86, 214)),
    ("purple", Rgba::rgb(175, 82, 222)),
    ("pink", Rgba::rgb(255, 45, 85)),
    ("brown", Rgba::rgb(162, 132, 94)),
    ("gray", Rgba::rgb(142, 142, 147)),
    ("lilac", Rgba::rgb(196, 181, 253)),
    ("violet", Rgba::rgb(139, 92, 246)),
    ("plum", Rgba::rgb(109, 40, 217)),
];

pub const FLYING_COLORS: [Rgba; 3] = [
    Rgba::rgb(196, 181, 253),
    Rgba::rgb(139, 92, 246),
    Rgba::rgb(109, 40, 217),
];

#[derive(Clone, Debug, PartialEq)]
pub enum ColorSource {
    Fixed(Rgba),
    Random,
    OneOf(Vec<Rgba>),
}

impl ColorSource {
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Rgba {
        match self {
            ColorSource::Fixed(c) => *c,
            ColorSource::Random => Rgba::rgb(rng.random(), rng.random(), rng.random()),
            ColorSource::OneOf(list) => list.choose(rng).copied().unwrap_or(Rgba::WHITE),
        }
    }
}

pub fn parse_color(s: &str) -> Result<Rgba, GalaxyError> {
    let name = s.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let v = u32::from_str_radix(hex, 16)
                .map_err(|_| GalaxyError::UnknownColor(s.to_string()))?;
            return Ok(Rgba::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8));
        }
        return Err(GalaxyError::UnknownColor(s.to_string()));
    }
    let name = if name == "grey" { "gray".to_string() } else { name };
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, c)| c)
        .ok_or_else(|| GalaxyError::UnknownColor(s.to_string()))
}

pub fn parse_color_source(s: &str) -> Result<ColorSource, GalaxyError> {
    if s.trim().eq_ignore_ascii_case("random") {
        return Ok(ColorSource::Random);
    }
    let mut list = Vec::new();
    for part in s.split(',') {
        if part.trim().is_empty() {
            continue;
        }
        list.push(parse_color(part)?);
    }
    match list.len() {
        0 => Err(GalaxyError::UnknownColor(s.to_string())),
        1 => Ok(ColorSource::Fixed(list[0])),
        _ => Ok(ColorSource::OneOf(list)),
    }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5) + 127) / 255;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray_v) = match avg {
        0..=7 => (16, 0),
        239..=255 => (231, 255),
        _ => {
            let i = (avg - 8) / 10;
            (232 + i, 8 + 10 * i)
        }
    };
    let gray_dist = dist2(r, g, b, gray_v, gray_v, gray_v);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, (cr, cg, cb))| dist2(r, g, b, *cr, *cg, *cb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

/// Maps an opaque RGB triple onto what the terminal can show. `None` means
/// "leave the terminal's default foreground".
pub fn term_color(mode: ColorMode, (r, g, b): (u8, u8, u8)) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
    }
}

pub fn background(mode: ColorMode, default_background: bool) -> Option<Color> {
    if default_background {
        return None;
    }
    Some(match mode {
        ColorMode::Color16 | ColorMode::Mono => Color::Black,
        ColorMode::TrueColor => Color::Rgb { r: 0, g: 0, b: 0 },
        ColorMode::Color256 => Color::AnsiValue(16),
    })
}
