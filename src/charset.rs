// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng};

use crate::error::{GalaxyError, Result};
use crate::symbols::{Glyph, SymbolTable};

const MATRIX_CHARS: &str = "abcdefghijklmnopqrstuvwxyz1234567890";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphSet {
    Matrix,
    Katakana,
    Binary,
    Hex,
    Ascii,
    Greek,
    Braille,
    Runic,
    Dna,
}

impl GlyphSet {
    pub const ALL: [GlyphSet; 9] = [
        GlyphSet::Matrix,
        GlyphSet::Katakana,
        GlyphSet::Binary,
        GlyphSet::Hex,
        GlyphSet::Ascii,
        GlyphSet::Greek,
        GlyphSet::Braille,
        GlyphSet::Runic,
        GlyphSet::Dna,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GlyphSet::Matrix => "matrix",
            GlyphSet::Katakana => "katakana",
            GlyphSet::Binary => "binary",
            GlyphSet::Hex => "hex",
            GlyphSet::Ascii => "ascii",
            GlyphSet::Greek => "greek",
            GlyphSet::Braille => "braille",
            GlyphSet::Runic => "runic",
            GlyphSet::Dna => "dna",
        }
    }

    pub fn from_name(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" | "auto" => Ok(GlyphSet::Matrix),
            "katakana" => Ok(GlyphSet::Katakana),
            "bin" | "binary" | "01" => Ok(GlyphSet::Binary),
            "hex" | "hexadecimal" => Ok(GlyphSet::Hex),
            "ascii" => Ok(GlyphSet::Ascii),
            "greek" => Ok(GlyphSet::Greek),
            "braille" => Ok(GlyphSet::Braille),
            "runic" => Ok(GlyphSet::Runic),
            "dna" => Ok(GlyphSet::Dna),
            _ => Err(GalaxyError::UnknownCharset(s.to_string())),
        }
    }

    pub fn chars(self) -> Vec<char> {
        let mut out = Vec::new();
        match self {
            GlyphSet::Matrix => out.extend(MATRIX_CHARS.chars()),
            GlyphSet::Katakana => push_range(&mut out, 0xFF66, 0xFF9D),
            GlyphSet::Binary => push_range(&mut out, 0x30, 0x31),
            GlyphSet::Hex => {
                push_range(&mut out, 0x30, 0x39);
                push_range(&mut out, 0x41, 0x46);
            }
            GlyphSet::Ascii => push_range(&mut out, 0x21, 0x7E),
            GlyphSet::Greek => {
                push_range(&mut out, 0x0391, 0x03A1);
                push_range(&mut out, 0x03A3, 0x03A9);
                push_range(&mut out, 0x03B1, 0x03C9);
            }
            GlyphSet::Braille => push_range(&mut out, 0x2801, 0x28FF),
            GlyphSet::Runic => push_range(&mut out, 0x16A0, 0x16EA),
            GlyphSet::Dna => out.extend("ACGT".chars()),
        }
        out
    }
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    out.extend((start..=end).filter_map(char::from_u32));
}

/// Where row `index` of a shifted stack reads from: forward by `shift` when
/// that stays in range, otherwise backward, otherwise unshifted.
pub fn shifted_index(index: usize, shift: usize, len: usize) -> usize {
    let max = len.saturating_sub(1);
    if index + shift > max {
        index.checked_sub(shift).unwrap_or(index)
    } else {
        index + shift
    }
}

/// The per-column glyph stacks of the rain effect. Each column has its own
/// shift, re-rolled on a fixed wall-clock beat independent of the pulses.
#[derive(Debug)]
pub struct RainGlyphs {
    chars: Vec<char>,
    shifts: Vec<usize>,
    rows: usize,
    next_refresh: Instant,
    rng: StdRng,
}

impl RainGlyphs {
    pub const REFRESH_EVERY: Duration = Duration::from_millis(200);

    pub fn new(set: GlyphSet, columns: usize, rows: usize, now: Instant, rng: StdRng) -> Self {
        let mut chars = set.chars();
        if chars.is_empty() {
            chars = MATRIX_CHARS.chars().collect();
        }
        Self {
            chars,
            shifts: vec![0; columns],
            rows,
            next_refresh: now + Self::REFRESH_EVERY,
            rng,
        }
    }

    pub fn columns(&self) -> usize {
        self.shifts.len()
    }

    pub fn refresh(&mut self, now: Instant) -> bool {
        if now < self.next_refresh {
            return false;
        }
        let len = self.chars.len();
        for shift in &mut self.shifts {
            *shift = self.rng.random_range(0..len);
        }
        self.next_refresh += Self::REFRESH_EVERY;
        if self.next_refresh <= now {
            self.next_refresh = now + Self::REFRESH_EVERY;
        }
        true
    }

    pub fn stack(&self, column: usize) -> Vec<char> {
        let len = self.chars.len();
        let shift = self.shifts.get(column).copied().unwrap_or(0);
        (0..self.rows)
            .map(|row| self.chars[shifted_index(row % len, shift, len)])
            .collect()
    }

    pub fn fill(&self, table: &mut SymbolTable<Glyph>) {
        for column in 0..self.columns() {
            table.insert(column, Glyph::Stack(self.stack(column)));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::symbols::SymbolKey;

    #[test]
    fn default_set_is_letters_then_digits() {
        let chars = GlyphSet::Matrix.chars();
        assert_eq!(chars.len(), 36);
        assert_eq!(chars[0], 'a');
        assert_eq!(chars[35], '0');
    }

    #[test]
    fn every_set_is_non_empty_and_parses_by_name() {
        for set in GlyphSet::ALL {
            assert!(!set.chars().is_empty(), "{}", set.name());
            assert_eq!(GlyphSet::from_name(set.name()).unwrap(), set);
        }
        assert_eq!(GlyphSet::Binary.chars(), vec!['0', '1']);
        assert!(matches!(
            GlyphSet::from_name("klingon"),
            Err(GalaxyError::UnknownCharset(_))
        ));
    }

    #[test]
    fn shifted_index_walks_forward_then_back() {
        assert_eq!(shifted_index(0, 5, 36), 5);
        assert_eq!(shifted_index(30, 5, 36), 35);
        assert_eq!(shifted_index(33, 5, 36), 28);
        assert_eq!(shifted_index(2, 35, 36), 2);
        assert_eq!(shifted_index(0, 0, 1), 0);
    }

    #[test]
    fn stacks_fill_every_row_and_start_unshifted() {
        let t0 = Instant::now();
        let glyphs = RainGlyphs::new(GlyphSet::Matrix, 3, 40, t0, StdRng::seed_from_u64(1));
        let stack = glyphs.stack(1);
        assert_eq!(stack.len(), 40);
        assert_eq!(stack[0], 'a');
        assert_eq!(stack[36], 'a');
        assert_eq!(glyphs.stack(99).len(), 40);
    }

    #[test]
    fn refresh_follows_the_wall_clock_beat() {
        let t0 = Instant::now();
        let mut glyphs = RainGlyphs::new(GlyphSet::Hex, 4, 16, t0, StdRng::seed_from_u64(2));
        assert!(!glyphs.refresh(t0 + Duration::from_millis(199)));
        assert!(glyphs.refresh(t0 + Duration::from_millis(200)));
        assert!(!glyphs.refresh(t0 + Duration::from_millis(250)));
        assert!(glyphs.refresh(t0 + Duration::from_secs(5)));
        assert!(!glyphs.refresh(t0 + Duration::from_millis(5100)));
    }

    #[test]
    fn fill_publishes_one_stack_per_column() {
        let t0 = Instant::now();
        let glyphs = RainGlyphs::new(GlyphSet::Dna, 2, 3, t0, StdRng::seed_from_u64(2));
        let mut table = SymbolTable::new();
        glyphs.fill(&mut table);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&SymbolKey::Index(1)),
            Some(&Glyph::Stack(vec!['A', 'C', 'G']))
        );
    }
}
