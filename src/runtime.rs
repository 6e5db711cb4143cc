// Copyright (c) 2026 rezky_nightky

use std::str::FromStr;

use crate::error::GalaxyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Falling,
    HyperCircle,
    HyperLine,
    Flying,
    Matrix,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Falling,
        EffectKind::HyperCircle,
        EffectKind::HyperLine,
        EffectKind::Flying,
        EffectKind::Matrix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Falling => "falling",
            EffectKind::HyperCircle => "hyper-circle",
            EffectKind::HyperLine => "hyper-line",
            EffectKind::Flying => "flying",
            EffectKind::Matrix => "matrix",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            EffectKind::Falling => "Stars falling top to bottom (alias: stars)",
            EffectKind::HyperCircle => "Hyper jump with round stars (alias: hyper)",
            EffectKind::HyperLine => "Hyper jump with streaks toward the center (alias: warp)",
            EffectKind::Flying => "Glyphs flying from the center to the edges (alias: math)",
            EffectKind::Matrix => "Digital rain columns (alias: rain)",
        }
    }
}

impl FromStr for EffectKind {
    type Err = GalaxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "falling" | "falling-stars" | "falling_stars" | "stars" => Ok(EffectKind::Falling),
            "hyper-circle" | "hyper_circle" | "hypercircle" | "hyper" => {
                Ok(EffectKind::HyperCircle)
            }
            "hyper-line" | "hyper_line" | "hyperline" | "warp" => Ok(EffectKind::HyperLine),
            "flying" | "flying-particles" | "flying_particles" | "math" => Ok(EffectKind::Flying),
            "matrix" | "rain" => Ok(EffectKind::Matrix),
            _ => Err(GalaxyError::UnknownEffect(s.to_string())),
        }
    }
}
