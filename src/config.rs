// Copyright (c) 2026 rezky_nightky

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::charset::GlyphSet;
use crate::error::{GalaxyError, Result};
use crate::palette::{parse_color_source, ColorSource, Rgba, FLYING_COLORS, NAMED_COLORS};
use crate::runtime::{ColorMode, EffectKind};
use crate::symbols::{BUILTIN_SYMBOLS, MATH_TAGS};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  galaxy --effect falling --count 100 --color white --fps 60 --max-delta 0.25 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_usage(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix("  galaxy") {
            out.push_str("  \x1b[1;34mgalaxy\x1b[0m");
            out.push_str(rest);
        } else if line.ends_with(':') && line == line.to_ascii_uppercase() {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_usage(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "galaxy",
    version,
    disable_version_flag = true,
    about = "Animated star fields, warp jumps, flying glyphs and digital rain in the terminal"
)]
pub struct Args {
    #[arg(
        short = 'e',
        long = "effect",
        default_value = "falling",
        help_heading = "EFFECT",
        help = "Effect to run (see --list-effects)"
    )]
    pub effect: String,

    #[arg(
        short = 'n',
        long = "count",
        default_value_t = 100,
        help_heading = "EFFECT",
        help = "Number of elements (min 0 max 100000; matrix derives it from the width)"
    )]
    pub count: u32,

    #[arg(
        short = 'c',
        long = "color",
        help_heading = "APPEARANCE",
        help = "Element color: a name, #rrggbb, random, or a comma list (see --list-colors)"
    )]
    pub color: Option<String>,

    #[arg(
        long = "symbols",
        help_heading = "EFFECT",
        help = "Comma separated symbol tags for flying (see --list-symbols)"
    )]
    pub symbols: Option<String>,

    #[arg(
        long = "size",
        default_value_t = 8.0,
        help_heading = "EFFECT",
        help = "Rain glyph width in pixels, one cell is 8 wide (min 1 max 400)"
    )]
    pub size: f64,

    #[arg(
        long = "charset",
        default_value = "matrix",
        help_heading = "EFFECT",
        help = "Glyph set for the rain stacks (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "TIMING",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "max-delta",
        default_value_t = 0.25,
        help_heading = "TIMING",
        help = "Cap on the time step handed to elements, in seconds (min 0 max 10; 0 disables)"
    )]
    pub max_delta: f64,

    #[arg(
        long = "seed",
        help_heading = "TIMING",
        help = "Seed for the random source (default: from the OS)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "perf-stats",
        help_heading = "GENERAL",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with GALAXY_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-effects",
        help_heading = "HELP",
        help = "List available effects and exit"
    )]
    pub list_effects: bool,

    #[arg(
        long = "list-symbols",
        help_heading = "HELP",
        help = "List built-in symbol tags and exit"
    )]
    pub list_symbols: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List named colors and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List rain glyph sets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub effect: EffectKind,
    pub count: usize,
    pub color: ColorSource,
    pub symbols: Vec<String>,
    pub glyph_size: f64,
    pub glyph_set: GlyphSet,
    pub fps: f64,
    pub duration: Option<Duration>,
    pub max_delta: Option<Duration>,
    pub seed: Option<u64>,
    pub color_mode: ColorMode,
    pub default_background: bool,
    pub screensaver: bool,
    pub perf_stats: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let effect: EffectKind = args.effect.parse()?;
        let count = require_u32_range("--count", args.count, 0, 100_000)? as usize;
        let color = match &args.color {
            Some(spec) => parse_color_source(spec)?,
            None => default_color(effect),
        };
        let symbols = match &args.symbols {
            Some(list) => parse_tags(list),
            None => MATH_TAGS.iter().map(|t| t.to_string()).collect(),
        };
        if symbols.is_empty() {
            return Err(GalaxyError::invalid(
                "--symbols",
                args.symbols.as_deref().unwrap_or_default(),
                "at least one tag",
            ));
        }
        let glyph_size = require_f64_range("--size", args.size, 1.0, 400.0)?;
        let glyph_set = GlyphSet::from_name(&args.charset)?;
        let fps = require_f64_range("--fps", args.fps, 1.0, 240.0)?;

        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(GalaxyError::invalid("--duration", s, "must be a finite number"))
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        let max_delta = require_f64_range("--max-delta", args.max_delta, 0.0, 10.0)?;
        let max_delta = (max_delta > 0.0).then(|| Duration::from_secs_f64(max_delta));

        Ok(Self {
            effect,
            count,
            color,
            symbols,
            glyph_size,
            glyph_set,
            fps,
            duration,
            max_delta,
            seed: args.seed,
            color_mode: detect_color_mode(args)?,
            default_background: matches!(
                args.color_bg,
                ColorBg::DefaultBackground | ColorBg::Transparent
            ),
            screensaver: args.screensaver,
            perf_stats: args.perf_stats,
        })
    }
}

fn default_color(effect: EffectKind) -> ColorSource {
    match effect {
        EffectKind::Flying => ColorSource::OneOf(FLYING_COLORS.to_vec()),
        EffectKind::Matrix => ColorSource::Fixed(Rgba::GREEN),
        _ => ColorSource::Fixed(Rgba::WHITE),
    }
}

fn parse_tags(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn require_f64_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(GalaxyError::invalid(name, v, "must be a finite number"));
    }
    if v < min || v > max {
        return Err(GalaxyError::invalid(name, v, format!("min {} max {}", min, max)));
    }
    Ok(v)
}

fn require_u32_range(name: &'static str, v: u32, min: u32, max: u32) -> Result<u32> {
    if v < min || v > max {
        return Err(GalaxyError::invalid(name, v, format!("min {} max {}", min, max)));
    }
    Ok(v)
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color256
}

pub fn detect_color_mode(args: &Args) -> Result<ColorMode> {
    match args.colormode {
        None => Ok(detect_color_mode_auto()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8) | Some(256) => Ok(ColorMode::Color256),
        Some(24) | Some(32) => Ok(ColorMode::TrueColor),
        Some(m) => Err(GalaxyError::invalid(
            "--colormode",
            m,
            "allowed: 0,16,8/256,24/32",
        )),
    }
}

pub fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn print_list_header(title: &str, flag: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", title);
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with {}.\x1b[0m", flag);
    } else {
        println!("{}", title);
        println!("NOTE: Use only the VALUE (left side) with {}.", flag);
    }
    println!();
}

pub fn print_list_effects() {
    print_list_header("AVAILABLE EFFECTS:", "--effect");
    println!("VALUE          DESCRIPTION");
    for kind in EffectKind::ALL {
        println!("{:<14} {}", kind.name(), kind.describe());
    }
}

pub fn print_list_colors() {
    print_list_header("AVAILABLE COLORS:", "--color");
    println!("VALUE          RGB");
    for (name, c) in NAMED_COLORS {
        println!("{:<14} #{:02x}{:02x}{:02x}", name, c.r, c.g, c.b);
    }
    println!("random         A fresh random color per element");
    println!();
    println!("Also accepted: #rrggbb, and comma lists like pink,purple,#ffffff");
}

pub fn print_list_symbols() {
    print_list_header("BUILT-IN SYMBOLS:", "--symbols");
    println!("VALUE                            GLYPH");
    for (tag, ch) in BUILTIN_SYMBOLS {
        let default = if MATH_TAGS.contains(tag) { "  (default)" } else { "" };
        println!("{:<32} {}{}", tag, ch, default);
    }
}

pub fn print_list_charsets() {
    print_list_header("AVAILABLE CHARSETS:", "--charset");
    println!("VALUE          SAMPLE");
    for set in GlyphSet::ALL {
        let sample: String = set.chars().into_iter().take(16).collect();
        println!("{:<14} {}", set.name(), sample);
    }
}
