// Copyright (c) 2026 rezky_nightky

mod canvas;
mod cell;
mod charset;
mod clock;
mod config;
mod element;
mod error;
mod falling;
mod flying;
mod frame;
mod galaxy;
mod hyper_jump;
mod logging;
mod palette;
mod population;
mod rain;
mod raster;
mod runtime;
mod session;
mod symbols;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tracing::info;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, color_mode_label, default_params_usage_for_help, detect_color_mode,
    detect_color_mode_auto, print_list_charsets, print_list_colors, print_list_effects,
    print_list_symbols, Args, Settings,
};
use crate::error::Result;
use crate::frame::Frame;
use crate::palette::background;
use crate::session::Session;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("GALAXY_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_restore_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn run_info_switches(args: &Args) -> Result<bool> {
    if args.list_effects {
        print_list_effects();
    } else if args.list_colors {
        print_list_colors();
    } else if args.list_symbols {
        print_list_symbols();
    } else if args.list_charsets {
        print_list_charsets();
    } else if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(args)?;

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
    } else if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    } else if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    } else {
        return Ok(false);
    }
    Ok(true)
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    drawn_frames: u64,
    runs: u64,
    work_sum_s: f64,
    work_max_s: f64,
    overshoot_frames: u64,
}

impl PerfStats {
    fn record(&mut self, drawn: bool, runs: usize, work_s: f64, target_period_s: f64) {
        self.frames = self.frames.saturating_add(1);
        if drawn {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        self.runs = self.runs.saturating_add(runs as u64);
        self.work_sum_s += work_s;
        self.work_max_s = self.work_max_s.max(work_s);
        if work_s > target_period_s {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_runs_per_frame: {:.1}", self.runs as f64 / frames);
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0
        );
    }
}

fn run(settings: Settings) -> Result<()> {
    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let bg = background(settings.color_mode, settings.default_background);
    let screensaver = settings.screensaver;
    let perf_enabled = settings.perf_stats;
    let target_fps = settings.fps;
    let duration = settings.duration;

    info!(
        effect = settings.effect.name(),
        cols = w,
        rows = h,
        color_mode = color_mode_label(settings.color_mode),
        "starting"
    );

    let start_time = Instant::now();
    let mut session = Session::new(settings, w, h, start_time);
    let mut frame = Frame::new(w, h, bg);
    let end_time = duration.map(|d| start_time + d);

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let mut restart = false;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if screensaver {
                            running = false;
                            break;
                        }
                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Char('p') => session.toggle_pause(Instant::now()),
                            KeyCode::Char(' ') => restart = true,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || restart || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            session.restart(nw, nh, Instant::now());
            frame = Frame::new(nw, nh, bg);
        } else if restart {
            let (cw, ch) = session.size();
            session.restart(cw, ch, Instant::now());
        }

        let work_start = Instant::now();
        let drawn = session.tick(work_start, &mut frame);
        let runs = if drawn { term.present(&frame)? } else { 0 };
        if perf_enabled {
            perf.record(
                drawn,
                runs,
                work_start.elapsed().as_secs_f64(),
                target_period.as_secs_f64(),
            );
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    info!(
        pulses = session.galaxy().pulses(),
        restarts = session.restarts(),
        "stopped"
    );
    if perf_enabled {
        perf.print(start_time.elapsed(), target_fps);
    }
    Ok(())
}

fn main() {
    install_restore_handlers();
    let args = parse_args();

    let outcome = run_info_switches(&args).and_then(|handled| {
        if handled {
            return Ok(());
        }
        let settings = Settings::from_args(&args)?;
        logging::init(args.log_file.as_deref())?;
        run(settings)
    });

    if let Err(e) = outcome {
        restore_terminal_best_effort();
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
