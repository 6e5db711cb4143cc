// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Owns the alternate screen for its lifetime and pushes frames to it,
/// rewriting only the cells that changed since the last present.
pub struct Terminal {
    stdout: Stdout,
    last: Option<Frame>,
    run_buf: String,
}

fn leave<W: Write>(out: &mut W) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

fn enter<W: Write>(out: &mut W) -> Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    let _ = out.execute(terminal::DisableLineWrap);
    out.execute(SetAttribute(Attribute::Reset))?;
    out.execute(ResetColor)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.flush()
}

#[derive(Debug, PartialEq, Eq)]
struct Run {
    x: u16,
    y: u16,
    len: usize,
    fg: Option<Color>,
    bg: Option<Color>,
}

/// Changed runs of `next` relative to `prev`, or every cell when there is
/// no comparable previous frame.
fn changed_runs(prev: Option<&Frame>, next: &Frame) -> Vec<Run> {
    let prev = prev.filter(|p| p.width == next.width && p.height == next.height);
    let width = next.width as usize;
    let mut runs = Vec::new();
    if width == 0 {
        return runs;
    }
    for (y, row) in next.cells().chunks(width).enumerate() {
        let old = prev.map(|p| &p.cells()[y * width..(y + 1) * width]);
        let mut x = 0;
        while x < width {
            let cell = row[x];
            if old.is_some_and(|o| o[x] == cell) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < width {
                let c = row[x];
                if old.is_some_and(|o| o[x] == c) || c.fg != cell.fg || c.bg != cell.bg {
                    break;
                }
                x += 1;
            }
            runs.push(Run {
                x: start as u16,
                y: y as u16,
                len: x - start,
                fg: cell.fg,
                bg: cell.bg,
            });
        }
    }
    runs
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        if let Err(e) = enter(&mut out) {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn present(&mut self, frame: &Frame) -> Result<usize> {
        let resized = self
            .last
            .as_ref()
            .map_or(true, |l| l.width != frame.width || l.height != frame.height);
        if resized {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = None;
        }

        let runs = changed_runs(self.last.as_ref(), frame);
        let width = frame.width as usize;
        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_bg: Option<Option<Color>> = None;
        let mut cur_pos: Option<(u16, u16)> = None;

        for run in &runs {
            let start = run.y as usize * width + run.x as usize;
            self.run_buf.clear();
            self.run_buf
                .extend(frame.cells()[start..start + run.len].iter().map(|c: &Cell| c.ch));

            if cur_pos != Some((run.x, run.y)) {
                self.stdout.queue(cursor::MoveTo(run.x, run.y))?;
            }
            if cur_fg != Some(run.fg) {
                self.stdout
                    .queue(SetForegroundColor(run.fg.unwrap_or(Color::Reset)))?;
                cur_fg = Some(run.fg);
            }
            if cur_bg != Some(run.bg) {
                self.stdout
                    .queue(SetBackgroundColor(run.bg.unwrap_or(Color::Reset)))?;
                cur_bg = Some(run.bg);
            }
            self.stdout.queue(Print(self.run_buf.as_str()))?;

            let next_x = run.x as usize + run.len;
            cur_pos = (next_x < width).then_some((next_x as u16, run.y));
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        match self.last.as_mut() {
            Some(last) => last.clone_from(frame),
            None => self.last = Some(frame.clone()),
        }
        Ok(runs.len())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
