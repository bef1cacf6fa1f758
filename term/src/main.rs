//! Terminal frontend: renders the framebuffer with crossterm in raw mode,
//! one block character per pixel. Thin adapter around the core machine.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chip8::{
    run, FrameBuffer, InputSource, Machine, Presenter, RunOptions, Signal, VideoOptions,
};
use clap::{command, Parser};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, style, terminal};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "ROM", help = "Path of the ROM to run", value_hint = clap::ValueHint::FilePath)]
    rom: PathBuf,
    #[arg(long, default_value = "FFFFFF", help = "Foreground color (RRGGBB)")]
    fg: chip8::Color,
    #[arg(long, default_value = "000000", help = "Background color (RRGGBB)")]
    bg: chip8::Color,
    #[arg(long, default_value_t = 11, help = "Instructions executed per 60 Hz frame")]
    steps_per_frame: usize,
}

fn term_color(color: chip8::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Raw-mode terminal adapter. Restores the terminal on drop so a fault in
/// the interpreter loop cannot leave the shell unusable.
struct Term {
    stdout: io::Stdout,
    video: VideoOptions,
}

impl Term {
    fn new(video: VideoOptions) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)
            .context("enter alternate screen")?;
        Ok(Self { stdout, video })
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Presenter for Term {
    fn present(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(term_color(self.video.foreground)),
            SetBackgroundColor(term_color(self.video.background)),
        )?;
        for row in fb {
            let line: String = row.iter().map(|&lit| if lit { '█' } else { ' ' }).collect();
            queue!(self.stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }
        self.stdout.flush().context("flush frame")?;
        Ok(())
    }
}

impl InputSource for Term {
    fn poll(&mut self) -> anyhow::Result<Vec<Signal>> {
        let mut signals = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        signals.push(Signal::Quit)
                    }
                    KeyCode::Esc | KeyCode::Char('q') => signals.push(Signal::Quit),
                    KeyCode::Char(' ') => signals.push(Signal::TogglePause),
                    _ => {}
                }
            }
        }
        Ok(signals)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut machine = Machine::new();
    let rom = match std::fs::read(&args.rom)
        .with_context(|| format!("read rom file {}", args.rom.display()))
    {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = machine.load_rom(&rom) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    let video = VideoOptions {
        foreground: args.fg,
        background: args.bg,
        ..VideoOptions::default()
    };
    let mut term = match Term::new(video) {
        Ok(term) => term,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let opts = RunOptions {
        steps_per_frame: args.steps_per_frame,
        ..RunOptions::default()
    };
    let result = run(&mut machine, &mut term, &opts);
    // restore the terminal before reporting anything
    drop(term);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
