//! Desktop frontend: a winit window with a pixels surface. Thin adapter
//! around the core machine; all semantics live in the `chip8` crate.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chip8::{
    run, Color, FrameBuffer, InputSource, Machine, Presenter, RunOptions, Signal, VideoOptions,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};
use clap::{command, Parser};
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{self, EventLoop},
    keyboard::{Key, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::Window,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "ROM", help = "Path of the ROM to run", value_hint = clap::ValueHint::FilePath)]
    rom: PathBuf,
    #[arg(long, default_value_t = 10, help = "Window pixels per framebuffer cell")]
    scale: u32,
    #[arg(long, default_value = "FFFFFF", help = "Foreground color (RRGGBB)")]
    fg: Color,
    #[arg(long, default_value = "000000", help = "Background color (RRGGBB)")]
    bg: Color,
    #[arg(long, help = "Skip the outline drawn around lit cells")]
    no_outlines: bool,
    #[arg(long, default_value_t = 11, help = "Instructions executed per 60 Hz frame")]
    steps_per_frame: usize,
}

impl Args {
    fn video(&self) -> VideoOptions {
        VideoOptions {
            scale_factor: self.scale,
            foreground: self.fg,
            background: self.bg,
            outlines: !self.no_outlines,
        }
    }
}

struct GfxState {
    window: Arc<Window>,
    pixels: Pixels<'static>,
}

struct App {
    video: VideoOptions,
    state: Option<GfxState>,
    signals: Vec<Signal>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(video: VideoOptions) -> Self {
        Self {
            video,
            state: None,
            signals: Vec::new(),
            init_error: None,
        }
    }

    fn init(&mut self, event_loop: &event_loop::ActiveEventLoop) -> anyhow::Result<()> {
        let surface_width = SCREEN_WIDTH as u32 * self.video.scale_factor;
        let surface_height = SCREEN_HEIGHT as u32 * self.video.scale_factor;

        let attrs = Window::default_attributes()
            .with_title("CHIP-8")
            .with_inner_size(LogicalSize::new(surface_width, surface_height))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = Pixels::new(surface_width, surface_height, surface_texture)
            .context("create pixels surface")?;

        self.state = Some(GfxState { window, pixels });
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &event_loop::ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.signals.push(Signal::Quit),
            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.as_mut() {
                    if let Err(e) = state.pixels.render() {
                        log::error!("redraw failed: {e}");
                    }
                }
            }
            WindowEvent::KeyboardInput {
                device_id: _,
                event,
                is_synthetic: _,
            } => {
                if !event.state.is_pressed() || event.repeat {
                    return;
                }
                match event.logical_key.as_ref() {
                    Key::Named(NamedKey::Space) => self.signals.push(Signal::TogglePause),
                    Key::Named(NamedKey::Escape) => self.signals.push(Signal::Quit),
                    _ => (),
                }
            }
            _ => (),
        }
    }
}

/// Owns the event loop and the window state; the interpreter loop drives it
/// through the two core capability traits.
struct Gui {
    event_loop: EventLoop<()>,
    app: App,
}

impl InputSource for Gui {
    fn poll(&mut self) -> anyhow::Result<Vec<Signal>> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        if let Some(e) = self.app.init_error.take() {
            return Err(e);
        }
        if let PumpStatus::Exit(_) = status {
            self.app.signals.push(Signal::Quit);
        }
        Ok(self.app.signals.drain(..).collect())
    }
}

impl Presenter for Gui {
    fn present(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        let Some(state) = self.app.state.as_mut() else {
            // window not mapped yet
            return Ok(());
        };

        let video = &self.app.video;
        let scale = video.scale_factor as usize;
        let surface_width = SCREEN_WIDTH * scale;

        for (i, pixel) in state.pixels.frame_mut().chunks_exact_mut(4).enumerate() {
            let px = i % surface_width;
            let py = i / surface_width;
            let lit = fb[py / scale][px / scale];

            let on_border = px % scale == 0
                || py % scale == 0
                || px % scale == scale - 1
                || py % scale == scale - 1;

            let color = if lit && !(video.outlines && on_border) {
                video.foreground
            } else {
                video.background
            };
            pixel.copy_from_slice(&[color.r, color.g, color.b, 0xFF]);
        }

        state.pixels.render().context("render frame")?;
        Ok(())
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
    log::debug!("{machine}");

    let event_loop = match EventLoop::new().context("create event loop") {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let mut gui = Gui {
        event_loop,
        app: App::new(args.video()),
    };

    let opts = RunOptions {
        steps_per_frame: args.steps_per_frame,
        ..RunOptions::default()
    };
    match run(&mut machine, &mut gui, &opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
