use clap::Parser;
use crossterm::event::{self, Event};
use env_logger::Env;
use log::{error, info};
use std::fs::File;
use std::ops::ControlFlow;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tiranga3d::clock::{run_frames, SystemClock};
use tiranga3d::state::AppState;
use tiranga3d::terminal::TerminalHost;
use tiranga3d::widget::{FlagWidget, Response};
use tiranga3d::{Args, Result, SceneRenderer, Settings};

/// Logs go to a file when asked; the terminal itself is the drawing surface
fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

struct App {
    host: TerminalHost,
    renderer: SceneRenderer,
    widget: FlagWidget,
    state: AppState,
    frame_time: Duration,
    frames_left: Option<u64>,
}

impl App {
    /// Draws one frame, then handles input until the next frame is due.
    /// Returns false once the user quits or the frame limit is reached.
    fn frame(&mut self, dt: f64) -> Result<bool> {
        let deadline = Instant::now() + self.frame_time;

        self.state.fps.tick(dt);
        if !self.renderer.frame(dt) {
            return Ok(false);
        }
        let grid = self.widget.compose(&self.renderer, &self.state);
        self.host.present(&grid)?;

        if let Some(left) = self.frames_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                return Ok(false);
            }
        }

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            let event = event::read()?;
            if let Event::Resize(cols, rows) = event {
                self.host.resize(cols, rows);
            }
            if self.widget.event(&event, &mut self.renderer, &mut self.state) == Response::Quit {
                return Ok(false);
            }
            if remaining.is_zero() {
                break;
            }
        }
        Ok(true)
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = Settings::from_args(args)?;
    info!("starting with {settings:?}");

    let host = TerminalHost::stdout()?;
    let renderer = SceneRenderer::new(host.viewport(), &settings)?;
    let mut app = App {
        host,
        renderer,
        widget: FlagWidget::new(),
        state: AppState::default(),
        frame_time: Duration::from_secs_f64(1.0 / settings.fps as f64),
        frames_left: settings.frames,
    };

    let mut clock = SystemClock::new();
    let result = run_frames(&mut clock, |dt| match app.frame(dt) {
        Ok(true) => ControlFlow::Continue(()),
        Ok(false) => ControlFlow::Break(Ok(())),
        Err(err) => ControlFlow::Break(Err(err)),
    });

    app.renderer.teardown();
    result
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(args.log_file.as_deref()) {
        eprintln!("tiranga3d: could not open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("tiranga3d: {err}");
            ExitCode::FAILURE
        }
    }
}
