use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
};
use trifield_background::{
    AnimationDriver, BackgroundState, FieldSettings, MonotonicClock, Overlay, RepaintScheduler,
};
use trifield_config::Config;
use trifield_core::FillMode;

/// Poll timeout while nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Size divisor range reachable with `+` and `-`.
const MIN_DIVISOR: f64 = 1.0;
const MAX_DIVISOR: f64 = 32.0;

/// Glyph size relative to the band height, for SVG snapshots.
const GLYPH_SCALE: f64 = 0.6;

type Driver = AnimationDriver<MonotonicClock, RepaintScheduler>;

/// Build the background settings described by `config`.
pub fn field_settings(config: &Config) -> FieldSettings {
    FieldSettings {
        sizing: config.sizing(),
        overscan: config.overscan,
        stroke_width: config.stroke_width,
        background: config.background_rgba(),
        cell_width: config.cell_width,
        cell_height: config.cell_height,
    }
}

/// The interactive terminal view.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    background: BackgroundState,
    /// Current fill mode.
    fill: FillMode,
    /// Animation held by the user.
    paused: bool,
    /// Needs a redraw outside the frame loop.
    dirty: bool,
    /// Message shown in place of the help line until the next key.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self {
            running: false,
            background: BackgroundState::new(field_settings(&config)),
            fill: config.fill,
            paused: false,
            dirty: true,
            status: None,
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let mut driver = Driver::new(
            MonotonicClock::new(),
            RepaintScheduler::with_frame_rate(self.config.frame_rate),
        );
        self.running = true;
        self.sync_driver(&mut driver);

        while self.running {
            if self.dirty && !driver.is_running() {
                let time = self.frozen_time(&driver);
                terminal.draw(|frame| self.render(frame, time))?;
                self.dirty = false;
            }

            let timeout = driver
                .scheduler()
                .time_until_due()
                .unwrap_or(IDLE_POLL);
            self.handle_crossterm_events(timeout, &mut driver)?;

            if let Some(id) = driver.scheduler_mut().take_due() {
                driver.on_frame(id, |time| {
                    terminal.draw(|frame| self.render(frame, time)).map(|_| ())
                })?;
                self.dirty = false;
            }
        }

        driver.stop();
        info!("quit after {} animated frames", driver.frames());
        Ok(())
    }

    /// Time the field is drawn at while the driver is stopped.
    fn frozen_time(&self, driver: &Driver) -> f64 {
        match self.fill {
            FillMode::Static => self.config.static_time,
            FillMode::Animated => driver.elapsed(),
        }
    }

    /// Start or stop the driver to match the fill mode and pause state.
    fn sync_driver(&mut self, driver: &mut Driver) {
        let animate = self.running && self.fill == FillMode::Animated && !self.paused;
        if animate && !driver.is_running() {
            let resume = Duration::try_from_secs_f64(driver.elapsed()).unwrap_or_default();
            driver.start_from(resume);
        } else if !animate && driver.is_running() {
            driver.stop();
        }
        self.dirty = true;
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, time: f64) {
        let [body, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let band_rows = self.config.viewport.rows(body.height);
        let [band] = Layout::vertical([Constraint::Length(band_rows)])
            .flex(Flex::Center)
            .areas(body);
        self.background.render(frame, band, time);

        if !self.config.glyph.is_empty() && !band.is_empty() {
            let middle = Rect::new(band.x, band.y + band.height / 2, band.width, 1);
            let glyph = Line::from(Span::styled(
                self.config.glyph.as_str(),
                Style::new().fg(Color::White).bold(),
            ))
            .centered();
            frame.render_widget(glyph, middle);
        }

        frame.render_widget(self.help_line(), help);
    }

    fn help_line(&self) -> Line<'_> {
        if let Some(status) = &self.status {
            return Line::from(status.as_str().yellow()).centered();
        }
        let pause = if self.paused { " resume  " } else { " pause  " };
        Line::from(vec![
            "q".bold(),
            " quit  ".dark_gray(),
            "space".bold(),
            pause.dark_gray(),
            "f".bold(),
            format!(" fill: {}  ", self.fill.name()).dark_gray(),
            "o".bold(),
            " overscan  ".dark_gray(),
            "+/-".bold(),
            " size  ".dark_gray(),
            "s".bold(),
            " snapshot".dark_gray(),
        ])
        .centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(
        &mut self,
        timeout: Duration,
        driver: &mut Driver,
    ) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.on_key_event(key, driver)
                }
                Event::Resize(_, _) => self.dirty = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent, driver: &mut Driver) {
        self.status = None;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => {
                self.paused = !self.paused;
                self.sync_driver(driver);
            }
            (_, KeyCode::Char('f')) => {
                self.fill = self.fill.toggle();
                self.sync_driver(driver);
            }
            (_, KeyCode::Char('o')) => {
                self.config.overscan = !self.config.overscan;
                self.apply_settings();
            }
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.adjust_divisor(1.0),
            (_, KeyCode::Char('-')) => self.adjust_divisor(-1.0),
            (_, KeyCode::Char('s')) => self.save_snapshot(),
            _ => {}
        }
        // The help line changes with every key.
        self.dirty = true;
    }

    /// More triangles per screen height with a positive `step`.
    fn adjust_divisor(&mut self, step: f64) {
        self.config.size_divisor = (self.config.size_divisor + step).clamp(MIN_DIVISOR, MAX_DIVISOR);
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        self.background.set_settings(field_settings(&self.config));
        self.dirty = true;
    }

    /// Write the field as last drawn to an SVG file in the working directory.
    fn save_snapshot(&mut self) {
        let overlay = (!self.config.glyph.is_empty()).then(|| Overlay {
            text: self.config.glyph.clone(),
            font_size: self.snapshot_font_size(),
        });
        let Some(svg) = self.background.snapshot_svg(overlay) else {
            self.status = Some("nothing drawn yet".to_string());
            return;
        };

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_secs())
            .unwrap_or_default();
        let path = PathBuf::from(format!("trifield-{stamp}.svg"));
        match fs::write(&path, svg) {
            Ok(()) => {
                info!("saved snapshot to {}", path.display());
                self.status = Some(format!("saved {}", path.display()));
            }
            Err(err) => {
                warn!("failed to save snapshot to {}: {err}", path.display());
                self.status = Some(format!("snapshot failed: {err}"));
            }
        }
    }

    fn snapshot_font_size(&self) -> f64 {
        let height = self
            .background
            .field()
            .map(|field| field.params().height())
            .unwrap_or_default();
        (height * GLYPH_SCALE).round()
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
