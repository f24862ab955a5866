//! Top-level application loop.
//!
//! `AppState` owns the effect [`Session`] and the status line.  It applies
//! [`Control`]s from the window and [`SourceEvent`]s from the hand source,
//! and `run` drives both at ~60 fps.

use std::path::PathBuf;
use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use elemental_fx::{FxConfig, PowerMode, Session, TrackingFrame, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use crate::tracking::{spawn_hand_source, SourceEvent};
use crate::visualizer::{Control, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_WIDTH:  usize = 1280;
pub const DEFAULT_HEIGHT: usize = 720;

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub fx:     FxConfig,
    pub width:  usize,
    pub height: usize,
    /// Fixed RNG seed for reproducible effects; entropy when `None`.
    pub seed:   Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            fx:     FxConfig::default(),
            width:  DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed:   None,
        }
    }
}

impl AppConfig {
    /// Parse `--config <path> --seed <u64> --width N --height N`.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cfg = AppConfig::default();
        let mut config_path: Option<PathBuf> = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next().ok_or_else(|| anyhow!("{} needs a value", name))
            };
            match arg.as_str() {
                "--config" => config_path = Some(PathBuf::from(value("--config")?)),
                "--seed"   => cfg.seed = Some(value("--seed")?.parse::<u64>().context("--seed")?),
                "--width"  => cfg.width = value("--width")?.parse::<usize>().context("--width")?,
                "--height" => cfg.height = value("--height")?.parse::<usize>().context("--height")?,
                other      => bail!("unknown argument: {}", other),
            }
        }

        if cfg.width == 0 || cfg.height == 0 {
            bail!("window size must be non-zero, got {}x{}", cfg.width, cfg.height);
        }
        if let Some(path) = config_path {
            cfg.fx = FxConfig::load(&path)
                .with_context(|| format!("failed to load config {:?}", path))?;
        }
        Ok(cfg)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session: Session<StdRng>,
    pub status: String,
    frames: u64,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        AppState {
            session: Session::start(cfg.fx.clone(), cfg.viewport(), rng),
            status:  status_line(PowerMode::default()),
            frames:  0,
        }
    }

    pub fn session(&self) -> &Session<StdRng> { &self.session }
    pub fn pixels(&self) -> &[u32]            { self.session.pixels() }
    pub fn frames(&self) -> u64               { self.frames }

    /// Returns false when the app should quit.
    pub fn handle_control(&mut self, control: Control) -> bool {
        match control {
            Control::SetMode(mode) => {
                self.session.set_power_mode(mode);
                self.status = status_line(mode);
                info!(%mode, "power mode");
            }
            Control::Clear => {
                self.session.clear();
                self.status = format!("{}  cleared", status_line(self.session.simulation().mode()));
            }
            Control::Quit => return false,
        }
        true
    }

    pub fn on_frame(&mut self, frame: &TrackingFrame) {
        if self.session.on_frame(frame).is_some() {
            self.frames += 1;
        }
    }

    pub fn shutdown(&mut self) {
        self.session.teardown();
    }
}

fn status_line(mode: PowerMode) -> String {
    format!("mode: {}", mode)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer and the hand source (simulation by default,
/// hardware with `--features leap`), then drives the input/frame/render loop.
/// A hand source that fails to start puts up a blocking error screen.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Hand source ───────────────────────────────────────────────────────
    #[cfg(not(feature = "leap"))]
    let (source_rx, sim_tx) = {
        let (sim_tx, sim_rx) = std::sync::mpsc::channel();
        let source = crate::tracking::SimHandSource::new(sim_rx, cfg.fx.scene.mirror_landmarks);
        (spawn_hand_source(source), Some(sim_tx))
    };
    #[cfg(feature = "leap")]
    let (source_rx, sim_tx) = (spawn_hand_source(crate::tracking::LeapHandSource), None);

    // ── Visualizer ────────────────────────────────────────────────────────
    let mut vis = Visualizer::new(cfg.viewport(), sim_tx).context("cannot start the display")?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);
    let started = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    'frames: while vis.is_open() {
        // 1. Poll window input; the simulator gets its tick here.
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        for control in vis.poll_input(now_ms) {
            if !app.handle_control(control) {
                break 'frames;
            }
        }

        // 2. Drain tracking frames in delivery order
        loop {
            match source_rx.try_recv() {
                Ok(SourceEvent::Frame(frame)) => app.on_frame(&frame),
                Ok(SourceEvent::Failed(reason)) => {
                    error!(%reason, "hand tracking failed to start");
                    vis.show_error(&reason);
                    app.shutdown();
                    bail!("hand tracking unavailable: {}", reason);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("hand source stopped");
                    break 'frames;
                }
            }
        }

        // 3. Render
        vis.present(app.pixels(), &app.status);
    }

    app.shutdown();
    info!(frames = app.frames(), "exiting");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_fx::synthetic::{synth_hand, HandPose};
    use elemental_fx::{Handedness, Point};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn make_app() -> AppState {
        AppState::new(&AppConfig { width: 64, height: 48, seed: Some(1), ..AppConfig::default() })
    }

    #[test]
    fn no_args_is_default() {
        assert_eq!(AppConfig::from_args(args(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_size_and_seed() {
        let cfg = AppConfig::from_args(args(&["--width", "320", "--height", "200", "--seed", "42"])).unwrap();
        assert_eq!(cfg.viewport(), Viewport::new(320, 200));
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn rejects_bad_args() {
        assert!(AppConfig::from_args(args(&["--width"])).is_err());
        assert!(AppConfig::from_args(args(&["--width", "wide"])).is_err());
        assert!(AppConfig::from_args(args(&["--width", "0"])).is_err());
        assert!(AppConfig::from_args(args(&["--bogus"])).is_err());
        assert!(AppConfig::from_args(args(&["--config", "/nonexistent/fx.toml"])).is_err());
    }

    #[test]
    fn mode_keys_switch_power() {
        let mut app = make_app();
        assert!(app.handle_control(Control::SetMode(PowerMode::Lightning)));
        assert_eq!(app.session().simulation().mode(), PowerMode::Lightning);
        assert!(app.status.contains("lightning"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = make_app();
        assert!(!app.handle_control(Control::Quit));
    }

    #[test]
    fn frames_render_and_clear_empties() {
        let mut app = make_app();
        let frame = TrackingFrame::empty(0.0)
            .with_hand(Handedness::Right, synth_hand(HandPose::Open, Point::new(0.5, 0.8), 1.0));
        for i in 0..20 {
            app.on_frame(&TrackingFrame { timestamp_ms: i as f64, ..frame.clone() });
        }
        assert_eq!(app.frames(), 20);
        assert_eq!(app.pixels().len(), 64 * 48);
        assert!(!app.session().simulation().particles().is_empty());

        app.handle_control(Control::Clear);
        assert!(app.session().simulation().particles().is_empty());
    }

    #[test]
    fn shutdown_ignores_late_frames() {
        let mut app = make_app();
        app.shutdown();
        app.on_frame(&TrackingFrame::empty(0.0));
        assert_eq!(app.frames(), 0);
    }
}
