//! Headless command-line driver.
//!
//! Runs a simulation against a [`HeadlessTarget`] with synthetic timestamps at a fixed refresh
//! rate, until the frame limit is reached or the outbreak is over.
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use clap::Parser;
use log::info;

use crate::census::Census;
use crate::error::OutbreakError;
use crate::log::set_log_spec;
use crate::particle::Particle;
use crate::render::HeadlessTarget;
use crate::report::CensusReport;
use crate::settings::Settings;
use crate::simulation::Simulation;

/// Default cli arguments for the outbreak runner
#[derive(Parser, Debug, Clone)]
#[command(name = "outbreak", version, about)]
pub struct Args {
    /// Number of particles. Overrides the config file
    #[arg(short, long)]
    pub density: Option<usize>,

    /// Random seed. Overrides the config file
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a settings config file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Maximum number of frames to run
    #[arg(short, long, default_value = "10000")]
    pub frames: u64,

    /// Synthetic refresh rate in frames per second
    #[arg(long, default_value = "60")]
    pub fps: f64,

    /// Optional path for a per-frame CSV census report
    #[arg(short = 'o', long, default_value = "")]
    pub report: String,

    /// Log levels, e.g. `info` or `warn,outbreak::simulation=debug`
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            density: None,
            random_seed: None,
            config: String::new(),
            frames: 10_000,
            fps: 60.0,
            report: String::new(),
            log_level: None,
        }
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub frames: u64,
    /// Timestamp of the last frame, in seconds.
    pub time: f64,
    pub census: Census,
    pub outbreak_over: bool,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames={} time={:.2}s healthy={} sick={} recovered={}",
            self.frames, self.time, self.census.healthy, self.census.sick, self.census.recovered
        )
    }
}

/// Builds the settings for a run: the config file if given, then command-line overrides.
///
/// # Errors
/// Returns an error if the config file cannot be loaded or the result does not validate.
pub fn resolve_settings(args: &Args) -> Result<Settings, OutbreakError> {
    let mut settings = if args.config.is_empty() {
        Settings::default()
    } else {
        info!("Loading settings from: {}", args.config);
        Settings::load(Path::new(&args.config))?
    };
    if let Some(density) = args.density {
        settings.density = density;
    }
    if let Some(seed) = args.random_seed {
        settings.random_seed = seed;
    }
    settings.validate()?;
    Ok(settings)
}

/// Parses the process arguments and runs.
///
/// # Errors
/// Returns an error if the run fails.
pub fn run_with_args() -> Result<RunOutcome, OutbreakError> {
    run(&Args::parse())
}

/// Follows a run through the simulation's notification stream. Every roster it is handed
/// counts as one simulated frame: it is tallied, written to the report and checked for the end
/// of the outbreak.
pub struct RunMonitor<W: Write> {
    fps: f64,
    report: Option<CensusReport<W>>,
    outcome: RunOutcome,
    error: Option<OutbreakError>,
}

impl<W: Write> RunMonitor<W> {
    #[must_use]
    pub fn new(fps: f64, report: Option<CensusReport<W>>) -> Self {
        RunMonitor {
            fps,
            report,
            outcome: RunOutcome {
                frames: 0,
                time: 0.0,
                census: Census::default(),
                outbreak_over: false,
            },
            error: None,
        }
    }

    /// Records one simulated frame. A report write error is held until
    /// [`RunMonitor::take_error`].
    #[allow(clippy::cast_precision_loss)]
    pub fn observe(&mut self, particles: &[Particle]) {
        if self.error.is_some() {
            return;
        }
        let frame = self.outcome.frames;
        let time = frame as f64 / self.fps;
        let census = Census::tally(particles);
        if let Some(report) = self.report.as_mut() {
            if let Err(e) = report.record(frame, time, &census) {
                self.error = Some(e);
                return;
            }
        }
        self.outcome = RunOutcome {
            frames: frame + 1,
            time,
            census,
            outbreak_over: census.is_outbreak_over(),
        };
    }

    #[must_use]
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    pub fn take_error(&mut self) -> Option<OutbreakError> {
        self.error.take()
    }

    /// Flushes the report and returns the outcome of the frames observed so far.
    ///
    /// # Errors
    /// A pending report error, or an I/O error from the flush.
    pub fn finish(&mut self) -> Result<RunOutcome, OutbreakError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        if let Some(report) = self.report.as_mut() {
            report.flush()?;
        }
        Ok(self.outcome.clone())
    }
}

/// Runs a headless simulation as described by `args`.
///
/// # Errors
/// Returns an error if the settings, the log spec, the refresh rate or the report path are
/// invalid, or if writing the report fails.
#[allow(clippy::cast_precision_loss)]
pub fn run(args: &Args) -> Result<RunOutcome, OutbreakError> {
    if let Some(spec) = &args.log_level {
        set_log_spec(spec)?;
    }
    if !args.fps.is_finite() || args.fps <= 0.0 {
        return Err(OutbreakError::InvalidParameter(format!(
            "fps must be finite and > 0, got {}",
            args.fps
        )));
    }

    let settings = resolve_settings(args)?;
    let density = settings.density;
    let target = HeadlessTarget::new(settings.width, settings.height);
    let mut simulation = Simulation::new(settings, target)?;

    let report = if args.report.is_empty() {
        None
    } else {
        Some(CensusReport::create(Path::new(&args.report))?)
    };
    let monitor = Rc::new(RefCell::new(RunMonitor::new(args.fps, report)));
    let observer = Rc::clone(&monitor);
    let subscription =
        simulation.subscribe(move |particles| observer.borrow_mut().observe(particles));

    simulation.start(density, 0.0)?;
    for frame in 0..args.frames {
        simulation.frame(frame as f64 / args.fps)?;
        let mut monitor = monitor.borrow_mut();
        if let Some(e) = monitor.take_error() {
            return Err(e);
        }
        if monitor.outcome().outbreak_over {
            info!("outbreak over after {:.2}s", monitor.outcome().time);
            simulation.pause();
            break;
        }
    }

    simulation.unsubscribe(subscription);
    simulation.teardown();
    let outcome = monitor.borrow_mut().finish()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::InfectionStatus;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn empty_run_reaches_frame_limit() {
        let args = Args {
            density: Some(0),
            frames: 120,
            ..Args::default()
        };
        let outcome = run(&args).unwrap();
        assert_eq!(outcome.frames, 120);
        assert_eq!(outcome.census, Census::default());
        assert!(!outcome.outbreak_over);
    }

    #[test]
    fn outbreak_runs_to_completion() {
        // A single particle is the index case at 1 s and recovers at 11 s.
        let args = Args {
            density: Some(1),
            random_seed: Some(3),
            frames: 60 * 20,
            ..Args::default()
        };
        let outcome = run(&args).unwrap();
        assert!(outcome.outbreak_over);
        assert_eq!(outcome.census.recovered, 1);
        assert!(outcome.time >= 11.0);
        assert!(outcome.time < 11.1);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "density": 12, "random_seed": 7 }"#)
            .unwrap();
        let args = Args {
            config: file.path().to_string_lossy().into_owned(),
            random_seed: Some(42),
            ..Args::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.density, 12);
        assert_eq!(settings.random_seed, 42);
    }

    #[test]
    fn invalid_fps_is_rejected() {
        let args = Args {
            fps: 0.0,
            ..Args::default()
        };
        assert!(matches!(
            run(&args),
            Err(OutbreakError::InvalidParameter(_))
        ));
    }

    #[test]
    fn writes_report_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("census.csv");
        let args = Args {
            density: Some(5),
            frames: 10,
            report: path.to_string_lossy().into_owned(),
            ..Args::default()
        };
        run(&args).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("frame,time,healthy,sick,recovered"));
        assert_eq!(lines.next(), Some("0,0.0,5,0,0"));
        assert_eq!(lines.count(), 9);
    }

    #[test]
    fn monitor_counts_only_notified_frames() {
        let settings = Settings {
            index_case_delay: 1000.0,
            ..Settings::default()
        };
        let mut simulation =
            Simulation::new(settings, HeadlessTarget::new(500.0, 500.0)).unwrap();
        let monitor = Rc::new(RefCell::new(RunMonitor::<Vec<u8>>::new(10.0, None)));
        let observer = Rc::clone(&monitor);
        simulation.subscribe(move |particles| observer.borrow_mut().observe(particles));

        simulation
            .start_with_particles(
                vec![
                    Particle::new(100.0, 100.0, 4.0, 0.0, 0.0)
                        .unwrap()
                        .with_status(InfectionStatus::Sick),
                    Particle::new(400.0, 400.0, 4.0, 0.0, 0.0).unwrap(),
                ],
                0.0,
            )
            .unwrap();

        for i in 0..100 {
            simulation.frame(f64::from(i) / 10.0).unwrap();
        }
        {
            let monitor = monitor.borrow();
            assert_eq!(monitor.outcome().frames, 100);
            assert_eq!(monitor.outcome().census.sick, 1);
            assert!(!monitor.outcome().outbreak_over);
        }

        // The sick arrival recovers 10 s after the start.
        simulation.frame(10.0).unwrap();
        assert!(monitor.borrow().outcome().outbreak_over);
        assert_eq!(monitor.borrow().outcome().census.recovered, 1);

        // Paused frames are not notified, so the monitor does not see them.
        simulation.pause();
        simulation.frame(10.1).unwrap();
        let outcome = monitor.borrow_mut().finish().unwrap();
        assert_eq!(outcome.frames, 101);
        assert_eq!(outcome.time, 10.0);
    }

    #[test]
    fn display_is_a_census_line() {
        let outcome = RunOutcome {
            frames: 3,
            time: 0.5,
            census: Census {
                healthy: 1,
                sick: 2,
                recovered: 3,
            },
            outbreak_over: false,
        };
        assert_eq!(
            outcome.to_string(),
            "frames=3 time=0.50s healthy=1 sick=2 recovered=3"
        );
    }
}
