//! A real-time 2D particle simulation of epidemic spread
//!
//! Outbreak moves a population of discs around a rectangular area. Discs
//! bounce elastically off each other and off the walls, and a sick disc makes
//! every healthy disc it touches sick as well. Shortly after a run starts one
//! disc is picked as the index case; every sick disc recovers a fixed time
//! after it fell ill and cannot be infected again.
//!
//! The central object is the [`Simulation`], which owns the particle roster
//! and a [`RenderTarget`] to draw onto. A host drives it by calling
//! [`Simulation::frame`] once per display refresh with a wall-clock timestamp:
//!
//! ```rust
//! use outbreak::{HeadlessTarget, InfectionStatus, Settings, Simulation};
//!
//! let mut simulation =
//!     Simulation::new(Settings::default(), HeadlessTarget::new(500.0, 500.0)).unwrap();
//! simulation.subscribe(|particles| {
//!     let sick = particles
//!         .iter()
//!         .filter(|p| p.status() == InfectionStatus::Sick)
//!         .count();
//!     outbreak::log::trace!("{sick} sick");
//! });
//! simulation.start(90, 0.0).unwrap();
//! for i in 0..120 {
//!     simulation.frame(f64::from(i) / 60.0).unwrap();
//! }
//! assert!(simulation.census().sick >= 1);
//! ```
//!
//! The building blocks are usable on their own:
//! * [`particle`]: a single disc and its infection status
//! * [`collision`]: pairwise elastic response, infection transfer and overlap resolution
//! * [`boundary`]: the area and wall reflection
//! * [`timer`]: the queue of delayed actions
//! * [`runner`]: the headless `outbreak` command line driver
pub mod boundary;
pub mod census;
pub mod clock;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod hashing;
pub mod log;
pub mod observer;
pub mod particle;
pub mod random;
pub mod render;
pub mod report;
pub mod runner;
pub mod settings;
pub mod simulation;
pub mod timer;

pub use boundary::Area;
pub use census::Census;
pub use error::OutbreakError;
pub use particle::{InfectionStatus, Particle, ParticleId};
pub use render::{HeadlessTarget, RenderTarget};
pub use settings::Settings;
pub use simulation::{FrameSummary, RunState, Simulation, TimerOutcome};

// Re-exported for use in `define_rng!`
pub use rand;
