//! The simulation loop.
//!
//! A [`Simulation`] owns the particle roster, the render target, the frame clock, the timer
//! queue and the observer registry. The host calls [`Simulation::frame`] once per display
//! refresh with a wall-clock timestamp in seconds. Each frame:
//!
//! 1. turns the time since the previous frame into a step `dt`,
//! 2. fires every timer that has come due (the delayed index case, recoveries),
//! 3. clears the surface, if configured to,
//! 4. while running: moves every particle, resolves collisions and walls, and notifies
//!    observers with the full roster,
//! 5. draws every particle, whether running or paused.
//!
//! Timers are messages consumed here, on the loop's own execution context, so particle state
//! is never touched from anywhere else. Starting a new run or tearing down cancels all pending
//! timers, so a recovery scheduled for an old roster can never reach a new one.
use log::{debug, info, trace};

use crate::boundary::Area;
use crate::census::Census;
use crate::clock::FrameClock;
use crate::collision::resolve_collisions;
use crate::define_rng;
use crate::error::OutbreakError;
use crate::observer::{ObserverRegistry, SubscriptionId};
use crate::particle::{InfectionStatus, Particle, ParticleId};
use crate::random::RngStreams;
use crate::render::{check_target, draw_particle, RenderTarget};
use crate::settings::Settings;
use crate::timer::TimerQueue;

define_rng!(PlacementRng);
define_rng!(VelocityRng);
define_rng!(IndexCaseRng);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Not started, or paused. Frames only redraw.
    Idle,
    /// Frames advance the physics.
    Running,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TimerAction {
    InfectIndexCase,
    Recover(ParticleId),
}

/// What the timers that fired did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerOutcome {
    /// Particles infected by a timer (the index case).
    pub infected: usize,
    pub recovered: usize,
}

/// What a call to [`Simulation::frame`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameSummary {
    /// Integration step derived from the elapsed wall-clock time.
    pub dt: f64,
    /// Whether positions and collisions were advanced.
    pub simulated: bool,
    /// New infections from timers and from contact.
    pub infected: usize,
    pub recovered: usize,
}

pub struct Simulation<T: RenderTarget> {
    settings: Settings,
    area: Area,
    target: T,
    particles: Vec<Particle>,
    state: RunState,
    clock: FrameClock,
    timers: TimerQueue<TimerAction>,
    observers: ObserverRegistry,
    rngs: RngStreams,
}

fn check_timestamp(now: f64) -> Result<(), OutbreakError> {
    if now.is_finite() {
        Ok(())
    } else {
        Err(OutbreakError::InvalidTimestamp(now))
    }
}

// Every timer is scheduled at most the longest delay after a checked `now`.
fn check_fire_time(now: f64, settings: &Settings) -> Result<(), OutbreakError> {
    check_timestamp(now)?;
    check_timestamp(now + settings.index_case_delay.max(settings.recovery_delay))
}

impl<T: RenderTarget> Simulation<T> {
    /// Sets up a simulation drawing onto `target`. The simulation area takes the target's size.
    ///
    /// # Errors
    /// `OutbreakError::RenderTargetUnavailable` if the target has no usable surface, or
    /// `OutbreakError::InvalidParameter` if `settings` do not validate.
    pub fn new(settings: Settings, target: T) -> Result<Self, OutbreakError> {
        settings.validate()?;
        check_target(&target)?;
        let area = Area::new(target.width(), target.height())?;
        debug!(
            "simulation area {}x{}, seed {}",
            area.width(),
            area.height(),
            settings.random_seed
        );
        Ok(Simulation {
            area,
            target,
            particles: Vec::new(),
            state: RunState::Idle,
            clock: FrameClock::new(settings.time_scale),
            timers: TimerQueue::new(),
            observers: ObserverRegistry::new(),
            rngs: RngStreams::new(settings.random_seed),
            settings,
        })
    }

    /// Starts a run with `density` particles at random positions and schedules the index case.
    ///
    /// Returns `Ok(false)` without doing anything if a run is already in progress. Starting
    /// while paused discards the paused run.
    ///
    /// # Errors
    /// `OutbreakError::InvalidTimestamp` if `now`, or `now` plus a delay, is not finite.
    pub fn start(&mut self, density: usize, now: f64) -> Result<bool, OutbreakError> {
        check_fire_time(now, &self.settings)?;
        if self.state == RunState::Running {
            debug!("start ignored: simulation already running");
            return Ok(false);
        }

        let area = self.area;
        let radius = self.settings.particle_radius;
        let mut particles = Vec::with_capacity(density);
        for _ in 0..density {
            let (x, y) = self
                .rngs
                .sample(PlacementRng, |rng| area.random_position(radius, rng));
            let particle = self
                .rngs
                .sample(VelocityRng, |rng| Particle::spawn(x, y, radius, rng))?;
            particles.push(particle);
        }
        self.begin_run(particles, now);
        Ok(true)
    }

    /// Starts a run with a prepared roster. Same rules as [`Simulation::start`]. Particles that
    /// arrive sick recover `recovery_delay` seconds after `now`.
    ///
    /// # Errors
    /// `OutbreakError::InvalidTimestamp` if `now`, or `now` plus a delay, is not finite.
    pub fn start_with_particles(
        &mut self,
        particles: Vec<Particle>,
        now: f64,
    ) -> Result<bool, OutbreakError> {
        check_fire_time(now, &self.settings)?;
        if self.state == RunState::Running {
            debug!("start ignored: simulation already running");
            return Ok(false);
        }
        self.begin_run(particles, now);
        Ok(true)
    }

    fn begin_run(&mut self, particles: Vec<Particle>, now: f64) {
        self.timers.clear();
        self.particles = particles;
        self.state = RunState::Running;
        info!(
            "starting simulation with {} particles (seed {})",
            self.particles.len(),
            self.rngs.base_seed()
        );

        if self.particles.is_empty() {
            debug!("empty roster: no index case");
            return;
        }
        self.timers.schedule(
            now + self.settings.index_case_delay,
            TimerAction::InfectIndexCase,
        );
        let arrived_sick: Vec<ParticleId> = self
            .particles
            .iter()
            .enumerate()
            .filter(|(_, particle)| particle.status() == InfectionStatus::Sick)
            .map(|(index, _)| ParticleId(index))
            .collect();
        for id in arrived_sick {
            self.schedule_recovery(id, now);
        }
    }

    /// Stops advancing the physics. Frames keep redrawing and timers keep firing. Only a new
    /// `start` resumes motion.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            debug!("pausing simulation");
        }
        self.state = RunState::Idle;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state != RunState::Running
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Ends the current run: pauses, cancels every pending timer and drops the roster.
    pub fn teardown(&mut self) {
        debug!("tearing down simulation");
        self.state = RunState::Idle;
        self.timers.clear();
        self.particles.clear();
    }

    /// Advances the simulation by one display refresh at wall-clock time `now` (seconds).
    ///
    /// # Errors
    /// `OutbreakError::InvalidTimestamp` if `now`, or `now` plus a delay, is not finite. Nothing
    /// is changed in that case.
    pub fn frame(&mut self, now: f64) -> Result<FrameSummary, OutbreakError> {
        check_fire_time(now, &self.settings)?;
        let dt = self.clock.tick(now);
        let fired = self.run_due_timers(now);
        let mut summary = FrameSummary {
            dt,
            simulated: false,
            infected: fired.infected,
            recovered: fired.recovered,
        };

        if self.settings.clear_each_frame {
            self.target.clear();
        }

        if self.state == RunState::Running {
            trace!("advancing {} particles by dt={dt}", self.particles.len());
            for particle in &mut self.particles {
                particle.integrate(dt);
            }
            let newly_infected = resolve_collisions(&mut self.particles, &self.area);
            for id in &newly_infected {
                self.schedule_recovery(*id, now);
            }
            summary.infected += newly_infected.len();
            summary.simulated = true;
            self.observers.notify(&self.particles);
        }

        for particle in &self.particles {
            draw_particle(&mut self.target, particle);
        }
        Ok(summary)
    }

    /// Fires every timer due at or before `now` without running a frame.
    ///
    /// # Errors
    /// `OutbreakError::InvalidTimestamp` if `now`, or `now` plus a delay, is not finite.
    pub fn fire_due_timers(&mut self, now: f64) -> Result<TimerOutcome, OutbreakError> {
        check_fire_time(now, &self.settings)?;
        Ok(self.run_due_timers(now))
    }

    fn run_due_timers(&mut self, now: f64) -> TimerOutcome {
        let mut outcome = TimerOutcome::default();
        while let Some(timer) = self.timers.pop_due(now) {
            match timer.action {
                TimerAction::InfectIndexCase => {
                    if self.particles.is_empty() {
                        continue;
                    }
                    let index = self
                        .rngs
                        .sample_range(IndexCaseRng, 0..self.particles.len());
                    let id = ParticleId(index);
                    debug!("index case is particle {id}");
                    if self.infect_at(id, timer.time) {
                        outcome.infected += 1;
                    }
                }
                TimerAction::Recover(id) => {
                    if let Some(particle) = self.particles.get_mut(id.0) {
                        if particle.recover() {
                            trace!("particle {id} recovered at {}", timer.time);
                            outcome.recovered += 1;
                        }
                    }
                }
            }
        }
        outcome
    }

    /// Infects a particle at time `now` and schedules its recovery. Returns `Ok(false)` if the
    /// particle was not healthy; its status and recovery time are left as they were.
    ///
    /// # Errors
    /// `OutbreakError::InvalidParameter` if `id` is not in the roster,
    /// `OutbreakError::InvalidTimestamp` if `now`, or `now` plus a delay, is not finite.
    pub fn infect(&mut self, id: ParticleId, now: f64) -> Result<bool, OutbreakError> {
        check_fire_time(now, &self.settings)?;
        if id.0 >= self.particles.len() {
            return Err(OutbreakError::InvalidParameter(format!(
                "no particle {id} in a roster of {}",
                self.particles.len()
            )));
        }
        Ok(self.infect_at(id, now))
    }

    fn infect_at(&mut self, id: ParticleId, now: f64) -> bool {
        let infected = self
            .particles
            .get_mut(id.0)
            .is_some_and(Particle::infect);
        if infected {
            self.schedule_recovery(id, now);
        }
        infected
    }

    fn schedule_recovery(&mut self, id: ParticleId, infected_at: f64) {
        self.timers.schedule(
            infected_at + self.settings.recovery_delay,
            TimerAction::Recover(id),
        );
    }

    /// Registers `observer` to receive the roster after every simulated frame.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Particle]) + 'static) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0)
    }

    #[must_use]
    pub fn census(&self) -> Census {
        Census::tally(&self.particles)
    }

    #[must_use]
    pub fn area(&self) -> &Area {
        &self.area
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn render_target(&self) -> &T {
        &self.target
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn next_timer_time(&self) -> Option<f64> {
        self.timers.next_fire_time()
    }
}
