//! Particles and their infection state.
//!
//! A [`Particle`] is a disc moving through the simulation area. Its mass is the cube of its
//! radius and is fixed at construction. Infection status only ever moves forward:
//!
//! ```text
//! Healthy --infect--> Sick --recover--> Recovered
//! ```
//!
//! A particle does not know about time; whoever infects it is responsible for scheduling the
//! matching recovery (see `Simulation::infect`).
use std::fmt::{self, Display};

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OutbreakError;
use crate::geometry::Point;

/// Identifies a particle by its position in the roster of the current run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub usize);

impl Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InfectionStatus {
    #[default]
    Healthy,
    Sick,
    Recovered,
}

/// An sRGB colour, written as `#RRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl InfectionStatus {
    #[must_use]
    pub fn fill_color(self) -> Color {
        match self {
            InfectionStatus::Healthy => Color::rgb(0x81, 0xE6, 0xD9),
            InfectionStatus::Sick => Color::rgb(0xEC, 0xC9, 0x4B),
            InfectionStatus::Recovered => Color::rgb(0x42, 0x99, 0xE1),
        }
    }

    #[must_use]
    pub fn stroke_color(self) -> Color {
        match self {
            InfectionStatus::Healthy => Color::rgb(0x31, 0x97, 0x95),
            InfectionStatus::Sick => Color::rgb(0x97, 0x5A, 0x16),
            InfectionStatus::Recovered => Color::rgb(0x2C, 0x52, 0x82),
        }
    }
}

/// Draws the initial horizontal velocity: an integer in `[-4, 5]`.
pub fn random_dx(rng: &mut impl Rng) -> f64 {
    (rng.random::<f64>() * 10.0 - 4.0).floor()
}

/// Draws the initial vertical velocity: an integer in `[-3, 6]`.
pub fn random_dy(rng: &mut impl Rng) -> f64 {
    (rng.random::<f64>() * 10.0 - 3.0).floor()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    size: f64,
    mass: f64,
    status: InfectionStatus,
}

impl Particle {
    /// Creates a healthy particle with an explicit velocity.
    ///
    /// # Errors
    /// `OutbreakError::InvalidParameter` if `size` is not finite and positive, or if any
    /// coordinate or velocity component is not finite.
    pub fn new(x: f64, y: f64, size: f64, dx: f64, dy: f64) -> Result<Self, OutbreakError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(OutbreakError::InvalidParameter(format!(
                "particle size must be finite and > 0, got {size}"
            )));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(OutbreakError::InvalidParameter(
                "particle position must be finite".to_string(),
            ));
        }
        if !dx.is_finite() || !dy.is_finite() {
            return Err(OutbreakError::InvalidParameter(
                "particle velocity must be finite".to_string(),
            ));
        }
        Ok(Particle {
            x,
            y,
            dx,
            dy,
            size,
            mass: size.powi(3),
            status: InfectionStatus::Healthy,
        })
    }

    /// Creates a healthy particle whose velocity is drawn from `rng`.
    ///
    /// # Errors
    /// See [`Particle::new`].
    pub fn spawn(x: f64, y: f64, size: f64, rng: &mut impl Rng) -> Result<Self, OutbreakError> {
        let dx = random_dx(rng);
        let dy = random_dy(rng);
        Particle::new(x, y, size, dx, dy)
    }

    /// Returns this particle advanced to `status` through the regular transitions. A status
    /// behind the current one leaves the particle as it is.
    #[must_use]
    pub fn with_status(mut self, status: InfectionStatus) -> Self {
        match status {
            InfectionStatus::Healthy => {}
            InfectionStatus::Sick => {
                self.infect();
            }
            InfectionStatus::Recovered => {
                self.infect();
                self.recover();
            }
        }
        self
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub fn status(&self) -> InfectionStatus {
        self.status
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Magnitude of the velocity vector.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Direction of the velocity vector.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }

    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.dx * self.dx + self.dy * self.dy)
    }

    #[must_use]
    pub fn momentum(&self) -> (f64, f64) {
        (self.mass * self.dx, self.mass * self.dy)
    }

    /// Moves the particle along its velocity for a step of length `dt`.
    pub fn integrate(&mut self, dt: f64) {
        self.x += self.dx * dt;
        self.y += self.dy * dt;
    }

    /// Healthy becomes Sick. Returns `false`, leaving the particle untouched, for any other
    /// status.
    pub fn infect(&mut self) -> bool {
        if self.status != InfectionStatus::Healthy {
            return false;
        }
        trace!("particle at ({:.1}, {:.1}) is now sick", self.x, self.y);
        self.status = InfectionStatus::Sick;
        true
    }

    /// Sick becomes Recovered. Returns `false` for any other status.
    pub fn recover(&mut self) -> bool {
        if self.status != InfectionStatus::Sick {
            return false;
        }
        self.status = InfectionStatus::Recovered;
        true
    }
}
