//! The rectangular simulation area and the rule that keeps particles inside it.
use rand::Rng;

use crate::error::OutbreakError;
use crate::particle::Particle;

/// A `width` by `height` rectangle with its origin at the top left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Area {
    width: f64,
    height: f64,
}

impl Area {
    /// # Errors
    /// `OutbreakError::InvalidParameter` if either dimension is not finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, OutbreakError> {
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(OutbreakError::InvalidParameter(format!(
                "area dimensions must be finite and > 0, got {width}x{height}"
            )));
        }
        Ok(Area { width, height })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Keeps `particle` inside the area.
    ///
    /// The velocity is reflected if the *next* step would carry the disc past a wall, then the
    /// position is clamped so the disc lies within `[size, dimension - size]` on both axes.
    pub fn enforce(&self, particle: &mut Particle) {
        let r = particle.size();

        if particle.x - r + particle.dx < 0.0 || particle.x + r + particle.dx > self.width {
            particle.dx = -particle.dx;
        }
        if particle.y - r + particle.dy < 0.0 || particle.y + r + particle.dy > self.height {
            particle.dy = -particle.dy;
        }

        if particle.y + r > self.height {
            particle.y = self.height - r;
        }
        if particle.y - r < 0.0 {
            particle.y = r;
        }
        if particle.x + r > self.width {
            particle.x = self.width - r;
        }
        if particle.x - r < 0.0 {
            particle.x = r;
        }
    }

    /// Whether the whole disc of `particle` lies inside the area.
    #[must_use]
    pub fn contains(&self, particle: &Particle) -> bool {
        let r = particle.size();
        particle.x >= r
            && particle.x <= self.width - r
            && particle.y >= r
            && particle.y <= self.height - r
    }

    /// Picks a spawn point for a particle of the given size. Coordinates are whole units in
    /// `[0, dimension - size)`; the disc may start across the top or left wall and is pushed
    /// back in by the first boundary pass.
    pub fn random_position(&self, size: f64, rng: &mut impl Rng) -> (f64, f64) {
        let x = (rng.random::<f64>() * (self.width - size).max(0.0)).floor();
        let y = (rng.random::<f64>() * (self.height - size).max(0.0)).floor();
        (x, y)
    }
}
