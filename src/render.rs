//! The drawing surface the simulation paints onto.
//!
//! The engine only needs to clear the surface and draw filled, outlined discs. Hosts implement
//! [`RenderTarget`] for their canvas or window; [`HeadlessTarget`] draws nothing and is used for
//! batch runs and tests.
use crate::error::OutbreakError;
use crate::geometry::Point;
use crate::particle::{Color, Particle};

pub trait RenderTarget {
    /// Width of the drawable region. Also the width of the simulation area.
    fn width(&self) -> f64;

    /// Height of the drawable region. Also the height of the simulation area.
    fn height(&self) -> f64;

    fn clear_region(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);

    fn end_path(&mut self);

    fn fill_and_stroke_circle(&mut self, center: Point, radius: f64, fill: Color, stroke: Color);

    /// Clears the whole surface.
    fn clear(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.clear_region(0.0, 0.0, width, height);
    }
}

/// Checks that `target` reports a usable size.
///
/// # Errors
/// `OutbreakError::RenderTargetUnavailable` if either dimension is not finite and positive.
pub fn check_target(target: &impl RenderTarget) -> Result<(), OutbreakError> {
    let (width, height) = (target.width(), target.height());
    if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
        return Err(OutbreakError::RenderTargetUnavailable(format!(
            "surface reports a {width}x{height} drawable region"
        )));
    }
    Ok(())
}

/// Draws `particle` as a disc coloured by its infection status, centred on its position
/// rounded to whole units.
pub fn draw_particle(target: &mut impl RenderTarget, particle: &Particle) {
    let status = particle.status();
    target.begin_path();
    target.fill_and_stroke_circle(
        particle.position().rounded(),
        particle.size(),
        status.fill_color(),
        status.stroke_color(),
    );
    target.end_path();
}

/// A surface with a size but no pixels. It counts what it was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessTarget {
    width: f64,
    height: f64,
    pub clears: usize,
    pub circles: usize,
}

impl HeadlessTarget {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        HeadlessTarget {
            width,
            height,
            ..Default::default()
        }
    }
}

impl RenderTarget for HeadlessTarget {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_region(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {
        self.clears += 1;
    }

    fn begin_path(&mut self) {}

    fn end_path(&mut self) {}

    fn fill_and_stroke_circle(&mut self, _center: Point, _radius: f64, _fill: Color, _stroke: Color) {
        self.circles += 1;
    }
}
