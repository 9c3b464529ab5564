//! Pairwise collision detection and response.
//!
//! Every unordered pair of particles is tested once per frame, so a pass is *O*(*n*²). A
//! particle touching several others in one frame has each contact resolved in turn, in index
//! order.
//!
//! For an overlapping pair the resolver
//! 1. exchanges momentum along the line of centres ([`elastic_response`]),
//! 2. passes the infection from a sick particle to a healthy one ([`transfer_infection`]),
//! 3. pushes the second particle out of the first ([`separate`]). This last step only keeps the
//!    picture clean; it does not touch velocities and does not conserve anything.
use std::f64::consts::FRAC_PI_2;

use log::trace;

use crate::boundary::Area;
use crate::particle::{InfectionStatus, Particle, ParticleId};

/// Centres closer than this have no usable line of centres.
const COINCIDENT_DISTANCE: f64 = f64::EPSILON;

/// Which member of a pair was infected by [`transfer_infection`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Infected {
    First,
    Second,
}

/// Whether the discs of `a` and `b` overlap.
#[must_use]
pub fn overlapping(a: &Particle, b: &Particle) -> bool {
    a.position().distance_to(b.position()) < a.size() + b.size()
}

/// Computes the post-collision velocities `((dx1, dy1), (dx2, dy2))` of a two-body elastic
/// collision.
///
/// Each velocity is split into a component along the line of centres `phi` and a component
/// perpendicular to it. The perpendicular part is kept; the parallel parts follow the 1D
/// elastic collision equations for masses `m1` and `m2`. Momentum and kinetic energy of the
/// pair are conserved.
///
/// Returns `None` when the centres coincide and `phi` is undefined.
#[must_use]
pub fn elastic_response(p1: &Particle, p2: &Particle) -> Option<((f64, f64), (f64, f64))> {
    if p1.position().distance_to(p2.position()) <= COINCIDENT_DISTANCE {
        return None;
    }
    let phi = p1.position().angle_to(p2.position());
    let (m1, m2) = (p1.mass(), p2.mass());
    let (v1, v2) = (p1.speed(), p2.speed());
    let (theta1, theta2) = (p1.angle(), p2.angle());

    let along1 = (v1 * (theta1 - phi).cos() * (m1 - m2) + 2.0 * m2 * v2 * (theta2 - phi).cos())
        / (m1 + m2);
    let along2 = (v2 * (theta2 - phi).cos() * (m2 - m1) + 2.0 * m1 * v1 * (theta1 - phi).cos())
        / (m1 + m2);
    let across1 = v1 * (theta1 - phi).sin();
    let across2 = v2 * (theta2 - phi).sin();

    let normal = (phi.cos(), phi.sin());
    let tangent = ((phi + FRAC_PI_2).cos(), (phi + FRAC_PI_2).sin());

    Some((
        (
            along1 * normal.0 + across1 * tangent.0,
            along1 * normal.1 + across1 * tangent.1,
        ),
        (
            along2 * normal.0 + across2 * tangent.0,
            along2 * normal.1 + across2 * tangent.1,
        ),
    ))
}

/// Infects the healthy member of the pair if the other one is sick.
///
/// Returns which particle, if any, changed status.
pub fn transfer_infection(p1: &mut Particle, p2: &mut Particle) -> Option<Infected> {
    match (p1.status(), p2.status()) {
        (InfectionStatus::Sick, InfectionStatus::Healthy) => {
            p2.infect();
            Some(Infected::Second)
        }
        (InfectionStatus::Healthy, InfectionStatus::Sick) => {
            p1.infect();
            Some(Infected::First)
        }
        _ => None,
    }
}

/// Moves `p2` directly away from `p1` by the overlap of the two discs.
///
/// Coincident centres give an angle of zero, so `p2` is pushed along -x.
pub fn separate(p1: &Particle, p2: &mut Particle) {
    let overlap = p1.size() + p2.size() - p1.position().distance_to(p2.position());
    let theta = p2.position().angle_to(p1.position());
    p2.x -= overlap * theta.cos();
    p2.y -= overlap * theta.sin();
}

/// Resolves one overlapping pair. Returns which particle was infected, if any.
pub fn collide(p1: &mut Particle, p2: &mut Particle) -> Option<Infected> {
    match elastic_response(p1, p2) {
        Some(((dx1, dy1), (dx2, dy2))) => {
            p1.dx = dx1;
            p1.dy = dy1;
            p2.dx = dx2;
            p2.dy = dy2;
        }
        None => trace!("skipping elastic response for coincident particles"),
    }
    let infected = transfer_infection(p1, p2);
    separate(p1, p2);
    infected
}

/// Runs a full collision pass over `particles` and keeps every particle inside `area`.
///
/// Particle `i` is clamped to the area once all pairs `(i, j > i)` have been resolved. The last
/// particle never appears as `i`, so it is clamped separately at the end.
///
/// Returns the particles that became sick during the pass, in the order they were infected.
pub fn resolve_collisions(particles: &mut [Particle], area: &Area) -> Vec<ParticleId> {
    let mut infected = Vec::new();
    let n = particles.len();

    for i in 0..n.saturating_sub(1) {
        for j in (i + 1)..n {
            let (head, tail) = particles.split_at_mut(j);
            let p1 = &mut head[i];
            let p2 = &mut tail[0];
            if !overlapping(p1, p2) {
                continue;
            }
            match collide(p1, p2) {
                Some(Infected::First) => infected.push(ParticleId(i)),
                Some(Infected::Second) => infected.push(ParticleId(j)),
                None => {}
            }
        }
        area.enforce(&mut particles[i]);
    }

    if let Some(last) = particles.last_mut() {
        area.enforce(last);
    }

    if !infected.is_empty() {
        trace!("collision pass infected {} particles", infected.len());
    }
    infected
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn particle(x: f64, y: f64, size: f64, dx: f64, dy: f64) -> Particle {
        Particle::new(x, y, size, dx, dy).unwrap()
    }

    fn pair_momentum(a: &Particle, b: &Particle) -> (f64, f64) {
        let (ax, ay) = a.momentum();
        let (bx, by) = b.momentum();
        (ax + bx, ay + by)
    }

    fn apply(p1: &mut Particle, p2: &mut Particle) {
        let ((dx1, dy1), (dx2, dy2)) = elastic_response(p1, p2).unwrap();
        p1.dx = dx1;
        p1.dy = dy1;
        p2.dx = dx2;
        p2.dy = dy2;
    }

    #[test]
    fn head_on_equal_masses_swap_velocities() {
        let mut a = particle(100.0, 100.0, 4.0, 2.0, 0.0);
        let mut b = particle(106.0, 100.0, 4.0, -1.0, 0.0);
        apply(&mut a, &mut b);
        assert_relative_eq!(a.dx, -1.0, epsilon = 1e-12);
        assert_relative_eq!(a.dy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.dx, 2.0, epsilon = 1e-12);
        assert_relative_eq!(b.dy, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn glancing_collision_keeps_tangential_component() {
        // Line of centres is the x axis; the y components are tangential.
        let mut a = particle(0.0, 0.0, 2.0, 3.0, 1.0);
        let mut b = particle(3.0, 0.0, 2.0, 0.0, -2.0);
        apply(&mut a, &mut b);
        assert_relative_eq!(a.dy, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.dy, -2.0, epsilon = 1e-12);
        assert_relative_eq!(a.dx, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.dx, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn conserves_momentum_and_energy_for_unequal_masses() {
        let cases = [
            ((10.0, 10.0, 4.0, 3.0, -2.0), (14.0, 12.0, 2.0, -4.0, 5.0)),
            ((50.0, 50.0, 3.0, 0.0, 0.0), (52.0, 48.0, 5.0, -1.0, 2.0)),
            ((0.0, 0.0, 1.5, 5.0, 6.0), (-1.0, 2.0, 4.5, 1.0, -3.0)),
        ];
        for ((x1, y1, s1, dx1, dy1), (x2, y2, s2, dx2, dy2)) in cases {
            let mut a = particle(x1, y1, s1, dx1, dy1);
            let mut b = particle(x2, y2, s2, dx2, dy2);
            let energy_before = a.kinetic_energy() + b.kinetic_energy();
            let momentum_before = pair_momentum(&a, &b);

            apply(&mut a, &mut b);

            let energy_after = a.kinetic_energy() + b.kinetic_energy();
            let momentum_after = pair_momentum(&a, &b);
            assert_relative_eq!(energy_before, energy_after, max_relative = 1e-9);
            assert_relative_eq!(momentum_before.0, momentum_after.0, epsilon = 1e-9);
            assert_relative_eq!(momentum_before.1, momentum_after.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn coincident_centres_skip_response_without_nan() {
        let mut a = particle(20.0, 20.0, 4.0, 1.0, 2.0);
        let mut b = particle(20.0, 20.0, 4.0, -3.0, 0.0);
        assert!(elastic_response(&a, &b).is_none());

        collide(&mut a, &mut b);
        assert_eq!((a.dx, a.dy), (1.0, 2.0));
        assert_eq!((b.dx, b.dy), (-3.0, 0.0));
        assert!(b.x.is_finite() && b.y.is_finite());
        assert_relative_eq!(b.x, 12.0, epsilon = 1e-12);
        assert_relative_eq!(b.y, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn infection_passes_from_sick_to_healthy_only() {
        let mut sick = particle(0.0, 0.0, 4.0, 0.0, 0.0).with_status(InfectionStatus::Sick);
        let mut healthy = particle(1.0, 0.0, 4.0, 0.0, 0.0);
        assert_eq!(
            transfer_infection(&mut sick, &mut healthy),
            Some(Infected::Second)
        );
        assert_eq!(healthy.status(), InfectionStatus::Sick);

        let mut healthy = particle(1.0, 0.0, 4.0, 0.0, 0.0);
        let mut sick = particle(0.0, 0.0, 4.0, 0.0, 0.0).with_status(InfectionStatus::Sick);
        assert_eq!(
            transfer_infection(&mut healthy, &mut sick),
            Some(Infected::First)
        );

        let mut recovered =
            particle(0.0, 0.0, 4.0, 0.0, 0.0).with_status(InfectionStatus::Recovered);
        let mut sick = particle(1.0, 0.0, 4.0, 0.0, 0.0).with_status(InfectionStatus::Sick);
        assert_eq!(transfer_infection(&mut recovered, &mut sick), None);
        assert_eq!(recovered.status(), InfectionStatus::Recovered);

        let mut a = particle(0.0, 0.0, 4.0, 0.0, 0.0);
        let mut b = particle(1.0, 0.0, 4.0, 0.0, 0.0);
        assert_eq!(transfer_infection(&mut a, &mut b), None);
    }

    #[test]
    fn separate_removes_overlap_along_centre_line() {
        let a = particle(100.0, 100.0, 4.0, 0.0, 0.0);
        let mut b = particle(103.0, 104.0, 4.0, 1.0, 1.0);
        separate(&a, &mut b);
        assert_relative_eq!(a.position().distance_to(b.position()), 8.0, epsilon = 1e-9);
        // Pushed outward along (3, 4) / 5.
        assert_relative_eq!(b.x, 100.0 + 8.0 * 0.6, epsilon = 1e-9);
        assert_relative_eq!(b.y, 100.0 + 8.0 * 0.8, epsilon = 1e-9);
        assert_eq!((b.dx, b.dy), (1.0, 1.0));
    }

    #[test]
    fn overlapping_pair_in_pass_spreads_infection() {
        let area = Area::new(500.0, 500.0).unwrap();
        let mut particles = vec![
            particle(200.0, 200.0, 4.0, 2.0, 1.0).with_status(InfectionStatus::Sick),
            particle(203.0, 200.0, 4.0, -1.0, 3.0),
        ];
        let before = pair_momentum(&particles[0], &particles[1]);

        let infected = resolve_collisions(&mut particles, &area);

        assert_eq!(infected, vec![ParticleId(1)]);
        assert_eq!(particles[1].status(), InfectionStatus::Sick);
        let after = pair_momentum(&particles[0], &particles[1]);
        assert_relative_eq!(before.0, after.0, epsilon = 1e-9);
        assert_relative_eq!(before.1, after.1, epsilon = 1e-9);
        let gap = particles[0].position().distance_to(particles[1].position());
        assert_relative_eq!(gap, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn pass_clamps_every_particle_including_last() {
        let area = Area::new(100.0, 100.0).unwrap();
        let mut particles = vec![
            particle(-10.0, 50.0, 4.0, -1.0, 0.0),
            particle(50.0, 50.0, 4.0, 0.0, 0.0),
            particle(150.0, 120.0, 4.0, 2.0, 2.0),
        ];
        resolve_collisions(&mut particles, &area);
        for p in &particles {
            assert!(area.contains(p), "{p:?} outside area");
        }
        assert_relative_eq!(particles[2].x, 96.0);
        assert_relative_eq!(particles[2].y, 96.0);
        assert_relative_eq!(particles[2].dx, -2.0);
    }

    #[test]
    fn empty_and_single_rosters() {
        let area = Area::new(100.0, 100.0).unwrap();
        let mut none: Vec<Particle> = Vec::new();
        assert!(resolve_collisions(&mut none, &area).is_empty());

        let mut one = vec![particle(1.0, 1.0, 4.0, 0.0, 0.0)];
        assert!(resolve_collisions(&mut one, &area).is_empty());
        assert!(area.contains(&one[0]));
    }
}
