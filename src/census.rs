//! Status tallies of a particle snapshot.
use serde::Serialize;

use crate::particle::{InfectionStatus, Particle};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    pub healthy: usize,
    pub sick: usize,
    pub recovered: usize,
}

impl Census {
    #[must_use]
    pub fn tally(particles: &[Particle]) -> Self {
        particles
            .iter()
            .fold(Census::default(), |mut census, particle| {
                match particle.status() {
                    InfectionStatus::Healthy => census.healthy += 1,
                    InfectionStatus::Sick => census.sick += 1,
                    InfectionStatus::Recovered => census.recovered += 1,
                }
                census
            })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.healthy + self.sick + self.recovered
    }

    /// The epidemic has run its course: someone has recovered and nobody is sick.
    #[must_use]
    pub fn is_outbreak_over(&self) -> bool {
        self.recovered > 0 && self.sick == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: InfectionStatus) -> Particle {
        Particle::new(10.0, 10.0, 4.0, 0.0, 0.0)
            .unwrap()
            .with_status(status)
    }

    #[test]
    fn tally_counts_each_status() {
        let particles = vec![
            with_status(InfectionStatus::Healthy),
            with_status(InfectionStatus::Sick),
            with_status(InfectionStatus::Healthy),
            with_status(InfectionStatus::Recovered),
        ];
        let census = Census::tally(&particles);
        assert_eq!(
            census,
            Census {
                healthy: 2,
                sick: 1,
                recovered: 1
            }
        );
        assert_eq!(census.total(), 4);
    }

    #[test]
    fn outbreak_over_needs_a_recovery_and_no_sick() {
        assert!(!Census::default().is_outbreak_over());
        assert!(!Census {
            healthy: 3,
            sick: 1,
            recovered: 2
        }
        .is_outbreak_over());
        assert!(Census {
            healthy: 3,
            sick: 0,
            recovered: 2
        }
        .is_outbreak_over());
    }
}
