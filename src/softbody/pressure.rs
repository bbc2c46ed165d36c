use crate::math::triangle::{area_normal, signed_tetra_volume};
use crate::math::TOLERANCE;

use super::particle::Particle;

/// Internal gas pressure that keeps a closed soft body inflated.
///
/// Each face is pushed along its area-weighted normal by
/// `pressure / volume`, so the force grows as the body is squeezed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressureConstraint {
    /// Target pressure; zero disables the constraint.
    pub pressure: f64,
}

impl PressureConstraint {
    /// Creates a pressure constraint.
    #[must_use]
    pub fn new(pressure: f64) -> Self {
        Self { pressure }
    }

    /// Returns `true` if the constraint would apply any force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pressure != 0.0
    }

    /// Signed volume enclosed by `triangles`, positive for outward winding.
    #[must_use]
    pub fn volume(particles: &[Particle], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| {
                signed_tetra_volume(
                    &particles[t[0]].position,
                    &particles[t[1]].position,
                    &particles[t[2]].position,
                )
            })
            .sum()
    }

    /// Adds pressure forces to the particles of a closed mesh.
    ///
    /// Dividing by the signed volume keeps the force pointing outwards for
    /// either winding. A collapsed mesh (volume below tolerance) receives
    /// no force.
    pub fn apply_forces(&self, particles: &mut [Particle], triangles: &[[usize; 3]]) {
        if !self.is_active() {
            return;
        }
        let volume = Self::volume(particles, triangles);
        if volume.abs() < TOLERANCE {
            tracing::warn!(volume, "soft body volume collapsed, skipping pressure");
            return;
        }

        let scale = self.pressure / volume / 3.0;
        let forces: Vec<_> = triangles
            .iter()
            .map(|t| {
                area_normal(
                    &particles[t[0]].position,
                    &particles[t[1]].position,
                    &particles[t[2]].position,
                ) * scale
            })
            .collect();
        for (t, force) in triangles.iter().zip(&forces) {
            for &i in t {
                particles[i].apply_force(force);
            }
        }
    }
}
