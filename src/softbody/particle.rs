use crate::math::{Point3, Vector3};

/// A point mass of a soft body, one per mesh vertex.
///
/// Static particles behave as if their mass were infinite: they never
/// move, but springs attached to them still pull on their neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Point3,
    /// Current velocity.
    pub velocity: Vector3,
    mass: f64,
    force: Vector3,
    is_static: bool,
}

impl Particle {
    /// Creates a resting dynamic particle.
    #[must_use]
    pub fn new(position: Point3, mass: f64) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            mass,
            force: Vector3::zeros(),
            is_static: false,
        }
    }

    /// Returns the mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub(crate) fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Returns the inverse mass, zero for static particles.
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Returns `true` if the particle is pinned in place.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Pins or releases the particle. Pinning discards any velocity.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.velocity = Vector3::zeros();
            self.force = Vector3::zeros();
        }
    }

    /// Returns the force accumulated for the current step.
    #[must_use]
    pub fn force(&self) -> &Vector3 {
        &self.force
    }

    /// Adds to the accumulated force. Ignored on static particles.
    pub fn apply_force(&mut self, force: &Vector3) {
        if !self.is_static {
            self.force += force;
        }
    }

    pub(crate) fn clear_force(&mut self) {
        self.force = Vector3::zeros();
    }

    /// Semi-implicit Euler step: velocity first, then position.
    pub(crate) fn integrate(&mut self, dt: f64) {
        if self.is_static {
            return;
        }
        self.velocity += self.force * (dt / self.mass);
        self.position += self.velocity * dt;
    }
}
