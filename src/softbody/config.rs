use super::spring::{SpringParams, SpringType};

/// Parameters applied when a soft body is built.
///
/// Everything here can also be changed on the body afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftBodyConfig {
    /// Mass given to every particle.
    pub particle_mass: f64,
    /// Parameters of structural springs.
    pub edge: SpringParams,
    /// Parameters of diagonal springs.
    pub shear: SpringParams,
    /// Parameters of folding springs.
    pub bend: SpringParams,
    /// Internal pressure for closed meshes; zero disables it.
    pub pressure: f64,
    /// Collision radius around each particle.
    pub vertex_expansion: f64,
    /// Collision thickness added to each triangle.
    pub triangle_expansion: f64,
    /// Whether particles are tested against their own body's triangles.
    pub self_collision: bool,
}

impl Default for SoftBodyConfig {
    fn default() -> Self {
        Self {
            particle_mass: 1.0,
            edge: SpringParams::new(1.0, 0.05),
            shear: SpringParams::new(0.5, 0.05),
            bend: SpringParams::new(0.1, 0.05),
            pressure: 0.0,
            vertex_expansion: 0.0,
            triangle_expansion: 0.0,
            self_collision: false,
        }
    }
}

impl SoftBodyConfig {
    /// Sets the mass of every particle.
    #[must_use]
    pub fn with_particle_mass(mut self, mass: f64) -> Self {
        self.particle_mass = mass;
        self
    }

    /// Sets stiffness and damping for one spring type.
    #[must_use]
    pub fn with_springs(mut self, kind: SpringType, stiffness: f64, damping: f64) -> Self {
        let params = SpringParams::new(stiffness, damping);
        match kind {
            SpringType::Edge => self.edge = params,
            SpringType::Shear => self.shear = params,
            SpringType::Bend => self.bend = params,
        }
        self
    }

    /// Sets the internal pressure.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    /// Sets both collision margins.
    #[must_use]
    pub fn with_expansion(mut self, vertex: f64, triangle: f64) -> Self {
        self.vertex_expansion = vertex;
        self.triangle_expansion = triangle;
        self
    }

    /// Enables or disables self collision.
    #[must_use]
    pub fn with_self_collision(mut self, enabled: bool) -> Self {
        self.self_collision = enabled;
        self
    }
}
