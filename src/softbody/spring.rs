use crate::math::{Vector3, TOLERANCE};

use super::particle::Particle;

/// The role a spring plays in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringType {
    /// Structural spring along a mesh edge.
    Edge,
    /// Diagonal spring resisting in-plane shearing.
    Shear,
    /// Long-range spring resisting folding.
    Bend,
}

impl SpringType {
    /// All spring types, in storage order.
    pub const ALL: [Self; 3] = [Self::Edge, Self::Shear, Self::Bend];

    fn slot(self) -> usize {
        match self {
            Self::Edge => 0,
            Self::Shear => 1,
            Self::Bend => 2,
        }
    }
}

/// Stiffness and damping shared by every spring of one type.
///
/// Values are not clamped. Large stiffness relative to particle mass and
/// step size makes the explicit integrator unstable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Restoring force per unit of stretch.
    pub stiffness: f64,
    /// Force per unit of relative velocity along the spring.
    pub damping: f64,
}

impl SpringParams {
    /// Creates spring parameters.
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::new(1.0, 0.05)
    }
}

/// A spring between two particles of the same soft body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// First particle index.
    pub a: usize,
    /// Second particle index.
    pub b: usize,
    /// Length at which the spring exerts no force.
    pub rest_length: f64,
    /// Which parameter group drives this spring.
    pub kind: SpringType,
}

impl Spring {
    /// Force on particle `a`; particle `b` receives the negation.
    ///
    /// `f = (k (L - L0) + c ((v_b - v_a) . dir)) dir` with `dir` pointing
    /// from `a` to `b`. Coincident endpoints produce no force.
    #[must_use]
    pub fn force(&self, particles: &[Particle], params: &SpringParams) -> Vector3 {
        let pa = &particles[self.a];
        let pb = &particles[self.b];
        let delta = pb.position - pa.position;
        let length = delta.norm();
        if length < TOLERANCE {
            return Vector3::zeros();
        }
        let dir = delta / length;
        let stretch = length - self.rest_length;
        let closing_speed = (pb.velocity - pa.velocity).dot(&dir);
        dir * (params.stiffness * stretch + params.damping * closing_speed)
    }
}

/// All springs of a soft body plus one parameter set per spring type.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringSystem {
    springs: Vec<Spring>,
    params: [SpringParams; 3],
}

impl SpringSystem {
    /// Creates an empty system with the given per-type parameters.
    #[must_use]
    pub fn new(edge: SpringParams, shear: SpringParams, bend: SpringParams) -> Self {
        Self {
            springs: Vec::new(),
            params: [edge, shear, bend],
        }
    }

    /// Adds a spring whose rest length is the current particle distance.
    ///
    /// Callers guarantee `a != b` and both indices are in range.
    pub(crate) fn connect(&mut self, particles: &[Particle], a: usize, b: usize, kind: SpringType) {
        debug_assert!(a != b, "spring endpoints must differ");
        let rest_length = (particles[b].position - particles[a].position).norm();
        self.springs.push(Spring {
            a,
            b,
            rest_length,
            kind,
        });
    }

    /// Returns every spring.
    #[must_use]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Iterates over the springs of one type.
    pub fn of_type(&self, kind: SpringType) -> impl Iterator<Item = &Spring> {
        self.springs.iter().filter(move |s| s.kind == kind)
    }

    /// Returns the parameters of one spring type.
    #[must_use]
    pub fn params(&self, kind: SpringType) -> &SpringParams {
        &self.params[kind.slot()]
    }

    /// Replaces the parameters of one spring type.
    pub fn set_params(&mut self, kind: SpringType, params: SpringParams) {
        self.params[kind.slot()] = params;
    }

    /// Computes every spring force from the current particle state, then
    /// adds them to the particles' accumulators.
    pub fn apply_forces(&self, particles: &mut [Particle]) {
        let forces: Vec<Vector3> = self
            .springs
            .iter()
            .map(|s| s.force(particles, self.params(s.kind)))
            .collect();
        for (spring, force) in self.springs.iter().zip(&forces) {
            particles[spring.a].apply_force(force);
            particles[spring.b].apply_force(&-force);
        }
    }
}
