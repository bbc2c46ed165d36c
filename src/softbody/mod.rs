//! Mass-spring soft bodies.
//!
//! A [`SoftBody`] owns one contiguous store of [`Particle`]s and one of
//! [`Spring`]s; springs, triangles and contacts refer to particles by index.
//! Each tick the driver calls [`SoftBody::step`] (or the individual
//! [`compute_forces`](SoftBody::compute_forces) and
//! [`integrate`](SoftBody::integrate) hooks). Forces are accumulated for
//! every particle from one snapshot of the state before any particle moves.

mod config;
mod construct;
mod particle;
mod pressure;
mod self_collision;
mod spring;

pub use config::SoftBodyConfig;
pub use particle::Particle;
pub use pressure::PressureConstraint;
pub use self_collision::SelfContact;
pub use spring::{Spring, SpringParams, SpringSystem, SpringType};

use crate::error::{Result, SoftBodyError};
use crate::math::{Aabb3, Vector3};

/// A deformable body made of particles, springs and internal pressure.
#[derive(Debug, Clone)]
pub struct SoftBody {
    particles: Vec<Particle>,
    springs: SpringSystem,
    pressure: PressureConstraint,
    triangles: Vec<[usize; 3]>,
    closed: bool,
    grid_size: Option<(usize, usize)>,
    vertex_expansion: f64,
    triangle_expansion: f64,
    self_collision: bool,
    self_contacts: Vec<SelfContact>,
}

impl SoftBody {
    // --- Particles ---

    /// Returns all particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Returns one particle.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn particle(&self, index: usize) -> Result<&Particle> {
        let len = self.particles.len();
        self.particles
            .get(index)
            .ok_or_else(|| SoftBodyError::ParticleOutOfRange { index, len }.into())
    }

    /// Returns one particle for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn particle_mut(&mut self, index: usize) -> Result<&mut Particle> {
        let len = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or_else(|| SoftBodyError::ParticleOutOfRange { index, len }.into())
    }

    /// Pins a particle in place, or releases it.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn set_static(&mut self, index: usize, is_static: bool) -> Result<()> {
        self.particle_mut(index)?.set_static(is_static);
        Ok(())
    }

    /// Adds an external force to one particle for the current step.
    ///
    /// Must be called between [`SoftBody::compute_forces`], which clears the
    /// accumulators, and [`SoftBody::integrate`]. [`SoftBody::step`] runs
    /// both back to back, so drivers that inject external forces call the
    /// two hooks themselves instead of `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn apply_force(&mut self, index: usize, force: &Vector3) -> Result<()> {
        self.particle_mut(index)?.apply_force(force);
        Ok(())
    }

    /// Total mass of all particles.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.particles.iter().map(Particle::mass).sum()
    }

    /// Spreads `total` mass evenly over the particles.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is not positive and finite.
    pub fn set_mass(&mut self, total: f64) -> Result<()> {
        if !(total.is_finite() && total > 0.0) {
            return Err(SoftBodyError::InvalidMass(total).into());
        }
        #[allow(clippy::cast_precision_loss)]
        let each = total / self.particles.len() as f64;
        for p in &mut self.particles {
            p.set_mass(each);
        }
        Ok(())
    }

    /// Moves every particle by `offset`. Spring rest lengths are kept.
    pub fn translate(&mut self, offset: &Vector3) {
        for p in &mut self.particles {
            p.position += offset;
        }
    }

    // --- Springs ---

    /// Returns the spring system.
    #[must_use]
    pub fn springs(&self) -> &SpringSystem {
        &self.springs
    }

    /// Sets stiffness and damping for every spring of one type.
    ///
    /// Values are taken as given; see [`SpringParams`].
    pub fn set_spring_values(&mut self, kind: SpringType, stiffness: f64, damping: f64) {
        self.springs
            .set_params(kind, SpringParams::new(stiffness, damping));
    }

    /// Sets stiffness and damping for all spring types at once.
    pub fn set_all_spring_values(&mut self, stiffness: f64, damping: f64) {
        for kind in SpringType::ALL {
            self.set_spring_values(kind, stiffness, damping);
        }
    }

    // --- Topology and pressure ---

    /// Returns the triangles, as particle index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Returns `true` if the body was built from a closed mesh.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `(rows, columns)` for bodies built with [`SoftBody::cloth`].
    #[must_use]
    pub fn grid_size(&self) -> Option<(usize, usize)> {
        self.grid_size
    }

    /// Returns the internal pressure.
    #[must_use]
    pub fn pressure(&self) -> f64 {
        self.pressure.pressure
    }

    /// Sets the internal pressure. Has no effect on open meshes.
    pub fn set_pressure(&mut self, pressure: f64) {
        self.pressure.pressure = pressure;
    }

    /// Signed volume enclosed by the triangles; meaningful for closed meshes.
    #[must_use]
    pub fn volume(&self) -> f64 {
        PressureConstraint::volume(&self.particles, &self.triangles)
    }

    // --- Collision margins ---

    /// Returns the collision radius around each particle.
    #[must_use]
    pub fn vertex_expansion(&self) -> f64 {
        self.vertex_expansion
    }

    /// Sets the collision radius around each particle.
    pub fn set_vertex_expansion(&mut self, expansion: f64) {
        self.vertex_expansion = expansion;
    }

    /// Returns the collision thickness added to each triangle.
    #[must_use]
    pub fn triangle_expansion(&self) -> f64 {
        self.triangle_expansion
    }

    /// Sets the collision thickness added to each triangle.
    pub fn set_triangle_expansion(&mut self, expansion: f64) {
        self.triangle_expansion = expansion;
    }

    /// Returns `true` if self collision detection is enabled.
    #[must_use]
    pub fn self_collision(&self) -> bool {
        self.self_collision
    }

    /// Enables or disables self collision detection.
    pub fn set_self_collision(&mut self, enabled: bool) {
        self.self_collision = enabled;
        if !enabled {
            self.self_contacts.clear();
        }
    }

    /// Contacts found by the last [`SoftBody::detect_self_collisions`].
    #[must_use]
    pub fn self_contacts(&self) -> &[SelfContact] {
        &self.self_contacts
    }

    /// Bounding box of all particles, padded by the vertex expansion.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(self.particles.iter().map(|p| &p.position))
            .map_or_else(
                || Aabb3::new(crate::math::Point3::origin(), crate::math::Point3::origin()),
                |b| b.padded(self.vertex_expansion),
            )
    }

    // --- Stepping ---

    /// Clears force accumulators and adds gravity, spring and pressure
    /// forces computed from the current positions and velocities.
    pub fn compute_forces(&mut self, gravity: &Vector3) {
        for p in &mut self.particles {
            p.clear_force();
            let weight = gravity * p.mass();
            p.apply_force(&weight);
        }
        self.springs.apply_forces(&mut self.particles);
        if self.closed {
            self.pressure
                .apply_forces(&mut self.particles, &self.triangles);
        }
    }

    /// Advances every dynamic particle by `dt` using the accumulated forces.
    pub fn integrate(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.integrate(dt);
        }
    }

    /// Refreshes [`SoftBody::self_contacts`] if self collision is enabled.
    pub fn detect_self_collisions(&mut self) {
        if !self.self_collision {
            return;
        }
        self.self_contacts = self_collision::detect(
            &self.particles,
            &self.triangles,
            self.vertex_expansion,
            self.triangle_expansion,
        );
    }

    /// Runs one full tick: forces, integration, then self collision detection.
    ///
    /// Forces added with [`SoftBody::apply_force`] before this call are
    /// discarded; see that method for injecting external forces.
    pub fn step(&mut self, dt: f64, gravity: &Vector3) {
        self.compute_forces(gravity);
        self.integrate(dt);
        self.detect_self_collisions();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::tests::{cube, tetrahedron};
    use crate::mesh::TriangleMesh;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 60.0;

    fn gravity() -> Vector3 {
        Vector3::new(0.0, -9.81, 0.0)
    }

    fn demo_cloth() -> SoftBody {
        let config = SoftBodyConfig::default()
            .with_springs(SpringType::Edge, 0.1, 0.1)
            .with_springs(SpringType::Shear, 0.1, 0.1)
            .with_springs(SpringType::Bend, 0.1, 0.1)
            .with_expansion(0.1, 0.1);
        SoftBody::cloth(20, 20, 0.3, config).unwrap()
    }

    #[test]
    fn cloth_topology_counts() {
        let cloth = SoftBody::cloth(3, 4, 1.0, SoftBodyConfig::default()).unwrap();
        assert_eq!(cloth.particles().len(), 12);
        assert_eq!(cloth.triangles().len(), 2 * 2 * 3);
        let springs = cloth.springs();
        // 3 rows x 3 horizontal + 2 x 4 vertical
        assert_eq!(springs.of_type(SpringType::Edge).count(), 17);
        assert_eq!(springs.of_type(SpringType::Shear).count(), 12);
        // 3 rows x 2 horizontal + 1 x 4 vertical
        assert_eq!(springs.of_type(SpringType::Bend).count(), 10);
        assert_eq!(cloth.grid_size(), Some((3, 4)));
        assert!(!cloth.is_closed());
    }

    #[test]
    fn cloth_layout_and_rest_lengths() {
        let cloth = SoftBody::cloth(2, 3, 0.5, SoftBodyConfig::default()).unwrap();
        assert_eq!(cloth.particle(4).unwrap().position, Point3::new(0.5, 0.0, 0.5));
        for s in cloth.springs().springs() {
            let expected = match s.kind {
                SpringType::Edge => 0.5,
                SpringType::Shear => 0.5 * 2.0_f64.sqrt(),
                SpringType::Bend => 1.0,
            };
            assert_relative_eq!(s.rest_length, expected, epsilon = 1e-12);
            assert_ne!(s.a, s.b);
        }
    }

    #[test]
    fn pinned_cloth_corners_hold_while_center_sags() {
        let mut cloth = demo_cloth();
        cloth.translate(&Vector3::new(0.0, 11.0, 10.0));
        cloth.set_static(0, true).unwrap();
        cloth.set_static(19, true).unwrap();

        let corner_a = cloth.particle(0).unwrap().position;
        let corner_b = cloth.particle(19).unwrap().position;
        let center_start = cloth.particle(210).unwrap().position;

        for _ in 0..100 {
            cloth.step(DT, &gravity());
        }

        assert_eq!(cloth.particle(0).unwrap().position, corner_a);
        assert_eq!(cloth.particle(19).unwrap().position, corner_b);
        assert!(cloth.particle(210).unwrap().position.y < center_start.y);
        assert!(cloth.particle(1).unwrap().position.y < corner_a.y);
    }

    #[test]
    fn unpinned_particle_falls_again() {
        let mut cloth = SoftBody::cloth(2, 2, 1.0, SoftBodyConfig::default()).unwrap();
        cloth.set_static(0, true).unwrap();
        cloth.step(DT, &gravity());
        assert_eq!(cloth.particle(0).unwrap().position, Point3::origin());
        cloth.set_static(0, false).unwrap();
        for _ in 0..10 {
            cloth.step(DT, &gravity());
        }
        assert!(cloth.particle(0).unwrap().position.y < 0.0);
    }

    #[test]
    fn translate_preserves_springs_and_pressure() {
        let mut body = SoftBody::from_mesh(cube(), SoftBodyConfig::default().with_pressure(5.0))
            .unwrap();
        let springs_before = body.springs().clone();
        let before: Vec<Point3> = body.particles().iter().map(|p| p.position).collect();

        let offset = Vector3::new(10.0, 5.0, 0.0);
        body.translate(&offset);
        body.translate(&-offset);
        body.translate(&offset);

        assert_eq!(body.springs(), &springs_before);
        assert_relative_eq!(body.pressure(), 5.0);
        for (p, b) in body.particles().iter().zip(&before) {
            assert_relative_eq!(p.position, b + offset);
        }
    }

    #[test]
    fn cube_spring_typing() {
        let body = SoftBody::from_mesh(cube(), SoftBodyConfig::default()).unwrap();
        let springs = body.springs();
        assert_eq!(springs.of_type(SpringType::Edge).count(), 18);
        // The second diagonal of each square face.
        assert_eq!(springs.of_type(SpringType::Shear).count(), 6);
        for s in springs.of_type(SpringType::Shear) {
            assert_relative_eq!(s.rest_length, 2.0_f64.sqrt(), epsilon = 1e-12);
        }

        let mut pairs: Vec<_> = springs
            .springs()
            .iter()
            .map(|s| crate::mesh::Edge::new(s.a, s.b))
            .collect();
        let total = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), total, "each particle pair is joined at most once");
    }

    #[test]
    fn tetrahedron_has_only_edge_springs() {
        let body = SoftBody::from_mesh(tetrahedron(), SoftBodyConfig::default()).unwrap();
        assert_eq!(body.springs().springs().len(), 6);
        assert!(body.is_closed());
    }

    #[test]
    fn spring_values_are_set_per_type() {
        let mut body = SoftBody::cloth(3, 3, 1.0, SoftBodyConfig::default()).unwrap();
        body.set_spring_values(SpringType::Shear, 0.7, 0.01);
        assert_eq!(*body.springs().params(SpringType::Shear), SpringParams::new(0.7, 0.01));
        assert_ne!(*body.springs().params(SpringType::Edge), SpringParams::new(0.7, 0.01));

        body.set_all_spring_values(0.2, 0.005);
        for kind in SpringType::ALL {
            assert_eq!(*body.springs().params(kind), SpringParams::new(0.2, 0.005));
        }
        // Out-of-range values are accepted as given.
        body.set_spring_values(SpringType::Bend, 50.0, -1.0);
        assert_eq!(*body.springs().params(SpringType::Bend), SpringParams::new(50.0, -1.0));
    }

    #[test]
    fn pressure_inflates_closed_mesh() {
        let mut body = SoftBody::from_mesh(cube(), SoftBodyConfig::default().with_pressure(10.0))
            .unwrap();
        let start = body.volume();
        for _ in 0..30 {
            body.step(DT, &Vector3::zeros());
        }
        assert!(body.volume() > start);
    }

    #[test]
    fn zero_pressure_cube_at_rest_stays_put() {
        let mut body = SoftBody::from_mesh(cube(), SoftBodyConfig::default()).unwrap();
        let before: Vec<Point3> = body.particles().iter().map(|p| p.position).collect();
        body.step(DT, &Vector3::zeros());
        for (p, b) in body.particles().iter().zip(&before) {
            assert_relative_eq!(p.position, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn set_mass_distributes_evenly() {
        let mut body = SoftBody::from_mesh(cube(), SoftBodyConfig::default()).unwrap();
        body.set_mass(16.0).unwrap();
        assert_relative_eq!(body.mass(), 16.0);
        assert!(body.particles().iter().all(|p| (p.mass() - 2.0).abs() < 1e-12));
        assert!(body.set_mass(0.0).is_err());
    }

    #[test]
    fn out_of_range_particle_is_an_error() {
        let mut body = SoftBody::cloth(2, 2, 1.0, SoftBodyConfig::default()).unwrap();
        let err = body.set_static(4, true).unwrap_err();
        assert!(matches!(
            err,
            crate::PliantError::SoftBody(SoftBodyError::ParticleOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn external_force_between_hooks_moves_particle() {
        let mut cloth = SoftBody::cloth(2, 2, 1.0, SoftBodyConfig::default()).unwrap();
        cloth.compute_forces(&Vector3::zeros());
        cloth.apply_force(3, &Vector3::new(2.0, 0.0, 0.0)).unwrap();
        cloth.integrate(DT);
        let p = cloth.particle(3).unwrap();
        assert!(p.position.x > 1.0);
        assert_relative_eq!(p.velocity.x, 2.0 * DT, epsilon = 1e-12);
    }

    #[test]
    fn step_discards_forces_applied_beforehand() {
        let mut cloth = SoftBody::cloth(2, 2, 1.0, SoftBodyConfig::default()).unwrap();
        cloth.apply_force(3, &Vector3::new(2.0, 0.0, 0.0)).unwrap();
        cloth.step(DT, &Vector3::zeros());
        assert_eq!(
            cloth.particle(3).unwrap().position,
            Point3::new(1.0, 0.0, 1.0)
        );
    }

    #[test]
    fn empty_mesh_never_becomes_a_soft_body() {
        let body = TriangleMesh::new(Vec::new(), Vec::new())
            .and_then(|mesh| SoftBody::from_mesh(mesh, SoftBodyConfig::default()));
        assert!(matches!(
            body,
            Err(crate::PliantError::Mesh(crate::error::MeshError::Empty))
        ));
    }

    #[test]
    fn invalid_construction_builds_nothing() {
        assert!(SoftBody::cloth(1, 5, 1.0, SoftBodyConfig::default()).is_err());
        assert!(SoftBody::cloth(5, 5, 0.0, SoftBodyConfig::default()).is_err());
        assert!(SoftBody::cloth(5, 5, f64::NAN, SoftBodyConfig::default()).is_err());
        let bad_mass = SoftBodyConfig::default().with_particle_mass(-1.0);
        assert!(SoftBody::from_mesh(cube(), bad_mass).is_err());
    }

    #[test]
    fn bounding_box_includes_vertex_expansion() {
        let mut body = SoftBody::cloth(2, 2, 1.0, SoftBodyConfig::default()).unwrap();
        body.set_vertex_expansion(0.25);
        let aabb = body.bounding_box();
        assert_relative_eq!(aabb.min, Point3::new(-0.25, -0.25, -0.25));
        assert_relative_eq!(aabb.max, Point3::new(1.25, 0.25, 1.25));
    }

    #[test]
    fn self_collision_is_opt_in() {
        let config = SoftBodyConfig::default().with_expansion(0.2, 0.2);
        let mut body = SoftBody::cloth(3, 3, 1.0, config).unwrap();
        // Fold the last row back over the first so it hovers just above it.
        for i in 6..9 {
            let p = body.particle_mut(i).unwrap();
            p.position.z = 0.0;
            p.position.y = 0.1;
        }
        body.detect_self_collisions();
        assert!(body.self_contacts().is_empty());

        body.set_self_collision(true);
        body.detect_self_collisions();
        assert!(!body.self_contacts().is_empty());
        assert!(body
            .self_contacts()
            .iter()
            .all(|c| !body.triangles()[c.triangle].contains(&c.particle)));

        body.set_self_collision(false);
        assert!(body.self_contacts().is_empty());
    }
}
