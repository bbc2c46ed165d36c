use crate::math::triangle::closest_point;
use crate::math::{Aabb3, Vector3, TOLERANCE};

use super::particle::Particle;

/// A particle found within the collision margin of a triangle of its own body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfContact {
    /// Index of the intruding particle.
    pub particle: usize,
    /// Index of the triangle it approaches.
    pub triangle: usize,
    /// Distance from the particle to the closest point on the triangle.
    pub distance: f64,
    /// Unit direction from the triangle towards the particle.
    pub normal: Vector3,
}

/// Finds particle/triangle pairs closer than `vertex_expansion + triangle_expansion`.
///
/// Particles are never tested against triangles they are a corner of. Each
/// triangle's bounding box, padded by the margin, rejects far particles
/// before the exact closest-point test. Resolving the contacts is left to
/// the collision engine.
#[must_use]
pub fn detect(
    particles: &[Particle],
    triangles: &[[usize; 3]],
    vertex_expansion: f64,
    triangle_expansion: f64,
) -> Vec<SelfContact> {
    let margin = vertex_expansion + triangle_expansion;
    if margin <= 0.0 {
        return Vec::new();
    }

    let mut contacts = Vec::new();
    for (t, tri) in triangles.iter().enumerate() {
        let [a, b, c] = tri.map(|i| particles[i].position);
        let Some(bounds) = Aabb3::from_points(&[a, b, c]) else {
            continue;
        };
        let bounds = bounds.padded(margin);

        for (i, particle) in particles.iter().enumerate() {
            if tri.contains(&i) || !bounds.contains(&particle.position) {
                continue;
            }
            let closest = closest_point(&particle.position, &a, &b, &c);
            let offset = particle.position - closest;
            let distance = offset.norm();
            if distance >= margin {
                continue;
            }
            let normal = if distance > TOLERANCE {
                offset / distance
            } else {
                (b - a).cross(&(c - a)).try_normalize(TOLERANCE).unwrap_or_else(Vector3::y)
            };
            contacts.push(SelfContact {
                particle: i,
                triangle: t,
                distance,
                normal,
            });
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn sheet_with_probe(probe_height: f64) -> (Vec<Particle>, Vec<[usize; 3]>) {
        let particles = vec![
            Particle::new(Point3::new(0.0, 0.0, 0.0), 1.0),
            Particle::new(Point3::new(1.0, 0.0, 0.0), 1.0),
            Particle::new(Point3::new(0.0, 0.0, 1.0), 1.0),
            Particle::new(Point3::new(0.25, probe_height, 0.25), 1.0),
        ];
        (particles, vec![[0, 2, 1]])
    }

    #[test]
    fn finds_particle_within_margin() {
        let (particles, triangles) = sheet_with_probe(0.05);
        let contacts = detect(&particles, &triangles, 0.05, 0.05);
        assert_eq!(contacts.len(), 1);
        let c = contacts[0];
        assert_eq!((c.particle, c.triangle), (3, 0));
        assert_relative_eq!(c.distance, 0.05, epsilon = 1e-12);
        assert_relative_eq!(c.normal, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn ignores_particle_outside_margin() {
        let (particles, triangles) = sheet_with_probe(0.5);
        assert!(detect(&particles, &triangles, 0.1, 0.1).is_empty());
    }

    #[test]
    fn zero_margin_disables_detection() {
        let (particles, triangles) = sheet_with_probe(0.0);
        assert!(detect(&particles, &triangles, 0.0, 0.0).is_empty());
    }

    #[test]
    fn corners_never_collide_with_own_triangle() {
        let (particles, triangles) = sheet_with_probe(10.0);
        assert!(detect(&particles, &triangles, 1.0, 1.0).is_empty());
    }
}
