use std::collections::{HashMap, HashSet};

use crate::error::{Result, SoftBodyError};
use crate::math::Point3;
use crate::mesh::{Edge, TriangleMesh};

use super::particle::Particle;
use super::pressure::PressureConstraint;
use super::spring::{SpringSystem, SpringType};
use super::{SoftBody, SoftBodyConfig};

impl SoftBody {
    /// Builds a soft body from a closed triangle mesh.
    ///
    /// One particle is created per mesh vertex. Springs are added along
    /// every mesh edge, and across every pair of triangles sharing an edge
    /// (joining the two vertices opposite the shared edge). A cross spring
    /// is a shear spring when the shared edge is the longest side of both
    /// triangles, so the pair forms a quad and the spring is its other
    /// diagonal; otherwise it is a bend spring holding the hinge angle.
    ///
    /// The pressure constraint only acts when the mesh is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the particle mass is not positive and finite.
    pub fn from_mesh(mesh: TriangleMesh, config: SoftBodyConfig) -> Result<Self> {
        let closed = mesh.is_closed();
        let edges = mesh.edges();
        let adjacency = mesh.edge_adjacency();
        let (vertices, triangles) = mesh.into_parts();

        let particles = make_particles(&vertices, config.particle_mass)?;
        let mut springs = SpringSystem::new(config.edge, config.shear, config.bend);

        for edge in &edges {
            springs.connect(&particles, edge.0, edge.1, SpringType::Edge);
        }

        let is_edge: HashSet<Edge> = edges.iter().copied().collect();
        let mut cross: Vec<(Edge, SpringType)> = Vec::new();
        let mut cross_slot: HashMap<Edge, usize> = HashMap::new();
        for edge in &edges {
            let faces = &adjacency[edge];
            for (k, &f1) in faces.iter().enumerate() {
                for &f2 in &faces[k + 1..] {
                    let c = opposite(&triangles[f1], *edge);
                    let d = opposite(&triangles[f2], *edge);
                    let pair = Edge::new(c, d);
                    if c == d || is_edge.contains(&pair) {
                        continue;
                    }
                    let kind = if is_longest_side(&vertices, *edge, c)
                        && is_longest_side(&vertices, *edge, d)
                    {
                        SpringType::Shear
                    } else {
                        SpringType::Bend
                    };
                    match cross_slot.get(&pair) {
                        Some(&slot) => {
                            if kind == SpringType::Shear {
                                cross[slot].1 = SpringType::Shear;
                            }
                        }
                        None => {
                            cross_slot.insert(pair, cross.len());
                            cross.push((pair, kind));
                        }
                    }
                }
            }
        }
        for (pair, kind) in cross {
            springs.connect(&particles, pair.0, pair.1, kind);
        }

        if config.pressure != 0.0 && !closed {
            tracing::warn!("pressure set on an open mesh; it will have no effect");
        }
        tracing::debug!(
            particles = particles.len(),
            springs = springs.springs().len(),
            triangles = triangles.len(),
            closed,
            "built soft body from mesh"
        );

        Ok(Self::assemble(
            particles,
            springs,
            triangles,
            closed,
            None,
            &config,
        ))
    }

    /// Builds a rectangular cloth lying in the XZ plane.
    ///
    /// Particle `row * columns + column` starts at
    /// `(column * spacing, 0, row * spacing)`. Edge springs join grid
    /// neighbours, shear springs both diagonals of every cell, and bend
    /// springs particles two steps apart along a row or column. Cloth is
    /// open, so pressure never applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is smaller than 2x2, the spacing is not
    /// positive and finite, or the particle mass is invalid.
    pub fn cloth(
        rows: usize,
        columns: usize,
        spacing: f64,
        config: SoftBodyConfig,
    ) -> Result<Self> {
        if rows < 2 || columns < 2 {
            return Err(SoftBodyError::InvalidGrid(format!(
                "need at least 2x2 particles, got {rows}x{columns}"
            ))
            .into());
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SoftBodyError::InvalidGrid(format!(
                "spacing must be positive and finite, got {spacing}"
            ))
            .into());
        }

        let index = |row: usize, column: usize| row * columns + column;

        #[allow(clippy::cast_precision_loss)]
        let vertices: Vec<Point3> = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| {
                    Point3::new(column as f64 * spacing, 0.0, row as f64 * spacing)
                })
            })
            .collect();
        let particles = make_particles(&vertices, config.particle_mass)?;

        let mut triangles = Vec::with_capacity((rows - 1) * (columns - 1) * 2);
        for row in 0..rows - 1 {
            for column in 0..columns - 1 {
                let i0 = index(row, column);
                let i1 = index(row, column + 1);
                let i2 = index(row + 1, column);
                let i3 = index(row + 1, column + 1);
                triangles.push([i0, i2, i1]);
                triangles.push([i1, i2, i3]);
            }
        }

        let mut springs = SpringSystem::new(config.edge, config.shear, config.bend);
        for row in 0..rows {
            for column in 0..columns {
                let i = index(row, column);
                if column + 1 < columns {
                    springs.connect(&particles, i, index(row, column + 1), SpringType::Edge);
                }
                if row + 1 < rows {
                    springs.connect(&particles, i, index(row + 1, column), SpringType::Edge);
                }
                if row + 1 < rows && column + 1 < columns {
                    springs.connect(&particles, i, index(row + 1, column + 1), SpringType::Shear);
                    springs.connect(
                        &particles,
                        index(row, column + 1),
                        index(row + 1, column),
                        SpringType::Shear,
                    );
                }
                if column + 2 < columns {
                    springs.connect(&particles, i, index(row, column + 2), SpringType::Bend);
                }
                if row + 2 < rows {
                    springs.connect(&particles, i, index(row + 2, column), SpringType::Bend);
                }
            }
        }

        tracing::debug!(
            rows,
            columns,
            springs = springs.springs().len(),
            "built cloth soft body"
        );

        Ok(Self::assemble(
            particles,
            springs,
            triangles,
            false,
            Some((rows, columns)),
            &config,
        ))
    }

    fn assemble(
        particles: Vec<Particle>,
        springs: SpringSystem,
        triangles: Vec<[usize; 3]>,
        closed: bool,
        grid_size: Option<(usize, usize)>,
        config: &SoftBodyConfig,
    ) -> Self {
        Self {
            particles,
            springs,
            pressure: PressureConstraint::new(config.pressure),
            triangles,
            closed,
            grid_size,
            vertex_expansion: config.vertex_expansion,
            triangle_expansion: config.triangle_expansion,
            self_collision: config.self_collision,
            self_contacts: Vec::new(),
        }
    }
}

fn make_particles(vertices: &[Point3], mass: f64) -> Result<Vec<Particle>> {
    if !(mass.is_finite() && mass > 0.0) {
        return Err(SoftBodyError::InvalidMass(mass).into());
    }
    Ok(vertices.iter().map(|&p| Particle::new(p, mass)).collect())
}

/// The corner of `tri` not on `edge`.
fn opposite(tri: &[usize; 3], edge: Edge) -> usize {
    tri.iter()
        .copied()
        .find(|&i| i != edge.0 && i != edge.1)
        .unwrap_or(tri[0])
}

/// Whether `edge` is at least as long as both other sides of the triangle
/// it forms with `apex`.
fn is_longest_side(vertices: &[Point3], edge: Edge, apex: usize) -> bool {
    let shared = (vertices[edge.1] - vertices[edge.0]).norm_squared();
    let side_a = (vertices[apex] - vertices[edge.0]).norm_squared();
    let side_b = (vertices[apex] - vertices[edge.1]).norm_squared();
    shared >= side_a && shared >= side_b
}
