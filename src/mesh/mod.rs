mod dedup;

pub use dedup::remove_duplicate_vertices;

use std::collections::HashMap;

use crate::error::{MeshError, Result};
use crate::math::triangle::{area_normal, signed_tetra_volume};
use crate::math::Point3;

/// An undirected edge, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Creates an edge, ordering the endpoints.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// The three edges of a triangle in winding order.
#[must_use]
pub fn triangle_edges(tri: &[usize; 3]) -> [Edge; 3] {
    [
        Edge::new(tri[0], tri[1]),
        Edge::new(tri[1], tri[2]),
        Edge::new(tri[2], tri[0]),
    ]
}

/// A validated, indexed triangle mesh.
///
/// Every triangle references three distinct vertices that exist, and every
/// vertex coordinate is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh from already-indexed data.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no triangles, an index is out of
    /// range, a triangle repeats a vertex, or a coordinate is not finite.
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(MeshError::Empty.into());
        }
        dedup::validate(&triangles, &vertices)?;
        if let Some((triangle, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, t)| t[0] == t[1] || t[1] == t[2] || t[0] == t[2])
        {
            return Err(MeshError::DegenerateTriangle {
                triangle,
                indices: *tri,
            }
            .into());
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Creates a mesh from a triangle soup as produced by asset exporters,
    /// merging vertices with identical positions first.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged data fails [`TriangleMesh::new`].
    pub fn from_soup(mut vertices: Vec<Point3>, mut triangles: Vec<[usize; 3]>) -> Result<Self> {
        remove_duplicate_vertices(&mut triangles, &mut vertices)?;
        Self::new(vertices, triangles)
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the triangle index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Consumes the mesh, returning vertices and triangles.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Point3>, Vec<[usize; 3]>) {
        (self.vertices, self.triangles)
    }

    /// Returns each undirected edge once, in first-seen order.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let mut seen = std::collections::HashSet::new();
        self.triangles
            .iter()
            .flat_map(triangle_edges)
            .filter(|e| seen.insert(*e))
            .collect()
    }

    /// Maps every edge to the triangles that use it.
    #[must_use]
    pub fn edge_adjacency(&self) -> HashMap<Edge, Vec<usize>> {
        let mut adjacency: HashMap<Edge, Vec<usize>> = HashMap::new();
        for (t, tri) in self.triangles.iter().enumerate() {
            for edge in triangle_edges(tri) {
                adjacency.entry(edge).or_default().push(t);
            }
        }
        adjacency
    }

    /// Returns `true` if the mesh has triangles and every edge is shared by
    /// exactly two of them.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty()
            && self.edge_adjacency().values().all(|faces| faces.len() == 2)
    }

    /// Signed enclosed volume; positive for outward (counter-clockwise) winding.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                signed_tetra_volume(
                    &self.vertices[t[0]],
                    &self.vertices[t[1]],
                    &self.vertices[t[2]],
                )
            })
            .sum()
    }

    /// Total area of all triangles.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                area_normal(
                    &self.vertices[t[0]],
                    &self.vertices[t[1]],
                    &self.vertices[t[2]],
                )
                .norm()
            })
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit cube with outward winding, 8 vertices and 12 triangles.
    pub(crate) fn cube() -> TriangleMesh {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let t = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [1, 2, 6],
            [1, 6, 5],
            [0, 4, 7],
            [0, 7, 3],
        ];
        TriangleMesh::new(v, t).unwrap()
    }

    /// Regular tetrahedron-like mesh with outward winding.
    pub(crate) fn tetrahedron() -> TriangleMesh {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let t = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        TriangleMesh::new(v, t).unwrap()
    }

    #[test]
    fn cube_is_closed_with_unit_volume() {
        let m = cube();
        assert!(m.is_closed());
        assert_eq!(m.edges().len(), 18);
        assert_relative_eq!(m.signed_volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.surface_area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn tetrahedron_volume() {
        let m = tetrahedron();
        assert!(m.is_closed());
        assert_eq!(m.edges().len(), 6);
        assert_relative_eq!(m.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn open_mesh_is_not_closed() {
        let m = TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert!(!m.is_closed());
    }

    #[test]
    fn mesh_without_triangles_is_not_closed() {
        let m = TriangleMesh {
            vertices: Vec::new(),
            triangles: Vec::new(),
        };
        assert!(!m.is_closed());
    }

    #[test]
    fn from_soup_merges_shared_corners() {
        let cube = cube();
        // Explode the cube into a soup with three vertices per triangle.
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for tri in cube.triangles() {
            let base = vertices.len();
            vertices.extend(tri.iter().map(|&i| cube.vertices()[i]));
            triangles.push([base, base + 1, base + 2]);
        }
        assert_eq!(vertices.len(), 36);

        let merged = TriangleMesh::from_soup(vertices, triangles).unwrap();
        assert_eq!(merged.vertices().len(), 8);
        assert!(merged.is_closed());
        assert_relative_eq!(merged.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let err = TriangleMesh::from_soup(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::PliantError::Mesh(MeshError::DegenerateTriangle {
                triangle: 0,
                indices: [0, 1, 0],
            })
        ));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = TriangleMesh::new(vec![Point3::origin()], vec![]).unwrap_err();
        assert!(matches!(err, crate::PliantError::Mesh(MeshError::Empty)));
    }
}
