use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point;

use crate::error::{MeshError, Result};

/// Hash key for exact coordinate equality.
///
/// `-0.0` is folded into `0.0` so that keys agree with `==` on every
/// finite input.
fn position_key<const D: usize>(p: &Point<f64, D>) -> [u64; D] {
    std::array::from_fn(|i| (p[i] + 0.0).to_bits())
}

/// Checks that every coordinate is finite and every triangle index is in range.
pub(crate) fn validate<const D: usize>(
    triangles: &[[usize; 3]],
    vertices: &[Point<f64, D>],
) -> Result<()> {
    if let Some(index) = vertices
        .iter()
        .position(|v| v.iter().any(|c| !c.is_finite()))
    {
        return Err(MeshError::NonFiniteVertex { index }.into());
    }
    for (triangle, tri) in triangles.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                triangle,
                index,
                len: vertices.len(),
            }
            .into());
        }
    }
    Ok(())
}

/// Merges vertices with identical positions and remaps triangle indices.
///
/// Each distinct position keeps the slot of its first occurrence. Triangle
/// corners are remapped by the position they pointed at, and the repeated
/// slots are then compacted out in one pass, so survivors keep their
/// relative order. Positions are compared exactly; nearly equal vertices are kept
/// apart.
///
/// Returns the number of vertices removed.
///
/// # Errors
///
/// Returns an error, leaving both inputs untouched, if a triangle index is
/// out of range or a vertex has a non-finite coordinate.
pub fn remove_duplicate_vertices<const D: usize>(
    triangles: &mut [[usize; 3]],
    vertices: &mut Vec<Point<f64, D>>,
) -> Result<usize> {
    validate(triangles, vertices)?;

    let mut unique: HashMap<[u64; D], usize> = HashMap::with_capacity(vertices.len());
    let mut duplicate = vec![false; vertices.len()];

    for (i, v) in vertices.iter().enumerate() {
        let next = unique.len();
        match unique.entry(position_key(v)) {
            Entry::Occupied(_) => duplicate[i] = true,
            Entry::Vacant(slot) => {
                slot.insert(next);
            }
        }
    }

    for tri in triangles.iter_mut() {
        for corner in tri.iter_mut() {
            *corner = unique[&position_key(&vertices[*corner])];
        }
    }

    let before = vertices.len();
    let mut slot = 0;
    vertices.retain(|_| {
        let keep = !duplicate[slot];
        slot += 1;
        keep
    });
    Ok(before - vertices.len())
}
