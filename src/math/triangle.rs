use super::{Point3, Vector3};

/// Area-weighted normal of the triangle `(a, b, c)`.
///
/// The length equals the triangle area; the direction follows the
/// counter-clockwise winding `a -> b -> c`.
#[must_use]
pub fn area_normal(a: &Point3, b: &Point3, c: &Point3) -> Vector3 {
    (b - a).cross(&(c - a)) * 0.5
}

/// Signed volume of the tetrahedron formed by the origin and triangle `(a, b, c)`.
///
/// Summed over a closed, consistently wound mesh this gives the enclosed
/// volume: positive when faces wind counter-clockwise seen from outside.
#[must_use]
pub fn signed_tetra_volume(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
}

/// Closest point on triangle `(a, b, c)` to `p`.
///
/// Voronoi-region walk over the three vertices, three edges and the face
/// interior. Degenerate triangles fall back to the nearest edge point.
#[must_use]
pub fn closest_point(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = va + vb + vc;
    if denom.abs() < f64::EPSILON {
        return *a;
    }
    let v = vb / denom;
    let w = vc / denom;
    a + ab * v + ac * w
}
