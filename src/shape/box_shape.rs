use crate::error::Result;
use crate::math::{Aabb2, Point2, Rotation2, Vector2};

use super::{positive, ConvexShape, MassProperties, BOUNDING_BOX_MARGIN};

/// A solid rectangle centred on the local origin.
///
/// Stored as half extents; constructed from the full width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    half_extents: Vector2,
}

impl BoxShape {
    /// Creates a new rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if either extent is not positive and finite.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let width = positive("width", width)?;
        let height = positive("height", height)?;
        Ok(Self {
            half_extents: Vector2::new(width, height) * 0.5,
        })
    }

    /// Returns the full width and height.
    #[must_use]
    pub fn size(&self) -> Vector2 {
        self.half_extents * 2.0
    }

    /// Returns the half width and half height.
    #[must_use]
    pub fn half_extents(&self) -> &Vector2 {
        &self.half_extents
    }
}

impl ConvexShape for BoxShape {
    fn point_inside_local(&self, point: &Point2) -> bool {
        point.x.abs() <= self.half_extents.x && point.y.abs() <= self.half_extents.y
    }

    fn support_mapping(&self, direction: &Vector2) -> Point2 {
        // Ties on an axis pick the positive face; a zero direction maps to
        // the origin like every other shape.
        if direction.x == 0.0 && direction.y == 0.0 {
            return Point2::origin();
        }
        let h = &self.half_extents;
        Point2::new(
            if direction.x >= 0.0 { h.x } else { -h.x },
            if direction.y >= 0.0 { h.y } else { -h.y },
        )
    }

    fn bounding_box(&self, orientation: &Rotation2) -> Aabb2 {
        // |R| * h gives the half extents of the rotated rectangle.
        let extent = orientation.matrix().abs() * self.half_extents;
        Aabb2::new(Point2::from(-extent), Point2::from(extent)).padded(BOUNDING_BOX_MARGIN)
    }

    fn mass_properties(&self, density: f64) -> MassProperties {
        let size = self.size();
        let mass = density * size.x * size.y;
        MassProperties {
            mass,
            inertia: mass * size.norm_squared() / 12.0,
        }
    }

    fn update_axes(&self, orientation: &Rotation2) -> Result<[Vector2; 2]> {
        Ok([orientation * Vector2::x(), orientation * Vector2::y()])
    }
}
