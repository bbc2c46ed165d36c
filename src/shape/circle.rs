use std::f64::consts::PI;

use crate::error::{Result, ShapeError};
use crate::math::{Aabb2, Point2, Rotation2, Vector2};

use super::{positive, ConvexShape, MassProperties, BOUNDING_BOX_MARGIN};

/// A solid disk centred on the local origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    /// Creates a new disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive and finite.
    pub fn new(radius: f64) -> Result<Self> {
        Ok(Self {
            radius: positive("radius", radius)?,
        })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ConvexShape for Circle {
    fn point_inside_local(&self, point: &Point2) -> bool {
        point.coords.norm_squared() <= self.radius * self.radius
    }

    fn support_mapping(&self, direction: &Vector2) -> Point2 {
        if direction.x == 0.0 && direction.y == 0.0 {
            return Point2::origin();
        }
        // Scale by the largest component first so tiny directions do not
        // underflow when squared.
        let unit = (direction / direction.amax()).normalize();
        Point2::from(unit * self.radius)
    }

    fn bounding_box(&self, _orientation: &Rotation2) -> Aabb2 {
        let r = self.radius;
        Aabb2::new(Point2::new(-r, -r), Point2::new(r, r)).padded(BOUNDING_BOX_MARGIN)
    }

    fn mass_properties(&self, density: f64) -> MassProperties {
        let r2 = self.radius * self.radius;
        let mass = density * PI * r2;
        MassProperties {
            mass,
            inertia: mass * r2 / 4.0,
        }
    }

    fn update_axes(&self, _orientation: &Rotation2) -> Result<[Vector2; 2]> {
        Err(ShapeError::Unsupported {
            shape: "circle",
            operation: "update_axes",
        }
        .into())
    }
}
