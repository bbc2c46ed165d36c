mod box_shape;
mod circle;

pub use box_shape::BoxShape;
pub use circle::Circle;

use crate::error::{Result, ShapeError};
use crate::math::{Aabb2, Point2, Rotation2, Vector2};

/// Density assigned to shapes that were not given one explicitly.
pub const DEFAULT_DENSITY: f64 = 1.0;

/// Padding added on every face of a shape's bounding box.
///
/// Keeps broad-phase culling from rejecting pairs that touch only
/// within floating-point error.
pub const BOUNDING_BOX_MARGIN: f64 = 0.01;

/// Mass and rotational inertia of a shape about its local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Total mass (`density * area`).
    pub mass: f64,
    /// Moment of inertia about the local origin.
    pub inertia: f64,
}

/// The queries a narrow-phase collision routine and a rigid-body solver
/// may ask of a convex planar shape.
pub trait ConvexShape {
    /// Returns `true` if `point`, given in the shape's local frame, lies
    /// inside the shape or on its boundary.
    fn point_inside_local(&self, point: &Point2) -> bool;

    /// Returns `true` if the world-space `point` lies inside the shape
    /// placed at `position` with `orientation`.
    fn point_inside_world(
        &self,
        point: &Point2,
        position: &Point2,
        orientation: &Rotation2,
    ) -> bool {
        let local = orientation.inverse_transform_vector(&(point - position));
        self.point_inside_local(&Point2::from(local))
    }

    /// Finds the point of the shape furthest along `direction`.
    ///
    /// `direction` need not be normalized. A zero-length direction yields
    /// the local origin.
    fn support_mapping(&self, direction: &Vector2) -> Point2;

    /// Computes the local-space bounding box under `orientation`, padded by
    /// [`BOUNDING_BOX_MARGIN`].
    fn bounding_box(&self, orientation: &Rotation2) -> Aabb2;

    /// Computes mass and inertia for the given density.
    fn mass_properties(&self, density: f64) -> MassProperties;

    /// Computes the shape's separating-axis candidates in world space.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Unsupported`] for shapes without face axes.
    fn update_axes(&self, orientation: &Rotation2) -> Result<[Vector2; 2]>;
}

/// The concrete shape variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// A solid disk.
    Circle(Circle),
    /// A solid rectangle.
    Box(BoxShape),
}

impl ShapeKind {
    /// Returns a short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Box(_) => "box",
        }
    }

    fn as_convex(&self) -> &dyn ConvexShape {
        match self {
            Self::Circle(c) => c,
            Self::Box(b) => b,
        }
    }
}

impl From<Circle> for ShapeKind {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<BoxShape> for ShapeKind {
    fn from(b: BoxShape) -> Self {
        Self::Box(b)
    }
}

impl ConvexShape for ShapeKind {
    fn point_inside_local(&self, point: &Point2) -> bool {
        self.as_convex().point_inside_local(point)
    }

    fn point_inside_world(
        &self,
        point: &Point2,
        position: &Point2,
        orientation: &Rotation2,
    ) -> bool {
        self.as_convex()
            .point_inside_world(point, position, orientation)
    }

    fn support_mapping(&self, direction: &Vector2) -> Point2 {
        self.as_convex().support_mapping(direction)
    }

    fn bounding_box(&self, orientation: &Rotation2) -> Aabb2 {
        self.as_convex().bounding_box(orientation)
    }

    fn mass_properties(&self, density: f64) -> MassProperties {
        self.as_convex().mass_properties(density)
    }

    fn update_axes(&self, orientation: &Rotation2) -> Result<[Vector2; 2]> {
        self.as_convex().update_axes(orientation)
    }
}

/// A shape together with its density and derived mass properties.
///
/// Every mutation goes through a method that recomputes mass and inertia,
/// so the cached values always match the current geometry and density.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    density: f64,
    mass_properties: MassProperties,
}

impl Shape {
    /// Creates a shape with [`DEFAULT_DENSITY`].
    #[must_use]
    pub fn new(kind: impl Into<ShapeKind>) -> Self {
        let kind = kind.into();
        let mass_properties = kind.mass_properties(DEFAULT_DENSITY);
        Self {
            kind,
            density: DEFAULT_DENSITY,
            mass_properties,
        }
    }

    /// Creates a disk of the given radius.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive and finite.
    pub fn circle(radius: f64) -> Result<Self> {
        Ok(Self::new(Circle::new(radius)?))
    }

    /// Creates a rectangle with the given full width and height.
    ///
    /// # Errors
    ///
    /// Returns an error if either extent is not positive and finite.
    pub fn cuboid(width: f64, height: f64) -> Result<Self> {
        Ok(Self::new(BoxShape::new(width, height)?))
    }

    /// Sets the density and returns the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the density is not positive and finite.
    pub fn with_density(mut self, density: f64) -> Result<Self> {
        self.set_density(density)?;
        Ok(self)
    }

    /// Returns the shape variant.
    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Returns the density.
    #[must_use]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Returns the mass derived from the current geometry and density.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass_properties.mass
    }

    /// Returns the inertia derived from the current geometry and density.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.mass_properties.inertia
    }

    /// Returns mass and inertia together.
    #[must_use]
    pub fn mass_properties(&self) -> MassProperties {
        self.mass_properties
    }

    /// Changes the density and recomputes mass and inertia.
    ///
    /// # Errors
    ///
    /// Returns an error if the density is not positive and finite.
    pub fn set_density(&mut self, density: f64) -> Result<()> {
        self.density = positive("density", density)?;
        self.calculate_mass_inertia();
        Ok(())
    }

    /// Replaces the geometry and recomputes mass and inertia.
    pub fn set_kind(&mut self, kind: impl Into<ShapeKind>) {
        self.kind = kind.into();
        self.calculate_mass_inertia();
    }

    /// Edits the geometry in place, then recomputes mass and inertia.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `edit`; the shape is left unchanged
    /// in that case.
    pub fn modify<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ShapeKind) -> Result<()>,
    {
        let mut kind = self.kind.clone();
        edit(&mut kind)?;
        self.set_kind(kind);
        Ok(())
    }

    /// Recomputes mass and inertia from the current geometry and density.
    pub fn calculate_mass_inertia(&mut self) {
        self.mass_properties = self.kind.mass_properties(self.density);
    }

    /// See [`ConvexShape::point_inside_local`].
    #[must_use]
    pub fn point_inside_local(&self, point: &Point2) -> bool {
        self.kind.point_inside_local(point)
    }

    /// See [`ConvexShape::point_inside_world`].
    #[must_use]
    pub fn point_inside_world(
        &self,
        point: &Point2,
        position: &Point2,
        orientation: &Rotation2,
    ) -> bool {
        self.kind.point_inside_world(point, position, orientation)
    }

    /// See [`ConvexShape::support_mapping`].
    #[must_use]
    pub fn support_mapping(&self, direction: &Vector2) -> Point2 {
        self.kind.support_mapping(direction)
    }

    /// See [`ConvexShape::bounding_box`].
    #[must_use]
    pub fn bounding_box(&self, orientation: &Rotation2) -> Aabb2 {
        self.kind.bounding_box(orientation)
    }

    /// See [`ConvexShape::update_axes`].
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Unsupported`] for shapes without face axes.
    pub fn update_axes(&self, orientation: &Rotation2) -> Result<[Vector2; 2]> {
        self.kind.update_axes(orientation)
    }
}

/// Checks that a geometric parameter is positive and finite.
pub(crate) fn positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidParameter { parameter, value }.into())
    }
}
