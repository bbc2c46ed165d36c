use nalgebra::{Point, SVector};

/// An axis-aligned bounding box in `D` dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<const D: usize> {
    /// Minimum corner of the bounding box.
    pub min: Point<f64, D>,
    /// Maximum corner of the bounding box.
    pub max: Point<f64, D>,
}

/// Planar bounding box, returned by shape queries.
pub type Aabb2 = Aabb<2>;

/// Spatial bounding box, returned by soft body queries.
pub type Aabb3 = Aabb<3>;

impl<const D: usize> Aabb<D> {
    /// Creates a bounding box from its two corners.
    #[must_use]
    pub fn new(min: Point<f64, D>, max: Point<f64, D>) -> Self {
        Self { min, max }
    }

    /// Returns the smallest box containing every point, or `None` if the
    /// iterator is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point<f64, D>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Returns a copy grown by `margin` on every face.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        let pad = SVector::<f64, D>::repeat(margin);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &SVector<f64, D>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point<f64, D>) -> bool {
        (0..D).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Returns `true` if the two boxes overlap (touching counts).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// Returns the size of the box along each axis.
    #[must_use]
    pub fn extents(&self) -> SVector<f64, D> {
        self.max - self.min
    }
}
