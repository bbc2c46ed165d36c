//! Minimal body registry for driving soft bodies.
//!
//! The world owns its bodies and hands out generational [`BodyId`]s, so a
//! removed body can never be reached through a stale id. Collision
//! detection and rigid-body dynamics belong to the caller; [`World::step`]
//! only advances soft bodies.

use slotmap::SlotMap;

use crate::error::{Result, WorldError};
use crate::math::{Aabb2, Point2, Rotation2, Vector3};
use crate::shape::Shape;
use crate::softbody::SoftBody;

slotmap::new_key_type! {
    /// Unique identifier for a body in a [`World`].
    pub struct BodyId;
}

/// A shape placed in the world.
///
/// Only the shape contract is modelled; moving rigid bodies is up to the
/// external solver.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Geometry, density and mass properties.
    pub shape: Shape,
    /// World position of the shape origin.
    pub position: Point2,
    /// World orientation.
    pub orientation: Rotation2,
}

impl RigidBody {
    /// Places a shape at the origin with no rotation.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            position: Point2::origin(),
            orientation: Rotation2::identity(),
        }
    }

    /// Sets the world position.
    #[must_use]
    pub fn with_position(mut self, position: Point2) -> Self {
        self.position = position;
        self
    }

    /// Sets the world orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Rotation2) -> Self {
        self.orientation = orientation;
        self
    }

    /// World-space bounding box of the shape.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb2 {
        self.shape
            .bounding_box(&self.orientation)
            .translated(&self.position.coords)
    }

    /// Returns `true` if the world-space point lies inside the shape.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.shape
            .point_inside_world(point, &self.position, &self.orientation)
    }
}

/// Anything the world can hold.
#[derive(Debug, Clone)]
pub enum Body {
    /// A placed shape.
    Rigid(RigidBody),
    /// A deformable body.
    Soft(SoftBody),
}

impl From<RigidBody> for Body {
    fn from(body: RigidBody) -> Self {
        Self::Rigid(body)
    }
}

impl From<SoftBody> for Body {
    fn from(body: SoftBody) -> Self {
        Self::Soft(body)
    }
}

/// Settings shared by every body in a world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Acceleration applied to every dynamic particle.
    pub gravity: Vector3,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
        }
    }
}

impl WorldConfig {
    /// Sets gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3) -> Self {
        self.gravity = gravity;
        self
    }
}

/// Owns bodies and advances soft bodies once per tick.
#[derive(Debug, Default)]
pub struct World {
    bodies: SlotMap<BodyId, Body>,
    config: WorldConfig,
}

impl World {
    /// Creates an empty world with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world with the given settings.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            config,
        }
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the gravity vector.
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.config.gravity = gravity;
    }

    /// Inserts a body and returns its ID.
    pub fn add_body(&mut self, body: impl Into<Body>) -> BodyId {
        let id = self.bodies.insert(body.into());
        tracing::debug!(?id, bodies = self.bodies.len(), "added body");
        id
    }

    /// Removes a body and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not in the world.
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let body = self.bodies.remove(id).ok_or(WorldError::BodyNotFound)?;
        tracing::debug!(?id, bodies = self.bodies.len(), "removed body");
        Ok(body)
    }

    /// Returns a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not in the world.
    pub fn body(&self, id: BodyId) -> Result<&Body> {
        Ok(self.bodies.get(id).ok_or(WorldError::BodyNotFound)?)
    }

    /// Returns a body for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not in the world.
    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        Ok(self.bodies.get_mut(id).ok_or(WorldError::BodyNotFound)?)
    }

    /// Returns a soft body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is missing or is not a soft body.
    pub fn soft_body(&self, id: BodyId) -> Result<&SoftBody> {
        match self.body(id)? {
            Body::Soft(soft) => Ok(soft),
            Body::Rigid(_) => Err(WorldError::NotSoftBody.into()),
        }
    }

    /// Returns a soft body for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is missing or is not a soft body.
    pub fn soft_body_mut(&mut self, id: BodyId) -> Result<&mut SoftBody> {
        match self.body_mut(id)? {
            Body::Soft(soft) => Ok(soft),
            Body::Rigid(_) => Err(WorldError::NotSoftBody.into()),
        }
    }

    /// Iterates over all bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` if the world holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Removes every body.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Advances every soft body by `dt` under the configured gravity.
    pub fn step(&mut self, dt: f64) {
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            if let Body::Soft(soft) = body {
                soft.step(dt, &gravity);
            }
        }
    }
}
