use thiserror::Error;

/// Top-level error type for the Pliant physics core.
#[derive(Debug, Error)]
pub enum PliantError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    SoftBody(#[from] SoftBodyError),

    #[error(transparent)]
    World(#[from] WorldError),
}

/// Errors raised by shape construction and shape queries.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("parameter {parameter} = {value} must be positive and finite")]
    InvalidParameter { parameter: &'static str, value: f64 },

    #[error("operation `{operation}` is not supported for {shape} shapes")]
    Unsupported {
        shape: &'static str,
        operation: &'static str,
    },
}

/// Errors raised while preprocessing or validating triangle meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("triangle {triangle} references vertex {index}, but only {len} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        len: usize,
    },

    #[error("triangle {triangle} has repeated vertex indices {indices:?}")]
    DegenerateTriangle { triangle: usize, indices: [usize; 3] },

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("mesh has no triangles")]
    Empty,
}

/// Errors raised by soft body construction and particle access.
#[derive(Debug, Error)]
pub enum SoftBodyError {
    #[error("particle {index} is out of range (soft body has {len} particles)")]
    ParticleOutOfRange { index: usize, len: usize },

    #[error("invalid cloth grid: {0}")]
    InvalidGrid(String),

    #[error("mass {0} must be positive and finite")]
    InvalidMass(f64),
}

/// Errors raised by the body registry.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("body not found in world")]
    BodyNotFound,

    #[error("body is not a soft body")]
    NotSoftBody,
}

/// Convenience type alias for results using [`PliantError`].
pub type Result<T> = std::result::Result<T, PliantError>;
