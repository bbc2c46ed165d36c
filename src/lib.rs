pub mod error;
pub mod math;
pub mod mesh;
pub mod shape;
pub mod softbody;
pub mod world;

pub use error::{PliantError, Result};
