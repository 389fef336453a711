//! Collision queries over settled cubes and the stepped fall of shape groups.
#![forbid(unsafe_code)]

pub mod group;
pub mod query;
pub mod raycast;
pub mod scene;

pub use group::{FallMode, FallParams, FallPhase, Landing, ShapeGroup};
pub use query::{BodyId, CollisionWorld, Hit, QueryFilter};
pub use scene::VoxelScene;
