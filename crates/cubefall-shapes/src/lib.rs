//! Random polyomino generation and spawn-group layout.
#![forbid(unsafe_code)]

pub mod color;
pub mod group;
pub mod mask;

pub use color::ShapeColor;
pub use group::{GroupParams, SpawnGroup, build_spawn_group};
pub use mask::{ShapeMask, ShapeParams, generate_shape};
