//! Shape-in-progress bookkeeping and grid placement rules.
#![forbid(unsafe_code)]

pub mod cubes;
pub mod placement;

pub use cubes::{CubeId, CubeSet, PlacedCube};
pub use placement::{
    BoardBounds, PlacementError, PlacementValidator, nearest_connection_point, resolve_tap,
};
