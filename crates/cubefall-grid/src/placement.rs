use cubefall_geom::{Cell, Vec3};
use thiserror::Error;

use crate::cubes::CubeSet;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("placement is closed until the next countdown")]
    Locked,
    #[error("the tap did not hit anything")]
    Missed,
    #[error("cell {0:?} is already occupied")]
    Occupied(Cell),
    #[error("cell {0:?} is below the floor")]
    BelowFloor(Cell),
    #[error("cell {0:?} is outside the board")]
    OutOfBounds(Cell),
    #[error("cell {0:?} does not touch the current shape")]
    NotAdjacent(Cell),
}

/// Inclusive cell range a cube may be placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardBounds {
    pub min: Cell,
    pub max: Cell,
}

impl BoardBounds {
    pub fn contains(&self, c: Cell) -> bool {
        (self.min.x..=self.max.x).contains(&c.x)
            && (self.min.y..=self.max.y).contains(&c.y)
            && (self.min.z..=self.max.z).contains(&c.z)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PlacementValidator {
    pub bounds: BoardBounds,
}

impl PlacementValidator {
    pub fn new(bounds: BoardBounds) -> Self {
        Self { bounds }
    }

    /// Checks that `candidate` is free and grows the shape in `set`.
    /// `blocked` reports cells taken by anything outside the set (settled
    /// cubes, a falling group).
    pub fn validate<F>(
        &self,
        set: &CubeSet,
        candidate: Cell,
        blocked: F,
    ) -> Result<(), PlacementError>
    where
        F: Fn(Cell) -> bool,
    {
        if candidate.y < self.bounds.min.y {
            return Err(PlacementError::BelowFloor(candidate));
        }
        if !self.bounds.contains(candidate) {
            return Err(PlacementError::OutOfBounds(candidate));
        }
        if set.contains(candidate) || blocked(candidate) {
            return Err(PlacementError::Occupied(candidate));
        }
        if set.is_empty() || set.touches(candidate) {
            Ok(())
        } else {
            Err(PlacementError::NotAdjacent(candidate))
        }
    }
}

/// Nearest face position of any cube in `set`, if it lies closer than
/// `connection_distance` to `pos`.
pub fn nearest_connection_point(
    set: &CubeSet,
    pos: Vec3,
    connection_distance: f32,
) -> Option<Vec3> {
    let mut best: Option<(f32, Vec3)> = None;
    for cube in set.iter() {
        for face in cube.cell.neighbors() {
            let p = face.center();
            let d = p.distance(pos);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, p));
            }
        }
    }
    best.filter(|(d, _)| *d < connection_distance).map(|(_, p)| p)
}

/// Cell targeted by a tap that hit a surface: the cell just outside the
/// touched face.
pub fn resolve_tap(hit_point: Vec3, hit_normal: Vec3, spawn_offset: Vec3) -> Cell {
    Cell::from_world(hit_point + hit_normal * 0.5 + spawn_offset)
}
