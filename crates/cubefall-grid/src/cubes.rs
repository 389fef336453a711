use cubefall_geom::{Cell, Vec3};

pub type CubeId = u32;

/// Centres closer than this count as the same spot.
pub const OCCUPIED_EPSILON: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedCube {
    pub id: CubeId,
    pub cell: Cell,
}

/// The cubes the player has placed this round, in placement order.
///
/// Lookups are linear scans; a round holds a handful of cubes.
#[derive(Debug, Default)]
pub struct CubeSet {
    cubes: Vec<PlacedCube>,
    first: Option<CubeId>,
    next_id: CubeId,
}

impl CubeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> CubeId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Adds a cube without checking placement rules; returns `None` if the
    /// cell is already taken.
    pub fn insert(&mut self, cell: Cell) -> Option<CubeId> {
        if self.contains(cell) {
            return None;
        }
        let id = self.alloc_id();
        self.cubes.push(PlacedCube { id, cell });
        if self.first.is_none() {
            self.first = Some(id);
        }
        Some(id)
    }

    pub fn remove(&mut self, id: CubeId) -> Option<Cell> {
        let idx = self.cubes.iter().position(|c| c.id == id)?;
        let removed = self.cubes.remove(idx);
        if self.first == Some(id) {
            self.first = self.cubes.first().map(|c| c.id);
        }
        Some(removed.cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn first(&self) -> Option<PlacedCube> {
        let id = self.first?;
        self.cubes.iter().find(|c| c.id == id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedCube> {
        self.cubes.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cubes.iter().map(|c| c.cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cubes.iter().any(|c| c.cell == cell)
    }

    pub fn is_position_occupied(&self, pos: Vec3) -> bool {
        self.cubes
            .iter()
            .any(|c| c.cell.center().distance(pos) < OCCUPIED_EPSILON)
    }

    /// Whether `cell` touches any cube of the set by a face.
    pub fn touches(&self, cell: Cell) -> bool {
        self.cubes.iter().any(|c| c.cell.is_adjacent(cell))
    }

    pub fn clear(&mut self) {
        self.cubes.clear();
        self.first = None;
    }

    /// Hands every cube over (placement order) and resets for the next shape.
    pub fn drain(&mut self) -> Vec<PlacedCube> {
        self.first = None;
        std::mem::take(&mut self.cubes)
    }
}
