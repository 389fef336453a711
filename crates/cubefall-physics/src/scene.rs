use cubefall_geom::{Cell, Vec3};
use hashbrown::HashMap;

use crate::query::{BodyId, CollisionWorld, Hit, QueryFilter, nearer};
use crate::raycast::raycast_first_hit;

/// Settled unit cubes keyed by cell, resting on an infinite floor plane.
#[derive(Debug, Clone)]
pub struct VoxelScene {
    floor_y: f32,
    cells: HashMap<Cell, BodyId>,
}

impl Default for VoxelScene {
    fn default() -> Self {
        Self::new(-0.5)
    }
}

impl VoxelScene {
    pub fn new(floor_y: f32) -> Self {
        Self {
            floor_y,
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    #[inline]
    pub fn body_at(&self, cell: Cell) -> Option<BodyId> {
        self.cells.get(&cell).copied()
    }

    /// Adds cubes for `body`; cells that are already taken keep their owner.
    /// Returns how many cells were inserted.
    pub fn insert_body(&mut self, body: BodyId, cells: impl IntoIterator<Item = Cell>) -> usize {
        let mut added = 0;
        for c in cells {
            if !self.cells.contains_key(&c) {
                self.cells.insert(c, body);
                added += 1;
            }
        }
        added
    }

    pub fn insert_cell(&mut self, body: BodyId, cell: Cell) -> bool {
        self.insert_body(body, [cell]) == 1
    }

    pub fn remove_cell(&mut self, cell: Cell) -> Option<BodyId> {
        self.cells.remove(&cell)
    }

    pub fn remove_body(&mut self, body: BodyId) -> Vec<Cell> {
        let cells = self.cells_of(body);
        for c in &cells {
            self.cells.remove(c);
        }
        cells
    }

    /// Cells owned by `body`, sorted for stable output.
    pub fn cells_of(&self, body: BodyId) -> Vec<Cell> {
        let mut out: Vec<Cell> = self
            .cells
            .iter()
            .filter(|(_, b)| **b == body)
            .map(|(c, _)| *c)
            .collect();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, BodyId)> + '_ {
        self.cells.iter().map(|(c, b)| (*c, *b))
    }

    /// Highest occupied row in the column, if any.
    pub fn column_top(&self, x: i32, z: i32) -> Option<i32> {
        self.cells
            .keys()
            .filter(|c| c.x == x && c.z == z)
            .map(|c| c.y)
            .max()
    }

    /// Highest occupied row anywhere.
    pub fn max_height(&self) -> Option<i32> {
        self.cells.keys().map(|c| c.y).max()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    fn floor_ray(&self, origin: Vec3, dir: Vec3, bottom_offset: f32, max_dist: f32) -> Option<Hit> {
        if dir.y >= 0.0 {
            return None;
        }
        let bottom = origin.y - bottom_offset;
        let t = ((bottom - self.floor_y) / -dir.y).max(0.0);
        if t > max_dist {
            return None;
        }
        let at = origin + dir * t;
        Some(Hit {
            body: BodyId::FLOOR,
            point: Vec3::new(at.x, self.floor_y, at.z),
            normal: Vec3::UP,
            distance: t,
        })
    }
}

impl CollisionWorld for VoxelScene {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, filter: QueryFilter) -> Option<Hit> {
        let d = dir.normalized();
        let cubes = raycast_first_hit(origin, d, max_dist, |c| {
            self.cells.get(&c).is_some_and(|b| filter.accepts(*b))
        })
        .filter(|h| h.t <= max_dist)
        .and_then(|h| {
            let body = self.cells.get(&h.cell).copied()?;
            let normal = if h.normal == (0, 0, 0) {
                -d
            } else {
                Vec3::new(h.normal.0 as f32, h.normal.1 as f32, h.normal.2 as f32)
            };
            Some(Hit {
                body,
                point: origin + d * h.t,
                normal,
                distance: h.t,
            })
        });
        let floor = if filter.accepts(BodyId::FLOOR) {
            self.floor_ray(origin, d, 0.0, max_dist)
        } else {
            None
        };
        nearer(cubes, floor)
    }

    fn boxcast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        dir: Vec3,
        max_dist: f32,
        filter: QueryFilter,
    ) -> Option<Hit> {
        let d = dir.normalized();
        let mut best: Option<Hit> = None;
        for (cell, body) in self.cells.iter() {
            if !filter.accepts(*body) {
                continue;
            }
            let Some(entry) = cell.bounds().expanded(half_extents).ray_entry(origin, d) else {
                continue;
            };
            if entry.t > max_dist {
                continue;
            }
            let center = origin + d * entry.t;
            let n = entry.normal;
            let point = center
                - Vec3::new(
                    n.x * half_extents.x,
                    n.y * half_extents.y,
                    n.z * half_extents.z,
                );
            best = nearer(
                best,
                Some(Hit {
                    body: *body,
                    point,
                    normal: n,
                    distance: entry.t,
                }),
            );
        }
        let floor = if filter.accepts(BodyId::FLOOR) {
            self.floor_ray(origin, d, half_extents.y, max_dist)
        } else {
            None
        };
        nearer(best, floor)
    }
}
