//! Minimal geometry types for the simulation crates (no Raylib dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const DOWN: Vec3 = Vec3 {
        x: 0.0,
        y: -1.0,
        z: 0.0,
    };
    pub const RIGHT: Vec3 = Vec3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const LEFT: Vec3 = Vec3 {
        x: -1.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    /// Steps toward `target` by at most `max_delta`, landing exactly on it
    /// when it is within reach.
    pub fn move_towards(self, target: Vec3, max_delta: f32) -> Vec3 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_delta || dist == 0.0 {
            return target;
        }
        self + delta / dist * max_delta
    }

    /// Rounds every axis to the nearest multiple of `resolution`.
    pub fn snapped(self, resolution: f32) -> Vec3 {
        if resolution <= 0.0 {
            return self;
        }
        let snap = |v: f32| (v / resolution).round() * resolution;
        Vec3::new(snap(self.x), snap(self.y), snap(self.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Where a ray first enters a box: distance along the ray and the face normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayEntry {
    pub t: f32,
    pub normal: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn translated(&self, by: Vec3) -> Self {
        Self::new(self.min + by, self.max + by)
    }

    /// Grows the box by `half` on every side (Minkowski sum with a box).
    #[inline]
    pub fn expanded(&self, half: Vec3) -> Self {
        Self::new(self.min - half, self.max + half)
    }

    /// Strict overlap test; boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Slab test. `dir` is expected to be normalized; returns `t == 0` when the
    /// origin already lies inside the box.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<RayEntry> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;
        let axes = [
            (origin.x, dir.x, self.min.x, self.max.x, Vec3::RIGHT),
            (origin.y, dir.y, self.min.y, self.max.y, Vec3::UP),
            (origin.z, dir.z, self.min.z, self.max.z, Vec3::new(0.0, 0.0, 1.0)),
        ];
        for (o, d, lo, hi, axis) in axes {
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t0, t1) = ((lo - o) * inv, (hi - o) * inv);
            let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            if near > t_enter {
                t_enter = near;
                normal = if d > 0.0 { -axis } else { axis };
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }
        if t_exit < 0.0 {
            return None;
        }
        if t_enter < 0.0 {
            return Some(RayEntry {
                t: 0.0,
                normal: -dir,
            });
        }
        Some(RayEntry { t: t_enter, normal })
    }
}

/// A discrete, integer-aligned grid position. Cubes are unit sized and
/// centred on their cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rounds each axis of a world position to the nearest integer.
    #[inline]
    pub fn from_world(v: Vec3) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32, v.z.round() as i32)
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face neighbours: +X, -X, +Y, -Y, +Z, -Z.
    pub fn neighbors(self) -> [Cell; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }

    /// Exactly one axis differs by one, the other two are equal.
    pub fn is_adjacent(self, other: Cell) -> bool {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        matches!((dx, dy, dz), (1, 0, 0) | (0, 1, 0) | (0, 0, 1))
    }

    /// Unit box occupied by a cube sitting in this cell.
    #[inline]
    pub fn bounds(self) -> Aabb {
        Aabb::from_center_half_extents(self.center(), Vec3::splat(0.5))
    }
}

/// Whether two world positions fall into adjacent cells.
#[inline]
pub fn positions_adjacent(a: Vec3, b: Vec3) -> bool {
    Cell::from_world(a).is_adjacent(Cell::from_world(b))
}
