use cubefall_geom::{Cell, Vec3};

use crate::query::{BodyId, CollisionWorld, QueryFilter};

/// How a released group travels to its resting place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallMode {
    /// Timed drops of `step_size`, probing below every cube before each drop.
    Stepped,
    /// One box cast finds the ground, then the group glides down to it.
    Glide,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallParams {
    pub mode: FallMode,
    /// Seconds between drops.
    pub fall_interval: f32,
    pub step_size: f32,
    /// Extra probe reach below a step, also kept as clearance when a hit is
    /// closer than a full step.
    pub probe_margin: f32,
    /// Reach of the post-move grounding probe.
    pub ground_probe: f32,
    pub move_speed: f32,
    pub boosted_move_speed: f32,
    pub speed_boost_multiplier: f32,
    /// Seconds to hold still after release.
    pub start_delay: f32,
    pub glide_speed: f32,
    pub max_probe_distance: f32,
    pub snap_resolution: f32,
    /// Half the edge length of one cube.
    pub cube_half: f32,
    /// A group that sinks below this height lands where it is.
    pub kill_y: f32,
}

impl Default for FallParams {
    fn default() -> Self {
        Self {
            mode: FallMode::Stepped,
            fall_interval: 0.5,
            step_size: 1.0,
            probe_margin: 0.1,
            ground_probe: 0.2,
            move_speed: 10.0,
            boosted_move_speed: 20.0,
            speed_boost_multiplier: 3.0,
            start_delay: 0.0,
            glide_speed: 10.0,
            max_probe_distance: 20.0,
            snap_resolution: 0.5,
            cube_half: 0.5,
            kill_y: -50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FallPhase {
    Delayed { remaining: f32 },
    /// Waiting for the next drop.
    Resting,
    Moving { target: Vec3, land_on_arrival: bool },
    Grounded,
}

/// Where a group came to rest, snapped to the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Landing {
    pub body: BodyId,
    pub cells: Vec<Cell>,
    pub positions: Vec<Vec3>,
}

/// A set of cubes falling as one rigid body.
#[derive(Clone, Debug)]
pub struct ShapeGroup {
    body: BodyId,
    origin: Vec3,
    offsets: Vec<Vec3>,
    params: FallParams,
    phase: FallPhase,
    timer: f32,
    fall_interval: f32,
    boosted: bool,
}

const GLIDE_PROBE_HALF: f32 = 0.05;
const GLIDE_PROBE_LIFT: f32 = 0.1;
const ARRIVE_EPS: f32 = 0.01;

impl ShapeGroup {
    /// Builds a group from world-space cube centres; the first cube becomes
    /// the group origin.
    pub fn from_positions(body: BodyId, positions: &[Vec3], params: FallParams) -> Self {
        let origin = positions.first().copied().unwrap_or(Vec3::ZERO);
        let offsets = positions.iter().map(|p| *p - origin).collect();
        Self::new(body, origin, offsets, params)
    }

    pub fn new(body: BodyId, origin: Vec3, offsets: Vec<Vec3>, params: FallParams) -> Self {
        let phase = if params.start_delay > 0.0 {
            FallPhase::Delayed {
                remaining: params.start_delay,
            }
        } else {
            FallPhase::Resting
        };
        Self {
            body,
            origin,
            offsets,
            params,
            phase,
            timer: 0.0,
            fall_interval: params.fall_interval,
            boosted: false,
        }
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn phase(&self) -> FallPhase {
        self.phase
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        matches!(self.phase, FallPhase::Grounded)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    #[inline]
    pub fn current_fall_interval(&self) -> f32 {
        self.fall_interval
    }

    /// Current cube centres in world space.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.offsets.iter().map(move |o| self.origin + *o)
    }

    fn lowest_y(&self) -> f32 {
        self.positions().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    /// Boost key pressed (`true`) or released (`false`). Repeated presses do
    /// not stack.
    pub fn set_boost(&mut self, on: bool) {
        let m = self.params.speed_boost_multiplier.max(1.0);
        if on && !self.boosted {
            self.boosted = true;
            self.fall_interval /= m;
        } else if !on && self.boosted {
            self.boosted = false;
            self.fall_interval *= m;
        }
    }

    /// Advances the fall by `dt` seconds. Returns the landing on the frame the
    /// group grounds; afterwards the group stays put.
    pub fn update<W: CollisionWorld>(&mut self, dt: f32, world: &W) -> Option<Landing> {
        if let FallPhase::Delayed { remaining } = self.phase {
            let left = remaining - dt;
            if left > 0.0 {
                self.phase = FallPhase::Delayed { remaining: left };
                return None;
            }
            self.phase = FallPhase::Resting;
        }
        match self.params.mode {
            FallMode::Stepped => self.update_stepped(dt, world),
            FallMode::Glide => self.update_glide(dt, world),
        }
    }

    fn update_stepped<W: CollisionWorld>(&mut self, dt: f32, world: &W) -> Option<Landing> {
        if self.is_grounded() {
            return None;
        }
        self.timer += dt;
        if self.timer < self.fall_interval {
            return None;
        }
        if matches!(self.phase, FallPhase::Resting) {
            if let Some(landing) = self.plan_step(world) {
                return Some(landing);
            }
        }
        let FallPhase::Moving {
            target,
            land_on_arrival,
        } = self.phase
        else {
            return None;
        };
        let speed = if self.boosted {
            self.params.boosted_move_speed
        } else {
            self.params.move_speed
        };
        self.origin = self.origin.move_towards(target, speed * dt);
        if self.origin.distance(target) >= ARRIVE_EPS {
            return None;
        }
        self.origin = target;
        self.phase = FallPhase::Resting;
        self.timer = 0.0;
        if land_on_arrival || self.probe_grounded(world) || self.origin.y < self.params.kill_y {
            return Some(self.land());
        }
        None
    }

    /// Probes below every cube and picks the next target. Lands immediately
    /// when there is no room to move at all.
    fn plan_step<W: CollisionWorld>(&mut self, world: &W) -> Option<Landing> {
        let step = self.params.step_size;
        let margin = self.params.probe_margin;
        let filter = QueryFilter::excluding(self.body);
        let nearest = self
            .positions()
            .filter_map(|p| {
                let bottom = p - Vec3::new(0.0, self.params.cube_half, 0.0);
                world.raycast(bottom, Vec3::DOWN, step + margin, filter)
            })
            .map(|h| h.distance)
            .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))));

        match nearest {
            Some(d) => {
                let drop = d - margin;
                if drop > 0.0 {
                    log::debug!(
                        "group {:?}: obstruction {:.2} below, dropping {:.2}",
                        self.body,
                        d,
                        drop
                    );
                    self.phase = FallPhase::Moving {
                        target: self.origin - Vec3::new(0.0, drop, 0.0),
                        land_on_arrival: true,
                    };
                    None
                } else {
                    Some(self.land())
                }
            }
            None => {
                self.phase = FallPhase::Moving {
                    target: self.origin - Vec3::new(0.0, step, 0.0),
                    land_on_arrival: false,
                };
                None
            }
        }
    }

    /// Whether a non-self collider sits within `ground_probe` below any cube.
    pub fn probe_grounded<W: CollisionWorld>(&self, world: &W) -> bool {
        let filter = QueryFilter::excluding(self.body);
        self.positions().any(|p| {
            let bottom = p - Vec3::new(0.0, self.params.cube_half, 0.0);
            world
                .raycast(bottom, Vec3::DOWN, self.params.ground_probe, filter)
                .is_some()
        })
    }

    fn update_glide<W: CollisionWorld>(&mut self, dt: f32, world: &W) -> Option<Landing> {
        match self.phase {
            FallPhase::Grounded | FallPhase::Delayed { .. } => None,
            FallPhase::Resting => {
                let Some(gap) = self.ground_gap(world) else {
                    log::warn!("no ground found below group {:?}; settling in place", self.body);
                    return Some(self.land());
                };
                if gap.abs() <= ARRIVE_EPS {
                    return Some(self.land());
                }
                log::debug!("group {:?}: gliding {:.2} to the ground", self.body, gap);
                self.phase = FallPhase::Moving {
                    target: self.origin - Vec3::new(0.0, gap, 0.0),
                    land_on_arrival: true,
                };
                None
            }
            FallPhase::Moving { target, .. } => {
                self.origin = self.origin.move_towards(target, self.params.glide_speed * dt);
                if self.origin.distance(target) < ARRIVE_EPS {
                    self.origin = target;
                    return Some(self.land());
                }
                None
            }
        }
    }

    /// Smallest distance between a cube bottom and the surface below it,
    /// found with thin box casts.
    fn ground_gap<W: CollisionWorld>(&self, world: &W) -> Option<f32> {
        let half = Vec3::splat(GLIDE_PROBE_HALF);
        let filter = QueryFilter::excluding(self.body);
        self.positions()
            .filter_map(|p| {
                let bottom = p.y - self.params.cube_half;
                let start = Vec3::new(p.x, bottom + GLIDE_PROBE_LIFT, p.z);
                world
                    .boxcast(start, half, Vec3::DOWN, self.params.max_probe_distance, filter)
                    .map(|h| bottom - h.point.y)
            })
            .fold(None, |acc: Option<f32>, g| Some(acc.map_or(g, |a| a.min(g))))
    }

    /// Moves the group one cube sideways if nothing is in the way and every
    /// cube stays within `x_range` (inclusive cube centres). A move in
    /// progress is dropped and re-planned below the new position.
    pub fn try_shift<W: CollisionWorld>(
        &mut self,
        dir_x: i32,
        world: &W,
        x_range: (f32, f32),
    ) -> bool {
        if self.is_grounded() || dir_x == 0 {
            return false;
        }
        let size = self.params.cube_half * 2.0;
        let delta = Vec3::new(dir_x.signum() as f32 * size, 0.0, 0.0);
        let in_range = self.positions().all(|p| {
            let x = p.x + delta.x;
            x >= x_range.0 - ARRIVE_EPS && x <= x_range.1 + ARRIVE_EPS
        });
        if !in_range {
            return false;
        }
        let half = Vec3::splat(self.params.cube_half * 0.9);
        let dir = delta.normalized();
        let filter = QueryFilter::excluding(self.body);
        let blocked = self.positions().any(|p| {
            world
                .boxcast(p, half, dir, size, filter)
                .is_some_and(|h| h.distance < size)
        });
        if blocked {
            return false;
        }
        self.origin += delta;
        // Any planned move was measured against the old column; plan again
        // from here on the next update.
        if matches!(self.phase, FallPhase::Moving { .. }) {
            self.phase = FallPhase::Resting;
            self.timer = self.fall_interval;
        }
        true
    }

    fn land(&mut self) -> Landing {
        let res = self.params.snap_resolution;
        self.origin = self.origin.snapped(res);
        self.phase = FallPhase::Grounded;
        let positions: Vec<Vec3> = self.positions().map(|p| p.snapped(res)).collect();
        let cells = positions.iter().map(|p| Cell::from_world(*p)).collect();
        log::debug!(
            "group {:?} landed at {:?} (lowest cube y {:.2})",
            self.body,
            self.origin,
            self.lowest_y()
        );
        Landing {
            body: self.body,
            cells,
            positions,
        }
    }
}
