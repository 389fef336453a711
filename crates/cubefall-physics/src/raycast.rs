use cubefall_geom::{Cell, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridHit {
    /// Solid cell that was hit.
    pub cell: Cell,
    /// Last empty cell the ray crossed before it.
    pub prev: Cell,
    /// Face normal of the hit; zero when the ray starts inside a solid cell.
    pub normal: (i32, i32, i32),
    /// Distance along the normalized ray to the entry point.
    pub t: f32,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

/// Ray distance to the first cell boundary along one axis, given the
/// fractional position `frac` inside the current cell.
#[inline]
fn first_crossing(step: i32, frac: f32, inv: f32) -> f32 {
    match step {
        1 => (1.0 - frac) * inv,
        -1 => frac * inv,
        _ => f32::MAX,
    }
}

/// Grid walk (Amanatides & Woo) over unit cells centred on integer
/// coordinates, reporting the first cell for which `is_solid` holds.
pub fn raycast_first_hit<F>(
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
    mut is_solid: F,
) -> Option<GridHit>
where
    F: FnMut(Cell) -> bool,
{
    let len = dir.length();
    if len < 1e-6 {
        return None;
    }
    let d = dir / len;
    // Cell boundaries sit on half-integers; shift so they land on integers.
    let o = origin + Vec3::splat(0.5);

    let mut vx = o.x.floor() as i32;
    let mut vy = o.y.floor() as i32;
    let mut vz = o.z.floor() as i32;

    let stepx = if d.x > 0.0 { 1 } else if d.x < 0.0 { -1 } else { 0 };
    let stepy = if d.y > 0.0 { 1 } else if d.y < 0.0 { -1 } else { 0 };
    let stepz = if d.z > 0.0 { 1 } else if d.z < 0.0 { -1 } else { 0 };

    let invx = inv_or_max(d.x);
    let invy = inv_or_max(d.y);
    let invz = inv_or_max(d.z);
    let tdx = if stepx == 0 { f32::MAX } else { invx };
    let tdy = if stepy == 0 { f32::MAX } else { invy };
    let tdz = if stepz == 0 { f32::MAX } else { invz };

    let fx = o.x - o.x.floor();
    let fy = o.y - o.y.floor();
    let fz = o.z - o.z.floor();
    let mut tmx = first_crossing(stepx, fx, invx);
    let mut tmy = first_crossing(stepy, fy, invy);
    let mut tmz = first_crossing(stepz, fz, invz);

    let (mut px, mut py, mut pz) = (vx, vy, vz);
    let mut t = 0.0f32;

    for _ in 0..512 {
        if t > max_dist {
            break;
        }
        if is_solid(Cell::new(vx, vy, vz)) {
            let dx = vx - px;
            let dy = vy - py;
            let dz = vz - pz;
            let normal = if dx != 0 {
                (-dx, 0, 0)
            } else if dy != 0 {
                (0, -dy, 0)
            } else if dz != 0 {
                (0, 0, -dz)
            } else {
                (0, 0, 0)
            };
            return Some(GridHit {
                cell: Cell::new(vx, vy, vz),
                prev: Cell::new(px, py, pz),
                normal,
                t,
            });
        }
        px = vx;
        py = vy;
        pz = vz;
        if tmx < tmy {
            if tmx < tmz {
                vx += stepx;
                t = tmx;
                tmx += tdx;
            } else {
                vz += stepz;
                t = tmz;
                tmz += tdz;
            }
        } else if tmy < tmz {
            vy += stepy;
            t = tmy;
            tmy += tdy;
        } else {
            vz += stepz;
            t = tmz;
            tmz += tdz;
        }
    }
    None
}
