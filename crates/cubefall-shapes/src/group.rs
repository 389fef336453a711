use cubefall_geom::Vec3;
use rand::Rng;

use crate::mask::{ShapeParams, generate_shape};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupParams {
    pub min_shapes: usize,
    pub max_shapes: usize,
    pub cube_size: f32,
    pub shape_spacing: f32,
}

impl Default for GroupParams {
    fn default() -> Self {
        Self {
            min_shapes: 2,
            max_shapes: 4,
            cube_size: 1.0,
            shape_spacing: 2.0,
        }
    }
}

/// Several random shapes laid out side by side, to be released as one body.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnGroup {
    pub origin: Vec3,
    /// Cube centres relative to `origin`.
    pub offsets: Vec<Vec3>,
    pub shape_count: usize,
}

/// Lays `n` shapes left to right, each in a slot `width * cube_size +
/// shape_spacing` wide, and centres the row on `spawn_point`. Every offset is
/// a whole number of cubes so the group lands on grid cells.
pub fn build_spawn_group<R: Rng>(
    shape: &ShapeParams,
    group: &GroupParams,
    spawn_point: Vec3,
    rng: &mut R,
) -> SpawnGroup {
    let lo = group.min_shapes.max(1);
    let hi = group.max_shapes.max(lo);
    let shape_count = rng.gen_range(lo..=hi);
    let size = group.cube_size;
    let slot_cubes = ((shape.width as f32 * size + group.shape_spacing) / size).round() as i32;

    let mut offsets = Vec::new();
    for i in 0..shape_count {
        let mask = generate_shape(shape, rng);
        let slot_x = i as i32 * slot_cubes;
        for (x, y) in mask.occupied() {
            let lx = slot_x + x as i32 - (shape.width / 2) as i32;
            let ly = (shape.height / 2) as i32 - y as i32;
            offsets.push(Vec3::new(lx as f32 * size, ly as f32 * size, 0.0));
        }
    }

    // Centre of the first slot to centre of the last one.
    let span_cubes = (shape_count as i32 - 1) * slot_cubes;
    let shift = (span_cubes / 2) as f32 * size;
    let origin = spawn_point - Vec3::new(shift, 0.0, 0.0);
    log::debug!(
        "spawn group: {} shapes, {} cubes, origin {:?}",
        shape_count,
        offsets.len(),
        origin
    );
    SpawnGroup {
        origin,
        offsets,
        shape_count,
    }
}
