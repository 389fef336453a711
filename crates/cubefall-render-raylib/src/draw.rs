use cubefall_geom::{Aabb, Vec3};
use cubefall_grid::BoardBounds;
use cubefall_shapes::ShapeColor;
use raylib::prelude::*;

use crate::conv::{aabb_to_rl, color_to_rl, vec3_to_rl};

const OUTLINE: Color = Color::new(20, 20, 30, 140);

/// Solid cube with a dark outline so neighbours stay distinguishable.
pub fn draw_cube<D: RaylibDraw3D>(d: &mut D, center: Vec3, size: f32, color: ShapeColor) {
    let c = vec3_to_rl(center);
    d.draw_cube(c, size, size, size, color_to_rl(color));
    d.draw_cube_wires(c, size * 1.002, size * 1.002, size * 1.002, OUTLINE);
}

/// Wireframe preview of where a tap would place a cube.
pub fn draw_ghost_cube<D: RaylibDraw3D>(d: &mut D, center: Vec3, size: f32, valid: bool) {
    let color = if valid { Color::LIME } else { Color::RED };
    d.draw_cube_wires(vec3_to_rl(center), size, size, size, color);
}

#[derive(Clone, Copy, Debug)]
pub struct BoardStyle {
    pub floor: Color,
    pub lines: Color,
    pub limit: Color,
}

impl Default for BoardStyle {
    fn default() -> Self {
        Self {
            floor: Color::new(222, 226, 230, 255),
            lines: Color::new(150, 156, 164, 255),
            limit: Color::new(230, 80, 80, 160),
        }
    }
}

/// Floor slab with cell lines and the outline of the playable volume.
pub fn draw_board<D: RaylibDraw3D>(
    d: &mut D,
    bounds: BoardBounds,
    floor_y: f32,
    style: BoardStyle,
) {
    let (x0, x1) = (bounds.min.x as f32 - 0.5, bounds.max.x as f32 + 0.5);
    let (z0, z1) = (bounds.min.z as f32 - 0.5, bounds.max.z as f32 + 0.5);
    let center = Vec3::new((x0 + x1) * 0.5, floor_y - 0.001, (z0 + z1) * 0.5);
    d.draw_plane(
        vec3_to_rl(center),
        Vector2::new(x1 - x0, z1 - z0),
        style.floor,
    );

    for x in bounds.min.x..=bounds.max.x + 1 {
        let x = x as f32 - 0.5;
        d.draw_line_3D(
            Vector3::new(x, floor_y, z0),
            Vector3::new(x, floor_y, z1),
            style.lines,
        );
    }
    for z in bounds.min.z..=bounds.max.z + 1 {
        let z = z as f32 - 0.5;
        d.draw_line_3D(
            Vector3::new(x0, floor_y, z),
            Vector3::new(x1, floor_y, z),
            style.lines,
        );
    }

    let top = bounds.max.y as f32 + 0.5;
    let volume = Aabb::new(Vec3::new(x0, floor_y, z0), Vec3::new(x1, top, z1));
    d.draw_bounding_box(aabb_to_rl(volume), style.limit);
}
