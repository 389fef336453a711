//! Raylib drawing for the cube puzzle: conversions, cubes, board and 3D digits.
#![forbid(unsafe_code)]

pub mod conv {
    use cubefall_geom::{Aabb, Vec3};
    use cubefall_shapes::ShapeColor;

    pub fn vec3_to_rl(v: Vec3) -> raylib::prelude::Vector3 {
        raylib::prelude::Vector3::new(v.x, v.y, v.z)
    }

    pub fn vec3_from_rl(v: raylib::prelude::Vector3) -> Vec3 {
        Vec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn aabb_to_rl(bb: Aabb) -> raylib::core::math::BoundingBox {
        raylib::core::math::BoundingBox::new(vec3_to_rl(bb.min), vec3_to_rl(bb.max))
    }

    pub fn color_to_rl(c: ShapeColor) -> raylib::prelude::Color {
        let [r, g, b, a] = c.to_rgba8();
        raylib::prelude::Color::new(r, g, b, a)
    }
}

pub mod digits;
pub mod draw;

pub use digits::draw_digit;
pub use draw::{BoardStyle, draw_board, draw_cube, draw_ghost_cube};
