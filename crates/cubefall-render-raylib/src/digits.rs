use cubefall_geom::Vec3;
use raylib::prelude::*;

use crate::conv::vec3_to_rl;

// Seven-segment masks, bit 0 = a (top) through bit 6 = g (middle).
const SEGMENTS: [u8; 10] = [
    0b011_1111, 0b000_0110, 0b101_1011, 0b100_1111, 0b110_0110, 0b110_1101, 0b111_1101,
    0b000_0111, 0b111_1111, 0b110_1111,
];

const THICKNESS: f32 = 0.2;

/// Centre and size of segment `i` for a digit one unit wide and two tall.
fn segment_box(i: usize) -> (Vec3, Vec3) {
    let horizontal = Vec3::new(1.0, THICKNESS, THICKNESS);
    let vertical = Vec3::new(THICKNESS, 1.0, THICKNESS);
    match i {
        0 => (Vec3::new(0.0, 1.0, 0.0), horizontal),
        1 => (Vec3::new(0.5, 0.5, 0.0), vertical),
        2 => (Vec3::new(0.5, -0.5, 0.0), vertical),
        3 => (Vec3::new(0.0, -1.0, 0.0), horizontal),
        4 => (Vec3::new(-0.5, -0.5, 0.0), vertical),
        5 => (Vec3::new(-0.5, 0.5, 0.0), vertical),
        _ => (Vec3::ZERO, horizontal),
    }
}

/// Draws `digit` (0-9) as a block seven-segment glyph centred on `center`.
pub fn draw_digit<D: RaylibDraw3D>(d: &mut D, digit: u8, center: Vec3, scale: f32, color: Color) {
    let Some(mask) = SEGMENTS.get(digit as usize) else {
        return;
    };
    for i in 0..7 {
        if mask & (1 << i) == 0 {
            continue;
        }
        let (offset, size) = segment_box(i);
        let size = size * scale;
        d.draw_cube(
            vec3_to_rl(center + offset * scale),
            size.x,
            size.y,
            size.z,
            color,
        );
    }
}
