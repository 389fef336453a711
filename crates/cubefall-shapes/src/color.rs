use rand::Rng;

/// Linear RGB in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ShapeColor {
    pub const NEUTRAL: ShapeColor = ShapeColor {
        r: 0.55,
        g: 0.75,
        b: 0.95,
    };

    /// Mid-range colour, channels in `0.2..=0.9` so cubes stay readable on
    /// both light and dark backgrounds.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(0.2..=0.9),
            g: rng.gen_range(0.2..=0.9),
            b: rng.gen_range(0.2..=0.9),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}
