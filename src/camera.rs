use raylib::prelude::*;

use crate::config::CameraConfig;

/// Camera circling a fixed target on the board.
pub struct OrbitCamera {
    pub target: Vector3,
    pub yaw: f32,   // degrees
    pub pitch: f32, // degrees
    pub distance: f32,
    pub fov: f32,
    pub orbit_speed: f32,
    pub zoom_speed: f32,
}

impl OrbitCamera {
    pub fn new(target: Vector3, cfg: &CameraConfig) -> Self {
        Self {
            target,
            yaw: cfg.yaw,
            pitch: cfg.pitch.clamp(5.0, 89.0),
            distance: cfg.distance.max(2.0),
            fov: cfg.fov,
            orbit_speed: 90.0,
            zoom_speed: 12.0,
        }
    }

    pub fn position(&self) -> Vector3 {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        let offset = Vector3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            -yaw_rad.sin() * pitch_rad.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D::perspective(
            self.position(),
            self.target,
            Vector3::new(0.0, 1.0, 0.0),
            self.fov,
        )
    }

    pub fn update(&mut self, rl: &RaylibHandle, dt: f32) {
        if rl.is_key_down(KeyboardKey::KEY_A) {
            self.yaw -= self.orbit_speed * dt;
        }
        if rl.is_key_down(KeyboardKey::KEY_D) {
            self.yaw += self.orbit_speed * dt;
        }
        if rl.is_key_down(KeyboardKey::KEY_Q) {
            self.pitch = (self.pitch + self.orbit_speed * 0.5 * dt).clamp(5.0, 89.0);
        }
        if rl.is_key_down(KeyboardKey::KEY_E) {
            self.pitch = (self.pitch - self.orbit_speed * 0.5 * dt).clamp(5.0, 89.0);
        }

        let mut zoom = -rl.get_mouse_wheel_move() * 2.0;
        if rl.is_key_down(KeyboardKey::KEY_W) {
            zoom -= self.zoom_speed * dt;
        }
        if rl.is_key_down(KeyboardKey::KEY_S) {
            zoom += self.zoom_speed * dt;
        }
        self.distance = (self.distance + zoom).clamp(4.0, 80.0);
    }
}
