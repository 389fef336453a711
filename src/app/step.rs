use cubefall_render_raylib::conv::vec3_from_rl;
use raylib::prelude::*;

use super::{App, HoverTarget};
use crate::config::poll_config_reload;

impl App {
    pub fn step(&mut self, rl: &mut RaylibHandle, _thread: &RaylibThread, dt: f32) {
        poll_config_reload(self.config_rx.as_ref(), &self.config_path, &mut self.game);
        self.cam.update(rl, dt);

        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.game.set_boost(true);
        }
        if rl.is_key_released(KeyboardKey::KEY_SPACE) {
            self.game.set_boost(false);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            self.game.nudge(-1);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            self.game.nudge(1);
        }

        // Cursor ray, used both for the hover preview and for taps.
        let ray = rl.get_screen_to_world_ray(rl.get_mouse_position(), self.cam.to_camera3d());
        let origin = vec3_from_rl(ray.position);
        let dir = vec3_from_rl(ray.direction);
        self.hover = self.game.tap_target(origin, dir).ok().map(|cell| HoverTarget {
            cell,
            valid: self.game.check_placement(cell).is_ok(),
        });
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            // Outcome arrives as an event.
            let _ = self.game.tap(origin, dir);
        }

        self.game.update(dt);
        for ev in self.game.drain_events() {
            self.handle_event(ev);
        }
    }
}
