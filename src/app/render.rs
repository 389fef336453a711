use cubefall_game::{RoundState, countdown_digits};
use cubefall_geom::Vec3;
use cubefall_render_raylib::{BoardStyle, draw_board, draw_cube, draw_digit, draw_ghost_cube};
use cubefall_shapes::ShapeColor;
use raylib::prelude::*;

use super::App;

const CUBE_SIZE: f32 = 1.0;
const DIGIT_SPACING: f32 = 1.6;
const DIGIT_SCALE: f32 = 1.2;

impl App {
    pub fn render(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let camera = self.cam.to_camera3d();
        let cfg = self.game.config();
        let bounds = cfg.board_bounds();
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::new(245, 246, 248, 255));

        {
            let mut d3 = d.begin_mode3D(camera);
            draw_board(&mut d3, bounds, cfg.board.floor_y, BoardStyle::default());
            for (cell, color) in self.game.settled_cubes() {
                draw_cube(&mut d3, cell.center(), CUBE_SIZE, color);
            }
            for cell in self.game.pending().cells() {
                draw_cube(&mut d3, cell.center(), CUBE_SIZE, ShapeColor::NEUTRAL);
            }
            if let Some(f) = self.game.falling() {
                for p in f.group.positions() {
                    draw_cube(&mut d3, p, CUBE_SIZE, f.color);
                }
            }
            if let Some(h) = self.hover {
                draw_ghost_cube(&mut d3, h.cell.center(), CUBE_SIZE * 1.02, h.valid);
            }

            // Countdown hangs above the back edge of the board.
            if self.game.state() == RoundState::Countdown {
                let anchor = Vec3::new(
                    0.0,
                    bounds.max.y as f32 + 3.0,
                    bounds.min.z as f32 - 1.0,
                );
                let n = self.game.seconds_left_display();
                for (digit, x) in countdown_digits(n, DIGIT_SPACING * DIGIT_SCALE) {
                    draw_digit(
                        &mut d3,
                        digit,
                        anchor + Vec3::new(x, 0.0, 0.0),
                        DIGIT_SCALE,
                        Color::DARKBLUE,
                    );
                }
            }
        }

        let label = self.game.countdown_label();
        let fs = 40;
        let w = d.measure_text(&label, fs);
        let sw = d.get_screen_width();
        d.draw_text(&label, (sw - w) / 2, 16, fs, Color::DARKGRAY);

        d.draw_text(
            &format!(
                "Round {}  |  settled {}  |  clears {}",
                self.game.round(),
                self.game.scene().len() - self.game.pending().len(),
                self.stats.board_clears
            ),
            12,
            12,
            18,
            Color::DARKGRAY,
        );
        let mut y = 40;
        for msg in &self.messages {
            d.draw_text(msg, 12, y, 16, Color::GRAY);
            y += 20;
        }

        let sh = d.get_screen_height();
        let help = concat!(
            "Click: place cube   Space: speed up   Left/Right: nudge   ",
            "A/D Q/E: orbit   W/S wheel: zoom",
        );
        d.draw_text(
            help,
            12,
            sh - 28,
            16,
            Color::GRAY,
        );
        d.draw_fps(sw - 90, 12);
    }
}
