/// Whole seconds shown for `remaining` (rounded up).
pub fn display_seconds(remaining: f32) -> u32 {
    remaining.max(0.0).ceil() as u32
}

/// HUD text: the seconds left while counting, "Time's Up!" once expired.
pub fn countdown_label(remaining: f32, running: bool) -> String {
    if running && remaining > 0.0 {
        display_seconds(remaining).to_string()
    } else {
        "Time's Up!".to_string()
    }
}

/// Digits of `n` with their x offsets, centred on zero, for a row of 3D
/// digit models `spacing` apart.
pub fn countdown_digits(n: u32, spacing: f32) -> Vec<(u8, f32)> {
    let digits: Vec<u8> = n.to_string().bytes().map(|b| b - b'0').collect();
    let start_x = -((digits.len() as f32 - 1.0) * spacing * 0.5);
    digits
        .into_iter()
        .enumerate()
        .map(|(i, d)| (d, start_x + i as f32 * spacing))
        .collect()
}
