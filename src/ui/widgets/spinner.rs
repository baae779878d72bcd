use chrono::Local;

pub const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const FRAME_DURATION_MS: i64 = 100;

/// Returns the spinner frame for the current wall clock time.
///
pub fn frame() -> &'static str {
    let tick = Local::now().timestamp_millis() / FRAME_DURATION_MS;
    FRAMES[tick.rem_euclid(FRAMES.len() as i64) as usize]
}
