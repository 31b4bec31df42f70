/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// GREEN inside the geofence, RED outside.
pub fn color_for_range(allowed: bool) -> &'static str {
    if allowed { GREEN } else { RED }
}

/// Daily total color:
/// 0 → grey, otherwise reset.
pub fn color_for_minutes(value: i64) -> &'static str {
    if value == 0 { GREY } else { RESET }
}
