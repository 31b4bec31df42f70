//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Human distance: meters below 1 km, kilometers with two decimals above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// A horizontal rule made of `ch` (first char of the configured separator).
pub fn separator(ch: &str, width: usize) -> String {
    ch.chars().next().unwrap_or('-').to_string().repeat(width)
}
