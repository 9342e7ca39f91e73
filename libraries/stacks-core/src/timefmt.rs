//! Clock-style time formatting for scrubber labels

/// Format seconds as `m:ss` or `h:mm:ss`.
///
/// Negative or non-finite input renders as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(65.4), "1:05");
        assert_eq!(format_clock(3723.0), "1:02:03");
    }

    #[test]
    fn clamps_invalid_input() {
        assert_eq!(format_clock(-5.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }
}
