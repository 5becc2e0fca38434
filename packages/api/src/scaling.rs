//! Quantity scaling and display formatting for the detail page.

/// Batch multipliers offered by the scale control.
pub const SCALE_OPTIONS: [f64; 4] = [0.5, 1.0, 2.0, 3.0];

/// Scale `qty` and format it with at most two decimals, trailing zeros
/// stripped. Missing or zero quantities render empty.
pub fn format_quantity(qty: Option<f64>, scale: f64) -> String {
    let Some(qty) = qty.filter(|q| *q != 0.0) else {
        return String::new();
    };
    let formatted = format!("{:.2}", qty * scale);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn scaled_servings(servings: u32, scale: f64) -> u32 {
    (servings as f64 * scale).round() as u32
}

/// `45 min`, `1h` or `1h 30m`. Missing or zero durations render as `None`.
pub fn format_time(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes.filter(|m| *m > 0)?;
    if minutes < 60 {
        return Some(format!("{minutes} min"));
    }
    let (hours, mins) = (minutes / 60, minutes % 60);
    Some(if mins > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{hours}h")
    })
}

/// Label for a scale option button.
pub fn scale_label(scale: f64) -> String {
    format!("{}x", format_quantity(Some(scale), 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(Some(1.5), 1.0), "1.5");
        assert_eq!(format_quantity(Some(1.5), 2.0), "3");
        assert_eq!(format_quantity(Some(0.333), 1.0), "0.33");
        assert_eq!(format_quantity(Some(2.0), 0.5), "1");
        assert_eq!(format_quantity(Some(10.0), 1.0), "10");
        assert_eq!(format_quantity(None, 2.0), "");
        assert_eq!(format_quantity(Some(0.0), 2.0), "");
    }

    #[test]
    fn test_scaled_servings() {
        assert_eq!(scaled_servings(4, 0.5), 2);
        assert_eq!(scaled_servings(3, 0.5), 2);
        assert_eq!(scaled_servings(4, 3.0), 12);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Some(45)).as_deref(), Some("45 min"));
        assert_eq!(format_time(Some(60)).as_deref(), Some("1h"));
        assert_eq!(format_time(Some(90)).as_deref(), Some("1h 30m"));
        assert_eq!(format_time(Some(0)), None);
        assert_eq!(format_time(None), None);
    }

    #[test]
    fn test_scale_labels() {
        let labels: Vec<_> = SCALE_OPTIONS.iter().map(|s| scale_label(*s)).collect();
        assert_eq!(labels, vec!["0.5x", "1x", "2x", "3x"]);
    }
}
