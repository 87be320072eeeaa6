//! Human-readable rendering of byte counts, durations and shares.

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Scale a byte count by 1024 until it fits its unit: `"1.50 KB"`
pub fn format_size(bytes: f64) -> String {
    let mut size = bytes;
    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// Milliseconds below one second, seconds otherwise: `"250.00 ms"`, `"2.50 s"`
pub fn format_time(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.2} ms", secs * 1000.0)
    } else {
        format!("{:.2} s", secs)
    }
}

/// `count` as a percentage of `total`; 0 when `total` is 0
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0.0), "0.00 B");
        assert_eq!(format_size(512.0), "512.00 B");
        assert_eq!(format_size(1536.0), "1.50 KB");
        assert_eq!(format_size(1_048_576.0), "1.00 MB");
        assert_eq!(format_size(5.0 * 1024.0 * 1024.0 * 1024.0), "5.00 GB");
        assert_eq!(format_size(2.0 * 1024f64.powi(4)), "2.00 TB");
        assert_eq!(format_size(2048.0 * 1024f64.powi(4)), "2048.00 TB");
    }

    #[test]
    fn test_format_time_units() {
        assert_eq!(format_time(0.0), "0.00 ms");
        assert_eq!(format_time(0.25), "250.00 ms");
        assert_eq!(format_time(1.0), "1.00 s");
        assert_eq!(format_time(2.5), "2.50 s");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
