const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const BASE: u64 = 1024;

/// Humanizes a byte count at base 1024, rounded to two decimals with trailing
/// zeros dropped: `1536` -> `"1.5 KB"`, `10485760` -> `"10 MB"`.
/// Sizes beyond the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && bytes / divisor >= BASE {
        divisor *= BASE;
        unit += 1;
    }

    let value = format!("{:.2}", bytes as f64 / divisor as f64);
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", value, UNITS[unit])
}

/// Lower-cased text after the last `.` in `name`; empty when there is no dot.
pub fn file_extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bytes() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_fractional_kilobytes() {
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn test_whole_units_drop_decimals() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 500000 / 1024 = 488.28125
        assert_eq!(format_file_size(500_000), "488.28 KB");
        // 11000000 / 1024^2 = 10.490417...
        assert_eq!(format_file_size(11_000_000), "10.49 MB");
    }

    #[test]
    fn test_caps_at_gigabytes() {
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_extension_is_lower_cased() {
        assert_eq!(file_extension("Resume.PDF"), "pdf");
    }

    #[test]
    fn test_extension_uses_last_dot() {
        assert_eq!(file_extension("cv.final.docx"), "docx");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_missing_extension_is_empty() {
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("resume."), "");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn test_leading_dot_only() {
        assert_eq!(file_extension(".pdf"), "pdf");
    }
}
