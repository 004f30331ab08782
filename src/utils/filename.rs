use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default export directory with format: output/airquality-yearly-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("airquality-yearly-{:02}{:02}{:02}", year, month, day);
    PathBuf::from("output").join(dirname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_dir() {
        let dir = generate_default_output_dir();

        let parts: Vec<String> = dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "output");

        let name = &parts[1];
        assert!(name.starts_with("airquality-yearly-"));
        // YYMMDD suffix
        let suffix = name.trim_start_matches("airquality-yearly-");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
