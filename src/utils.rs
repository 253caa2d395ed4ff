//! Small helpers for edition naming, log-friendly strings and output paths.

use chrono::{Local, NaiveTime, Timelike};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Classify a wall-clock time into an edition name.
///
/// - **morning**: 00:00 - 08:00
/// - **afternoon**: 08:00 - 16:00
/// - **evening**: 16:00 - 24:00
pub fn edition_for(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..8 => "morning",
        8..16 => "afternoon",
        _ => "evening",
    }
}

/// Edition name for the current local time.
#[instrument]
pub fn time_of_day() -> String {
    let tod = Local::now().time();
    let which = edition_for(tod);
    debug!(%tod, %which, "Computed time_of_day");
    which.to_string()
}

/// Truncate a string for logging, appending how many bytes were cut.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Lowercase, hyphenated, filename-safe form of a label.
pub fn slugify_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Create `path` if needed and check it accepts writes.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn ensure_writable_dir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).await?;
    let probe = path.join("..__probe_write__");
    fs::write(&probe, b"").await?;
    let _ = fs::remove_file(&probe).await;
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // 'é' is two bytes; cutting at 1 would split it
        assert_eq!(truncate_for_log("éa", 1), "…(+3 bytes)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Technology"), "technology");
        assert_eq!(slugify_title(" North America "), "north-america");
        assert_eq!(slugify_title("Science/Health!"), "sciencehealth");
    }

    #[test]
    fn test_edition_boundaries() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(edition_for(at(0, 0)), "morning");
        assert_eq!(edition_for(at(7, 59)), "morning");
        assert_eq!(edition_for(at(8, 0)), "afternoon");
        assert_eq!(edition_for(at(15, 59)), "afternoon");
        assert_eq!(edition_for(at(16, 0)), "evening");
        assert_eq!(edition_for(at(23, 59)), "evening");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let dir = std::env::temp_dir().join(format!("headline_scout_probe_{}", std::process::id()));
        let nested = dir.join("a/b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
