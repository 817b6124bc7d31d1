//! Small formatting helpers used in log output.
//!
//! - [`format_count`] - Format counts with K/M suffix (1.5K, 2.3M)
//! - [`truncate`] - Truncate strings with ellipsis

/// Format a count with K/M suffix for compact display.
///
/// # Examples
/// ```
/// use apache_cf_iplist::utils::format_count;
/// assert_eq!(format_count(15), "15");
/// assert_eq!(format_count(1500), "1.5K");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Truncate a string to at most `max_len` characters, adding "..." if truncated.
///
/// Counts characters, not bytes, so multi-byte input never splits mid-character.
///
/// # Examples
/// ```
/// use apache_cf_iplist::utils::truncate;
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("<!DOCTYPE html>", 10), "<!DOCTY...");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
