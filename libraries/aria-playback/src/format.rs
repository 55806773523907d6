//! Time formatting for the player display

/// Format seconds as `M:SS`
///
/// Minutes are not wrapped into hours, so a 75 minute mix reads `75:00`.
/// NaN, infinite and negative input all read `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
