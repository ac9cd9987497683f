//! Display formatting shared by the presentation layers

/// Format remaining seconds as "MM:SS"
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a cumulative study total as "HHh MMm"
pub fn format_study_total(seconds: u64) -> String {
    format!("{:02}h {:02}m", seconds / 3600, (seconds % 3600) / 60)
}
