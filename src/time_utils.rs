/// Format a millisecond timestamp as UTC `HH:MM:SS.mmm` for log lines.
pub fn format_clock_time(timestamp_ms: u64) -> String {
    let millis = timestamp_ms % 1000;
    let total_secs = timestamp_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

/// Render a millisecond duration the way the summary log prints it.
pub fn format_duration_ms(ms: f64) -> String {
    if !ms.is_finite() {
        return "n/a".to_string();
    }
    if ms >= 1000.0 { format!("{:.2}s", ms / 1000.0) } else { format!("{:.1}ms", ms) }
}
