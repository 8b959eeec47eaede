//! Kline interval codes.
//!
//! The upstream API accepts a fixed set of interval codes. The delay
//! transform only needs each code's length in minutes; unknown codes fall
//! back to 60 so a bad code degrades to hourly lag math instead of failing.

/// Interval codes accepted by the upstream kline API.
pub const KNOWN_INTERVALS: [&str; 15] = [
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Whether `code` is one of the accepted interval codes.
pub fn is_known_interval(code: &str) -> bool {
    KNOWN_INTERVALS.contains(&code)
}

/// Length of an interval code in minutes. Unknown codes default to 60.
pub fn interval_minutes(code: &str) -> u32 {
    match code {
        "1m" => 1,
        "3m" => 3,
        "5m" => 5,
        "15m" => 15,
        "30m" => 30,
        "1h" => 60,
        "2h" => 120,
        "4h" => 240,
        "6h" => 360,
        "8h" => 480,
        "12h" => 720,
        "1d" => 1440,
        "3d" => 4320,
        "1w" => 10080,
        "1M" => 43200,
        _ => 60,
    }
}
