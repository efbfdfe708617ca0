use chrono::Utc;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC timestamp with millisecond precision, as stored on audit rows.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}
