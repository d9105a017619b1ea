//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch, used for generated upload names
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // After 2000-01-01 and before 2100-01-01
        assert!(timestamp.timestamp() > 946_684_800);
        assert!(timestamp.timestamp() < 4_102_444_800);
    }

    #[tokio::test]
    async fn test_now_successive_calls_advance() {
        let time1 = now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let time2 = now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_unix_millis_matches_now() {
        let millis = unix_millis();
        let secs = now().timestamp();
        assert!((millis / 1000 - secs).abs() <= 1);
    }
}
