use chrono::{DateTime, Utc};

/// Relative label for a transcript timestamp: "agora" under a minute,
/// "há N min" under an hour, "há Nh" under a day, then the absolute
/// "DD/MM HH:MM". Future timestamps (clock skew) read as "agora".
pub fn relative_label(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);

    if elapsed.num_seconds() < 60 {
        return "agora".to_string();
    }
    if elapsed.num_minutes() < 60 {
        return format!("há {} min", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("há {}h", elapsed.num_hours());
    }
    ts.format("%d/%m %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-08-06T15:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(relative_label(now() - Duration::seconds(10), now()), "agora");
        assert_eq!(relative_label(now() - Duration::seconds(59), now()), "agora");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(relative_label(now() - Duration::minutes(1), now()), "há 1 min");
        assert_eq!(relative_label(now() - Duration::minutes(45), now()), "há 45 min");
    }

    #[test]
    fn test_hours() {
        assert_eq!(relative_label(now() - Duration::hours(1), now()), "há 1h");
        assert_eq!(relative_label(now() - Duration::hours(23), now()), "há 23h");
    }

    #[test]
    fn test_absolute_beyond_a_day() {
        assert_eq!(
            relative_label(now() - Duration::hours(30), now()),
            "05/08 09:00"
        );
    }

    #[test]
    fn test_future_timestamp_reads_as_now() {
        assert_eq!(relative_label(now() + Duration::minutes(5), now()), "agora");
    }
}
