use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Timelike};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::queries;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlot {
    pub day: String,
    pub start: String,
    pub end: String,
}

/// Weekly opening hours, configured as JSON:
/// `{"slots":[{"day":"mon","start":"09:00","end":"18:00"}, ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub slots: Vec<DaySlot>,
}

impl BusinessHours {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let hours: BusinessHours = serde_json::from_str(s).context("invalid business hours JSON")?;
        for slot in &hours.slots {
            parse_weekday(&slot.day)?;
            parse_clock(&slot.start)?;
            parse_clock(&slot.end)?;
        }
        Ok(hours)
    }

    /// Mon-Sat 09:00-18:00.
    pub fn default_week() -> Self {
        let days = ["mon", "tue", "wed", "thu", "fri", "sat"];
        Self {
            slots: days
                .iter()
                .map(|d| DaySlot {
                    day: (*d).to_string(),
                    start: "09:00".to_string(),
                    end: "18:00".to_string(),
                })
                .collect(),
        }
    }

    fn windows_for(&self, date: NaiveDate) -> Vec<(NaiveTime, NaiveTime)> {
        let weekday = date.format("%a").to_string().to_lowercase();
        self.slots
            .iter()
            .filter(|s| s.day.to_lowercase() == weekday)
            .filter_map(|s| Some((parse_clock(&s.start).ok()?, parse_clock(&s.end).ok()?)))
            .collect()
    }
}

/// The bookable time-of-day strings for a given date: the opening-hours
/// grid at `step_minutes` intervals, minus times already taken by a
/// confirmed appointment on that date.
pub fn bookable_slots(
    conn: &Connection,
    hours: &BusinessHours,
    date: NaiveDate,
    step_minutes: u32,
) -> anyhow::Result<Vec<String>> {
    let step = step_minutes.max(5);
    let taken = queries::get_booked_times(conn, date)?;

    let mut slots = vec![];
    for (start, end) in hours.windows_for(date) {
        let mut t = start;
        while t < end {
            let label = format!("{:02}:{:02}", t.hour(), t.minute());
            if !taken.contains(&label) {
                slots.push(label);
            }
            t = match t.overflowing_add_signed(chrono::Duration::minutes(step as i64)) {
                (next, 0) => next,
                _ => break, // wrapped past midnight
            };
        }
    }
    Ok(slots)
}

fn parse_weekday(s: &str) -> anyhow::Result<()> {
    match s.to_lowercase().as_str() {
        "mon" | "tue" | "wed" | "thu" | "fri" | "sat" | "sun" => Ok(()),
        _ => Err(anyhow::anyhow!("invalid weekday: {s}")),
    }
}

fn parse_clock(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").with_context(|| format!("invalid time: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Appointment, AppointmentStatus};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_from_json_valid() {
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"12:00"}]}"#,
        )
        .unwrap();
        assert_eq!(hours.slots.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_bad_day_or_time() {
        assert!(BusinessHours::from_json(
            r#"{"slots":[{"day":"xyz","start":"09:00","end":"12:00"}]}"#
        )
        .is_err());
        assert!(BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"25:00","end":"12:00"}]}"#
        )
        .is_err());
        assert!(BusinessHours::from_json("not json").is_err());
    }

    #[test]
    fn test_grid_for_open_day() {
        let conn = setup_db();
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"12:00"}]}"#,
        )
        .unwrap();
        // 2025-06-16 is a Monday
        let slots = bookable_slots(&conn, &hours, d("2025-06-16"), 60).unwrap();
        assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
    }

    #[test]
    fn test_closed_day_has_no_slots() {
        let conn = setup_db();
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"12:00"}]}"#,
        )
        .unwrap();
        // 2025-06-15 is a Sunday
        let slots = bookable_slots(&conn, &hours, d("2025-06-15"), 60).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_booked_time_removed() {
        let conn = setup_db();
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"12:00"}]}"#,
        )
        .unwrap();

        let appt = Appointment {
            id: "a1".to_string(),
            client_id: "c1".to_string(),
            service_name: "Manicure".to_string(),
            date: d("2025-06-16"),
            time: "10:00".to_string(),
            status: AppointmentStatus::Confirmed,
            created_at: chrono::Utc::now().naive_utc(),
        };
        queries::create_appointment(&conn, &appt).unwrap();

        let slots = bookable_slots(&conn, &hours, d("2025-06-16"), 60).unwrap();
        assert_eq!(slots, vec!["09:00", "11:00"]);
    }

    #[test]
    fn test_cancelled_appointment_frees_slot() {
        let conn = setup_db();
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"12:00"}]}"#,
        )
        .unwrap();

        let appt = Appointment {
            id: "a2".to_string(),
            client_id: "c1".to_string(),
            service_name: "Manicure".to_string(),
            date: d("2025-06-16"),
            time: "10:00".to_string(),
            status: AppointmentStatus::Cancelled,
            created_at: chrono::Utc::now().naive_utc(),
        };
        queries::create_appointment(&conn, &appt).unwrap();

        let slots = bookable_slots(&conn, &hours, d("2025-06-16"), 60).unwrap();
        assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
    }

    #[test]
    fn test_half_hour_step() {
        let conn = setup_db();
        let hours = BusinessHours::from_json(
            r#"{"slots":[{"day":"mon","start":"09:00","end":"10:30"}]}"#,
        )
        .unwrap();
        let slots = bookable_slots(&conn, &hours, d("2025-06-16"), 30).unwrap();
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }
}
