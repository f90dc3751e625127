use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Appointment, AppointmentStatus, BookingStage, ChatSession, Service, SessionData, SessionEvent,
};

// ── Sessions ──

pub fn get_session(conn: &Connection, client_id: &str) -> anyhow::Result<Option<ChatSession>> {
    let mut stmt =
        conn.prepare("SELECT client_id, data, last_activity FROM sessions WHERE client_id = ?1")?;

    let result = stmt.query_row(params![client_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    });

    match result {
        Ok((client_id, data_json, last_activity_str)) => {
            // A malformed blob must never fail rehydration; fall back to a
            // fresh idle session.
            let data: SessionData = serde_json::from_str(&data_json).unwrap_or_else(|e| {
                tracing::warn!(client_id = %client_id, error = %e, "malformed session data, resetting");
                SessionData {
                    messages: vec![],
                    stage: BookingStage::Idle,
                    last_service_mentioned: None,
                }
            });

            let last_activity =
                NaiveDateTime::parse_from_str(&last_activity_str, "%Y-%m-%d %H:%M:%S")
                    .unwrap_or_else(|_| Utc::now().naive_utc());

            Ok(Some(ChatSession {
                client_id,
                messages: data.messages,
                stage: data.stage,
                last_service_mentioned: data.last_service_mentioned,
                last_activity,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_session(conn: &Connection, session: &ChatSession) -> anyhow::Result<()> {
    let data_json = serde_json::to_string(&session.data())?;
    let last_activity = session.last_activity.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO sessions (client_id, data, stage, last_activity)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(client_id) DO UPDATE SET
           data = excluded.data,
           stage = excluded.stage,
           last_activity = excluded.last_activity",
        params![
            session.client_id,
            data_json,
            session.stage.as_str(),
            last_activity
        ],
    )?;
    Ok(())
}

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, client_id, service_name, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            appt.id,
            appt.client_id,
            appt.service_name,
            appt.date.format("%Y-%m-%d").to_string(),
            appt.time,
            appt.status.as_str(),
            appt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

/// Confirmed appointments for a client from `from_date` on, nearest first.
pub fn get_upcoming_appointments(
    conn: &Connection,
    client_id: &str,
    from_date: NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, service_name, date, time, status, created_at
         FROM appointments
         WHERE client_id = ?1 AND status = 'confirmed' AND date >= ?2
         ORDER BY date ASC, time ASC",
    )?;

    let from = from_date.format("%Y-%m-%d").to_string();
    let rows = stmt.query_map(params![client_id, from], parse_appointment_row)?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn get_all_appointments(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, service_name, date, time, status, created_at
         FROM appointments
         WHERE (?1 IS NULL OR status = ?1)
         ORDER BY date DESC, time DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![status_filter, limit], parse_appointment_row)?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

/// Returns false when the id does not exist.
pub fn cancel_appointment(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let changed = conn.execute(
        "UPDATE appointments SET status = 'cancelled' WHERE id = ?1",
        params![id],
    )?;
    Ok(changed > 0)
}

/// Times already taken by a confirmed appointment on the given date.
pub fn get_booked_times(conn: &Connection, date: NaiveDate) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT time FROM appointments WHERE date = ?1 AND status = 'confirmed'",
    )?;

    let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

fn parse_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    let date_str: String = row.get(3)?;
    let created_at_str: String = row.get(6)?;
    let status_str: String = row.get(5)?;

    Ok(Appointment {
        id: row.get(0)?,
        client_id: row.get(1)?,
        service_name: row.get(2)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
        time: row.get(4)?,
        status: AppointmentStatus::parse(&status_str),
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    })
}

// ── Services ──

/// Catalog order doubles as match precedence for the booking flow.
pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, duration_minutes, sort_order FROM services ORDER BY sort_order ASC, name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            duration_minutes: row.get(2)?,
            sort_order: row.get(3)?,
        })
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

// ── Interaction log ──

pub fn insert_log_event(
    conn: &Connection,
    client_id: &str,
    kind: &str,
    content: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO interaction_log (client_id, kind, content, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            client_id,
            kind,
            content,
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_log_events(
    conn: &Connection,
    client_id: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<SessionEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, kind, content, created_at
         FROM interaction_log
         WHERE (?1 IS NULL OR client_id = ?1)
         ORDER BY id DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![client_id, limit], |row| {
        Ok(SessionEvent {
            id: row.get(0)?,
            client_id: row.get(1)?,
            kind: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;

    let mut events = vec![];
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}
