pub mod intent;
pub mod parse;
pub mod replies;

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::db::queries;
use crate::models::{
    Appointment, AppointmentStatus, BookingStage, ChatMessage, ChatSession, Sender, Service,
};
use crate::services::{availability, log, tips};
use crate::state::AppState;

use intent::Intent;

/// Run one user message through the dialogue engine and produce the reply.
/// The whole turn is handled here: transcript append, stage transition,
/// typing pause, persistence, interaction log.
pub async fn process_message(
    state: &Arc<AppState>,
    client_id: &str,
    text: &str,
) -> anyhow::Result<String> {
    let mut session = {
        let db = state.db.lock().unwrap();
        queries::get_session(&db, client_id)?
    }
    .unwrap_or_else(|| ChatSession::new(client_id));

    session.messages.push(ChatMessage::new(Sender::User, text));

    // User activity pushes the next proactive tip out instead of stacking.
    tips::reschedule(state, client_id);

    let reply = match session.stage.clone() {
        BookingStage::Idle => handle_intent(state, &mut session, text)?,
        BookingStage::AwaitingService => handle_service_choice(state, &mut session, text)?,
        BookingStage::AwaitingDateTime { service_name } => {
            handle_date_time(state, &mut session, &service_name, text)?
        }
        BookingStage::AwaitingConfirm {
            service_name,
            date,
            time,
        } => handle_confirmation(state, &mut session, &service_name, date, &time, text).await,
    };

    tracing::info!(
        client_id,
        stage = session.stage.as_str(),
        "message processed"
    );

    // Simulated typing pause before the reply lands.
    if state.config.typing_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.typing_delay_ms)).await;
    }

    session
        .messages
        .push(ChatMessage::new(Sender::Assistant, reply.clone()));
    session.last_activity = Utc::now().naive_utc();

    {
        let db = state.db.lock().unwrap();
        queries::save_session(&db, &session)?;
    }

    log::record_event(state, client_id, "bot_reply", &reply);

    Ok(reply)
}

/// Free intent-matching mode, active only while no booking flow runs.
fn handle_intent(
    state: &Arc<AppState>,
    session: &mut ChatSession,
    text: &str,
) -> anyhow::Result<String> {
    let matched = intent::classify(text);
    tracing::info!(
        client_id = %session.client_id,
        intent = matched.as_str(),
        "intent matched"
    );

    let reply = match matched {
        Intent::Greeting => replies::GREETING.to_string(),
        Intent::StatusCheck => {
            let upcoming = {
                let db = state.db.lock().unwrap();
                queries::get_upcoming_appointments(&db, &session.client_id, Utc::now().date_naive())?
            };
            match upcoming.first() {
                Some(appt) => replies::next_appointment(appt),
                None => replies::NO_APPOINTMENTS.to_string(),
            }
        }
        Intent::CancelAppointment => replies::CANCEL_INFO.to_string(),
        Intent::Reschedule => replies::RESCHEDULE_INFO.to_string(),
        Intent::StartBooking => {
            session.stage = BookingStage::AwaitingService;
            replies::SERVICE_PROMPT.to_string()
        }
        Intent::Services => {
            let services = {
                let db = state.db.lock().unwrap();
                queries::list_services(&db)?
            };
            if let Some(svc) = match_service(text, &services) {
                session.last_service_mentioned = Some(svc.name.clone());
            }
            let names: Vec<String> = services.into_iter().map(|s| s.name).collect();
            replies::services_list(&names)
        }
        Intent::Hours
        | Intent::Payment
        | Intent::Promotion
        | Intent::HumanHandoff
        | Intent::Goodbye => {
            // Unrelated topic: the previously discussed service is stale now.
            session.last_service_mentioned = None;
            match matched {
                Intent::Hours => replies::HOURS.to_string(),
                Intent::Payment => replies::PAYMENT.to_string(),
                Intent::Promotion => replies::PROMOTION.to_string(),
                Intent::HumanHandoff => replies::HUMAN_HANDOFF.to_string(),
                _ => replies::GOODBYE.to_string(),
            }
        }
        Intent::Thanks => replies::THANKS.to_string(),
        Intent::Fallback => replies::FALLBACK.to_string(),
    };

    Ok(reply)
}

/// `AwaitingService`: every message is read as a service-name attempt,
/// including another "quero agendar".
fn handle_service_choice(
    state: &Arc<AppState>,
    session: &mut ChatSession,
    text: &str,
) -> anyhow::Result<String> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::list_services(&db)?
    };

    match match_service(text, &services) {
        Some(svc) => {
            session.stage = BookingStage::AwaitingDateTime {
                service_name: svc.name.clone(),
            };
            session.last_service_mentioned = Some(svc.name.clone());
            Ok(replies::ask_date_time(&svc.name))
        }
        None => {
            let names: Vec<String> = services.into_iter().map(|s| s.name).collect();
            Ok(replies::service_options(&names))
        }
    }
}

/// `AwaitingDateTime`: needs a parseable date, a parseable time, and the
/// time must be in the bookable slot set for that date. Anything else
/// re-prompts without leaving the stage.
fn handle_date_time(
    state: &Arc<AppState>,
    session: &mut ChatSession,
    service_name: &str,
    text: &str,
) -> anyhow::Result<String> {
    let today = Utc::now().date_naive();

    let Some((date, time)) = parse::extract_date_time(text, today) else {
        return Ok(replies::DATE_TIME_INVALID.to_string());
    };

    let slots = {
        let db = state.db.lock().unwrap();
        availability::bookable_slots(
            &db,
            &state.config.business_hours,
            date,
            state.config.slot_step_minutes,
        )?
    };

    if !slots.contains(&time) {
        tracing::info!(
            client_id = %session.client_id,
            date = %date,
            %time,
            "requested slot not available"
        );
        return Ok(replies::DATE_TIME_INVALID.to_string());
    }

    session.stage = BookingStage::AwaitingConfirm {
        service_name: service_name.to_string(),
        date,
        time: time.clone(),
    };
    Ok(replies::confirm_prompt(service_name, date, &time))
}

/// `AwaitingConfirm`: "sim"/"confirmar" books, "não"/"cancelar" abandons,
/// anything else re-prompts. The affirmative branch is the only place an
/// appointment is ever created.
async fn handle_confirmation(
    state: &Arc<AppState>,
    session: &mut ChatSession,
    service_name: &str,
    date: NaiveDate,
    time: &str,
    text: &str,
) -> String {
    match classify_confirmation(text) {
        Some(true) => {
            let appt = Appointment {
                id: uuid::Uuid::new_v4().to_string(),
                client_id: session.client_id.clone(),
                service_name: service_name.to_string(),
                date,
                time: time.to_string(),
                status: AppointmentStatus::Confirmed,
                created_at: Utc::now().naive_utc(),
            };

            // Best-effort: a failed write never surfaces as a conversation
            // error.
            let created = {
                let db = state.db.lock().unwrap();
                queries::create_appointment(&db, &appt)
            };
            if let Err(e) = created {
                tracing::error!(
                    error = %e,
                    client_id = %session.client_id,
                    "failed to persist appointment"
                );
            }

            log::record_event(
                state,
                &session.client_id,
                "booking_confirmed",
                &format!("{service_name} {} {time}", date.format("%d/%m/%Y")),
            );
            notify_owner(state, &appt).await;

            session.stage = BookingStage::Idle;
            session.last_service_mentioned = None;
            replies::booking_confirmed(service_name, date, time)
        }
        Some(false) => {
            session.stage = BookingStage::Idle;
            session.last_service_mentioned = None;
            replies::BOOKING_DECLINED.to_string()
        }
        None => replies::CONFIRM_RETRY.to_string(),
    }
}

/// Affirmative is tested before negative; "sim"/"não" must be whole
/// tokens, "confirmar"/"cancelar" match as substrings. Accent-sensitive.
fn classify_confirmation(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.contains(&"sim") || lower.contains("confirmar") {
        return Some(true);
    }
    if tokens.contains(&"não") || lower.contains("cancelar") {
        return Some(false);
    }
    None
}

/// First catalog entry whose name contains the message, or whose name is
/// contained in it. Catalog order breaks ties.
fn match_service<'a>(message: &str, services: &'a [Service]) -> Option<&'a Service> {
    let text = message.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    services.iter().find(|svc| {
        let name = svc.name.to_lowercase();
        text.contains(&name) || name.contains(&text)
    })
}

async fn notify_owner(state: &Arc<AppState>, appt: &Appointment) {
    let payload = serde_json::json!({
        "id": appt.id,
        "client_id": appt.client_id,
        "service_name": appt.service_name,
        "date": appt.date.format("%Y-%m-%d").to_string(),
        "time": appt.time,
    });

    if let Err(e) = state.notifier.notify("booking.confirmed", &payload).await {
        tracing::error!(error = %e, "failed to notify owner");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str, order: i32) -> Service {
        Service {
            id: format!("svc-{order}"),
            name: name.to_string(),
            duration_minutes: 60,
            sort_order: order,
        }
    }

    #[test]
    fn test_classify_confirmation_affirmative() {
        assert_eq!(classify_confirmation("sim"), Some(true));
        assert_eq!(classify_confirmation("Sim, por favor!"), Some(true));
        assert_eq!(classify_confirmation("pode confirmar"), Some(true));
    }

    #[test]
    fn test_classify_confirmation_negative() {
        assert_eq!(classify_confirmation("não"), Some(false));
        assert_eq!(classify_confirmation("melhor cancelar"), Some(false));
    }

    #[test]
    fn test_classify_confirmation_ambiguous() {
        assert_eq!(classify_confirmation("talvez"), None);
        // "assim" must not read as "sim".
        assert_eq!(classify_confirmation("assim"), None);
        // Accent-sensitive: "nao" without the tilde is not a negative.
        assert_eq!(classify_confirmation("nao"), None);
    }

    #[test]
    fn test_match_service_full_name_in_message() {
        let services = vec![svc("Corte de Cabelo", 1), svc("Manicure", 2)];
        let found = match_service("quero Corte de Cabelo amanhã", &services).unwrap();
        assert_eq!(found.name, "Corte de Cabelo");
    }

    #[test]
    fn test_match_service_partial_message() {
        let services = vec![svc("Corte de Cabelo", 1), svc("Manicure", 2)];
        let found = match_service("corte", &services).unwrap();
        assert_eq!(found.name, "Corte de Cabelo");
    }

    #[test]
    fn test_match_service_first_wins_on_ambiguity() {
        // "c" is contained in both names; catalog order decides.
        let services = vec![svc("Coloração", 1), svc("Corte de Cabelo", 2)];
        let found = match_service("c", &services).unwrap();
        assert_eq!(found.name, "Coloração");
    }

    #[test]
    fn test_match_service_no_match() {
        let services = vec![svc("Manicure", 1)];
        assert!(match_service("massagem", &services).is_none());
        assert!(match_service("   ", &services).is_none());
    }
}
