use std::env;

use crate::services::availability::BusinessHours;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    pub owner_webhook_url: String,
    pub owner_webhook_secret: String,
    pub business_hours: BusinessHours,
    pub slot_step_minutes: u32,
    pub typing_delay_ms: u64,
    pub tip_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let business_hours = match env::var("BUSINESS_HOURS") {
            Ok(json) => BusinessHours::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid BUSINESS_HOURS, using default week");
                BusinessHours::default_week()
            }),
            Err(_) => BusinessHours::default_week(),
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "atendente.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Studio Beleza".to_string()),
            owner_webhook_url: env::var("OWNER_WEBHOOK_URL").unwrap_or_default(),
            owner_webhook_secret: env::var("OWNER_WEBHOOK_SECRET").unwrap_or_default(),
            business_hours,
            slot_step_minutes: env::var("SLOT_STEP_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            typing_delay_ms: env::var("TYPING_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
            tip_interval_secs: env::var("TIP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }
}
