use std::env;

use anyhow::Context;
use chrono::FixedOffset;

use crate::app::Curriculum;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL of the email delivery service; unset disables delivery
    pub email_api_url: Option<String>,
    pub email_api_token: Option<String>,
    /// Offset in which professors publish their HH:MM windows
    pub schedule_offset: FixedOffset,
    pub curriculum: Curriculum,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let offset_minutes: i32 = match env::var("SCHEDULE_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SCHEDULE_UTC_OFFSET_MINUTES is not a number: {}", raw))?,
            Err(_) => 0,
        };
        let schedule_offset = FixedOffset::east_opt(offset_minutes * 60)
            .with_context(|| format!("UTC offset out of range: {} minutes", offset_minutes))?;

        let curriculum = match env::var("CURRICULUM_PATH") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading curriculum from {}", path))?;
                Curriculum::from_json(&raw).with_context(|| format!("parsing {}", path))?
            }
            Err(_) => Curriculum::default(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            email_api_url: env::var("EMAIL_API_URL").ok().filter(|u| !u.is_empty()),
            email_api_token: env::var("EMAIL_API_TOKEN").ok(),
            schedule_offset,
            curriculum,
        })
    }

    /// Check if an email service is configured
    pub fn email_enabled(&self) -> bool {
        self.email_api_url.is_some()
    }
}
