//! Environment-driven settings, overridable from the command line.

use anyhow::{Context, Result};
use chrono_tz::Tz;

pub const DEFAULT_LOG_FILTER: &str = "rendezvous=info";
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing` filter directive (`RENDEZVOUS_LOG`).
    pub log_filter: String,
    /// IANA zone used when rendering times for humans (`RENDEZVOUS_TIMEZONE`).
    pub timezone: String,
}

impl Config {
    pub fn from_env() -> Self {
        let log_filter = std::env::var("RENDEZVOUS_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let timezone = std::env::var("RENDEZVOUS_TIMEZONE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        Self {
            log_filter,
            timezone,
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, log_filter: Option<String>, timezone: Option<String>) -> Self {
        if let Some(filter) = log_filter {
            self.log_filter = filter;
        }
        if let Some(tz) = timezone {
            self.timezone = tz;
        }
        self
    }

    /// The configured display zone, or an error naming the bad value.
    pub fn display_timezone(&self) -> Result<Tz> {
        rendezvous_core::tz::parse_timezone(&self.timezone)
            .with_context(|| format!("Invalid display timezone: '{}'", self.timezone))
    }
}
