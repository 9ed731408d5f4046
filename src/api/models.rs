//! API request and response models

use crate::error::{AlarmError, Result};
use crate::filter::FilterSpec;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check endpoint response
pub const HEALTH_OK: &str = "OK";

/// Query parameters for the alarm list endpoint
///
/// `after`/`before` are epoch milliseconds, matching the wire format of
/// the upstream admin clients.
#[derive(Debug, Deserialize)]
pub struct AlarmsQuery {
    pub token: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    #[serde(rename = "type")]
    pub alarm_type: Option<String>,
}

impl AlarmsQuery {
    /// Parse the token if present and well-formed. A malformed token on
    /// the read path is treated the same as an absent one: the service
    /// builds a fresh snapshot instead of failing the request.
    pub fn token(&self) -> Option<Uuid> {
        self.token.as_deref().and_then(|t| Uuid::parse_str(t).ok())
    }

    pub fn filter(&self) -> Result<FilterSpec> {
        Ok(FilterSpec {
            after: self.after.map(millis_to_utc).transpose()?,
            before: self.before.map(millis_to_utc).transpose()?,
            alarm_type: self.alarm_type.clone(),
        })
    }
}

fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AlarmError::InvalidArgument(format!("invalid timestamp: {millis}")))
}

/// Body of the update endpoint: `{"action": "close"|"comment", "value": ...}`
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub action: String,
    pub value: String,
}

/// Uniform success body for the mutation endpoints
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
