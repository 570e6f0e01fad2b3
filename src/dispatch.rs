//! Batch dispatch: normalize → session → render, collapsed to exactly one record.
//!
//! An empty batch yields `{"status": "no_tasks"}` without allocating a session.
//! Any failure yields `{"status": "error", "message", "timestamp"}` and no
//! channel payloads at all.

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::SecondsFormat;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::channels::{ChannelSet, render_channels};
use crate::core::clock::{Clock, RandomSource, SystemClock, UuidRandom};
use crate::core::config::AppConfig;
use crate::core::models::{ApprovalSession, NormalizedTask, RawItem};
use crate::errors::HitlError;
use crate::normalize::{normalize_batch, parse_batch, parse_batch_str};
use crate::session::build_session;

/// A fully rendered approval session, ready for the three senders.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalDispatch {
    pub session: ApprovalSession,
    pub meeting_organizer: String,
    pub meeting_date: String,
    pub channels: ChannelSet,
}

impl ApprovalDispatch {
    #[must_use]
    pub fn tasks(&self) -> &[NormalizedTask] {
        &self.channels.store.tasks
    }

    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.channels.store.total_tasks
    }
}

/// Flat view of a dispatch, shaped for the downstream senders.
#[derive(Serialize)]
struct DispatchRecord<'a> {
    telegram_message: &'a str,
    email_subject: &'a str,
    email_html: &'a str,
    email_text: &'a str,
    execution_id: &'a str,
    approval_url: &'a str,
    tasks: &'a [NormalizedTask],
    meeting_title: &'a str,
    meeting_organizer: &'a str,
    meeting_date: &'a str,
    created_at: &'a str,
    total_tasks: usize,
    tasks_count: usize,
    source: &'a str,
    store_request: &'a crate::channels::StoreRequest,
}

impl Serialize for ApprovalDispatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let store = &self.channels.store;
        DispatchRecord {
            telegram_message: &self.channels.chat.text,
            email_subject: &self.channels.email.subject,
            email_html: &self.channels.email.html,
            email_text: &self.channels.email.text,
            execution_id: &self.session.execution_id,
            approval_url: &self.session.approval_url,
            tasks: &store.tasks,
            meeting_title: &self.session.meeting_title,
            meeting_organizer: &self.meeting_organizer,
            meeting_date: &self.meeting_date,
            created_at: &self.session.created_at,
            total_tasks: store.total_tasks,
            tasks_count: store.total_tasks,
            source: &store.source_tag,
            store_request: store,
        }
        .serialize(serializer)
    }
}

/// The single record produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Ready(Box<ApprovalDispatch>),
    NoTasks,
    Error { message: String, timestamp: String },
}

impl DispatchOutcome {
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            DispatchOutcome::Ready(_) => "ready",
            DispatchOutcome::NoTasks => "no_tasks",
            DispatchOutcome::Error { .. } => "error",
        }
    }

    #[must_use]
    pub fn as_ready(&self) -> Option<&ApprovalDispatch> {
        match self {
            DispatchOutcome::Ready(dispatch) => Some(dispatch),
            _ => None,
        }
    }
}

pub struct Dispatcher {
    config: AppConfig,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
            random: Box::new(UuidRandom),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Process one batch of raw items.
    pub fn dispatch(&self, items: &[RawItem]) -> DispatchOutcome {
        let attempt = catch_unwind(AssertUnwindSafe(|| self.try_dispatch(items)));
        match attempt {
            Ok(Ok(Some(dispatch))) => DispatchOutcome::Ready(Box::new(dispatch)),
            Ok(Ok(None)) => {
                info!("No tasks found in batch");
                DispatchOutcome::NoTasks
            }
            Ok(Err(e)) => self.fail(&e),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected panic".to_string());
                self.fail(&HitlError::ProcessingFault(message))
            }
        }
    }

    /// Process a batch given as a JSON value. Shape errors become error records.
    pub fn dispatch_value(&self, value: Value) -> DispatchOutcome {
        match parse_batch(value) {
            Ok(items) => self.dispatch(&items),
            Err(e) => self.fail(&e),
        }
    }

    /// Process a batch given as JSON text.
    pub fn dispatch_str(&self, input: &str) -> DispatchOutcome {
        match parse_batch_str(input) {
            Ok(items) => self.dispatch(&items),
            Err(e) => self.fail(&e),
        }
    }

    /// Log `err` and turn it into the error record.
    pub fn fail(&self, err: &dyn std::fmt::Display) -> DispatchOutcome {
        error!("Error in HITL dispatch: {}", err);
        DispatchOutcome::Error {
            message: err.to_string(),
            timestamp: self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Serialize an outcome into the JSON record handed to the senders.
    #[must_use]
    pub fn to_record(&self, outcome: &DispatchOutcome) -> Value {
        serde_json::to_value(outcome).unwrap_or_else(|e| {
            self.fallback_record(&format!("Failed to serialize dispatch record: {}", e))
        })
    }

    fn fallback_record(&self, message: &str) -> Value {
        error!("Error in HITL dispatch: {}", message);
        json!({
            "status": "error",
            "message": message,
            "timestamp": self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    fn try_dispatch(&self, items: &[RawItem]) -> Result<Option<ApprovalDispatch>, HitlError> {
        let batch = normalize_batch(items, self.clock.as_ref())?;
        if batch.is_empty() {
            return Ok(None);
        }
        info!("Generated {} tasks for approval", batch.len());

        let session = build_session(
            &batch.meeting.title,
            &self.config,
            self.clock.as_ref(),
            self.random.as_ref(),
        );
        let channels = render_channels(&batch, &session, &self.config)?;
        channels.verify(&session)?;

        Ok(Some(ApprovalDispatch {
            meeting_organizer: batch.meeting.organizer,
            meeting_date: batch.meeting.date,
            session,
            channels,
        }))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn fallback_record_uses_injected_clock() {
        let dispatcher = Dispatcher::default()
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap()));

        let record = dispatcher.fallback_record("Failed to serialize dispatch record: boom");
        assert_eq!(
            record,
            json!({
                "status": "error",
                "message": "Failed to serialize dispatch record: boom",
                "timestamp": "2025-06-02T14:30:00.000Z",
            })
        );
    }

    #[test]
    fn record_matches_outcome_serialization() {
        let dispatcher = Dispatcher::default();
        assert_eq!(
            dispatcher.to_record(&DispatchOutcome::NoTasks),
            json!({ "status": "no_tasks" })
        );
    }
}
