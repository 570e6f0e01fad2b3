use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One loosely-typed input record. Any subset of the recognised aliases may be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem(pub Map<String, Value>);

impl RawItem {
    /// Accept either a plain object or a workflow envelope `{"json": {...}}`.
    ///
    /// Envelope siblings such as `pairedItem` or `binary` are ignored; an
    /// envelope whose `json` is not an object is rejected.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut map) => match map.remove("json") {
                Some(Value::Object(inner)) => Some(Self(inner)),
                Some(_) => None,
                None => Some(Self(map)),
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        Self::from_value(value).unwrap_or_default()
    }
}

/// Resolved meeting date: either a full timestamp or a bare calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeetingDate {
    Instant(DateTime<FixedOffset>),
    Day(NaiveDate),
}

impl MeetingDate {
    /// Calendar day shown to humans. Bare days are never shifted by the zone.
    #[must_use]
    pub fn display_day(&self, tz: Tz) -> NaiveDate {
        match self {
            MeetingDate::Instant(ts) => ts.with_timezone(&tz).date_naive(),
            MeetingDate::Day(day) => *day,
        }
    }
}

/// Batch-level meeting metadata, resolved once from the first input item.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingInfo {
    pub title: String,
    pub organizer: String,
    /// False when the organizer is the default placeholder.
    pub organizer_resolved: bool,
    /// Date exactly as it will appear in payloads.
    pub date: String,
    pub parsed_date: MeetingDate,
    pub meeting_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTask {
    pub task_id: String,
    pub task_item: String,
    pub assignee_names: String,
    pub assignee_emails: String,
    pub priority: String,
    pub description: String,
    pub date_expected: String,
    pub meeting_title: String,
    pub meeting_organizer: String,
    pub meeting_date: String,
    pub meeting_id: String,
}

/// The normalizer's output: tasks plus the meeting they all belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub meeting: MeetingInfo,
    pub tasks: Vec<NormalizedTask>,
}

impl NormalizedBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSession {
    pub execution_id: String,
    pub approval_url: String,
    pub meeting_title: String,
    pub created_at: String,
}
