//! Task normalization: raw input records → canonical [`NormalizedTask`]s.
//!
//! Meeting metadata is resolved from the first item only and stamped onto
//! every task, since a batch always belongs to a single meeting.

pub mod aliases;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::clock::Clock;
use crate::core::models::{MeetingDate, MeetingInfo, NormalizedBatch, NormalizedTask, RawItem};
use crate::errors::HitlError;
use aliases::{FieldDefault, FieldSpec};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Split a JSON batch into raw items.
///
/// Arrays yield one item per object element (workflow envelopes are unwrapped
/// and other elements skipped). A lone object is a one-item batch.
pub fn parse_batch(value: Value) -> Result<Vec<RawItem>, HitlError> {
    match value {
        Value::Array(elements) => {
            let total = elements.len();
            let items: Vec<RawItem> = elements
                .into_iter()
                .enumerate()
                .filter_map(|(index, element)| {
                    let parsed = RawItem::from_value(element);
                    if parsed.is_none() {
                        warn!("Skipping input element {} that is not a record", index);
                    }
                    parsed
                })
                .collect();
            debug!("Parsed {} of {} input elements", items.len(), total);
            Ok(items)
        }
        Value::Object(_) => Ok(RawItem::from_value(value).into_iter().collect()),
        other => Err(HitlError::ParseError(format!(
            "expected an array of task records, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse raw JSON text into raw items.
pub fn parse_batch_str(input: &str) -> Result<Vec<RawItem>, HitlError> {
    let value: Value = serde_json::from_str(input)?;
    parse_batch(value)
}

/// Resolve meeting-level metadata. `first` is the batch's first item, if any.
pub fn resolve_meeting(first: Option<&RawItem>, now: DateTime<Utc>) -> Result<MeetingInfo, HitlError> {
    let lookup = |spec: &FieldSpec| first.and_then(|item| spec.resolve(item));

    let title = lookup(&aliases::MEETING_TITLE)
        .unwrap_or_else(|| default_text(&aliases::MEETING_TITLE, now));
    let organizer = lookup(&aliases::MEETING_ORGANIZER);
    let organizer_resolved = organizer.is_some();
    let organizer =
        organizer.unwrap_or_else(|| default_text(&aliases::MEETING_ORGANIZER, now));

    let (date, parsed_date) = match lookup(&aliases::MEETING_DATE) {
        Some(raw) => {
            let parsed = parse_meeting_date(&raw)?;
            (raw, parsed)
        }
        None => (
            default_text(&aliases::MEETING_DATE, now),
            MeetingDate::Instant(now.fixed_offset()),
        ),
    };

    Ok(MeetingInfo {
        title,
        organizer,
        organizer_resolved,
        date,
        parsed_date,
        meeting_id: format!("meeting_{}", now.timestamp_millis()),
    })
}

/// Normalize a whole batch. An empty input gives an empty (but valid) batch.
pub fn normalize_batch(items: &[RawItem], clock: &dyn Clock) -> Result<NormalizedBatch, HitlError> {
    let now = clock.now();
    let meeting = resolve_meeting(items.first(), now)?;
    if !items.is_empty() {
        info!(
            "Processing meeting: \"{}\" by {}",
            meeting.title, meeting.organizer
        );
    }

    let stamp = now.timestamp_millis();
    let tasks = items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_task(item, index, stamp, &meeting, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NormalizedBatch { meeting, tasks })
}

fn normalize_task(
    item: &RawItem,
    index: usize,
    stamp: i64,
    meeting: &MeetingInfo,
    now: DateTime<Utc>,
) -> Result<NormalizedTask, HitlError> {
    let field = |spec: &FieldSpec| spec.resolve(item).unwrap_or_else(|| default_text(spec, now));

    let date_expected = match aliases::DATE_EXPECTED.resolve(item) {
        Some(raw) => parse_due_date(&raw)?,
        None => default_text(&aliases::DATE_EXPECTED, now),
    };

    Ok(NormalizedTask {
        task_id: format!("task_{}_{}", stamp, index),
        task_item: field(&aliases::TASK_ITEM),
        assignee_names: field(&aliases::ASSIGNEE_NAMES),
        assignee_emails: field(&aliases::ASSIGNEE_EMAILS),
        priority: field(&aliases::PRIORITY),
        description: field(&aliases::DESCRIPTION),
        date_expected,
        meeting_title: meeting.title.clone(),
        meeting_organizer: meeting.organizer.clone(),
        meeting_date: meeting.date.clone(),
        meeting_id: meeting.meeting_id.clone(),
    })
}

fn default_text(spec: &FieldSpec, now: DateTime<Utc>) -> String {
    match spec.default {
        FieldDefault::Literal(text) => text.to_string(),
        FieldDefault::Today => now.format(DAY_FORMAT).to_string(),
        FieldDefault::Now => now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Accepts `YYYY-MM-DD` or RFC 3339 and returns the `YYYY-MM-DD` day.
pub fn parse_due_date(raw: &str) -> Result<String, HitlError> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Ok(day.format(DAY_FORMAT).to_string());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive().format(DAY_FORMAT).to_string());
    }
    Err(HitlError::InvalidDate {
        field: aliases::DATE_EXPECTED.name,
        value: raw.to_string(),
    })
}

pub fn parse_meeting_date(raw: &str) -> Result<MeetingDate, HitlError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(MeetingDate::Instant(ts));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Ok(MeetingDate::Day(day));
    }
    Err(HitlError::InvalidDate {
        field: aliases::MEETING_DATE.name,
        value: raw.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
