use chrono::{TimeZone, Utc};
use serde_json::json;
use std::collections::HashSet;
use taskforge_hitl::core::{FixedClock, MeetingDate, RawItem};
use taskforge_hitl::errors::HitlError;
use taskforge_hitl::normalize::{normalize_batch, parse_batch, parse_batch_str};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap())
}

fn items(value: serde_json::Value) -> Vec<RawItem> {
    parse_batch(value).expect("batch parses")
}

#[test]
fn missing_fields_take_documented_defaults() {
    let batch = normalize_batch(&items(json!([{}])), &clock()).unwrap();
    let task = &batch.tasks[0];

    assert_eq!(task.task_item, "Untitled Task");
    assert_eq!(task.assignee_names, "Unassigned");
    assert_eq!(task.assignee_emails, "");
    assert_eq!(task.priority, "Medium");
    assert_eq!(task.description, "No description");
    assert_eq!(task.date_expected, "2025-06-02");
    assert_eq!(task.meeting_title, "TaskForge Meeting");
    assert_eq!(task.meeting_organizer, "TaskForge System");
    assert_eq!(task.meeting_date, "2025-06-02T14:30:00.000Z");
    assert_eq!(task.meeting_id, "meeting_1748874600000");
    assert!(!batch.meeting.organizer_resolved);
}

#[test]
fn aliases_resolve_in_order() {
    let batch = normalize_batch(
        &items(json!([{
            "task": "Book venue",
            "assignee(s)_full_names": "Dana Reyes",
            "assignee": "ignored",
            "assignee_email": "dana@example.com",
            "urgency": "High",
            "details": "Seats for 40",
            "due_date": "2025-06-20"
        }])),
        &clock(),
    )
    .unwrap();
    let task = &batch.tasks[0];

    assert_eq!(task.task_item, "Book venue");
    assert_eq!(task.assignee_names, "Dana Reyes");
    assert_eq!(task.assignee_emails, "dana@example.com");
    assert_eq!(task.priority, "High");
    assert_eq!(task.description, "Seats for 40");
    assert_eq!(task.date_expected, "2025-06-20");
}

#[test]
fn list_valued_assignees_are_joined() {
    let batch = normalize_batch(
        &items(json!([{ "task_item": "Pair on parser", "assignees": ["Ana", "Ben"] }])),
        &clock(),
    )
    .unwrap();
    assert_eq!(batch.tasks[0].assignee_names, "Ana, Ben");
}

#[test]
fn meeting_metadata_comes_from_first_item_only() {
    let batch = normalize_batch(
        &items(json!([
            { "task_item": "A", "meeting_title": "Q3 Planning", "organizer": "lee@example.com", "meeting_date": "2025-06-01" },
            { "task_item": "B", "meeting_title": "Other Meeting", "organizer": "someone@else.com", "meeting_date": "2024-01-01" },
            { "task_item": "C" }
        ])),
        &clock(),
    )
    .unwrap();

    assert!(batch.meeting.organizer_resolved);
    assert_eq!(batch.meeting.parsed_date, MeetingDate::Day(chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
    for task in &batch.tasks {
        assert_eq!(task.meeting_title, "Q3 Planning");
        assert_eq!(task.meeting_organizer, "lee@example.com");
        assert_eq!(task.meeting_date, "2025-06-01");
        assert_eq!(task.meeting_id, batch.meeting.meeting_id);
    }
}

#[test]
fn meeting_defaults_apply_when_first_item_lacks_them() {
    // Later items carrying meeting fields do not count.
    let batch = normalize_batch(
        &items(json!([
            { "task_item": "Draft report", "assignee": "A" },
            { "task_item": "Review report", "assignee": "B", "meeting_title": "Late Title" }
        ])),
        &clock(),
    )
    .unwrap();

    assert!(batch.tasks.iter().all(|t| t.meeting_title == "TaskForge Meeting"));
    assert_eq!(batch.tasks[0].assignee_names, "A");
    assert_eq!(batch.tasks[1].assignee_names, "B");
}

#[test]
fn task_ids_are_unique_within_batch() {
    let raw: Vec<serde_json::Value> = (0..25).map(|i| json!({ "task_item": format!("Task {i}") })).collect();
    let batch = normalize_batch(&items(serde_json::Value::Array(raw)), &clock()).unwrap();

    let ids: HashSet<&str> = batch.tasks.iter().map(|t| t.task_id.as_str()).collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(batch.tasks[0].task_id, "task_1748874600000_0");
    assert_eq!(batch.tasks[24].task_id, "task_1748874600000_24");
}

#[test]
fn empty_input_is_an_empty_batch_not_an_error() {
    let batch = normalize_batch(&[], &clock()).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn malformed_due_date_is_rejected() {
    let err = normalize_batch(
        &items(json!([{ "task_item": "A" }, { "task_item": "B", "date_expected": "31/12/2025" }])),
        &clock(),
    )
    .unwrap_err();
    assert!(matches!(err, HitlError::InvalidDate { field: "date_expected", .. }));
}

#[test]
fn malformed_meeting_date_is_rejected() {
    let err = normalize_batch(&items(json!([{ "meeting_date": "sometime" }])), &clock()).unwrap_err();
    assert!(matches!(err, HitlError::InvalidDate { field: "meeting_date", .. }));
}

#[test]
fn envelopes_are_unwrapped_and_non_records_skipped() {
    let raw = items(json!([
        { "json": { "task_item": "Wrapped" } },
        "stray string",
        42,
        { "json": "not an object" },
        { "task_item": "Plain" }
    ]));
    assert_eq!(raw.len(), 2);

    let batch = normalize_batch(&raw, &clock()).unwrap();
    assert_eq!(batch.tasks[0].task_item, "Wrapped");
    assert_eq!(batch.tasks[1].task_item, "Plain");
}

#[test]
fn envelopes_with_sibling_keys_are_unwrapped() {
    let raw = items(json!([
        {
            "json": { "task_item": "Draft report", "meeting_title": "Q3" },
            "pairedItem": { "item": 0 }
        },
        {
            "json": { "task_item": "Review report" },
            "pairedItem": { "item": 1 },
            "binary": {}
        },
        { "json": "not an object", "pairedItem": { "item": 2 } }
    ]));
    assert_eq!(raw.len(), 2);

    let batch = normalize_batch(&raw, &clock()).unwrap();
    assert_eq!(batch.tasks[0].task_item, "Draft report");
    assert_eq!(batch.tasks[1].task_item, "Review report");
    assert!(batch.tasks.iter().all(|t| t.meeting_title == "Q3"));
}

#[test]
fn single_object_is_a_one_item_batch() {
    let raw = parse_batch_str(r#"{ "task_item": "Solo" }"#).unwrap();
    assert_eq!(raw.len(), 1);
}

#[test]
fn invalid_json_text_is_a_parse_error() {
    assert!(matches!(
        parse_batch_str("[{"),
        Err(HitlError::ParseError(_))
    ));
}
