//! Ordered alias tables for every canonical field.
//!
//! Resolution walks the aliases in order and takes the first value that is
//! non-empty after coercion; when none qualifies the field default applies.

use serde_json::Value;

use crate::core::models::RawItem;

/// What to substitute when no alias yields a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Literal(&'static str),
    /// Current date as `YYYY-MM-DD`.
    Today,
    /// Current instant as RFC 3339.
    Now,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub default: FieldDefault,
}

pub const TASK_ITEM: FieldSpec = FieldSpec {
    name: "task_item",
    aliases: &["task_item", "task", "action_item", "item"],
    default: FieldDefault::Literal("Untitled Task"),
};

pub const ASSIGNEE_NAMES: FieldSpec = FieldSpec {
    name: "assignee_names",
    aliases: &[
        "assignee(s)_full_names",
        "assignee_full_names",
        "assignee_names",
        "assignees",
        "assignee",
    ],
    default: FieldDefault::Literal("Unassigned"),
};

pub const ASSIGNEE_EMAILS: FieldSpec = FieldSpec {
    name: "assignee_emails",
    aliases: &["assignee_emails", "assignee_email", "emails", "email"],
    default: FieldDefault::Literal(""),
};

pub const PRIORITY: FieldSpec = FieldSpec {
    name: "priority",
    aliases: &["priority", "urgency"],
    default: FieldDefault::Literal("Medium"),
};

pub const DESCRIPTION: FieldSpec = FieldSpec {
    name: "description",
    aliases: &["brief_description", "description", "details", "notes"],
    default: FieldDefault::Literal("No description"),
};

pub const DATE_EXPECTED: FieldSpec = FieldSpec {
    name: "date_expected",
    aliases: &["date_expected", "due_date", "due", "deadline"],
    default: FieldDefault::Today,
};

pub const MEETING_TITLE: FieldSpec = FieldSpec {
    name: "meeting_title",
    aliases: &["meeting_title", "title", "meeting_name", "name"],
    default: FieldDefault::Literal("TaskForge Meeting"),
};

pub const MEETING_ORGANIZER: FieldSpec = FieldSpec {
    name: "meeting_organizer",
    aliases: &["meeting_organizer", "organizer", "organizer_email", "creator"],
    default: FieldDefault::Literal("TaskForge System"),
};

pub const MEETING_DATE: FieldSpec = FieldSpec {
    name: "meeting_date",
    aliases: &["meeting_date", "date", "created_at"],
    default: FieldDefault::Now,
};

impl FieldSpec {
    /// First non-empty alias value, or `None` if the item carries none.
    #[must_use]
    pub fn resolve(&self, item: &RawItem) -> Option<String> {
        self.aliases
            .iter()
            .find_map(|alias| item.get(alias).and_then(coerce))
    }
}

/// Render a JSON value as field text; `None` means "treat as absent".
#[must_use]
pub fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(values) => {
            let parts: Vec<String> = values
                .iter()
                .filter(|v| !v.is_array() && !v.is_object())
                .filter_map(coerce)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> RawItem {
        RawItem::from(value)
    }

    #[test]
    fn first_non_empty_alias_wins() {
        let raw = item(json!({ "task_item": "  ", "task": "Ship it", "item": "ignored" }));
        assert_eq!(TASK_ITEM.resolve(&raw).as_deref(), Some("Ship it"));
    }

    #[test]
    fn missing_aliases_resolve_to_none() {
        assert_eq!(PRIORITY.resolve(&item(json!({}))), None);
        assert_eq!(PRIORITY.resolve(&item(json!({ "priority": null }))), None);
    }

    #[test]
    fn coerce_handles_scalars_and_lists() {
        assert_eq!(coerce(&json!(3)).as_deref(), Some("3"));
        assert_eq!(coerce(&json!(true)).as_deref(), Some("true"));
        assert_eq!(
            coerce(&json!(["Ana", "", "Ben", { "x": 1 }])).as_deref(),
            Some("Ana, Ben")
        );
        assert_eq!(coerce(&json!([])), None);
        assert_eq!(coerce(&json!({ "name": "x" })), None);
    }

    #[test]
    fn task_and_meeting_aliases_do_not_overlap() {
        for alias in TASK_ITEM.aliases {
            assert!(!MEETING_TITLE.aliases.contains(alias), "{alias} is ambiguous");
        }
    }
}
