//! Instant-messaging alert in Telegram legacy Markdown.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::models::{ApprovalSession, NormalizedBatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAlert {
    pub text: String,
}

static MARKDOWN_SPECIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([_*`\[])").expect("static regex compile"));

/// Escape user-supplied text for legacy Markdown. Applied exactly once per value.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIALS.replace_all(text, r"\$1").into_owned()
}

/// Build the alert text. The execution id sits in a code span so it is
/// shown verbatim without escaping.
#[must_use]
pub fn render_chat(batch: &NormalizedBatch, session: &ApprovalSession) -> ChatAlert {
    let meeting = &batch.meeting;
    let mut lines = vec![
        "🔥 *TaskForge Approval Required*".to_string(),
        String::new(),
        format!("📋 *Meeting:* {}", escape_markdown(&meeting.title)),
    ];
    if meeting.organizer_resolved {
        lines.push(format!(
            "👤 *Organizer:* {}",
            escape_markdown(&meeting.organizer)
        ));
    }
    lines.extend([
        format!("📊 *Tasks:* {}", batch.len()),
        String::new(),
        format!("👆 [*APPROVE TASKS*]({})", session.approval_url),
        String::new(),
        format!("🆔 Execution: `{}`", session.execution_id),
    ]);

    ChatAlert {
        text: lines.join("\n"),
    }
}
