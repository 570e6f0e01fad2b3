//! Email notification: subject line, HTML body and a plain-text alternative.

use serde::{Deserialize, Serialize};

use crate::core::config::{AppConfig, MAX_EMAIL_PREVIEW_LIMIT};
use crate::core::models::{ApprovalSession, NormalizedBatch, NormalizedTask};
use crate::errors::HitlError;

/// Wrap width for the plain-text alternative body.
const TEXT_WIDTH: usize = 80;
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailNotice {
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[must_use]
pub fn render_subject(task_count: usize, meeting_title: &str) -> String {
    let noun = if task_count == 1 { "Item" } else { "Items" };
    format!(
        "🔥 TaskForge: {} Action {} from \"{}\"",
        task_count, noun, meeting_title
    )
}

/// Preview list items: the first `limit` tasks (never more than three), then
/// an "and N more" line.
#[must_use]
pub fn render_preview(tasks: &[NormalizedTask], limit: usize) -> String {
    let limit = limit.min(MAX_EMAIL_PREVIEW_LIMIT);
    let mut items: Vec<String> = tasks
        .iter()
        .take(limit)
        .map(|task| {
            format!(
                "<li style=\"margin-bottom: 8px; color: #6c757d;\"><strong>{}</strong> <span style=\"color: #adb5bd;\">→ {}</span></li>",
                escape_html(&task.task_item),
                escape_html(&task.assignee_names)
            )
        })
        .collect();

    if tasks.len() > limit {
        items.push(format!(
            "<li style=\"color: #adb5bd; font-style: italic;\">... and {} more tasks</li>",
            tasks.len() - limit
        ));
    }
    items.join("\n            ")
}

pub fn render_email(
    batch: &NormalizedBatch,
    session: &ApprovalSession,
    config: &AppConfig,
) -> Result<EmailNotice, HitlError> {
    let meeting = &batch.meeting;
    let display_date = meeting
        .parsed_date
        .display_day(config.display_timezone)
        .format(DISPLAY_DATE_FORMAT)
        .to_string();
    let approval_url = escape_html(&session.approval_url);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>TaskForge Approval Required</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; border-radius: 10px; text-align: center; margin-bottom: 30px;">
        <h1 style="color: white; margin: 0; font-size: 28px;">🔥 TaskForge Approval Required</h1>
    </div>
    <div style="background: #f8f9fa; padding: 25px; border-radius: 8px; margin-bottom: 25px;">
        <h2 style="color: #495057; margin-top: 0; font-size: 20px;">📋 Meeting Details</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <tr><td style="padding: 8px 0; font-weight: bold; color: #6c757d;">Meeting:</td><td style="padding: 8px 0;">{title}</td></tr>
            <tr><td style="padding: 8px 0; font-weight: bold; color: #6c757d;">Organizer:</td><td style="padding: 8px 0;">{organizer}</td></tr>
            <tr><td style="padding: 8px 0; font-weight: bold; color: #6c757d;">Date:</td><td style="padding: 8px 0;">{date}</td></tr>
            <tr><td style="padding: 8px 0; font-weight: bold; color: #6c757d;">Tasks:</td><td style="padding: 8px 0;">{count} action items</td></tr>
            <tr><td style="padding: 8px 0; font-weight: bold; color: #6c757d;">Execution ID:</td><td style="padding: 8px 0; font-family: monospace; font-size: 12px;">{execution_id}</td></tr>
        </table>
    </div>
    <div style="text-align: center; margin: 40px 0;">
        <a href="{approval_url}" style="background: #28a745; color: white; padding: 15px 30px; text-decoration: none; border-radius: 25px; font-size: 18px; font-weight: bold; display: inline-block;">✅ APPROVE TASKS</a>
    </div>
    <div style="background: #e9ecef; padding: 20px; border-radius: 8px; margin-top: 30px;">
        <h3 style="color: #495057; margin-top: 0; font-size: 16px;">📝 Task Preview</h3>
        <ul style="margin: 0; padding-left: 20px;">
            {preview}
        </ul>
    </div>
    <div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #dee2e6; color: #6c757d; font-size: 12px;">
        <p style="margin: 0;">This email was sent automatically by TaskForge</p>
        <p style="margin: 5px 0 0 0;">Click the button above to review and approve tasks</p>
    </div>
</body>
</html>"#,
        title = escape_html(&meeting.title),
        organizer = escape_html(&meeting.organizer),
        date = escape_html(&display_date),
        count = batch.len(),
        execution_id = escape_html(&session.execution_id),
        approval_url = approval_url,
        preview = render_preview(&batch.tasks, config.email_preview_limit),
    );

    let text = html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .map_err(|e| HitlError::RenderError(format!("plain-text email body: {}", e)))?;

    Ok(EmailNotice {
        subject: render_subject(batch.len(), &meeting.title),
        html,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"R&D"</b> isn't"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; isn&#39;t"
        );
    }

    #[test]
    fn subject_uses_singular_for_one_task() {
        assert_eq!(
            render_subject(1, "Standup"),
            "🔥 TaskForge: 1 Action Item from \"Standup\""
        );
        assert_eq!(
            render_subject(4, "Standup"),
            "🔥 TaskForge: 4 Action Items from \"Standup\""
        );
    }
}
