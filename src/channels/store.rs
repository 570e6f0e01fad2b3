//! Request body for the remote approval store, upserted by `execution_id`.

use serde::{Deserialize, Serialize};

use crate::core::config::AppConfig;
use crate::core::models::{ApprovalSession, NormalizedBatch, NormalizedTask};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRequest {
    pub execution_id: String,
    pub approval_url: String,
    pub tasks: Vec<NormalizedTask>,
    pub meeting_title: String,
    pub meeting_organizer: String,
    pub meeting_date: String,
    pub created_at: String,
    pub total_tasks: usize,
    #[serde(rename = "source")]
    pub source_tag: String,
}

#[must_use]
pub fn render_store(
    batch: &NormalizedBatch,
    session: &ApprovalSession,
    config: &AppConfig,
) -> StoreRequest {
    StoreRequest {
        execution_id: session.execution_id.clone(),
        approval_url: session.approval_url.clone(),
        tasks: batch.tasks.clone(),
        meeting_title: batch.meeting.title.clone(),
        meeting_organizer: batch.meeting.organizer.clone(),
        meeting_date: batch.meeting.date.clone(),
        created_at: session.created_at.clone(),
        total_tasks: batch.len(),
        source_tag: config.source_tag.clone(),
    }
}
