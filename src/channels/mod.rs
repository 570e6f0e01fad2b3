//! Channel rendering: one normalized batch and session in, three payloads out.
//!
//! Rendering is pure. All three payloads must reference the same
//! `execution_id` and `approval_url`; [`ChannelSet::verify`] enforces that
//! before anything leaves the dispatcher.

pub mod chat;
pub mod email;
pub mod store;

use serde::Serialize;

use crate::core::config::AppConfig;
use crate::core::models::{ApprovalSession, NormalizedBatch};
use crate::errors::HitlError;
use crate::session::execution_id_from_url;

pub use chat::{ChatAlert, render_chat};
pub use email::{EmailNotice, render_email};
pub use store::{StoreRequest, render_store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum ChannelPayload {
    ChatAlert(ChatAlert),
    EmailNotice(EmailNotice),
    StoreRequest(StoreRequest),
}

impl ChannelPayload {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ChannelPayload::ChatAlert(_) => "chat_alert",
            ChannelPayload::EmailNotice(_) => "email_notice",
            ChannelPayload::StoreRequest(_) => "store_request",
        }
    }

    /// Whether this payload references the session's id and link.
    #[must_use]
    pub fn references(&self, session: &ApprovalSession) -> bool {
        match self {
            ChannelPayload::ChatAlert(alert) => {
                alert.text.contains(&session.approval_url)
                    && alert.text.contains(&session.execution_id)
            }
            ChannelPayload::EmailNotice(notice) => {
                notice.html.contains(&email::escape_html(&session.approval_url))
                    && notice.html.contains(&session.execution_id)
            }
            ChannelPayload::StoreRequest(request) => {
                request.execution_id == session.execution_id
                    && request.approval_url == session.approval_url
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    pub chat: ChatAlert,
    pub email: EmailNotice,
    pub store: StoreRequest,
}

impl ChannelSet {
    #[must_use]
    pub fn payloads(&self) -> [ChannelPayload; 3] {
        [
            ChannelPayload::ChatAlert(self.chat.clone()),
            ChannelPayload::EmailNotice(self.email.clone()),
            ChannelPayload::StoreRequest(self.store.clone()),
        ]
    }

    /// Check the cross-channel contract against `session`.
    pub fn verify(&self, session: &ApprovalSession) -> Result<(), HitlError> {
        if execution_id_from_url(&session.approval_url).as_deref()
            != Some(session.execution_id.as_str())
        {
            return Err(HitlError::RenderError(format!(
                "approval URL {} does not reference execution {}",
                session.approval_url, session.execution_id
            )));
        }
        if let Some(stray) = self.payloads().iter().find(|p| !p.references(session)) {
            return Err(HitlError::RenderError(format!(
                "{} payload does not reference execution {}",
                stray.name(),
                session.execution_id
            )));
        }
        Ok(())
    }
}

/// Render all three channel payloads from the same inputs.
pub fn render_channels(
    batch: &NormalizedBatch,
    session: &ApprovalSession,
    config: &AppConfig,
) -> Result<ChannelSet, HitlError> {
    Ok(ChannelSet {
        chat: render_chat(batch, session),
        email: render_email(batch, session, config)?,
        store: render_store(batch, session, config),
    })
}
