//! Approval session: one execution id and one approval link per batch.
//!
//! The link carries only the execution id. The approval UI fetches the task
//! data from the remote store by that id, so every channel shares one short URL.

use chrono::SecondsFormat;
use tracing::info;
use url::Url;

use crate::core::clock::{Clock, RandomSource};
use crate::core::config::AppConfig;
use crate::core::models::ApprovalSession;

pub const EXECUTION_ID_PREFIX: &str = "exec_";
pub const EXECUTION_SUFFIX_LEN: usize = 6;
pub const EXEC_ID_PARAM: &str = "exec_id";

/// `exec_<epoch-millis>_<suffix>`.
#[must_use]
pub fn new_execution_id(clock: &dyn Clock, random: &dyn RandomSource) -> String {
    format!(
        "{}{}_{}",
        EXECUTION_ID_PREFIX,
        clock.now().timestamp_millis(),
        random.suffix(EXECUTION_SUFFIX_LEN)
    )
}

/// `<base>?exec_id=<execution_id>`.
#[must_use]
pub fn approval_url(base_url: &str, execution_id: &str) -> String {
    format!(
        "{}?{}={}",
        base_url,
        EXEC_ID_PARAM,
        urlencoding::encode(execution_id)
    )
}

/// Read the execution id back out of an approval link.
#[must_use]
pub fn execution_id_from_url(approval_url: &str) -> Option<String> {
    let url = Url::parse(approval_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == EXEC_ID_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[must_use]
pub fn build_session(
    meeting_title: &str,
    config: &AppConfig,
    clock: &dyn Clock,
    random: &dyn RandomSource,
) -> ApprovalSession {
    let execution_id = new_execution_id(clock, random);
    let approval_url = approval_url(&config.approval_base_url, &execution_id);

    info!("Execution ID: {}", execution_id);
    info!("Approval URL: {}", approval_url);

    ApprovalSession {
        execution_id,
        approval_url,
        meeting_title: meeting_title.to_string(),
        created_at: clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_round_trips_execution_id() {
        let url = approval_url("https://approve.example.com", "exec_1700000000000_ab12cd");
        assert_eq!(url, "https://approve.example.com?exec_id=exec_1700000000000_ab12cd");
        assert_eq!(
            execution_id_from_url(&url).as_deref(),
            Some("exec_1700000000000_ab12cd")
        );
    }

    #[test]
    fn execution_id_from_url_without_param() {
        assert_eq!(execution_id_from_url("https://approve.example.com"), None);
        assert_eq!(execution_id_from_url("not a url"), None);
    }
}
