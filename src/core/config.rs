use std::env;

use chrono_tz::Tz;
use url::Url;

use crate::errors::HitlError;

pub const DEFAULT_APPROVAL_BASE_URL: &str = "https://web-production-c8f1d.up.railway.app";
pub const DEFAULT_SOURCE_TAG: &str = "TaskForge_HITL_HTTP";
pub const DEFAULT_EMAIL_PREVIEW_LIMIT: usize = 3;
/// Upper bound on tasks listed verbatim in the email preview.
pub const MAX_EMAIL_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Approval UI endpoint; the execution id is appended as `?exec_id=`.
    pub approval_base_url: String,
    pub source_tag: String,
    pub display_timezone: Tz,
    pub email_preview_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            approval_base_url: DEFAULT_APPROVAL_BASE_URL.to_string(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
            display_timezone: Tz::UTC,
            email_preview_limit: DEFAULT_EMAIL_PREVIEW_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, HitlError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HitlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let approval_base_url = match get("HITL_APPROVAL_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => defaults.approval_base_url,
        };

        let display_timezone = match get("HITL_DISPLAY_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| HitlError::ConfigError(format!("HITL_DISPLAY_TIMEZONE: {}", e)))?,
            None => defaults.display_timezone,
        };

        let email_preview_limit = match get("HITL_EMAIL_PREVIEW_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| HitlError::ConfigError(format!("HITL_EMAIL_PREVIEW_LIMIT: {}", e)))
                .and_then(|limit| {
                    if limit > MAX_EMAIL_PREVIEW_LIMIT {
                        Err(HitlError::ConfigError(format!(
                            "HITL_EMAIL_PREVIEW_LIMIT must be at most {}, got {}",
                            MAX_EMAIL_PREVIEW_LIMIT, limit
                        )))
                    } else {
                        Ok(limit)
                    }
                })?,
            None => defaults.email_preview_limit,
        };

        Ok(Self {
            approval_base_url,
            source_tag: get("HITL_SOURCE_TAG")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.source_tag),
            display_timezone,
            email_preview_limit,
        })
    }
}

/// Check the base endpoint is an absolute http(s) URL without a query, and
/// strip any trailing slash so links read `<base>?exec_id=...`.
fn validate_base_url(raw: &str) -> Result<String, HitlError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HitlError::ConfigError(format!(
            "HITL_APPROVAL_BASE_URL must be http(s), got {}",
            parsed.scheme()
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(HitlError::ConfigError(
            "HITL_APPROVAL_BASE_URL must not carry a query or fragment".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
