//! TaskForge HITL - turns a batch of meeting action items into one approval session.
//!
//! A batch of loosely-typed task records is normalized, assigned a single
//! execution id and approval link, and rendered into three payloads:
//! 1. A Telegram alert (legacy Markdown text)
//! 2. An email notice (subject, HTML body, plain-text alternative)
//! 3. A JSON request body for the remote approval store
//!
//! All three carry the same `execution_id` and `approval_url`. Transmission,
//! persistence and the approval UI belong to downstream senders.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use taskforge_hitl::core::{AppConfig, FixedClock, SequenceRandom};
//! use taskforge_hitl::dispatch::{DispatchOutcome, Dispatcher};
//!
//! let dispatcher = Dispatcher::new(AppConfig::default())
//!     .with_clock(FixedClock(Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap()))
//!     .with_random(SequenceRandom::new(["k3x9q2"]));
//!
//! let outcome = dispatcher.dispatch_value(json!([
//!     { "task_item": "Draft report", "assignee": "A" },
//!     { "task_item": "Review report", "assignee": "B" },
//! ]));
//!
//! match outcome {
//!     DispatchOutcome::Ready(dispatch) => {
//!         assert_eq!(dispatch.session.execution_id, "exec_1741338000000_k3x9q2");
//!         assert_eq!(dispatch.total_tasks(), 2);
//!     }
//!     other => panic!("unexpected outcome: {:?}", other.status()),
//! }
//! ```

// Module declarations
pub mod channels;
pub mod core;
pub mod dispatch;
pub mod errors;
pub mod normalize;
pub mod session;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use errors::HitlError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. Safe to call more than once; later calls leave the first subscriber
/// in place.
///
/// # Example
///
/// ```
/// taskforge_hitl::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
