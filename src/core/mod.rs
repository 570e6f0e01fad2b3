//! Configuration, data model and identifier sources shared by every stage.

pub mod clock;
pub mod config;
pub mod models;

pub use clock::{Clock, FixedClock, RandomSource, SequenceRandom, SystemClock, UuidRandom};
pub use config::AppConfig;
pub use models::{ApprovalSession, MeetingDate, MeetingInfo, NormalizedBatch, NormalizedTask, RawItem};
