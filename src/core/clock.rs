//! Time and randomness sources used for identifiers.
//!
//! Production code uses [`SystemClock`] and [`UuidRandom`]; tests substitute
//! [`FixedClock`] and [`SequenceRandom`] so execution ids are reproducible.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Produces short lowercase alphanumeric suffixes.
pub trait RandomSource: Send + Sync {
    fn suffix(&self, len: usize) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Draws suffix characters from v4 UUIDs (hex digits, so always `[0-9a-f]`).
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRandom;

impl RandomSource for UuidRandom {
    fn suffix(&self, len: usize) -> String {
        let mut out = String::with_capacity(len);
        while out.len() < len {
            let simple = Uuid::new_v4().simple().to_string();
            out.extend(simple.chars().take(len - out.len()));
        }
        out
    }
}

/// Hands out the configured suffixes in order, cycling when exhausted.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<String>,
    next: AtomicUsize,
}

impl SequenceRandom {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn suffix(&self, len: usize) -> String {
        if self.values.is_empty() {
            return "0".repeat(len);
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[idx].chars().take(len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_suffix_has_requested_length_and_charset() {
        let suffix = UuidRandom.suffix(6);
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        // Longer than a single UUID still fills up.
        assert_eq!(UuidRandom.suffix(40).len(), 40);
    }

    #[test]
    fn sequence_random_cycles() {
        let random = SequenceRandom::new(["abc123", "zzz999"]);
        assert_eq!(random.suffix(6), "abc123");
        assert_eq!(random.suffix(6), "zzz999");
        assert_eq!(random.suffix(3), "abc");
    }
}
