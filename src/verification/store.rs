//! In memory storage of the codes waiting to be verified.

use super::domain::{ExpiryPolicy, Outcome, VerificationRecord};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

type Records = HashMap<String, VerificationRecord>;

/// Keeps the latest [VerificationRecord] of each recipient. All operations are serialized under a
/// single lock.
#[derive(Debug, Default)]
pub struct VerificationStore {
    records: Mutex<Records>,
}

impl VerificationStore {
    /// Stores the given record, superseding the one of the same recipient, if any. The superseded
    /// record is returned.
    pub fn put(&self, record: VerificationRecord) -> Option<VerificationRecord> {
        self.lock().insert(record.recipient.clone(), record)
    }

    /// Removes every record whose lifetime has elapsed at the given instant, returning how many
    /// there were.
    pub fn sweep_expired(&self, policy: ExpiryPolicy, now: SystemTime) -> usize {
        sweep(&mut self.lock(), policy, now)
    }

    /// Returns a copy of the record of the given recipient, if any, without removing it.
    pub fn find(&self, recipient: &str) -> Option<VerificationRecord> {
        self.lock().get(recipient).cloned()
    }

    /// Sweeps expired records and, if the recipient's record holds the submitted code, removes it.
    /// A mismatch keeps the record in place.
    pub fn consume(
        &self,
        recipient: &str,
        submitted: &str,
        policy: ExpiryPolicy,
        now: SystemTime,
    ) -> Outcome {
        let mut records = self.lock();
        let swept = sweep(&mut records, policy, now);
        if swept > 0 {
            debug!(swept, "expired verification records removed");
        }

        let matches = records
            .get(recipient)
            .map(|record| record.code.matches(submitted))
            .unwrap_or_default();

        if !matches {
            return Outcome::Failure;
        }

        records.remove(recipient);
        Outcome::Success
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sweep(records: &mut Records, policy: ExpiryPolicy, now: SystemTime) -> usize {
    if policy.duration().is_none() {
        return 0;
    }

    let before = records.len();
    records.retain(|_, record| !record.is_expired(policy, now));
    before - records.len()
}

#[cfg(test)]
mod tests {
    use super::VerificationStore;
    use crate::verification::domain::{Code, ExpiryPolicy, Outcome, VerificationRecord};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, SystemTime};

    fn record(recipient: &str, code: &str, issued_at: SystemTime) -> VerificationRecord {
        VerificationRecord::new(recipient, Code::from(code), issued_at)
    }

    #[test]
    fn put_supersedes_previous_record() {
        let now = SystemTime::now();
        let store = VerificationStore::default();

        assert!(store.put(record("a@x.com", "111111", now)).is_none());
        let superseded = store.put(record("a@x.com", "222222", now)).unwrap();
        assert_eq!(superseded.code.as_ref(), "111111");
        assert_eq!(store.len(), 1);

        let policy = ExpiryPolicy::FifteenMinutes;
        assert_eq!(
            store.consume("a@x.com", "111111", policy, now),
            Outcome::Failure
        );
        assert_eq!(
            store.consume("a@x.com", "222222", policy, now),
            Outcome::Success
        );
    }

    #[test]
    fn find_does_not_remove() {
        let now = SystemTime::now();
        let store = VerificationStore::default();
        store.put(record("a@x.com", "482913", now));

        assert!(store.find("a@x.com").is_some());
        assert!(store.find("a@x.com").is_some());
        assert!(store.find("b@x.com").is_none());
    }

    #[test]
    fn sweep_expired_records() {
        struct Test<'a> {
            name: &'a str,
            policy: ExpiryPolicy,
            elapsed: Duration,
            swept: usize,
        }

        vec![
            Test {
                name: "five minutes policy before deadline",
                policy: ExpiryPolicy::FiveMinutes,
                elapsed: Duration::from_secs(4 * 60 + 59),
                swept: 0,
            },
            Test {
                name: "five minutes policy on deadline",
                policy: ExpiryPolicy::FiveMinutes,
                elapsed: Duration::from_secs(5 * 60),
                swept: 2,
            },
            Test {
                name: "thirty minutes policy after deadline",
                policy: ExpiryPolicy::ThirtyMinutes,
                elapsed: Duration::from_secs(31 * 60),
                swept: 2,
            },
            Test {
                name: "never expire policy",
                policy: ExpiryPolicy::Never,
                elapsed: Duration::from_secs(365 * 24 * 60 * 60),
                swept: 0,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let issued_at = SystemTime::now();
            let store = VerificationStore::default();
            store.put(record("a@x.com", "111111", issued_at));
            store.put(record("b@x.com", "222222", issued_at));

            let swept = store.sweep_expired(test.policy, issued_at + test.elapsed);
            assert_eq!(swept, test.swept, "{}", test.name);
            assert_eq!(store.len(), 2 - test.swept, "{}", test.name);
        })
    }

    #[test]
    fn consume_sweeps_other_recipients() {
        let issued_at = SystemTime::now();
        let store = VerificationStore::default();
        store.put(record("a@x.com", "111111", issued_at));
        store.put(record(
            "b@x.com",
            "222222",
            issued_at + Duration::from_secs(4 * 60),
        ));

        let now = issued_at + Duration::from_secs(5 * 60);
        let outcome = store.consume("c@x.com", "333333", ExpiryPolicy::FiveMinutes, now);

        assert_eq!(outcome, Outcome::Failure);
        assert!(store.find("a@x.com").is_none());
        assert!(store.find("b@x.com").is_some());
    }

    #[test]
    fn consume_on_five_minutes_boundary() {
        struct Test<'a> {
            name: &'a str,
            elapsed: Duration,
            outcome: Outcome,
        }

        vec![
            Test {
                name: "one second before deadline",
                elapsed: Duration::from_secs(4 * 60 + 59),
                outcome: Outcome::Success,
            },
            Test {
                name: "on deadline",
                elapsed: Duration::from_secs(5 * 60),
                outcome: Outcome::Failure,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let issued_at = SystemTime::now();
            let store = VerificationStore::default();
            store.put(record("a@x.com", "482913", issued_at));

            let outcome = store.consume(
                "a@x.com",
                "482913",
                ExpiryPolicy::FiveMinutes,
                issued_at + test.elapsed,
            );

            assert_eq!(outcome, test.outcome, "{}", test.name);
        })
    }

    #[test]
    fn wrong_code_keeps_record() {
        let now = SystemTime::now();
        let store = VerificationStore::default();
        store.put(record("a@x.com", "aBcDeF", now));

        let policy = ExpiryPolicy::Never;
        assert_eq!(
            store.consume("a@x.com", "abcdef", policy, now),
            Outcome::Failure
        );
        assert_eq!(
            store.consume("a@x.com", "000000", policy, now),
            Outcome::Failure
        );
        assert_eq!(
            store.consume("a@x.com", "aBcDeF", policy, now),
            Outcome::Success
        );
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_consume_succeeds_once() {
        let now = SystemTime::now();
        let store = Arc::new(VerificationStore::default());
        store.put(record("a@x.com", "482913", now));

        let successes = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || store.consume("a@x.com", "482913", ExpiryPolicy::Never, now))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(Outcome::is_success)
            .count();

        assert_eq!(successes, 1);
    }
}
