use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh record identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Decimal ids from an atomic counter.
///
/// Seeded with the startup time in milliseconds so ids look like the
/// timestamps older clients are used to, but two creations in the same
/// millisecond still get distinct values.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    pub fn from_clock() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Self::new(u64::try_from(millis).unwrap_or_default())
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn sequential_ids_increase_by_one() {
        let ids = SequentialIds::new(41);
        assert_eq!(ids.next_id(), "41");
        assert_eq!(ids.next_id(), "42");
    }

    #[test]
    fn sequential_ids_never_repeat_across_threads() {
        let ids = Arc::new(SequentialIds::from_clock());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn random_ids_are_uuids() {
        let id = RandomIds.next_id();
        assert!(Uuid::parse_str(&id).is_ok(), "not a uuid: {}", id);
        assert_ne!(id, RandomIds.next_id());
    }
}
