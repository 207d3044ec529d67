//! Unhandled-marker collector shared by every book in a batch.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

/// Set of marker texts the engine could not translate.
///
/// Safe to share between worker threads; insertion order is irrelevant
/// because [`snapshot`](Self::snapshot) is sorted.
#[derive(Debug, Default)]
pub struct UnhandledTags {
    tags: Mutex<BTreeSet<String>>,
}

impl UnhandledTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a marker as written (`\zzz`, `\q9`).
    pub fn record(&self, marker: impl Into<String>) {
        self.lock().insert(marker.into());
    }

    /// Unique recorded markers, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        // Inserts are atomic, so a poisoned set is still consistent.
        self.tags.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_semantics() {
        let tags = UnhandledTags::new();
        tags.record("\\zzz");
        tags.record("\\zzz");
        tags.record("\\aaa");
        assert_eq!(tags.snapshot(), vec!["\\aaa", "\\zzz"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_concurrent_record() {
        let tags = Arc::new(UnhandledTags::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tags = Arc::clone(&tags);
                thread::spawn(move || {
                    for j in 0..50 {
                        tags.record(format!("\\t{}", (i * 50 + j) % 60));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tags.len(), 60);
        let snapshot = tags.snapshot();
        assert!(snapshot.windows(2).all(|w| w[0] < w[1]));
    }
}
