//! Observable diagnostic events for cache degradations.
//!
//! When the cache falls back from the persistent store to a volatile one,
//! it records a structured event here instead of printing a warning. Tests
//! and embedding applications assert on the events rather than scraping
//! message text.

use std::path::PathBuf;
use std::sync::Mutex;

/// A cache degradation worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// The store file exists but failed integrity validation. The file is
    /// left untouched on disk for inspection.
    StoreCorrupted {
        /// Path of the corrupted store file.
        path: PathBuf,
        /// What the validation found.
        reason: String,
    },

    /// The persistent store engine is not available in this build.
    DriverUnavailable {
        /// Name of the missing dependency.
        dependency: String,
    },

    /// The backend misbehaved mid-session and was swapped for a volatile
    /// one.
    BackendFailure {
        /// Description of the malfunction.
        reason: String,
    },
}

/// A thread-safe accumulator for cache events.
///
/// Multiple threads can emit concurrently; readers take a snapshot or
/// drain the sink.
#[derive(Debug, Default)]
pub struct EventSink {
    events: Mutex<Vec<CacheEvent>>,
}

impl EventSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn emit(&self, event: CacheEvent) {
        let mut events = self.events.lock().unwrap();
        events.push(event);
    }

    /// Returns a snapshot of all accumulated events without draining.
    pub fn events(&self) -> Vec<CacheEvent> {
        let events = self.events.lock().unwrap();
        events.clone()
    }

    /// Takes all accumulated events, leaving the sink empty.
    pub fn take_all(&self) -> Vec<CacheEvent> {
        let mut events = self.events.lock().unwrap();
        std::mem::take(&mut *events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sink() {
        let sink = EventSink::new();
        assert!(sink.events().is_empty());
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_and_snapshot() {
        let sink = EventSink::new();
        sink.emit(CacheEvent::DriverUnavailable {
            dependency: "rusqlite".to_string(),
        });
        assert_eq!(sink.events().len(), 1);
        // Snapshot does not drain.
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn take_all_drains() {
        let sink = EventSink::new();
        sink.emit(CacheEvent::BackendFailure {
            reason: "locked".to_string(),
        });
        sink.emit(CacheEvent::StoreCorrupted {
            path: PathBuf::from("/tmp/store"),
            reason: "bad header".to_string(),
        });
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(EventSink::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    sink.emit(CacheEvent::BackendFailure {
                        reason: "race".to_string(),
                    });
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.events().len(), 800);
    }
}
