use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Things the breaker counts while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakEvent {
    LegalBreak,
    NodeCreated,
    NodeDeactivated,
    Restart,
    FootnoteSplit,
    FootnotePage,
}

impl BreakEvent {
    const ALL: [BreakEvent; 6] = [
        BreakEvent::LegalBreak,
        BreakEvent::NodeCreated,
        BreakEvent::NodeDeactivated,
        BreakEvent::Restart,
        BreakEvent::FootnoteSplit,
        BreakEvent::FootnotePage,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            BreakEvent::LegalBreak => "legal breaks",
            BreakEvent::NodeCreated => "nodes created",
            BreakEvent::NodeDeactivated => "nodes deactivated",
            BreakEvent::Restart => "restarts",
            BreakEvent::FootnoteSplit => "footnote splits",
            BreakEvent::FootnotePage => "footnote-only pages",
        }
    }
}

/// Trait for measuring breaker performance.
///
/// The breaker holds a `&dyn Profiler`; the default [`NoOpProfiler`] compiles
/// down to nothing.
pub trait Profiler: Send + Sync {
    fn record(&self, key: &str, duration: Duration);
    fn count(&self, event: BreakEvent);
    fn reset(&self);
}

/// A no-op profiler for production use.
pub struct NoOpProfiler;

/// Shared instance used when no profiler is configured.
pub static NOOP_PROFILER: NoOpProfiler = NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _key: &str, _duration: Duration) {}
    #[inline(always)]
    fn count(&self, _event: BreakEvent) {}
    #[inline(always)]
    fn reset(&self) {}
}

/// Collects timings and counters, and logs them on request.
pub struct DebugProfiler {
    stats: Mutex<HashMap<String, Duration>>,
    counters: [AtomicUsize; 6],
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(HashMap::new()),
            counters: std::array::from_fn(|_| AtomicUsize::new(0)),
        }
    }

    pub fn count_of(&self, event: BreakEvent) -> usize {
        self.counters[event.slot()].load(Ordering::Acquire)
    }

    pub fn duration_of(&self, key: &str) -> Option<Duration> {
        self.stats.lock().ok()?.get(key).copied()
    }

    pub fn log_summary(&self, sequence_id: usize) {
        if self.count_of(BreakEvent::LegalBreak) == 0 {
            return;
        }

        log::info!("=== Break Profile Summary (ID: {}) ===", sequence_id);
        for event in BreakEvent::ALL {
            log::info!("{}: {}", event.label(), self.count_of(event));
        }

        if let Ok(stats) = self.stats.lock() {
            for (k, v) in stats.iter() {
                log::info!("{}: {:?}", k, v);
            }
        }
    }
}

impl Default for DebugProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, key: &str, duration: Duration) {
        if let Ok(mut g) = self.stats.lock() {
            *g.entry(key.to_string()).or_default() += duration;
        }
    }

    fn count(&self, event: BreakEvent) {
        self.counters[event.slot()].fetch_add(1, Ordering::Release);
    }

    fn reset(&self) {
        if let Ok(mut g) = self.stats.lock() {
            g.clear();
        }
        for counter in &self.counters {
            counter.store(0, Ordering::Release);
        }
    }
}
