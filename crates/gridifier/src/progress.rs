//! Non-blocking progress reporting.
//!
//! Snapshots go through a `tokio::sync::watch` channel: the publisher
//! overwrites the latest value and never waits, with or without subscribers.

use serde::Serialize;
use tokio::sync::watch;

/// Stage of a rasterization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RasterPhase {
    #[default]
    Idle,
    ScanningExtent,
    Binning,
    FillingHoles,
    Done,
}

impl RasterPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ScanningExtent => "scanning_extent",
            Self::Binning => "binning",
            Self::FillingHoles => "filling_holes",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for RasterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latest progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RasterProgress {
    pub phase: RasterPhase,
    /// Zero-based index of the source being read.
    pub source_index: usize,
    pub source_count: usize,
    pub source_name: String,
    /// Vertices seen so far in the current phase, across sources.
    pub vertices: u64,
}

/// Publishing side, owned by the rasterizer.
#[derive(Debug)]
pub struct ProgressReporter {
    tx: watch::Sender<RasterProgress>,
    interval: u64,
}

impl ProgressReporter {
    pub fn new(interval: u64) -> Self {
        let (tx, _rx) = watch::channel(RasterProgress::default());
        Self {
            tx,
            interval: interval.max(1),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RasterProgress> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn current(&self) -> RasterProgress {
        self.tx.borrow().clone()
    }

    /// Start a phase; resets the vertex count.
    pub fn phase(&self, phase: RasterPhase, source_count: usize) {
        self.tx.send_replace(RasterProgress {
            phase,
            source_index: 0,
            source_count,
            source_name: String::new(),
            vertices: 0,
        });
    }

    /// Move to the next source within the current phase.
    pub fn source(&self, index: usize, name: &str) {
        self.tx.send_modify(|p| {
            p.source_index = index;
            p.source_name = name.to_string();
        });
    }

    /// Publish the running vertex count when it crosses an interval boundary.
    #[inline]
    pub fn vertices(&self, total: u64) {
        if total % self.interval == 0 {
            self.tx.send_modify(|p| p.vertices = total);
        }
    }

    /// Publish the exact count, e.g. at the end of a source.
    pub fn flush_vertices(&self, total: u64) {
        self.tx.send_modify(|p| p.vertices = total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let reporter = ProgressReporter::new(10);
        reporter.phase(RasterPhase::Binning, 2);
        reporter.source(1, "b.obj");
        reporter.vertices(20);
        let p = reporter.current();
        assert_eq!(p.phase, RasterPhase::Binning);
        assert_eq!(p.source_index, 1);
        assert_eq!(p.source_name, "b.obj");
        assert_eq!(p.vertices, 20);
    }

    #[test]
    fn test_vertices_throttled_to_interval() {
        let reporter = ProgressReporter::new(100);
        let mut rx = reporter.subscribe();
        reporter.phase(RasterPhase::ScanningExtent, 1);
        rx.borrow_and_update();

        reporter.vertices(99);
        assert!(!rx.has_changed().unwrap());
        reporter.vertices(100);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().vertices, 100);

        reporter.flush_vertices(101);
        assert_eq!(rx.borrow().vertices, 101);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RasterPhase::FillingHoles.to_string(), "filling_holes");
    }
}
