//! Current dataset holder.
//!
//! # Design Decisions
//! - One dataset at a time; an upload replaces the previous one
//! - Lock-free reads: handlers load an `Arc<Snapshot>` and keep it for
//!   the whole request
//! - In memory only, nothing is written to disk

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwapOption;
use uuid::Uuid;

use crate::data::dataset::Dataset;
use crate::observability::metrics;
use crate::qc::{Finding, QcEngine};

/// A loaded dataset with its QC findings.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: Uuid,
    /// Upload filename.
    pub source: String,
    /// Seconds since epoch.
    pub loaded_at_secs: u64,
    pub dataset: Dataset,
    pub findings: Vec<Finding>,
}

/// Shared handle to the current snapshot.
#[derive(Clone, Default)]
pub struct DataStore {
    current: Arc<ArcSwapOption<Snapshot>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `dataset` with `engine` and make it current.
    pub fn replace(&self, source: &str, dataset: Dataset, engine: &QcEngine) -> Arc<Snapshot> {
        let findings = engine.run(&dataset);
        let snapshot = Arc::new(Snapshot {
            id: Uuid::new_v4(),
            source: source.to_string(),
            loaded_at_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            dataset,
            findings,
        });

        metrics::record_dataset(snapshot.dataset.len(), snapshot.findings.len());
        tracing::info!(
            id = %snapshot.id,
            source = %snapshot.source,
            records = snapshot.dataset.len(),
            findings = snapshot.findings.len(),
            "Dataset loaded"
        );

        self.current.store(Some(snapshot.clone()));
        snapshot
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Re-run QC on the current dataset, e.g. after the rules changed.
    ///
    /// The result is stored only if the snapshot it was computed from is
    /// still current. A snapshot uploaded meanwhile is never overwritten;
    /// `None` is returned instead.
    pub fn recheck(&self, engine: &QcEngine) -> Option<Arc<Snapshot>> {
        let current = self.current.load_full();
        let base = current.as_ref()?;
        let mut next = (**base).clone();
        next.findings = engine.run(&next.dataset);
        let next = Arc::new(next);

        let previous = self.current.compare_and_swap(&current, Some(next.clone()));
        let swapped = matches!(&*previous, Some(prev) if Arc::ptr_eq(prev, base));
        if !swapped {
            tracing::debug!(id = %next.id, "Dataset replaced during re-check, result dropped");
            return None;
        }

        metrics::record_dataset(next.dataset.len(), next.findings.len());
        tracing::info!(id = %next.id, findings = next.findings.len(), "Dataset re-checked");
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qc::{Check, Rule, Severity};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn dataset() -> Dataset {
        Dataset::from_csv(b"SUBJ_ID,AGE\nS1,30\nS2,50\n").unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = DataStore::new();
        assert!(store.current().is_none());
        assert!(store.recheck(&QcEngine::default()).is_none());
    }

    #[test]
    fn test_replace_runs_qc() {
        let store = DataStore::new();
        let snap = store.replace("visits.csv", dataset(), &QcEngine::default());

        assert_eq!(snap.source, "visits.csv");
        assert_eq!(snap.findings.len(), 1);
        assert_eq!(store.current().unwrap().id, snap.id);
    }

    #[test]
    fn test_recheck_keeps_dataset_identity() {
        let store = DataStore::new();
        let first = store.replace("visits.csv", dataset(), &QcEngine::default());

        let strict = QcEngine::new(vec![Rule {
            id: "AGE-STRICT".into(),
            domain: "subject".into(),
            severity: Severity::High,
            variable: "AGE".into(),
            description: String::new(),
            check: Check::Range { min: 60.0, max: 100.0 },
        }]);
        let second = store.recheck(&strict).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.findings.len(), 2);
        assert_eq!(store.current().unwrap().findings.len(), 2);
    }

    #[test]
    fn test_recheck_never_reverts_a_newer_upload() {
        let store = DataStore::new();
        let engine = QcEngine::default();
        store.replace("upload-0", dataset(), &engine);

        let mut csv = String::from("SUBJ_ID,AGE\n");
        for i in 0..2000 {
            csv.push_str(&format!("S{i},{}\n", 20 + i % 90));
        }
        let big = Dataset::from_csv(csv.as_bytes()).unwrap();

        let stop = AtomicBool::new(false);
        let mut reverted = Vec::new();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    store.recheck(&engine);
                }
            });

            for i in 1..60 {
                let source = format!("upload-{i}");
                store.replace(&source, big.clone(), &engine);
                std::thread::sleep(Duration::from_millis(2));
                let seen = store.current().unwrap().source.clone();
                if seen != source {
                    reverted.push((source, seen));
                }
            }
            stop.store(true, Ordering::Relaxed);
        });

        assert!(reverted.is_empty(), "uploads reverted: {reverted:?}");
    }
}
