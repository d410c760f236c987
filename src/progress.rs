//! Indexing progress reporting.
//!
//! Reports one event per document while the corpus is indexed, plus a
//! final summary. Progress is emitted on **stderr** so stdout stays
//! reserved for search results.

use std::io::Write;

/// A single progress event.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexProgressEvent {
    /// About to embed and upsert document `n` of `total` (1-based).
    Indexing {
        index: String,
        n: usize,
        total: usize,
        id: String,
        title: String,
    },
    /// Every document has been upserted.
    Done { index: String, total: usize },
}

/// Receives progress events from the indexing loop.
pub trait IndexProgressReporter: Send + Sync {
    fn report(&self, event: IndexProgressEvent);
}

/// Human-friendly progress on stderr: `index recipes  [2/6] tomato-soup "Tomato Soup"`.
pub struct StderrProgress;

impl IndexProgressReporter for StderrProgress {
    fn report(&self, event: IndexProgressEvent) {
        let line = match &event {
            IndexProgressEvent::Indexing {
                index,
                n,
                total,
                id,
                title,
            } => format!("index {}  [{}/{}] {} \"{}\"\n", index, n, total, id, title),
            IndexProgressEvent::Done { index, total } => {
                format!("index {}  done, {} documents upserted\n", index, total)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IndexProgressReporter for JsonProgress {
    fn report(&self, event: IndexProgressEvent) {
        let obj = match &event {
            IndexProgressEvent::Indexing {
                index,
                n,
                total,
                id,
                title,
            } => serde_json::json!({
                "event": "progress",
                "index": index,
                "phase": "indexing",
                "n": n,
                "total": total,
                "id": id,
                "title": title
            }),
            IndexProgressEvent::Done { index, total } => serde_json::json!({
                "event": "progress",
                "index": index,
                "phase": "done",
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IndexProgressReporter for NoProgress {
    fn report(&self, _event: IndexProgressEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    #[default]
    Human,
    Json,
}

impl ProgressMode {
    pub fn reporter(&self) -> Box<dyn IndexProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
