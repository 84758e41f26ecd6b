//! Draft persistence and `.schedule` files. Drafts autosave through a
//! debounce so rapid edits coalesce into one write; loading always funnels
//! through [`crate::normalize`] so corrupted or old payloads come back as a
//! usable document instead of an error.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::{
    error::{SlateError, SlateResult},
    model::ScheduleDocument,
};

/// Delay between the last edit and the draft write.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(700);

/// Where drafts live. Keyed by document id; payloads are JSON strings.
pub trait DraftStore {
    fn load(&self, id: &str) -> SlateResult<Option<String>>;
    fn save(&mut self, id: &str, json: &str) -> SlateResult<()>;
    fn remove(&mut self, id: &str) -> SlateResult<()>;
}

/// Drafts as files under one directory, `<dir>/<id>.schedule.json`.
#[derive(Clone, Debug)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.schedule.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, id: &str) -> SlateResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(id)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlateError::persist(format!("read draft '{id}': {e}"))),
        }
    }

    fn save(&mut self, id: &str, json: &str) -> SlateResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SlateError::persist(format!("create '{}': {e}", self.dir.display())))?;
        std::fs::write(self.path_for(id), json)
            .map_err(|e| SlateError::persist(format!("write draft '{id}': {e}")))
    }

    fn remove(&mut self, id: &str) -> SlateResult<()> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlateError::persist(format!("remove draft '{id}': {e}"))),
        }
    }
}

fn parse_normalized(json: &str) -> SlateResult<ScheduleDocument> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| SlateError::serde(format!("parse document: {e}")))?;
    Ok(crate::normalize::normalize(&value))
}

/// Loads the working document: a remote payload wins over the local draft,
/// and an unreadable payload at either level falls through to the next
/// instead of failing the load.
pub fn load_document(
    remote_json: Option<&str>,
    store: &dyn DraftStore,
    id: &str,
) -> ScheduleDocument {
    if let Some(json) = remote_json {
        match parse_normalized(json) {
            Ok(doc) => return doc,
            Err(err) => warn!(id, %err, "remote document unreadable, trying local draft"),
        }
    }
    match store.load(id) {
        Ok(Some(json)) => match parse_normalized(&json) {
            Ok(doc) => return doc,
            Err(err) => warn!(id, %err, "local draft unreadable, starting fresh"),
        },
        Ok(None) => {}
        Err(err) => warn!(id, %err, "draft store unavailable, starting fresh"),
    }
    ScheduleDocument::default()
}

/// Writes a document as a pretty-printed `.schedule` file.
pub fn save_schedule_file(doc: &ScheduleDocument, path: &Path) -> SlateResult<()> {
    doc.validate()?;
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| SlateError::serde(format!("serialize document: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| SlateError::persist(format!("write '{}': {e}", path.display())))
}

/// Reads a `.schedule` file, normalizing whatever shape is inside.
pub fn load_schedule_file(path: &Path) -> SlateResult<ScheduleDocument> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| SlateError::persist(format!("read '{}': {e}", path.display())))?;
    parse_normalized(&json)
}

/// Deadline tracker for coalescing writes. `mark` restarts the countdown;
/// `due` fires at most once per mark.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Debounced draft autosave. Watches the editor revision, serializes once
/// the debounce lapses, and skips the write when nothing changed since the
/// last persisted payload. A failed write is retried on the next deadline.
#[derive(Debug)]
pub struct Autosave {
    id: String,
    debounce: Debouncer,
    last_seen_revision: u64,
    last_persisted_json: Option<String>,
}

impl Autosave {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            debounce: Debouncer::new(AUTOSAVE_DELAY),
            last_seen_revision: 0,
            last_persisted_json: None,
        }
    }

    /// Called whenever the editor reports a revision; a new revision arms
    /// the debounce.
    pub fn note_revision(&mut self, revision: u64, now: Instant) {
        if revision != self.last_seen_revision {
            self.last_seen_revision = revision;
            self.debounce.mark(now);
        }
    }

    /// Runs a pending save if its deadline passed. Returns whether a write
    /// happened; write failures are logged and re-armed rather than
    /// surfaced, so an unavailable store never breaks editing.
    pub fn tick(
        &mut self,
        doc: &ScheduleDocument,
        store: &mut dyn DraftStore,
        now: Instant,
    ) -> bool {
        if !self.debounce.due(now) {
            return false;
        }
        self.write(doc, store, now)
    }

    /// Immediate save, for shutdown paths. Ignores the debounce.
    pub fn flush(&mut self, doc: &ScheduleDocument, store: &mut dyn DraftStore, now: Instant) -> bool {
        self.debounce.deadline = None;
        self.write(doc, store, now)
    }

    fn write(&mut self, doc: &ScheduleDocument, store: &mut dyn DraftStore, now: Instant) -> bool {
        let json = match serde_json::to_string(doc) {
            Ok(json) => json,
            Err(err) => {
                warn!(id = %self.id, %err, "draft serialization failed");
                return false;
            }
        };
        if self.last_persisted_json.as_deref() == Some(json.as_str()) {
            return false;
        }
        match store.save(&self.id, &json) {
            Ok(()) => {
                self.last_persisted_json = Some(json);
                true
            }
            Err(err) => {
                warn!(id = %self.id, %err, "draft save failed, will retry");
                self.debounce.mark(now);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        entries: HashMap<String, String>,
        writes: usize,
        fail_next: bool,
    }

    impl DraftStore for MemoryStore {
        fn load(&self, id: &str) -> SlateResult<Option<String>> {
            Ok(self.entries.get(id).cloned())
        }

        fn save(&mut self, id: &str, json: &str) -> SlateResult<()> {
            if self.fail_next {
                self.fail_next = false;
                return Err(SlateError::persist("store offline"));
            }
            self.writes += 1;
            self.entries.insert(id.to_string(), json.to_string());
            Ok(())
        }

        fn remove(&mut self, id: &str) -> SlateResult<()> {
            self.entries.remove(id);
            Ok(())
        }
    }

    #[test]
    fn debouncer_fires_once_after_the_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(700));
        assert!(!d.due(start));

        d.mark(start);
        assert!(!d.due(start + Duration::from_millis(699)));
        assert!(d.due(start + Duration::from_millis(700)));
        assert!(!d.due(start + Duration::from_millis(701)));
    }

    #[test]
    fn marking_again_pushes_the_deadline_out() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(700));
        d.mark(start);
        d.mark(start + Duration::from_millis(500));
        assert!(!d.due(start + Duration::from_millis(700)));
        assert!(d.due(start + Duration::from_millis(1200)));
    }

    #[test]
    fn autosave_skips_unchanged_payloads() {
        let start = Instant::now();
        let doc = ScheduleDocument::default();
        let mut store = MemoryStore::default();
        let mut autosave = Autosave::new("draft");

        autosave.note_revision(1, start);
        assert!(autosave.tick(&doc, &mut store, start + Duration::from_secs(1)));
        assert_eq!(store.writes, 1);

        // A new revision with the same serialized document writes nothing.
        autosave.note_revision(2, start + Duration::from_secs(2));
        assert!(!autosave.tick(&doc, &mut store, start + Duration::from_secs(3)));
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn autosave_retries_after_a_failed_write() {
        let start = Instant::now();
        let doc = ScheduleDocument::default();
        let mut store = MemoryStore {
            fail_next: true,
            ..MemoryStore::default()
        };
        let mut autosave = Autosave::new("draft");

        autosave.note_revision(1, start);
        assert!(!autosave.tick(&doc, &mut store, start + Duration::from_secs(1)));
        assert_eq!(store.writes, 0);

        // The failure re-armed the debounce; the next deadline succeeds.
        assert!(autosave.tick(&doc, &mut store, start + Duration::from_secs(2)));
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn load_prefers_remote_and_falls_back_on_garbage() {
        let mut store = MemoryStore::default();
        let mut local = ScheduleDocument::default();
        local.schedule_name = "Local".into();
        store
            .save("draft", &serde_json::to_string(&local).unwrap())
            .unwrap();

        let mut remote = ScheduleDocument::default();
        remote.schedule_name = "Remote".into();
        let remote_json = serde_json::to_string(&remote).unwrap();

        let doc = load_document(Some(&remote_json), &store, "draft");
        assert_eq!(doc.schedule_name, "Remote");

        let doc = load_document(Some("{not json"), &store, "draft");
        assert_eq!(doc.schedule_name, "Local");

        let doc = load_document(None, &MemoryStore::default(), "draft");
        assert_eq!(doc.schedule_name, ScheduleDocument::default().schedule_name);
    }

    #[test]
    fn schedule_files_round_trip_through_normalize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week.schedule");
        let mut doc = ScheduleDocument::default();
        doc.schedule_name = "Round Trip".into();

        save_schedule_file(&doc, &path).unwrap();
        let loaded = load_schedule_file(&path).unwrap();
        assert_eq!(loaded.schedule_name, "Round Trip");
        assert_eq!(loaded, doc);
    }

    #[test]
    fn file_store_returns_none_for_missing_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileDraftStore::new(dir.path());
        assert_eq!(store.load("nope").unwrap(), None);

        store.save("d1", "{}").unwrap();
        assert_eq!(store.load("d1").unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("d1.schedule.json").exists());

        store.remove("d1").unwrap();
        store.remove("d1").unwrap();
        assert_eq!(store.load("d1").unwrap(), None);
    }
}
