use std::time::{Duration, Instant};

use serde_json::json;
use weekslate::{
    Editor, ScheduleDocument,
    editor::InsertPosition,
    normalize::normalize,
    persist::{Autosave, DraftStore, FileDraftStore, load_document, load_schedule_file, save_schedule_file},
};

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn mangled_payload_becomes_an_editable_document() {
    init_logs();
    // Shapes drafts actually come back in: legacy keys, wrong types,
    // duplicate ids, too many days.
    let payload = json!({
        "scheduleName": "Chaos Week",
        "exportSizeId": "laserdisc",
        "days": (0..9).map(|_| json!({
            "id": "day-1",
            "day": "Monday",
            "streams": [{ "times": [{ "zoneId": "nowhere" }] }]
        })).collect::<Vec<_>>()
    });

    let doc = normalize(&payload);
    assert!(doc.validate().is_ok());
    assert_eq!(doc.schedule_name, "Chaos Week");
    assert_eq!(doc.days.len(), weekslate::model::MAX_DAYS);

    let mut editor = Editor::new(doc);
    let before = editor.revision();
    assert!(!editor.can_add_day());
    assert!(editor.add_day(InsertPosition::Bottom).is_none());
    assert_eq!(editor.revision(), before);

    let first_id = editor.document().days[0].id.clone();
    assert!(editor.remove_day(&first_id));
    assert!(editor.revision() > before);
    assert!(editor.can_add_day());
    assert!(editor.add_day(InsertPosition::Bottom).is_some());
    assert!(editor.document().validate().is_ok());
}

#[test]
fn edits_autosave_and_reload_through_the_draft_store() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileDraftStore::new(dir.path());
    let mut autosave = Autosave::new("working");
    let start = Instant::now();

    let mut editor = Editor::new(ScheduleDocument::default());
    editor.add_day(InsertPosition::Bottom);
    editor.update_document(|doc| doc.schedule_name = "Autosaved Week".into());

    // Before the debounce lapses nothing is on disk.
    autosave.note_revision(editor.revision(), start);
    assert!(!autosave.tick(
        editor.document(),
        &mut store,
        start + Duration::from_millis(100)
    ));
    assert_eq!(store.load("working").unwrap(), None);

    assert!(autosave.tick(editor.document(), &mut store, start + Duration::from_secs(1)));

    let reloaded = load_document(None, &store, "working");
    assert_eq!(reloaded.schedule_name, "Autosaved Week");
    assert_eq!(reloaded.days.len(), 1);
    assert_eq!(&reloaded, editor.document());
}

#[test]
fn flush_persists_pending_edits_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileDraftStore::new(dir.path());
    let mut autosave = Autosave::new("working");
    let start = Instant::now();

    let mut editor = Editor::new(ScheduleDocument::default());
    editor.update_document(|doc| doc.schedule_name = "Closing Time".into());
    autosave.note_revision(editor.revision(), start);

    // Shutdown before the debounce lapses still writes.
    assert!(autosave.flush(editor.document(), &mut store, start));
    let reloaded = load_document(None, &store, "working");
    assert_eq!(reloaded.schedule_name, "Closing Time");
}

#[test]
fn schedule_files_survive_a_save_load_edit_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.schedule");

    let mut editor = Editor::new(ScheduleDocument::default());
    editor.add_day(InsertPosition::Bottom);
    editor.add_day(InsertPosition::Bottom);
    let day_id = editor.document().days[0].id.clone();
    editor.update_day_label(&day_id, "Saturday");
    let stream_id = editor.document().days[0].streams[0].id.clone();
    editor.update_stream_title(&day_id, &stream_id, "Community games");

    save_schedule_file(editor.document(), &path).unwrap();
    let loaded = load_schedule_file(&path).unwrap();
    assert_eq!(&loaded, editor.document());
    assert_eq!(loaded.days[0].label, "Saturday");
    assert_eq!(loaded.days[0].streams[0].title, "Community games");

    // A reloaded document keeps editing from where it left off.
    let mut editor = Editor::new(loaded);
    let removed = editor.document().days[1].id.clone();
    assert!(editor.remove_day(&removed));
    assert_eq!(editor.document().days.len(), 1);
    assert!(editor.document().validate().is_ok());
}
