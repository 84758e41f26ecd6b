//! Document mutations. All edits flow through [`Editor`], which owns the
//! document, the id source, the selection and the session thumbnail store,
//! and bumps a revision counter the autosave machinery watches.

use crate::{
    assets::thumbs::SessionThumbs,
    catalog::zones::WEEKDAY_NAMES,
    model::{
        DEFAULT_BASE_TIME, DEFAULT_STREAM_TITLE, Day, MAX_DAYS, ScheduleDocument, Stream, TimeSlot,
    },
};

/// Monotonic id source. Ids are never reused within a session; on load the
/// counter adopts the largest numeric run found in any existing id.
#[derive(Clone, Copy, Debug)]
pub struct IdSource {
    next: u64,
}

impl IdSource {
    const FLOOR: u64 = 100;

    pub fn new() -> Self {
        Self { next: Self::FLOOR }
    }

    pub fn adopting(doc: &ScheduleDocument) -> Self {
        let mut max = -1i64;
        let mut collect = |id: &str| {
            if let Some(v) = max_numeric_run(id) {
                max = max.max(v as i64);
            }
        };
        for day in &doc.days {
            collect(&day.id);
            for stream in &day.streams {
                collect(&stream.id);
                for slot in &stream.time_slots {
                    collect(&slot.id);
                }
            }
        }
        Self {
            next: Self::FLOOR.max((max + 1).max(0) as u64),
        }
    }

    pub fn make(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next);
        self.next += 1;
        id
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest run of consecutive digits in an id, e.g. "day-imported-12" -> 12.
fn max_numeric_run(id: &str) -> Option<u64> {
    let mut best: Option<u64> = None;
    let mut current: Option<u64> = None;
    for c in id.chars() {
        if let Some(d) = c.to_digit(10) {
            // Saturate rather than wrap on absurdly long digit runs.
            current = Some(
                current
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(u64::from(d)),
            );
        } else {
            if let Some(v) = current.take() {
                best = Some(best.map_or(v, |b| b.max(v)));
            }
        }
    }
    if let Some(v) = current {
        best = Some(best.map_or(v, |b| b.max(v)));
    }
    best
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectedElement {
    Day(String),
    Header,
    Footer,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub day_id: Option<String>,
    pub stream_id: Option<String>,
    pub element: Option<SelectedElement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertPosition {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

#[derive(Debug, Default)]
pub struct Editor {
    doc: ScheduleDocument,
    ids: IdSource,
    selection: Selection,
    thumbs: SessionThumbs,
    revision: u64,
}

impl Editor {
    pub fn new(doc: ScheduleDocument) -> Self {
        let ids = IdSource::adopting(&doc);
        let selection = Selection {
            day_id: doc.days.first().map(|d| d.id.clone()),
            stream_id: doc
                .days
                .first()
                .and_then(|d| d.streams.first())
                .map(|s| s.id.clone()),
            element: None,
        };
        Self {
            doc,
            ids,
            selection,
            thumbs: SessionThumbs::new(),
            revision: 0,
        }
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session_thumbs(&self) -> &SessionThumbs {
        &self.thumbs
    }

    /// Bumped on every mutation; the autosave debouncer watches this.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ---- day operations ----

    pub fn can_add_day(&self) -> bool {
        self.doc.days.len() < MAX_DAYS
    }

    /// First weekday name not already used, else "Day N".
    pub fn next_day_name(&self) -> String {
        let used: Vec<String> = self
            .doc
            .days
            .iter()
            .map(|d| d.label.to_lowercase())
            .collect();
        WEEKDAY_NAMES
            .iter()
            .find(|name| !used.contains(&name.to_lowercase()))
            .map(|name| (*name).to_string())
            .unwrap_or_else(|| format!("Day {}", self.doc.days.len() + 1))
    }

    fn create_slot(&mut self) -> TimeSlot {
        TimeSlot::new(self.ids.make("slot"), "uk")
    }

    fn create_stream(&mut self) -> Stream {
        let slot = self.create_slot();
        Stream {
            id: self.ids.make("stream"),
            title: DEFAULT_STREAM_TITLE.to_string(),
            thumbnail: String::new(),
            base_time: DEFAULT_BASE_TIME.to_string(),
            time_slots: vec![slot],
        }
    }

    /// No-op at the day cap. The new day is seeded with one default stream
    /// and becomes the selected day.
    pub fn add_day(&mut self, position: InsertPosition) -> Option<&Day> {
        if !self.can_add_day() {
            return None;
        }
        let label = self.next_day_name();
        let stream = self.create_stream();
        let day = Day {
            id: self.ids.make("day"),
            label,
            date_label: String::new(),
            is_off: false,
            streams: vec![stream],
        };
        let day_id = day.id.clone();
        let stream_id = day.streams[0].id.clone();
        match position {
            InsertPosition::Top => self.doc.days.insert(0, day),
            InsertPosition::Bottom => self.doc.days.push(day),
        }
        self.selection.day_id = Some(day_id.clone());
        self.selection.stream_id = Some(stream_id);
        self.selection.element = Some(SelectedElement::Day(day_id.clone()));
        self.touch();
        self.doc.find_day(&day_id)
    }

    pub fn remove_day(&mut self, day_id: &str) -> bool {
        let Some(index) = self.doc.days.iter().position(|d| d.id == day_id) else {
            return false;
        };
        let removed = self.doc.days.remove(index);
        for stream in &removed.streams {
            self.thumbs.release_ref(&stream.thumbnail);
        }
        if self.selection.day_id.as_deref() == Some(day_id) {
            let next = self.doc.days.first();
            self.selection.day_id = next.map(|d| d.id.clone());
            self.selection.stream_id = next.and_then(|d| d.streams.first()).map(|s| s.id.clone());
            if matches!(self.selection.element, Some(SelectedElement::Day(_))) {
                self.selection.element = next.map(|d| SelectedElement::Day(d.id.clone()));
            }
        }
        self.touch();
        true
    }

    /// Empties the schedule and releases every session thumbnail.
    pub fn clear_days(&mut self) {
        self.doc.days.clear();
        self.thumbs.clear();
        self.selection.day_id = None;
        self.selection.stream_id = None;
        if matches!(self.selection.element, Some(SelectedElement::Day(_))) {
            self.selection.element = None;
        }
        self.touch();
    }

    /// Stable splice move. No-op when drag and target are the same id or
    /// either is missing.
    pub fn reorder_days(&mut self, drag_id: &str, target_id: &str, position: DropPosition) -> bool {
        if drag_id == target_id {
            return false;
        }
        let Some(from) = self.doc.days.iter().position(|d| d.id == drag_id) else {
            return false;
        };
        let dragged = self.doc.days.remove(from);
        let Some(target) = self.doc.days.iter().position(|d| d.id == target_id) else {
            self.doc.days.insert(from, dragged);
            return false;
        };
        let insert_at = match position {
            DropPosition::Before => target,
            DropPosition::After => target + 1,
        };
        self.doc.days.insert(insert_at, dragged);
        self.touch();
        true
    }

    pub fn update_day_label(&mut self, day_id: &str, label: impl Into<String>) -> bool {
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        day.label = label.into();
        self.touch();
        true
    }

    pub fn update_day_date(&mut self, day_id: &str, date_label: impl Into<String>) -> bool {
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        day.date_label = date_label.into();
        self.touch();
        true
    }

    pub fn set_day_off(&mut self, day_id: &str, is_off: bool) -> bool {
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        day.is_off = is_off;
        self.touch();
        true
    }

    // ---- stream operations ----

    pub fn add_stream(&mut self, day_id: &str) -> Option<String> {
        if self.doc.find_day(day_id).is_none() {
            return None;
        }
        let stream = self.create_stream();
        let stream_id = stream.id.clone();
        let day = self.doc.find_day_mut(day_id)?;
        day.streams.push(stream);
        self.selection.stream_id = Some(stream_id.clone());
        self.touch();
        Some(stream_id)
    }

    /// The last stream of a day cannot be removed.
    pub fn can_remove_stream(&self, day_id: &str) -> bool {
        self.doc
            .find_day(day_id)
            .is_some_and(|d| d.streams.len() > 1)
    }

    pub fn remove_stream(&mut self, day_id: &str, stream_id: &str) -> bool {
        if !self.can_remove_stream(day_id) {
            return false;
        }
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        let Some(index) = day.streams.iter().position(|s| s.id == stream_id) else {
            return false;
        };
        let removed = day.streams.remove(index);
        let next_stream = day.streams.first().map(|s| s.id.clone());
        self.thumbs.release_ref(&removed.thumbnail);
        if self.selection.stream_id.as_deref() == Some(stream_id) {
            self.selection.stream_id = next_stream;
        }
        self.touch();
        true
    }

    pub fn reorder_streams(
        &mut self,
        day_id: &str,
        drag_id: &str,
        target_id: &str,
        position: DropPosition,
    ) -> bool {
        if drag_id == target_id {
            return false;
        }
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        let Some(from) = day.streams.iter().position(|s| s.id == drag_id) else {
            return false;
        };
        let dragged = day.streams.remove(from);
        let Some(target) = day.streams.iter().position(|s| s.id == target_id) else {
            day.streams.insert(from, dragged);
            return false;
        };
        let insert_at = match position {
            DropPosition::Before => target,
            DropPosition::After => target + 1,
        };
        day.streams.insert(insert_at, dragged);
        self.touch();
        true
    }

    pub fn update_stream_title(
        &mut self,
        day_id: &str,
        stream_id: &str,
        title: impl Into<String>,
    ) -> bool {
        self.with_stream(day_id, stream_id, |s| s.title = title.into())
    }

    pub fn update_stream_base_time(
        &mut self,
        day_id: &str,
        stream_id: &str,
        base_time: impl Into<String>,
    ) -> bool {
        self.with_stream(day_id, stream_id, |s| s.base_time = base_time.into())
    }

    /// Points the thumbnail at an external reference (URL, data URI, path),
    /// releasing any session bytes the old value held.
    pub fn set_thumbnail_ref(
        &mut self,
        day_id: &str,
        stream_id: &str,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let Some(old) = self.stream_thumbnail(day_id, stream_id) else {
            return false;
        };
        self.thumbs.release_ref(&old);
        self.with_stream(day_id, stream_id, |s| s.thumbnail = value)
    }

    /// Registers uploaded bytes in the session store and points the stream's
    /// thumbnail at them, releasing the previous session entry if any.
    pub fn upload_thumbnail(
        &mut self,
        day_id: &str,
        stream_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> bool {
        let Some(old) = self.stream_thumbnail(day_id, stream_id) else {
            return false;
        };
        self.thumbs.release_ref(&old);
        let reference = self.thumbs.insert(file_name, bytes);
        self.with_stream(day_id, stream_id, |s| s.thumbnail = reference)
    }

    pub fn clear_thumbnail(&mut self, day_id: &str, stream_id: &str) -> bool {
        self.set_thumbnail_ref(day_id, stream_id, "")
    }

    fn stream_thumbnail(&self, day_id: &str, stream_id: &str) -> Option<String> {
        self.doc
            .find_day(day_id)?
            .streams
            .iter()
            .find(|s| s.id == stream_id)
            .map(|s| s.thumbnail.clone())
    }

    fn with_stream(&mut self, day_id: &str, stream_id: &str, f: impl FnOnce(&mut Stream)) -> bool {
        let Some(day) = self.doc.find_day_mut(day_id) else {
            return false;
        };
        let Some(stream) = day.find_stream_mut(stream_id) else {
            return false;
        };
        f(stream);
        self.touch();
        true
    }

    // ---- time slot operations ----

    pub fn add_time_slot(&mut self, day_id: &str, stream_id: &str) -> Option<String> {
        let slot = self.create_slot();
        let slot_id = slot.id.clone();
        let added = self.with_stream(day_id, stream_id, |s| s.time_slots.push(slot));
        added.then_some(slot_id)
    }

    pub fn remove_time_slot(&mut self, day_id: &str, stream_id: &str, slot_id: &str) -> bool {
        let slot_id = slot_id.to_string();
        self.with_stream(day_id, stream_id, |s| {
            s.time_slots.retain(|slot| slot.id != slot_id);
        })
    }

    pub fn update_slot(
        &mut self,
        day_id: &str,
        stream_id: &str,
        slot_id: &str,
        f: impl FnOnce(&mut TimeSlot),
    ) -> bool {
        let mut applied = false;
        let updated = self.with_stream(day_id, stream_id, |s| {
            if let Some(slot) = s.time_slots.iter_mut().find(|slot| slot.id == slot_id) {
                f(slot);
                applied = true;
            }
        });
        updated && applied
    }

    // ---- header / footer / document settings ----

    /// Hiding the header also clears a header selection; the selection never
    /// points at a hidden element.
    pub fn toggle_header(&mut self) {
        self.doc.show_header = !self.doc.show_header;
        if !self.doc.show_header && self.selection.element == Some(SelectedElement::Header) {
            self.selection.element = self
                .selection
                .day_id
                .clone()
                .map(SelectedElement::Day);
        }
        self.touch();
    }

    pub fn toggle_footer(&mut self) {
        self.doc.show_footer = !self.doc.show_footer;
        if !self.doc.show_footer && self.selection.element == Some(SelectedElement::Footer) {
            self.selection.element = self
                .selection
                .day_id
                .clone()
                .map(SelectedElement::Day);
        }
        self.touch();
    }

    pub fn select_day(&mut self, day_id: &str) -> bool {
        let Some(day) = self.doc.find_day(day_id) else {
            return false;
        };
        let keep_stream = self
            .selection
            .stream_id
            .as_ref()
            .is_some_and(|id| day.streams.iter().any(|s| &s.id == id));
        self.selection.stream_id = if keep_stream {
            self.selection.stream_id.clone()
        } else {
            day.streams.first().map(|s| s.id.clone())
        };
        self.selection.day_id = Some(day_id.to_string());
        self.selection.element = Some(SelectedElement::Day(day_id.to_string()));
        true
    }

    pub fn select_header(&mut self) -> bool {
        if !self.doc.show_header {
            return false;
        }
        self.selection.element = Some(SelectedElement::Header);
        true
    }

    pub fn select_footer(&mut self) -> bool {
        if !self.doc.show_footer {
            return false;
        }
        self.selection.element = Some(SelectedElement::Footer);
        true
    }

    pub fn update_document(&mut self, f: impl FnOnce(&mut ScheduleDocument)) {
        f(&mut self.doc);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_days(n: usize) -> Editor {
        let mut editor = Editor::new(ScheduleDocument::default());
        for _ in 0..n {
            editor.add_day(InsertPosition::Bottom);
        }
        editor
    }

    #[test]
    fn id_source_adopts_max_numeric_run() {
        let mut doc = ScheduleDocument::default();
        doc.days = vec![Day {
            id: "day-imported-412".into(),
            label: "Monday".into(),
            date_label: String::new(),
            is_off: false,
            streams: vec![],
        }];
        let mut ids = IdSource::adopting(&doc);
        assert_eq!(ids.make("day"), "day-413");
    }

    #[test]
    fn id_source_floor_applies_to_small_ids() {
        let mut doc = ScheduleDocument::default();
        doc.days = vec![Day {
            id: "day-3".into(),
            label: "Monday".into(),
            date_label: String::new(),
            is_off: false,
            streams: vec![],
        }];
        let mut ids = IdSource::adopting(&doc);
        assert_eq!(ids.make("day"), "day-100");
    }

    #[test]
    fn add_day_uses_unused_weekday_then_day_n() {
        let mut editor = editor_with_days(0);
        for expected in WEEKDAY_NAMES {
            let day = editor.add_day(InsertPosition::Bottom).unwrap();
            assert_eq!(day.label, expected);
        }
        // Cap reached: further adds are no-ops.
        assert!(!editor.can_add_day());
        assert!(editor.add_day(InsertPosition::Bottom).is_none());
        assert_eq!(editor.document().days.len(), MAX_DAYS);
    }

    #[test]
    fn add_day_is_idempotent_at_cap() {
        let mut editor = editor_with_days(0);
        for _ in 0..10 {
            editor.add_day(InsertPosition::Bottom);
        }
        assert_eq!(editor.document().days.len(), MAX_DAYS);
        assert!(editor.document().validate().is_ok());
    }

    #[test]
    fn add_day_top_inserts_first_and_selects() {
        let mut editor = editor_with_days(2);
        let id = editor
            .add_day(InsertPosition::Top)
            .map(|d| d.id.clone())
            .unwrap();
        assert_eq!(editor.document().days[0].id, id);
        assert_eq!(editor.selection().day_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn new_day_seeds_default_stream_and_slot() {
        let mut editor = editor_with_days(1);
        let day = &editor.document().days[0];
        assert_eq!(day.streams.len(), 1);
        assert_eq!(day.streams[0].title, DEFAULT_STREAM_TITLE);
        assert_eq!(day.streams[0].base_time, DEFAULT_BASE_TIME);
        assert_eq!(day.streams[0].time_slots.len(), 1);
        assert_eq!(day.streams[0].time_slots[0].zone_id, "uk");
    }

    #[test]
    fn reorder_days_is_a_pure_permutation() {
        let mut editor = editor_with_days(4);
        let before: Vec<String> = editor.document().days.iter().map(|d| d.id.clone()).collect();

        assert!(editor.reorder_days(&before[3], &before[0], DropPosition::Before));
        let after: Vec<String> = editor.document().days.iter().map(|d| d.id.clone()).collect();
        assert_eq!(after[0], before[3]);
        let mut sorted_before = before.clone();
        let mut sorted_after = after.clone();
        sorted_before.sort();
        sorted_after.sort();
        assert_eq!(sorted_before, sorted_after);

        // Inverse move restores the original order.
        assert!(editor.reorder_days(&before[3], &before[2], DropPosition::After));
        let restored: Vec<String> = editor.document().days.iter().map(|d| d.id.clone()).collect();
        assert_eq!(restored, before);
    }

    #[test]
    fn reorder_self_and_missing_are_noops() {
        let mut editor = editor_with_days(3);
        let before: Vec<String> = editor.document().days.iter().map(|d| d.id.clone()).collect();
        let rev = editor.revision();
        assert!(!editor.reorder_days(&before[0], &before[0], DropPosition::After));
        assert!(!editor.reorder_days("day-nope", &before[0], DropPosition::After));
        assert!(!editor.reorder_days(&before[0], "day-nope", DropPosition::After));
        let after: Vec<String> = editor.document().days.iter().map(|d| d.id.clone()).collect();
        assert_eq!(after, before);
        assert_eq!(editor.revision(), rev);
    }

    #[test]
    fn last_stream_of_a_day_cannot_be_removed() {
        let mut editor = editor_with_days(1);
        let day_id = editor.document().days[0].id.clone();
        let stream_id = editor.document().days[0].streams[0].id.clone();
        assert!(!editor.can_remove_stream(&day_id));
        assert!(!editor.remove_stream(&day_id, &stream_id));

        editor.add_stream(&day_id);
        assert!(editor.can_remove_stream(&day_id));
        assert!(editor.remove_stream(&day_id, &stream_id));
        assert_eq!(editor.document().days[0].streams.len(), 1);
    }

    #[test]
    fn remove_day_repairs_selection_and_releases_thumbs() {
        let mut editor = editor_with_days(2);
        let first = editor.document().days[0].id.clone();
        let second = editor.document().days[1].id.clone();
        let stream = editor.document().days[0].streams[0].id.clone();
        editor.select_day(&first);
        editor.upload_thumbnail(&first, &stream, "x.png", vec![0u8; 8]);
        assert_eq!(editor.session_thumbs().len(), 1);

        assert!(editor.remove_day(&first));
        assert!(editor.session_thumbs().is_empty());
        assert_eq!(editor.selection().day_id.as_deref(), Some(second.as_str()));
    }

    #[test]
    fn replacing_an_uploaded_thumbnail_releases_the_old_bytes() {
        let mut editor = editor_with_days(1);
        let day_id = editor.document().days[0].id.clone();
        let stream_id = editor.document().days[0].streams[0].id.clone();

        editor.upload_thumbnail(&day_id, &stream_id, "a.png", vec![1]);
        assert_eq!(editor.session_thumbs().len(), 1);
        editor.upload_thumbnail(&day_id, &stream_id, "b.png", vec![2]);
        assert_eq!(editor.session_thumbs().len(), 1);
        editor.set_thumbnail_ref(&day_id, &stream_id, "https://example.com/c.jpg");
        assert!(editor.session_thumbs().is_empty());
    }

    #[test]
    fn clear_days_empties_everything() {
        let mut editor = editor_with_days(3);
        let day_id = editor.document().days[0].id.clone();
        let stream_id = editor.document().days[0].streams[0].id.clone();
        editor.upload_thumbnail(&day_id, &stream_id, "a.png", vec![1]);
        editor.select_day(&day_id);

        editor.clear_days();
        assert!(editor.document().days.is_empty());
        assert!(editor.session_thumbs().is_empty());
        assert_eq!(editor.selection().day_id, None);
        assert_eq!(editor.selection().element, None);
        assert!(editor.can_add_day());
    }

    #[test]
    fn hiding_a_selected_header_moves_selection_back_to_the_day() {
        let mut editor = editor_with_days(1);
        editor.update_document(|d| d.show_header = true);
        assert!(editor.select_header());
        editor.toggle_header();
        assert!(!editor.document().show_header);
        assert!(matches!(
            editor.selection().element,
            Some(SelectedElement::Day(_))
        ));
    }

    #[test]
    fn footer_cannot_be_selected_while_hidden() {
        let mut editor = editor_with_days(1);
        editor.toggle_footer();
        assert!(!editor.document().show_footer);
        assert!(!editor.select_footer());
    }

    #[test]
    fn mutations_bump_revision() {
        let mut editor = editor_with_days(1);
        let rev = editor.revision();
        let day_id = editor.document().days[0].id.clone();
        editor.update_day_label(&day_id, "Friday");
        assert!(editor.revision() > rev);
    }
}
