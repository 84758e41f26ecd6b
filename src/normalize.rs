//! Total normalization of untrusted draft payloads.
//!
//! Drafts come back from synced storage and hand-edited files, so every field
//! repairs independently: a bad value degrades to the document default
//! without failing the fields around it. A payload that is not even a JSON
//! object yields the default document.

use serde_json::Value;

use crate::{
    catalog::{
        flags::FlagKey,
        sizes::is_known_size_id,
        themes,
    },
    model::{
        CustomSize, CustomSlot, Day, FooterSize, FooterStyle, HeaderAlignment, HeaderTone,
        ScheduleDocument, Stream, ThemeSelection, TimeSlot,
    },
};

struct FallbackIds {
    next: u64,
}

impl FallbackIds {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn make(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-imported-{}", self.next);
        self.next += 1;
        id
    }
}

fn field<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = record.as_object()?;
    names.iter().find_map(|n| obj.get(*n))
}

fn get_string(record: &Value, names: &[&str], fallback: &str) -> String {
    match field(record, names).and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => fallback.to_string(),
    }
}

fn get_opt_string(record: &Value, names: &[&str]) -> String {
    field(record, names)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn get_bool(record: &Value, names: &[&str], fallback: bool) -> bool {
    field(record, names)
        .and_then(Value::as_bool)
        .unwrap_or(fallback)
}

/// Positive integer with string tolerance, rounded like the import path has
/// always done. Zero, negatives, NaN strings and non-numbers all fall back.
fn get_positive_u32(record: &Value, names: &[&str], fallback: u32) -> u32 {
    let raw = field(record, names);
    let numeric = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match numeric {
        Some(v) if v.is_finite() && v > 0.0 && v <= f64::from(u32::MAX) => v.round() as u32,
        _ => fallback,
    }
}

fn get_array<'a>(record: &'a Value, names: &[&str]) -> &'a [Value] {
    field(record, names)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn normalize_slot(value: &Value, ids: &mut FallbackIds) -> TimeSlot {
    let zone_id = get_string(value, &["zone_id", "zoneId"], "uk");
    let custom_obj = field(value, &["custom"]);
    // Accept both the nested layout this crate writes and the flat
    // `customLabel`-style keys of older payloads.
    let custom = CustomSlot {
        label: custom_obj
            .map(|c| get_opt_string(c, &["label"]))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| get_opt_string(value, &["customLabel"])),
        time_text: custom_obj
            .map(|c| get_opt_string(c, &["time_text"]))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| get_opt_string(value, &["customTime"])),
        zone_name: custom_obj
            .map(|c| get_opt_string(c, &["zone_name"]))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| get_opt_string(value, &["customZone"])),
        emoji: custom_obj
            .map(|c| get_opt_string(c, &["emoji"]))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| get_opt_string(value, &["customEmoji"])),
        flag: custom_obj
            .and_then(|c| field(c, &["flag"]))
            .or_else(|| field(value, &["customFlag"]))
            .and_then(Value::as_str)
            .and_then(FlagKey::parse)
            .unwrap_or_default(),
    };

    let id = field(value, &["id"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ids.make("slot"));

    TimeSlot {
        id,
        zone_id,
        custom,
    }
}

fn normalize_stream(value: &Value, ids: &mut FallbackIds) -> Stream {
    let id = field(value, &["id"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ids.make("stream"));

    Stream {
        id,
        title: get_opt_string(value, &["title"]),
        thumbnail: get_opt_string(value, &["thumbnail", "thumbUrl"]),
        base_time: get_string(value, &["base_time", "baseTime"], "20:30"),
        time_slots: get_array(value, &["time_slots", "times"])
            .iter()
            .map(|v| normalize_slot(v, ids))
            .collect(),
    }
}

fn normalize_day(value: &Value, ids: &mut FallbackIds) -> Day {
    let id = field(value, &["id"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ids.make("day"));

    Day {
        id,
        label: get_string(value, &["label", "day"], "Day"),
        date_label: get_opt_string(value, &["date_label", "date"]),
        is_off: get_bool(value, &["is_off", "off"], false),
        streams: get_array(value, &["streams"])
            .iter()
            .map(|v| normalize_stream(v, ids))
            .collect(),
    }
}

fn normalize_theme(record: &Value, defaults: &ThemeSelection) -> ThemeSelection {
    let theme = field(record, &["theme"]).cloned().unwrap_or(Value::Null);

    let pick = |names: &[&str], known: &dyn Fn(&str) -> bool, fallback: &str| -> String {
        match field(&theme, names).and_then(Value::as_str) {
            Some(s) if known(s) => s.to_string(),
            _ => fallback.to_string(),
        }
    };

    ThemeSelection {
        background_id: pick(
            &["background_id", "backgroundId"],
            &|s| themes::background_options().iter().any(|o| o.id == s),
            &defaults.background_id,
        ),
        font_pair_id: pick(
            &["font_pair_id", "fontId"],
            &|s| themes::font_pair_options().iter().any(|o| o.id == s),
            &defaults.font_pair_id,
        ),
        card_style_id: pick(
            &["card_style_id", "cardStyleId"],
            &|s| themes::card_style_options().iter().any(|o| o.id == s),
            &defaults.card_style_id,
        ),
        border_shape_id: pick(
            &["border_shape_id", "borderId"],
            &|s| themes::border_options().iter().any(|o| o.id == s),
            &defaults.border_shape_id,
        ),
        border_weight_id: pick(
            &["border_weight_id", "borderWeightId"],
            &|s| themes::border_weight_options().iter().any(|o| o.id == s),
            &defaults.border_weight_id,
        ),
    }
}

/// Repair an arbitrary JSON value into a schedule document. Never fails.
pub fn normalize(payload: &Value) -> ScheduleDocument {
    let defaults = ScheduleDocument::default();
    if !payload.is_object() {
        return defaults;
    }

    let mut ids = FallbackIds::new();
    let days: Vec<Day> = get_array(payload, &["days"])
        .iter()
        .map(|v| normalize_day(v, &mut ids))
        .collect();

    let export_size_id = match field(payload, &["export_size_id", "exportSizeId"])
        .and_then(Value::as_str)
    {
        Some(s) if is_known_size_id(s) => s.to_string(),
        _ => defaults.export_size_id.clone(),
    };

    let custom_vertical = field(payload, &["custom_vertical_size", "customVerticalSize"])
        .cloned()
        .unwrap_or(Value::Null);
    let custom_horizontal = field(payload, &["custom_horizontal_size", "customHorizontalSize"])
        .cloned()
        .unwrap_or(Value::Null);

    let header_alignment = field(payload, &["header_alignment", "headerAlignment"])
        .and_then(Value::as_str)
        .and_then(HeaderAlignment::parse)
        .unwrap_or(defaults.header_alignment);
    let header_tone = field(payload, &["header_tone", "headerTone"])
        .and_then(Value::as_str)
        .and_then(HeaderTone::parse)
        .unwrap_or(defaults.header_tone);
    let footer_style = field(payload, &["footer_style", "footerStyle"])
        .and_then(Value::as_str)
        .and_then(FooterStyle::parse)
        .unwrap_or(defaults.footer_style);
    let footer_size = field(payload, &["footer_size", "footerSize"])
        .and_then(Value::as_str)
        .and_then(FooterSize::parse)
        .unwrap_or(defaults.footer_size);

    let version = field(payload, &["version"])
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(1);

    let mut doc = ScheduleDocument {
        version,
        schedule_name: get_string(
            payload,
            &["schedule_name", "scheduleName"],
            &defaults.schedule_name,
        ),
        schedule_time_zone: get_string(
            payload,
            &["schedule_time_zone", "scheduleTimeZone"],
            &defaults.schedule_time_zone,
        ),
        export_size_id,
        custom_vertical_size: CustomSize {
            width: get_positive_u32(
                &custom_vertical,
                &["width"],
                defaults.custom_vertical_size.width,
            ),
            height: get_positive_u32(
                &custom_vertical,
                &["height"],
                defaults.custom_vertical_size.height,
            ),
        },
        custom_horizontal_size: CustomSize {
            width: get_positive_u32(
                &custom_horizontal,
                &["width"],
                defaults.custom_horizontal_size.width,
            ),
            height: get_positive_u32(
                &custom_horizontal,
                &["height"],
                defaults.custom_horizontal_size.height,
            ),
        },
        show_header: get_bool(payload, &["show_header", "showHeader"], defaults.show_header),
        header_title: get_string(
            payload,
            &["header_title", "headerTitle"],
            &defaults.header_title,
        ),
        header_alignment,
        header_tone,
        show_footer: get_bool(payload, &["show_footer", "showFooter"], defaults.show_footer),
        footer_link: get_string(
            payload,
            &["footer_link", "footerLink"],
            &defaults.footer_link,
        ),
        footer_style,
        footer_size,
        theme: normalize_theme(payload, &defaults.theme),
        days,
    };

    doc.days.truncate(crate::model::MAX_DAYS);
    dedupe_ids(&mut doc, &mut ids);
    doc
}

/// Colliding ids get fresh imported ids instead of failing validation.
fn dedupe_ids(doc: &mut ScheduleDocument, ids: &mut FallbackIds) {
    let mut seen = std::collections::BTreeSet::new();
    for day in &mut doc.days {
        if !seen.insert(day.id.clone()) {
            day.id = ids.make("day");
            seen.insert(day.id.clone());
        }
        for stream in &mut day.streams {
            if !seen.insert(stream.id.clone()) {
                stream.id = ids.make("stream");
                seen.insert(stream.id.clone());
            }
            for slot in &mut stream.time_slots {
                if !seen.insert(slot.id.clone()) {
                    slot.id = ids.make("slot");
                    seen.insert(slot.id.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_payload_yields_defaults() {
        assert_eq!(normalize(&Value::Null), ScheduleDocument::default());
        assert_eq!(normalize(&json!("hi")), ScheduleDocument::default());
        assert_eq!(normalize(&json!([1, 2, 3])), ScheduleDocument::default());
    }

    #[test]
    fn roundtrip_of_serialized_document_is_identity() {
        let mut doc = ScheduleDocument::default();
        doc.days.push(Day {
            id: "day-1".into(),
            label: "Tuesday".into(),
            date_label: "Jan 12".into(),
            is_off: false,
            streams: vec![Stream {
                id: "stream-1".into(),
                title: "Ranked night".into(),
                thumbnail: String::new(),
                base_time: "20:30".into(),
                time_slots: vec![TimeSlot::new("slot-1".into(), "uk")],
            }],
        });
        // The canonical version is what a serialized current document carries.
        doc.version = crate::model::CURRENT_VERSION;
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(normalize(&value), doc);
    }

    #[test]
    fn legacy_camel_case_payload_is_accepted() {
        let payload = json!({
            "version": 1,
            "scheduleName": "My week",
            "scheduleTimeZone": "Europe/London",
            "exportSizeId": "youtube",
            "showHeader": true,
            "headerTitle": "Hello",
            "headerAlignment": "center",
            "headerTone": "soft",
            "days": [{
                "id": "day-1",
                "day": "Tuesday",
                "date": "Jan 12",
                "off": false,
                "streams": [{
                    "id": "stream-1",
                    "title": "VRChat",
                    "thumbUrl": "https://example.com/a.jpg",
                    "baseTime": "21:00",
                    "times": [{
                        "id": "slot-1",
                        "zoneId": "us-et",
                        "customFlag": "jp"
                    }]
                }]
            }]
        });
        let doc = normalize(&payload);
        assert_eq!(doc.schedule_name, "My week");
        assert_eq!(doc.export_size_id, "youtube");
        assert_eq!(doc.header_alignment, HeaderAlignment::Center);
        let day = &doc.days[0];
        assert_eq!(day.label, "Tuesday");
        let stream = &day.streams[0];
        assert_eq!(stream.thumbnail, "https://example.com/a.jpg");
        assert_eq!(stream.base_time, "21:00");
        assert_eq!(stream.time_slots[0].zone_id, "us-et");
        assert_eq!(stream.time_slots[0].custom.flag, FlagKey::Jp);
    }

    #[test]
    fn corrupted_fields_degrade_independently() {
        let payload = json!({
            "schedule_name": 42,
            "export_size_id": "betamax",
            "custom_vertical_size": { "width": -5, "height": "900" },
            "header_alignment": "justify",
            "theme": { "background_id": "lava" },
            "days": [
                "not an object",
                { "streams": [{ "time_slots": [{}] }] }
            ]
        });
        let doc = normalize(&payload);
        let defaults = ScheduleDocument::default();
        assert_eq!(doc.schedule_name, defaults.schedule_name);
        assert_eq!(doc.export_size_id, "story");
        assert_eq!(doc.custom_vertical_size.width, 1080);
        assert_eq!(doc.custom_vertical_size.height, 900);
        assert_eq!(doc.header_alignment, HeaderAlignment::Left);
        assert_eq!(doc.theme.background_id, "nebula");

        assert_eq!(doc.days.len(), 2);
        assert_eq!(doc.days[0].id, "day-imported-1");
        assert_eq!(doc.days[0].label, "Day");
        let slot = &doc.days[1].streams[0].time_slots[0];
        assert_eq!(slot.zone_id, "uk");
        assert!(slot.id.starts_with("slot-imported-"));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn excess_days_are_truncated_and_ids_deduped() {
        let days: Vec<Value> = (0..9)
            .map(|_| json!({ "id": "day-1", "label": "Monday" }))
            .collect();
        let doc = normalize(&json!({ "days": days }));
        assert_eq!(doc.days.len(), crate::model::MAX_DAYS);
        assert!(doc.validate().is_ok());
    }
}
