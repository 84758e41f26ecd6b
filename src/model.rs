use std::collections::BTreeSet;

use crate::{
    catalog::flags::FlagKey,
    error::{SlateError, SlateResult},
};

/// Payload format version written by this crate.
pub const CURRENT_VERSION: u32 = 2;

/// Hard cap on the number of days a schedule can hold.
pub const MAX_DAYS: usize = 7;

pub const DEFAULT_BASE_TIME: &str = "20:30";
pub const DEFAULT_STREAM_TITLE: &str = "New stream";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    #[default]
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderTone {
    #[default]
    Bright,
    Soft,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Solid,
    Glass,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterSize {
    #[default]
    Regular,
    Compact,
}

impl HeaderAlignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            _ => None,
        }
    }
}

impl HeaderTone {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bright" => Some(Self::Bright),
            "soft" => Some(Self::Soft),
            _ => None,
        }
    }
}

impl FooterStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "solid" => Some(Self::Solid),
            "glass" => Some(Self::Glass),
            _ => None,
        }
    }
}

impl FooterSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(Self::Regular),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Catalog ids for the five theme axes. Unknown ids are kept verbatim and
/// degrade at lookup time (`Theme::resolve`), so a document authored against
/// a newer catalog still opens.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThemeSelection {
    pub background_id: String,
    pub font_pair_id: String,
    pub card_style_id: String,
    pub border_shape_id: String,
    pub border_weight_id: String,
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            background_id: "nebula".into(),
            font_pair_id: "grotesk-fraunces".into(),
            card_style_id: "glass".into(),
            border_shape_id: "soft".into(),
            border_weight_id: "hairline".into(),
        }
    }
}

/// Manual display values for a slot whose zone is "custom".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomSlot {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub time_text: String,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub flag: FlagKey,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeSlot {
    pub id: String,
    /// Zone catalog id, or "custom" for manual entry.
    pub zone_id: String,
    #[serde(default)]
    pub custom: CustomSlot,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stream {
    pub id: String,
    pub title: String,
    /// Empty, a data: URI, a `session:` key, an http(s) URL, or a relative
    /// path under the asset root.
    #[serde(default)]
    pub thumbnail: String,
    /// Wall-clock "HH:MM" in the schedule's authoring zone.
    pub base_time: String,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Day {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub date_label: String,
    #[serde(default)]
    pub is_off: bool,
    #[serde(default)]
    pub streams: Vec<Stream>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleDocument {
    pub version: u32,
    pub schedule_name: String,
    /// IANA zone every base time is authored in.
    pub schedule_time_zone: String,
    pub export_size_id: String,
    pub custom_vertical_size: CustomSize,
    pub custom_horizontal_size: CustomSize,
    pub show_header: bool,
    pub header_title: String,
    pub header_alignment: HeaderAlignment,
    pub header_tone: HeaderTone,
    pub show_footer: bool,
    pub footer_link: String,
    pub footer_style: FooterStyle,
    pub footer_size: FooterSize,
    pub theme: ThemeSelection,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Default for ScheduleDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            schedule_name: "Untitled schedule".into(),
            schedule_time_zone: "Europe/Paris".into(),
            export_size_id: "story".into(),
            custom_vertical_size: CustomSize {
                width: 1080,
                height: 1920,
            },
            custom_horizontal_size: CustomSize {
                width: 1920,
                height: 1080,
            },
            show_header: false,
            header_title: "Weekly Schedule".into(),
            header_alignment: HeaderAlignment::Left,
            header_tone: HeaderTone::Bright,
            show_footer: true,
            footer_link: "twitch.tv/yourname".into(),
            footer_style: FooterStyle::Solid,
            footer_size: FooterSize::Regular,
            theme: ThemeSelection::default(),
            days: Vec::new(),
        }
    }
}

impl ScheduleDocument {
    pub fn validate(&self) -> SlateResult<()> {
        if self.version == 0 {
            return Err(SlateError::validation("version must be > 0"));
        }
        if self.days.len() > MAX_DAYS {
            return Err(SlateError::validation(format!(
                "a schedule holds at most {MAX_DAYS} days, got {}",
                self.days.len()
            )));
        }
        if self.custom_vertical_size.width == 0 || self.custom_vertical_size.height == 0 {
            return Err(SlateError::validation(
                "custom vertical size must be > 0 in both dimensions",
            ));
        }
        if self.custom_horizontal_size.width == 0 || self.custom_horizontal_size.height == 0 {
            return Err(SlateError::validation(
                "custom horizontal size must be > 0 in both dimensions",
            ));
        }

        let mut day_ids = BTreeSet::new();
        let mut stream_ids = BTreeSet::new();
        let mut slot_ids = BTreeSet::new();
        for day in &self.days {
            if !day_ids.insert(day.id.as_str()) {
                return Err(SlateError::validation(format!(
                    "duplicate day id '{}'",
                    day.id
                )));
            }
            for stream in &day.streams {
                if !stream_ids.insert(stream.id.as_str()) {
                    return Err(SlateError::validation(format!(
                        "duplicate stream id '{}'",
                        stream.id
                    )));
                }
                for slot in &stream.time_slots {
                    if !slot_ids.insert(slot.id.as_str()) {
                        return Err(SlateError::validation(format!(
                            "duplicate time slot id '{}'",
                            slot.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn find_day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == day_id)
    }

    pub fn find_day_mut(&mut self, day_id: &str) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.id == day_id)
    }
}

impl Day {
    pub fn find_stream_mut(&mut self, stream_id: &str) -> Option<&mut Stream> {
        self.streams.iter_mut().find(|s| s.id == stream_id)
    }
}

impl TimeSlot {
    pub fn new(id: String, zone_id: impl Into<String>) -> Self {
        Self {
            id,
            zone_id: zone_id.into(),
            custom: CustomSlot::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, zone: &str) -> TimeSlot {
        TimeSlot::new(id.to_string(), zone)
    }

    fn stream(id: &str, title: &str, slots: Vec<TimeSlot>) -> Stream {
        Stream {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail: String::new(),
            base_time: DEFAULT_BASE_TIME.to_string(),
            time_slots: slots,
        }
    }

    fn day(id: &str, label: &str, streams: Vec<Stream>) -> Day {
        Day {
            id: id.to_string(),
            label: label.to_string(),
            date_label: String::new(),
            is_off: false,
            streams,
        }
    }

    #[test]
    fn default_document_validates() {
        let doc = ScheduleDocument::default();
        assert!(doc.validate().is_ok());
        assert_eq!(doc.version, CURRENT_VERSION);
        assert!(doc.show_footer);
        assert!(!doc.show_header);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut doc = ScheduleDocument::default();
        doc.days = vec![
            day("day-1", "Monday", vec![]),
            day("day-1", "Tuesday", vec![]),
        ];
        assert!(doc.validate().is_err());

        let mut doc = ScheduleDocument::default();
        doc.days = vec![day(
            "day-1",
            "Monday",
            vec![stream(
                "stream-1",
                "a",
                vec![slot("slot-1", "uk"), slot("slot-1", "utc")],
            )],
        )];
        assert!(doc.validate().is_err());
    }

    #[test]
    fn more_than_seven_days_is_rejected() {
        let mut doc = ScheduleDocument::default();
        doc.days = (0..8)
            .map(|i| day(&format!("day-{i}"), "Day", vec![]))
            .collect();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn document_json_roundtrip() {
        let mut doc = ScheduleDocument::default();
        doc.days = vec![day(
            "day-1",
            "Tuesday",
            vec![stream("stream-1", "Ranked night", vec![slot("slot-1", "uk")])],
        )];
        let json = serde_json::to_string(&doc).unwrap();
        let back: ScheduleDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
