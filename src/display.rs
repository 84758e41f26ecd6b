//! Resolution of a document into the display values the layout engine and
//! scene builder consume: slot labels, zone-converted times and flags are
//! fixed here so everything downstream is pure.

use chrono::{DateTime, Utc};

use crate::{
    catalog::{flags::FlagKey, zones},
    model::{
        FooterSize, FooterStyle, HeaderAlignment, HeaderTone, ScheduleDocument, TimeSlot,
    },
    time::{TIME_PLACEHOLDER, resolve_slot_time_at},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotDisplay {
    pub label: String,
    pub time_text: String,
    pub flag: FlagKey,
    pub emoji: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayStream {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub slots: Vec<SlotDisplay>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayDay {
    pub id: String,
    pub label: String,
    pub date_label: String,
    pub is_off: bool,
    pub streams: Vec<DisplayStream>,
}

/// Everything the renderer needs, with all time resolution already done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySchedule {
    pub days: Vec<DisplayDay>,
    pub show_header: bool,
    pub header_title: String,
    pub header_alignment: HeaderAlignment,
    pub header_tone: HeaderTone,
    pub show_footer: bool,
    pub footer_link: String,
    pub footer_style: FooterStyle,
    pub footer_size: FooterSize,
}

impl DisplaySchedule {
    pub fn resolve(doc: &ScheduleDocument) -> Self {
        Self::resolve_at(doc, Utc::now())
    }

    /// Deterministic seam: resolves against an explicit instant.
    pub fn resolve_at(doc: &ScheduleDocument, now: DateTime<Utc>) -> Self {
        let days = doc
            .days
            .iter()
            .map(|day| DisplayDay {
                id: day.id.clone(),
                label: day.label.clone(),
                date_label: day.date_label.clone(),
                is_off: day.is_off,
                streams: day
                    .streams
                    .iter()
                    .map(|stream| DisplayStream {
                        id: stream.id.clone(),
                        title: stream.title.clone(),
                        thumbnail: stream.thumbnail.clone(),
                        slots: stream
                            .time_slots
                            .iter()
                            .map(|slot| {
                                slot_display(slot, &stream.base_time, &doc.schedule_time_zone, now)
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            days,
            show_header: doc.show_header,
            header_title: doc.header_title.clone(),
            header_alignment: doc.header_alignment,
            header_tone: doc.header_tone,
            show_footer: doc.show_footer,
            footer_link: doc.footer_link.clone(),
            footer_style: doc.footer_style,
            footer_size: doc.footer_size,
        }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

/// A slot with a catalog zone derives label/time/flag from the catalog and
/// the base time. A "custom" slot (or one whose zone id the catalog no
/// longer knows) displays its manual fields verbatim.
pub fn slot_display(
    slot: &TimeSlot,
    base_time: &str,
    schedule_zone: &str,
    now: DateTime<Utc>,
) -> SlotDisplay {
    let custom_fallback = |slot: &TimeSlot| SlotDisplay {
        label: if !slot.custom.label.is_empty() {
            slot.custom.label.clone()
        } else if !slot.custom.zone_name.is_empty() {
            slot.custom.zone_name.clone()
        } else {
            "Custom".to_string()
        },
        time_text: if slot.custom.time_text.is_empty() {
            TIME_PLACEHOLDER.to_string()
        } else {
            slot.custom.time_text.clone()
        },
        flag: slot.custom.flag,
        emoji: slot.custom.emoji.clone(),
    };

    let Some(zone) = zones::slot_zone(&slot.zone_id) else {
        return custom_fallback(slot);
    };
    let Some(zone_name) = zone.time_zone else {
        return custom_fallback(slot);
    };

    let time_text = resolve_slot_time_at(now, base_time, schedule_zone, zone_name)
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string());

    SlotDisplay {
        label: zone.label.to_string(),
        time_text,
        flag: zone.flag,
        emoji: String::new(),
    }
}
