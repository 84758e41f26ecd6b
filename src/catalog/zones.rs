use crate::catalog::flags::FlagKey;

/// One selectable slot time zone. `time_zone` is `None` for the manual-entry
/// option, whose display values come entirely from the slot's custom fields.
#[derive(Clone, Copy, Debug)]
pub struct SlotZoneOption {
    pub id: &'static str,
    pub label: &'static str,
    pub time_zone: Option<&'static str>,
    pub flag: FlagKey,
    pub description: &'static str,
}

pub const CUSTOM_ZONE_ID: &str = "custom";
pub const DEFAULT_ZONE_ID: &str = "uk";

const SLOT_ZONE_OPTIONS: &[SlotZoneOption] = &[
    SlotZoneOption {
        id: "uk",
        label: "UK",
        time_zone: Some("Europe/London"),
        flag: FlagKey::Uk,
        description: "Europe/London",
    },
    SlotZoneOption {
        id: "us-et",
        label: "US (ET)",
        time_zone: Some("America/New_York"),
        flag: FlagKey::Us,
        description: "America/New_York",
    },
    SlotZoneOption {
        id: "us-ct",
        label: "US (CT)",
        time_zone: Some("America/Chicago"),
        flag: FlagKey::Us,
        description: "America/Chicago",
    },
    SlotZoneOption {
        id: "us-mt",
        label: "US (MT)",
        time_zone: Some("America/Denver"),
        flag: FlagKey::Us,
        description: "America/Denver",
    },
    SlotZoneOption {
        id: "us-pt",
        label: "US (PT)",
        time_zone: Some("America/Los_Angeles"),
        flag: FlagKey::Us,
        description: "America/Los_Angeles",
    },
    SlotZoneOption {
        id: "cet",
        label: "Central Europe",
        time_zone: Some("Europe/Paris"),
        flag: FlagKey::Eu,
        description: "Europe/Paris",
    },
    SlotZoneOption {
        id: "fr",
        label: "France",
        time_zone: Some("Europe/Paris"),
        flag: FlagKey::Fr,
        description: "Europe/Paris",
    },
    SlotZoneOption {
        id: "de",
        label: "Germany",
        time_zone: Some("Europe/Berlin"),
        flag: FlagKey::De,
        description: "Europe/Berlin",
    },
    SlotZoneOption {
        id: "es",
        label: "Spain",
        time_zone: Some("Europe/Madrid"),
        flag: FlagKey::Es,
        description: "Europe/Madrid",
    },
    SlotZoneOption {
        id: "it",
        label: "Italy",
        time_zone: Some("Europe/Rome"),
        flag: FlagKey::It,
        description: "Europe/Rome",
    },
    SlotZoneOption {
        id: "br",
        label: "Brazil",
        time_zone: Some("America/Sao_Paulo"),
        flag: FlagKey::Br,
        description: "America/Sao_Paulo",
    },
    SlotZoneOption {
        id: "in",
        label: "India",
        time_zone: Some("Asia/Kolkata"),
        flag: FlagKey::In,
        description: "Asia/Kolkata",
    },
    SlotZoneOption {
        id: "kr",
        label: "Korea",
        time_zone: Some("Asia/Seoul"),
        flag: FlagKey::Kr,
        description: "Asia/Seoul",
    },
    SlotZoneOption {
        id: "utc",
        label: "UTC",
        time_zone: Some("UTC"),
        flag: FlagKey::Globe,
        description: "UTC",
    },
    SlotZoneOption {
        id: "jst",
        label: "Japan",
        time_zone: Some("Asia/Tokyo"),
        flag: FlagKey::Jp,
        description: "Asia/Tokyo",
    },
    SlotZoneOption {
        id: "aet",
        label: "Australia",
        time_zone: Some("Australia/Sydney"),
        flag: FlagKey::Au,
        description: "Australia/Sydney",
    },
    SlotZoneOption {
        id: CUSTOM_ZONE_ID,
        label: "Custom",
        time_zone: None,
        flag: FlagKey::Globe,
        description: "Manual entry",
    },
];

pub fn slot_zone_options() -> &'static [SlotZoneOption] {
    SLOT_ZONE_OPTIONS
}

/// Catalog lookup by id. Unknown ids display through the slot's custom
/// fields, so this returns `None` rather than guessing a zone.
pub fn slot_zone(id: &str) -> Option<&'static SlotZoneOption> {
    SLOT_ZONE_OPTIONS.iter().find(|z| z.id == id)
}

pub fn is_known_zone_id(id: &str) -> bool {
    SLOT_ZONE_OPTIONS.iter().any(|z| z.id == id)
}

/// IANA zones offered for the schedule's authoring zone.
pub const SCHEDULE_ZONE_IDS: &[(&str, &str)] = &[
    ("Europe/Paris", "Paris (CET)"),
    ("Europe/London", "London (UK)"),
    ("America/New_York", "US Eastern (ET)"),
    ("America/Chicago", "US Central (CT)"),
    ("America/Denver", "US Mountain (MT)"),
    ("America/Los_Angeles", "US Pacific (PT)"),
    ("Asia/Tokyo", "Tokyo (JST)"),
    ("Australia/Sydney", "Sydney (AET)"),
    ("UTC", "UTC"),
];

/// Weekday cycle used when naming newly added days.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_ids_are_unique() {
        for (i, a) in SLOT_ZONE_OPTIONS.iter().enumerate() {
            for b in &SLOT_ZONE_OPTIONS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn only_custom_lacks_a_time_zone() {
        for z in SLOT_ZONE_OPTIONS {
            assert_eq!(z.time_zone.is_none(), z.id == CUSTOM_ZONE_ID);
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(slot_zone("nope").is_none());
        assert_eq!(slot_zone("jst").unwrap().time_zone, Some("Asia/Tokyo"));
        assert_eq!(slot_zone(DEFAULT_ZONE_ID).unwrap().label, "UK");
    }
}
