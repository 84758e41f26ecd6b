//! Fixed option catalogs: slot time zones, flag artwork, theme options and
//! export size presets. Unknown ids never fail a lookup; every catalog has a
//! default entry it degrades to.

pub mod flags;
pub mod sizes;
pub mod themes;
pub mod zones;

pub use flags::{FlagKey, flag_svg};
pub use sizes::{
    CUSTOM_LANDSCAPE_ID, CUSTOM_PORTRAIT_ID, ExportSizeOption, SizeChoice, export_size_options,
    resolve_export_canvas,
};
pub use themes::{
    CardStyleOption, FontPairOption, Theme, ThemeBackgroundOption, ThemeBorderOption,
    ThemeBorderWeightOption,
};
pub use zones::{SlotZoneOption, WEEKDAY_NAMES, slot_zone, slot_zone_options};
