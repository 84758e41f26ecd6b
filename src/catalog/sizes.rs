use crate::{
    core::{Canvas, Orientation},
    model::ScheduleDocument,
};

pub const CUSTOM_PORTRAIT_ID: &str = "custom-vertical";
pub const CUSTOM_LANDSCAPE_ID: &str = "custom-horizontal";
pub const DEFAULT_SIZE_ID: &str = "story";

#[derive(Clone, Copy, Debug)]
pub struct ExportSizeOption {
    pub id: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

const EXPORT_SIZES: &[ExportSizeOption] = &[
    ExportSizeOption {
        id: "story",
        label: "Story",
        width: 1080,
        height: 1920,
    },
    ExportSizeOption {
        id: "youtube",
        label: "YouTube post",
        width: 1280,
        height: 720,
    },
    ExportSizeOption {
        id: "x-vertical",
        label: "X vertical",
        width: 1080,
        height: 1920,
    },
    ExportSizeOption {
        id: "x-horizontal",
        label: "X horizontal",
        width: 1600,
        height: 900,
    },
];

pub fn export_size_options() -> &'static [ExportSizeOption] {
    EXPORT_SIZES
}

pub fn is_known_size_id(id: &str) -> bool {
    id == CUSTOM_PORTRAIT_ID
        || id == CUSTOM_LANDSCAPE_ID
        || EXPORT_SIZES.iter().any(|s| s.id == id)
}

/// The canvas and orientation a document exports at. Presets derive their
/// orientation from the aspect ratio; the two custom kinds carry the
/// author's orientation even when the entered pixel sizes disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeChoice {
    pub canvas: Canvas,
    pub orientation: Orientation,
    pub label: &'static str,
}

pub fn resolve_export_canvas(doc: &ScheduleDocument) -> SizeChoice {
    match doc.export_size_id.as_str() {
        CUSTOM_PORTRAIT_ID => SizeChoice {
            canvas: Canvas {
                width: doc.custom_vertical_size.width.max(1),
                height: doc.custom_vertical_size.height.max(1),
            },
            orientation: Orientation::Portrait,
            label: "Custom vertical",
        },
        CUSTOM_LANDSCAPE_ID => SizeChoice {
            canvas: Canvas {
                width: doc.custom_horizontal_size.width.max(1),
                height: doc.custom_horizontal_size.height.max(1),
            },
            orientation: Orientation::Landscape,
            label: "Custom horizontal",
        },
        id => {
            let preset = EXPORT_SIZES
                .iter()
                .find(|s| s.id == id)
                .unwrap_or(&EXPORT_SIZES[0]);
            let canvas = Canvas {
                width: preset.width,
                height: preset.height,
            };
            SizeChoice {
                canvas,
                orientation: Orientation::of(canvas),
                label: preset.label,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleDocument;

    #[test]
    fn presets_resolve_by_aspect() {
        let mut doc = ScheduleDocument::default();
        doc.export_size_id = "youtube".into();
        let choice = resolve_export_canvas(&doc);
        assert_eq!(choice.canvas.width, 1280);
        assert_eq!(choice.orientation, Orientation::Landscape);
    }

    #[test]
    fn custom_vertical_keeps_portrait_even_when_wide() {
        let mut doc = ScheduleDocument::default();
        doc.export_size_id = CUSTOM_PORTRAIT_ID.into();
        doc.custom_vertical_size.width = 2000;
        doc.custom_vertical_size.height = 1000;
        let choice = resolve_export_canvas(&doc);
        assert_eq!(choice.orientation, Orientation::Portrait);
        assert_eq!(choice.canvas.width, 2000);
    }

    #[test]
    fn unknown_preset_degrades_to_story() {
        let mut doc = ScheduleDocument::default();
        doc.export_size_id = "betamax".into();
        let choice = resolve_export_canvas(&doc);
        assert_eq!(choice.canvas.height, 1920);
        assert_eq!(choice.label, "Story");
    }
}
