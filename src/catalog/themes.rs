use crate::model::ThemeSelection;

/// Straight (non-premultiplied) RGBA8. Theme colors stay straight until the
/// scene builder converts them for the raster path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// One soft radial glow layered over the vertical base gradient. Center is in
/// canvas fractions, radii in pixels at the design size (scaled with the
/// canvas at render time), `fade` is the fraction of the radius where the
/// glow reaches full transparency.
#[derive(Clone, Copy, Debug)]
pub struct Glow {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub color: Rgba,
    pub fade: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct ThemeBackgroundOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub glows: [Glow; 2],
    pub base_top: Rgba,
    pub base_bottom: Rgba,
    /// 135-degree overlay laid over thumbnail placeholders.
    pub thumb_overlay: (Rgba, Rgba),
}

#[derive(Clone, Copy, Debug)]
pub struct FontPairOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// CSS-style family stacks, resolved through the text engine.
    pub body: &'static str,
    pub heading: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct CardStyleOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub surface: Rgba,
    pub surface_strong: Rgba,
}

#[derive(Clone, Copy, Debug)]
pub struct ThemeBorderOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub frame_radius: f64,
    pub card_radius: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct ThemeBorderWeightOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub frame_border_width: f64,
    pub card_border_width: f64,
}

/// Accent colors shared by every theme.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub accent: Rgba,
    pub accent_soft: Rgba,
    pub accent_glow: Rgba,
    pub border: Rgba,
    pub live: Rgba,
    pub live_glow: Rgba,
}

pub const PALETTE: Palette = Palette {
    accent: Rgba::opaque(56, 189, 248),
    accent_soft: Rgba::new(56, 189, 248, 51),
    accent_glow: Rgba::new(56, 189, 248, 140),
    border: Rgba::new(255, 255, 255, 56),
    live: Rgba::opaque(248, 113, 113),
    live_glow: Rgba::new(248, 113, 113, 51),
};

const BACKGROUNDS: &[ThemeBackgroundOption] = &[
    ThemeBackgroundOption {
        id: "nebula",
        label: "Nebula",
        description: "Violet and cyan haze",
        glows: [
            Glow {
                cx: 0.22,
                cy: 0.14,
                rx: 820.0,
                ry: 560.0,
                color: Rgba::new(124, 58, 237, 71),
                fade: 0.64,
            },
            Glow {
                cx: 0.84,
                cy: 0.22,
                rx: 820.0,
                ry: 600.0,
                color: Rgba::new(34, 211, 238, 41),
                fade: 0.66,
            },
        ],
        base_top: Rgba::opaque(9, 7, 24),
        base_bottom: Rgba::opaque(11, 7, 34),
        thumb_overlay: (Rgba::new(124, 58, 237, 51), Rgba::new(34, 211, 238, 36)),
    },
    ThemeBackgroundOption {
        id: "sunset",
        label: "Sunset",
        description: "Warm orange glow",
        glows: [
            Glow {
                cx: 0.20,
                cy: 0.16,
                rx: 820.0,
                ry: 560.0,
                color: Rgba::new(251, 146, 60, 71),
                fade: 0.64,
            },
            Glow {
                cx: 0.82,
                cy: 0.20,
                rx: 760.0,
                ry: 560.0,
                color: Rgba::new(244, 63, 94, 56),
                fade: 0.60,
            },
        ],
        base_top: Rgba::opaque(20, 7, 16),
        base_bottom: Rgba::opaque(34, 10, 22),
        thumb_overlay: (Rgba::new(251, 146, 60, 51), Rgba::new(244, 63, 94, 41)),
    },
    ThemeBackgroundOption {
        id: "coast",
        label: "Coast",
        description: "Cool teal drift",
        glows: [
            Glow {
                cx: 0.20,
                cy: 0.16,
                rx: 820.0,
                ry: 560.0,
                color: Rgba::new(14, 165, 233, 66),
                fade: 0.64,
            },
            Glow {
                cx: 0.82,
                cy: 0.22,
                rx: 760.0,
                ry: 560.0,
                color: Rgba::new(45, 212, 191, 51),
                fade: 0.60,
            },
        ],
        base_top: Rgba::opaque(7, 12, 24),
        base_bottom: Rgba::opaque(9, 20, 32),
        thumb_overlay: (Rgba::new(14, 165, 233, 51), Rgba::new(45, 212, 191, 36)),
    },
    ThemeBackgroundOption {
        id: "graphite",
        label: "Graphite",
        description: "Minimal charcoal",
        glows: [
            Glow {
                cx: 0.18,
                cy: 0.18,
                rx: 760.0,
                ry: 500.0,
                color: Rgba::new(148, 163, 184, 51),
                fade: 0.60,
            },
            Glow {
                cx: 0.82,
                cy: 0.26,
                rx: 760.0,
                ry: 520.0,
                color: Rgba::new(71, 85, 105, 61),
                fade: 0.60,
            },
        ],
        base_top: Rgba::opaque(10, 12, 16),
        base_bottom: Rgba::opaque(20, 24, 30),
        thumb_overlay: (Rgba::new(148, 163, 184, 46), Rgba::new(71, 85, 105, 31)),
    },
    ThemeBackgroundOption {
        id: "garden",
        label: "Garden",
        description: "Fresh green glow",
        glows: [
            Glow {
                cx: 0.20,
                cy: 0.16,
                rx: 820.0,
                ry: 560.0,
                color: Rgba::new(34, 197, 94, 61),
                fade: 0.64,
            },
            Glow {
                cx: 0.82,
                cy: 0.24,
                rx: 760.0,
                ry: 560.0,
                color: Rgba::new(132, 204, 22, 51),
                fade: 0.60,
            },
        ],
        base_top: Rgba::opaque(8, 16, 12),
        base_bottom: Rgba::opaque(12, 24, 16),
        thumb_overlay: (Rgba::new(34, 197, 94, 51), Rgba::new(132, 204, 22, 36)),
    },
];

const FONT_PAIRS: &[FontPairOption] = &[
    FontPairOption {
        id: "grotesk-fraunces",
        label: "Grotesk / Fraunces",
        description: "Clean body, serif accents",
        body: "Space Grotesk, Segoe UI, sans-serif",
        heading: "Fraunces, Space Grotesk, serif",
    },
    FontPairOption {
        id: "fraunces-grotesk",
        label: "Fraunces / Grotesk",
        description: "Serif body, clean accents",
        body: "Fraunces, Space Grotesk, serif",
        heading: "Space Grotesk, Segoe UI, sans-serif",
    },
    FontPairOption {
        id: "grotesk-only",
        label: "Grotesk only",
        description: "Mono sans look",
        body: "Space Grotesk, Segoe UI, sans-serif",
        heading: "Space Grotesk, Segoe UI, sans-serif",
    },
    FontPairOption {
        id: "fraunces-only",
        label: "Fraunces only",
        description: "Bold editorial",
        body: "Fraunces, Space Grotesk, serif",
        heading: "Fraunces, Space Grotesk, serif",
    },
    FontPairOption {
        id: "sora-playfair",
        label: "Sora / Playfair",
        description: "Geometric body, classic display",
        body: "Sora, Segoe UI, sans-serif",
        heading: "Playfair Display, Fraunces, serif",
    },
    FontPairOption {
        id: "playfair-sora",
        label: "Playfair / Sora",
        description: "Editorial body, crisp sans",
        body: "Playfair Display, Fraunces, serif",
        heading: "Sora, Space Grotesk, sans-serif",
    },
    FontPairOption {
        id: "manrope-fraunces",
        label: "Manrope / Fraunces",
        description: "Friendly sans, elegant serif",
        body: "Manrope, Segoe UI, sans-serif",
        heading: "Fraunces, Playfair Display, serif",
    },
    FontPairOption {
        id: "manrope-only",
        label: "Manrope only",
        description: "Modern sans focus",
        body: "Manrope, Segoe UI, sans-serif",
        heading: "Manrope, Segoe UI, sans-serif",
    },
    FontPairOption {
        id: "sora-only",
        label: "Sora only",
        description: "Crisp geometric sans",
        body: "Sora, Segoe UI, sans-serif",
        heading: "Sora, Segoe UI, sans-serif",
    },
];

const CARD_STYLES: &[CardStyleOption] = &[
    CardStyleOption {
        id: "glass",
        label: "Glass",
        description: "Airy and translucent",
        surface: Rgba::new(255, 255, 255, 20),
        surface_strong: Rgba::new(255, 255, 255, 41),
    },
    CardStyleOption {
        id: "mist",
        label: "Mist",
        description: "Smoky contrast",
        surface: Rgba::new(15, 23, 42, 89),
        surface_strong: Rgba::new(15, 23, 42, 140),
    },
    CardStyleOption {
        id: "crisp",
        label: "Crisp",
        description: "Bright edges",
        surface: Rgba::new(255, 255, 255, 31),
        surface_strong: Rgba::new(255, 255, 255, 56),
    },
];

const BORDERS: &[ThemeBorderOption] = &[
    ThemeBorderOption {
        id: "soft",
        label: "Soft",
        description: "Rounded corners",
        frame_radius: 38.0,
        card_radius: 28.0,
    },
    ThemeBorderOption {
        id: "sharp",
        label: "Sharp",
        description: "Tighter cuts",
        frame_radius: 22.0,
        card_radius: 16.0,
    },
    ThemeBorderOption {
        id: "pill",
        label: "Pill",
        description: "Extra round",
        frame_radius: 58.0,
        card_radius: 40.0,
    },
];

const BORDER_WEIGHTS: &[ThemeBorderWeightOption] = &[
    ThemeBorderWeightOption {
        id: "hairline",
        label: "Hairline",
        description: "1px strokes",
        frame_border_width: 1.0,
        card_border_width: 1.0,
    },
    ThemeBorderWeightOption {
        id: "medium",
        label: "Medium",
        description: "2px strokes",
        frame_border_width: 2.0,
        card_border_width: 2.0,
    },
    ThemeBorderWeightOption {
        id: "bold",
        label: "Bold",
        description: "3px strokes",
        frame_border_width: 3.0,
        card_border_width: 3.0,
    },
];

pub fn background_options() -> &'static [ThemeBackgroundOption] {
    BACKGROUNDS
}

pub fn font_pair_options() -> &'static [FontPairOption] {
    FONT_PAIRS
}

pub fn card_style_options() -> &'static [CardStyleOption] {
    CARD_STYLES
}

pub fn border_options() -> &'static [ThemeBorderOption] {
    BORDERS
}

pub fn border_weight_options() -> &'static [ThemeBorderWeightOption] {
    BORDER_WEIGHTS
}

fn find_or_first<T>(options: &'static [T], pred: impl Fn(&T) -> bool) -> &'static T {
    options.iter().find(|o| pred(o)).unwrap_or(&options[0])
}

/// A fully resolved theme. Unknown ids in the selection fall back to the
/// first catalog entry, so this never fails.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: &'static ThemeBackgroundOption,
    pub fonts: &'static FontPairOption,
    pub card_style: &'static CardStyleOption,
    pub border: &'static ThemeBorderOption,
    pub border_weight: &'static ThemeBorderWeightOption,
    pub palette: Palette,
}

impl Theme {
    pub fn resolve(selection: &ThemeSelection) -> Self {
        Self {
            background: find_or_first(BACKGROUNDS, |o| o.id == selection.background_id),
            fonts: find_or_first(FONT_PAIRS, |o| o.id == selection.font_pair_id),
            card_style: find_or_first(CARD_STYLES, |o| o.id == selection.card_style_id),
            border: find_or_first(BORDERS, |o| o.id == selection.border_shape_id),
            border_weight: find_or_first(BORDER_WEIGHTS, |o| o.id == selection.border_weight_id),
            palette: PALETTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_resolve_to_catalog_defaults() {
        let theme = Theme::resolve(&ThemeSelection {
            background_id: "no-such".into(),
            font_pair_id: "no-such".into(),
            card_style_id: "no-such".into(),
            border_shape_id: "no-such".into(),
            border_weight_id: "no-such".into(),
        });
        assert_eq!(theme.background.id, "nebula");
        assert_eq!(theme.fonts.id, "grotesk-fraunces");
        assert_eq!(theme.card_style.id, "glass");
        assert_eq!(theme.border.id, "soft");
        assert_eq!(theme.border_weight.id, "hairline");
    }

    #[test]
    fn known_ids_resolve_exactly() {
        let theme = Theme::resolve(&ThemeSelection {
            background_id: "garden".into(),
            font_pair_id: "sora-only".into(),
            card_style_id: "mist".into(),
            border_shape_id: "pill".into(),
            border_weight_id: "bold".into(),
        });
        assert_eq!(theme.background.id, "garden");
        assert_eq!(theme.border.frame_radius, 58.0);
        assert_eq!(theme.border_weight.card_border_width, 3.0);
    }
}
