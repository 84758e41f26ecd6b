//! The layout engine. Turns a resolved schedule plus a canvas size into a
//! plan of absolute pixel rectangles and font sizes, fully deterministically.
//! Nothing here touches IO or the clock; the preview scale a window applies
//! on top of a plan is computed separately and never feeds back into one.

pub mod landscape;
pub mod portrait;
pub mod scale;

use crate::{
    catalog::flags::FlagKey,
    core::{Canvas, Orientation, Rect},
    display::DisplaySchedule,
    model::{FooterSize, FooterStyle, HeaderAlignment, HeaderTone},
};

/// Whether edit affordances (add-day buttons, slot placeholders) are laid
/// out. Exports never carry them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Edit,
    Export,
}

impl RenderMode {
    pub fn shows_add_controls(self) -> bool {
        matches!(self, RenderMode::Edit)
    }
}

/// A block of text with a known box. `max_lines` is a hard clamp; the
/// renderer ellipsizes past it.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub rect: Rect,
    pub text: String,
    pub font_size: f64,
    pub line_height: f64,
    pub max_lines: u32,
}

/// A fully rounded badge: the Live marker, a date chip. `dot_size` of zero
/// means no leading dot.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgePlan {
    pub rect: Rect,
    pub text: String,
    pub font_size: f64,
    pub dot_size: f64,
    pub gap: f64,
    pub pad_x: f64,
}

impl BadgePlan {
    /// Badges are drawn fully rounded.
    pub fn radius(&self) -> f64 {
        self.rect.height() / 2.0
    }
}

/// One time-slot pill. A placeholder pill ("Add time slot") carries an empty
/// `time` and no flag; a custom slot with an emoji shows the emoji where the
/// flag would sit.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotPill {
    pub rect: Rect,
    pub radius: f64,
    pub label: String,
    pub label_font: f64,
    pub time: String,
    pub time_font: f64,
    pub flag: Option<FlagKey>,
    pub emoji: Option<String>,
    pub flag_width: f64,
    pub flag_height: f64,
    pub emoji_font: f64,
    pub gap: f64,
    pub pad_x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddButtonPlan {
    pub rect: Rect,
    pub radius: f64,
    pub label: String,
    pub font_size: f64,
    pub plus_font: f64,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmptyStatePlan {
    pub rect: Rect,
    pub radius: f64,
    pub text: String,
    pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderPlan {
    pub rect: Rect,
    pub text: String,
    pub font_size: f64,
    pub line_height: f64,
    pub max_lines: u32,
    pub pad_bottom: f64,
    pub alignment: HeaderAlignment,
    pub tone: HeaderTone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FooterPlan {
    pub rect: Rect,
    pub text: String,
    pub font_size: f64,
    pub dot_size: f64,
    pub dot_ring: f64,
    pub gap: f64,
    pub style: FooterStyle,
    pub size: FooterSize,
}

impl FooterPlan {
    pub fn radius(&self) -> f64 {
        self.rect.height() / 2.0
    }
}

/// A portrait day card. The header row (day name, optional date chip) is
/// shared; the body depends on how many streams the day carries.
#[derive(Clone, Debug, PartialEq)]
pub struct DayCard {
    pub day_id: String,
    pub rect: Rect,
    pub radius: f64,
    pub name: TextBlock,
    pub date: Option<BadgePlan>,
    pub kind: DayCardKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DayCardKind {
    Off {
        thumb: Rect,
        thumb_radius: f64,
        note: TextBlock,
    },
    Single {
        thumb: Rect,
        thumb_radius: f64,
        thumbnail: String,
        live: BadgePlan,
        title: TextBlock,
        pills: Vec<SlotPill>,
    },
    Multi {
        streams: Vec<StreamBox>,
    },
}

/// One stream column inside a multi-stream portrait card.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamBox {
    pub rect: Rect,
    pub radius: f64,
    pub thumbnail: String,
    pub title: TextBlock,
    pub pills: Vec<SlotPill>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortraitBody {
    /// The content column after horizontal padding.
    pub content_rect: Rect,
    pub empty_state: Option<EmptyStatePlan>,
    pub add_top: Option<AddButtonPlan>,
    pub add_bottom: Option<AddButtonPlan>,
    pub cards: Vec<DayCard>,
}

/// A landscape day tile.
#[derive(Clone, Debug, PartialEq)]
pub struct DayTile {
    pub day_id: String,
    pub rect: Rect,
    pub radius: f64,
    pub name: TextBlock,
    pub kind: DayTileKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DayTileKind {
    Off {
        note: TextBlock,
    },
    Single {
        thumbnail: String,
        live: BadgePlan,
        date: BadgePlan,
        title: TextBlock,
        pills: Vec<SlotPill>,
    },
    Multi {
        live: BadgePlan,
        date: BadgePlan,
        streams: Vec<TileStream>,
    },
}

/// One stacked stream panel inside a multi-stream landscape tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileStream {
    pub rect: Rect,
    pub radius: f64,
    pub thumbnail: String,
    pub title: TextBlock,
    pub pills: Vec<SlotPill>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LandscapeBody {
    pub content_rect: Rect,
    pub empty_state: Option<EmptyStatePlan>,
    pub empty_add: Option<AddButtonPlan>,
    pub add_left: Option<AddButtonPlan>,
    pub add_right: Option<AddButtonPlan>,
    pub tiles: Vec<DayTile>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyPlan {
    Portrait(PortraitBody),
    Landscape(LandscapeBody),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    pub canvas: Canvas,
    pub orientation: Orientation,
    /// Corner radius of the frame the whole composition is clipped to.
    pub frame_radius: f64,
    pub header: Option<HeaderPlan>,
    pub footer: Option<FooterPlan>,
    pub body: BodyPlan,
}

/// Corner rounding of the outer frame, fixed across canvas sizes.
pub const FRAME_RADIUS: f64 = 38.0;

/// Computes the full layout for a resolved schedule. Portrait and landscape
/// canvases lay out through entirely separate paths; a square canvas takes
/// the portrait one.
#[tracing::instrument(skip_all, fields(w = canvas.width, h = canvas.height, days = schedule.day_count()))]
pub fn compute_layout(schedule: &DisplaySchedule, canvas: Canvas, mode: RenderMode) -> LayoutPlan {
    compute_layout_for(schedule, canvas, Orientation::of(canvas), mode)
}

/// Like [`compute_layout`] but with the orientation pinned by the caller.
/// Custom export sizes keep the author's stated orientation even when the
/// entered pixel sizes disagree with it.
pub fn compute_layout_for(
    display: &DisplaySchedule,
    canvas: Canvas,
    orientation: Orientation,
    mode: RenderMode,
) -> LayoutPlan {
    match orientation {
        Orientation::Portrait => portrait::plan(display, canvas, mode),
        Orientation::Landscape => landscape::plan(display, canvas, mode),
    }
}

/// The scale a preview window applies to fit the canvas, capped at 1 so a
/// large window never magnifies. Presentation only; plans never see it.
pub fn preview_scale(window_width: f64, window_height: f64, canvas: Canvas) -> f64 {
    if !window_width.is_finite() || !window_height.is_finite() {
        return 1.0;
    }
    if window_width <= 0.0 || window_height <= 0.0 {
        return 1.0;
    }
    let s = (window_width / canvas.width_f64())
        .min(window_height / canvas.height_f64())
        .min(1.0);
    (s * 10_000.0).round() / 10_000.0
}

impl LayoutPlan {
    /// Every rectangle in the plan, used to validate geometric invariants.
    pub fn rects(&self) -> Vec<Rect> {
        let mut out = Vec::new();
        if let Some(h) = &self.header {
            out.push(h.rect);
        }
        if let Some(f) = &self.footer {
            out.push(f.rect);
        }
        match &self.body {
            BodyPlan::Portrait(body) => {
                out.push(body.content_rect);
                if let Some(e) = &body.empty_state {
                    out.push(e.rect);
                }
                for add in [&body.add_top, &body.add_bottom].into_iter().flatten() {
                    out.push(add.rect);
                }
                for card in &body.cards {
                    out.push(card.rect);
                    out.push(card.name.rect);
                    if let Some(date) = &card.date {
                        out.push(date.rect);
                    }
                    match &card.kind {
                        DayCardKind::Off { thumb, note, .. } => {
                            out.push(*thumb);
                            out.push(note.rect);
                        }
                        DayCardKind::Single {
                            thumb,
                            live,
                            title,
                            pills,
                            ..
                        } => {
                            out.push(*thumb);
                            out.push(live.rect);
                            out.push(title.rect);
                            out.extend(pills.iter().map(|p| p.rect));
                        }
                        DayCardKind::Multi { streams } => {
                            for s in streams {
                                out.push(s.rect);
                                out.push(s.title.rect);
                                out.extend(s.pills.iter().map(|p| p.rect));
                            }
                        }
                    }
                }
            }
            BodyPlan::Landscape(body) => {
                out.push(body.content_rect);
                if let Some(e) = &body.empty_state {
                    out.push(e.rect);
                }
                for add in [&body.empty_add, &body.add_left, &body.add_right]
                    .into_iter()
                    .flatten()
                {
                    out.push(add.rect);
                }
                for tile in &body.tiles {
                    out.push(tile.rect);
                    out.push(tile.name.rect);
                    match &tile.kind {
                        DayTileKind::Off { note } => out.push(note.rect),
                        DayTileKind::Single {
                            live,
                            date,
                            title,
                            pills,
                            ..
                        } => {
                            out.push(live.rect);
                            out.push(date.rect);
                            out.push(title.rect);
                            out.extend(pills.iter().map(|p| p.rect));
                        }
                        DayTileKind::Multi { live, date, streams } => {
                            out.push(live.rect);
                            out.push(date.rect);
                            for s in streams {
                                out.push(s.rect);
                                out.push(s.title.rect);
                                out.extend(s.pills.iter().map(|p| p.rect));
                            }
                        }
                    }
                }
            }
        }
        out
    }

    pub fn day_cards(&self) -> usize {
        match &self.body {
            BodyPlan::Portrait(body) => body.cards.len(),
            BodyPlan::Landscape(body) => body.tiles.len(),
        }
    }
}
