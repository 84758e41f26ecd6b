//! Landscape layout: one row of day tiles between an optional header and
//! footer. Tiles share the row through weights (off days narrower, add
//! columns narrowest) and shrink together as days accumulate.

use crate::{
    core::{Canvas, Orientation, Rect, clamp_f64},
    display::{DisplayDay, DisplaySchedule, DisplayStream, SlotDisplay},
    layout::{
        AddButtonPlan, BadgePlan, BodyPlan, DayTile, DayTileKind, EmptyStatePlan, FRAME_RADIUS,
        FooterPlan, HeaderPlan, LandscapeBody, LayoutPlan, RenderMode, SlotPill, TextBlock,
        TileStream,
        scale::{
            AxisScales, LANDSCAPE_DESIGN_HEIGHT, LANDSCAPE_DESIGN_WIDTH, approx_text_width,
            line_count, shrink_to_fit,
        },
    },
    model::FooterSize,
};

const PADDING: f64 = 28.0;
const GAP: f64 = 14.0;
const HEADER_SIZE: f64 = 42.0;
const MIN_HEADER_SIZE: f64 = 26.0;
const HEADER_MAX_CHARS: f64 = 64.0;
const HEADER_CHARS_PER_LINE: f64 = 26.0;
const TILE_PADDING: f64 = 12.0;
const TILE_RADIUS: f64 = 20.0;
const DAY_NAME_SIZE: f64 = 14.0;
const DATE_SIZE: f64 = 13.0;
const LIVE_SIZE: f64 = 13.0;
const TITLE_SIZE: f64 = 24.0;
const TZ_SIZE: f64 = 14.0;
const TIME_SIZE: f64 = 16.0;
const PILL_RADIUS: f64 = 16.0;
const PILL_MIN_HEIGHT: f64 = 46.0;
const FLAG_WIDTH: f64 = 22.0;
const FLAG_HEIGHT: f64 = 16.0;
const FOOTER_MIN_HEIGHT: f64 = 52.0;
const STREAM_PANEL_RADIUS: f64 = 16.0;

const EMPTY_TEXT: &str = "No days yet. Add your first day to get started.";
const UNTITLED_STREAM: &str = "Untitled stream";
const OFF_NOTE: &str = "No streams scheduled";

pub(crate) fn plan(display: &DisplaySchedule, canvas: Canvas, mode: RenderMode) -> LayoutPlan {
    let w = canvas.width_f64();
    let h = canvas.height_f64();
    let axes = AxisScales::new(w, h, LANDSCAPE_DESIGN_WIDTH, LANDSCAPE_DESIGN_HEIGHT);
    let ls = axes.unit();

    let day_count = display.days.len();
    let show_add = mode.shows_add_controls();

    let padding = PADDING * ls;
    let gap = GAP * ls;
    let inner = Rect::new(padding, padding, w - padding, h - padding);

    // Header.
    let header_text = non_empty(&display.header_title, "Weekly Schedule");
    let header_len = header_text.trim().chars().count();
    let max_chars = 36.0_f64.max((HEADER_MAX_CHARS * axes.x).round()) as usize;
    let cpl = 16.0_f64.max((HEADER_CHARS_PER_LINE * axes.x).round()) as usize;
    let header_font = shrink_to_fit(HEADER_SIZE * ls, MIN_HEADER_SIZE * ls, header_len, max_chars);
    let header_lines = line_count(header_len, cpl);
    let header_pad = (4.0 * ls).max((header_font * 0.14).round());
    let header_height = header_font * 1.14 * header_lines as f64 + header_pad;

    // Footer.
    let (f_pad_x, f_pad_y, f_font, f_gap, f_dot, f_ring) = match display.footer_size {
        FooterSize::Compact => (22.0, 12.0, 18.0, 10.0, 10.0, 6.0),
        FooterSize::Regular => (26.0, 16.0, 22.0, 14.0, 12.0, 8.0),
    };
    let footer_font = f_font * ls;
    let footer_dot = f_dot * ls;
    let footer_height =
        (footer_font.max(footer_dot) + 2.0 * f_pad_y * ls).max(FOOTER_MIN_HEIGHT * ls);

    let mut main_top = inner.y0;
    let mut main_bottom = inner.y1;
    let header = display.show_header.then(|| {
        let rect = Rect::new(inner.x0, main_top, inner.x1, main_top + header_height);
        main_top = rect.y1 + gap;
        HeaderPlan {
            rect,
            text: header_text.clone(),
            font_size: header_font,
            line_height: 1.14,
            max_lines: 3,
            pad_bottom: header_pad,
            alignment: display.header_alignment,
            tone: display.header_tone,
        }
    });
    let footer = display.show_footer.then(|| {
        let text = non_empty(&display.footer_link, "twitch.tv/yourname");
        let width =
            2.0 * f_pad_x * ls + footer_dot + f_gap * ls + approx_text_width(&text, footer_font);
        let x = (w - width) / 2.0;
        let y = inner.y1 - footer_height;
        main_bottom = y - gap;
        FooterPlan {
            rect: Rect::new(x, y, x + width, y + footer_height),
            text,
            font_size: footer_font,
            dot_size: footer_dot,
            dot_ring: f_ring * ls,
            gap: f_gap * ls,
            style: display.footer_style,
            size: display.footer_size,
        }
    });

    let main = Rect::new(inner.x0, main_top, inner.x1, main_bottom.max(main_top));

    let density_scale = clamp_f64(1.0 - (day_count as f64 - 4.0).max(0.0) * 0.06, 0.72, 1.0);
    let tile_scale = ls * density_scale;
    let tile_radius = TILE_RADIUS * tile_scale;
    let grid_gap = 10.0 * tile_scale;

    let mut empty_state = None;
    let mut empty_add = None;
    let mut add_left = None;
    let mut add_right = None;
    let mut tiles = Vec::with_capacity(day_count);

    if day_count == 0 {
        let font = (13.0 * ls).round();
        let box_h = font * 1.2 + 2.0 * 32.0 * axes.y;
        empty_state = Some(EmptyStatePlan {
            rect: Rect::new(main.x0, main.y0, main.x1, main.y0 + box_h),
            radius: 20.0 * ls,
            text: EMPTY_TEXT.to_string(),
            font_size: font,
        });
        if show_add {
            let y = main.y0 + box_h + gap;
            let add_h = 46.0 * ls;
            empty_add = Some(AddButtonPlan {
                rect: Rect::new(main.x0, y, main.x1, y + add_h),
                radius: 24.0,
                label: "Add your first day".to_string(),
                font_size: (11.0 * ls).round(),
                plus_font: (16.0 * ls).round(),
                enabled: true,
            });
        }
    } else {
        // The row splits by flex weight: an add column on each side when
        // editing, the tile strip between them.
        let add_weight = clamp_f64(0.07 - day_count as f64 * 0.004, 0.04, 0.08);
        let (strip_x, strip_w) = if show_add {
            let free = (main.width() - 2.0 * gap).max(0.0);
            let total = 2.0 * add_weight + 1.0;
            let add_w = free * add_weight / total;
            let strip_w = free / total;
            let make = |x: f64, label: &str| AddButtonPlan {
                rect: Rect::new(x, main.y0, x + add_w, main.y1),
                radius: tile_radius,
                label: label.to_string(),
                font_size: (11.0 * ls).round(),
                plus_font: (16.0 * ls).round(),
                enabled: day_count < crate::model::MAX_DAYS,
            };
            add_left = Some(make(main.x0, "Add day"));
            add_right = Some(make(main.x1 - add_w, "Add day"));
            (main.x0 + add_w + gap, strip_w)
        } else {
            (main.x0, main.width())
        };

        let off_weight = clamp_f64(0.8 - day_count as f64 * 0.04, 0.55, 0.85);
        let weights: Vec<f64> = display
            .days
            .iter()
            .map(|d| if d.is_off { off_weight } else { 1.0 })
            .collect();
        let weight_sum: f64 = weights.iter().sum();
        let free = (strip_w - grid_gap * (day_count as f64 - 1.0)).max(0.0);

        let mut x = strip_x;
        for (day, weight) in display.days.iter().zip(&weights) {
            let tw = free * weight / weight_sum;
            let rect = Rect::new(x, main.y0, x + tw, main.y1);
            tiles.push(day_tile(day, rect, tile_scale, tile_radius));
            x += tw + grid_gap;
        }
    }

    LayoutPlan {
        canvas,
        orientation: Orientation::Landscape,
        frame_radius: FRAME_RADIUS,
        header,
        footer,
        body: BodyPlan::Landscape(LandscapeBody {
            content_rect: main,
            empty_state,
            empty_add,
            add_left,
            add_right,
            tiles,
        }),
    }
}

fn day_tile(day: &DisplayDay, rect: Rect, ts: f64, radius: f64) -> DayTile {
    let tu = |v: f64| v * ts;
    let tf = |v: f64| (v * ts).round();
    let pad = if day.is_off {
        TILE_PADDING * ts * 0.7
    } else {
        TILE_PADDING * ts
    };
    let inner_x = rect.x0 + pad;
    let inner_w = (rect.width() - 2.0 * pad).max(0.0);

    let name_font = tf(DAY_NAME_SIZE);
    let name_y = rect.y0 + pad + tu(2.0);
    let name = TextBlock {
        rect: Rect::new(inner_x, name_y, inner_x + inner_w, name_y + name_font * 1.2),
        text: day.label.clone(),
        font_size: name_font,
        line_height: 1.2,
        max_lines: 1,
    };

    if day.is_off {
        let note_font = tf(13.0);
        let note_y = name.rect.y1 + tu(8.0);
        return DayTile {
            day_id: day.id.clone(),
            rect,
            radius,
            name,
            kind: DayTileKind::Off {
                note: TextBlock {
                    rect: Rect::new(inner_x, note_y, inner_x + inner_w, note_y + note_font * 1.2),
                    text: OFF_NOTE.to_string(),
                    font_size: note_font,
                    line_height: 1.2,
                    max_lines: 2,
                },
            },
        };
    }

    // Live and date badges share the row under the day name.
    let badge_y = name.rect.y1 + tu(8.0);
    let live = badge(
        inner_x,
        badge_y,
        "Live",
        tf(LIVE_SIZE),
        tu(9.0),
        tu(8.0),
        tu(6.0),
        tu(9.0),
    );
    let date = badge(
        live.rect.x1 + tu(8.0),
        badge_y,
        &non_empty(&day.date_label, "TBD"),
        tf(DATE_SIZE),
        0.0,
        0.0,
        tu(6.0),
        tu(9.0),
    );

    let stream_count = day.streams.len();
    if stream_count <= 1 {
        let empty = DisplayStream {
            id: String::new(),
            title: String::new(),
            thumbnail: String::new(),
            slots: Vec::new(),
        };
        let stream = day.streams.first().unwrap_or(&empty);
        let slot_scale = clamp_f64(
            1.0 - (stream.slots.len() as f64 - 2.0).max(0.0) * 0.12,
            0.78,
            1.0,
        );

        let title_font = tf(TITLE_SIZE);
        let title_text = non_empty(&stream.title, UNTITLED_STREAM);
        let title_lines = wrapped_lines(&title_text, title_font, inner_w, 2);
        let title_h = title_font * 1.18 * title_lines as f64;
        let pill_h = pill_height(ts, slot_scale);
        let n = stream.slots.len().max(1) as f64;
        let block_h = title_h + tu(12.0) + n * pill_h + (n - 1.0) * tu(8.0) * slot_scale;

        // The title/slot block floats at the tile's vertical middle.
        let mut y = rect.y0 + (rect.height() - block_h) / 2.0;
        let title = TextBlock {
            rect: Rect::new(inner_x, y, inner_x + inner_w, y + title_h),
            text: title_text,
            font_size: title_font,
            line_height: 1.18,
            max_lines: 2,
        };
        y += title_h + tu(12.0);
        let pills = stacked_pills(&stream.slots, inner_x, y, inner_w, ts, slot_scale);

        return DayTile {
            day_id: day.id.clone(),
            rect,
            radius,
            name,
            kind: DayTileKind::Single {
                thumbnail: stream.thumbnail.clone(),
                live,
                date,
                title,
                pills,
            },
        };
    }

    let stream_scale = (1.0 - (stream_count as f64 - 1.0) * 0.18).max(0.6);
    let pill_scale = (1.0 - (stream_count as f64 - 1.0) * 0.14).max(0.65);
    let s_gap = tu(8.0) * stream_scale;
    let area_y = date.rect.y1.max(live.rect.y1) + tu(10.0);
    let area_h = (rect.y1 - pad - area_y).max(0.0);
    let panel_h = ((area_h - s_gap * (stream_count as f64 - 1.0)) / stream_count as f64).max(0.0);

    let streams = day
        .streams
        .iter()
        .enumerate()
        .map(|(i, stream)| {
            let y = area_y + i as f64 * (panel_h + s_gap);
            let panel = Rect::new(inner_x, y, inner_x + inner_w, y + panel_h);
            stream_panel(stream, panel, ts, stream_scale, pill_scale)
        })
        .collect();

    DayTile {
        day_id: day.id.clone(),
        rect,
        radius,
        name,
        kind: DayTileKind::Multi {
            live,
            date,
            streams,
        },
    }
}

fn stream_panel(
    stream: &DisplayStream,
    rect: Rect,
    ts: f64,
    stream_scale: f64,
    pill_scale: f64,
) -> TileStream {
    let tu = |v: f64| v * ts;
    let tf = |v: f64| (v * ts).round();
    let su = |v: f64| tu(v) * stream_scale;
    let pad_y = su(8.0);
    let pad_x = su(10.0);
    let inner_x = rect.x0 + pad_x;
    let inner_w = (rect.width() - 2.0 * pad_x).max(0.0);

    let title_font = (tf(TITLE_SIZE) * stream_scale).round();
    let title_text = non_empty(&stream.title, UNTITLED_STREAM);
    let title_lines = wrapped_lines(&title_text, title_font, inner_w, 2);
    let title_h = title_font * 1.16 * title_lines as f64;
    let title = TextBlock {
        rect: Rect::new(
            inner_x,
            rect.y0 + pad_y,
            inner_x + inner_w,
            rect.y0 + pad_y + title_h,
        ),
        text: title_text,
        font_size: title_font,
        line_height: 1.16,
        max_lines: 2,
    };

    let slot_scale = clamp_f64(
        1.0 - (stream.slots.len() as f64 - 2.0).max(0.0) * 0.12,
        0.72,
        1.0,
    ) * stream_scale
        * pill_scale;
    let pills = stacked_pills(
        &stream.slots,
        inner_x,
        title.rect.y1 + su(6.0),
        inner_w,
        ts,
        slot_scale,
    );

    TileStream {
        rect,
        radius: STREAM_PANEL_RADIUS,
        thumbnail: stream.thumbnail.clone(),
        title,
        pills,
    }
}

fn pill_height(ts: f64, slot_scale: f64) -> f64 {
    let time_font = 9.0_f64.max(((TIME_SIZE * ts).round() * slot_scale).round());
    let flag_h = FLAG_HEIGHT * ts * slot_scale;
    let pad_y = 4.0 * ts * slot_scale;
    (PILL_MIN_HEIGHT * ts * slot_scale).max((time_font * 1.2).max(flag_h) + 2.0 * pad_y)
}

/// Landscape pills are full-width rows stacked vertically.
fn stacked_pills(
    slots: &[SlotDisplay],
    x0: f64,
    y0: f64,
    avail_w: f64,
    ts: f64,
    slot_scale: f64,
) -> Vec<SlotPill> {
    let tf = |v: f64| (v * ts).round();
    let su = |v: f64| v * ts * slot_scale;
    let pill_h = pill_height(ts, slot_scale);
    let radius = PILL_RADIUS * ts * slot_scale;
    let gap = su(8.0);
    let label_font = 9.0_f64.max((tf(TZ_SIZE) * slot_scale).round());
    let time_font = 9.0_f64.max((tf(TIME_SIZE) * slot_scale).round());
    let flag_w = FLAG_WIDTH * ts * slot_scale;
    let flag_h = FLAG_HEIGHT * ts * slot_scale;
    let emoji_font = 10.0_f64.max((flag_h * 1.25).round());

    if slots.is_empty() {
        let font = 9.0_f64.max((tf(10.0) * slot_scale).round());
        return vec![SlotPill {
            rect: Rect::new(x0, y0, x0 + avail_w, y0 + pill_h),
            radius,
            label: "Add time slot".to_string(),
            label_font: font,
            time: String::new(),
            time_font: font,
            flag: None,
            emoji: None,
            flag_width: 0.0,
            flag_height: 0.0,
            emoji_font: 0.0,
            gap,
            pad_x: su(10.0),
        }];
    }

    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let y = y0 + i as f64 * (pill_h + gap);
            let has_emoji = !slot.emoji.is_empty();
            SlotPill {
                rect: Rect::new(x0, y, x0 + avail_w, y + pill_h),
                radius,
                label: slot.label.clone(),
                label_font,
                time: slot.time_text.clone(),
                time_font,
                flag: (!has_emoji).then_some(slot.flag),
                emoji: has_emoji.then(|| slot.emoji.clone()),
                flag_width: flag_w,
                flag_height: flag_h,
                emoji_font,
                gap: su(8.0),
                pad_x: su(10.0),
            }
        })
        .collect()
}

fn badge(
    x: f64,
    y: f64,
    text: &str,
    font: f64,
    dot: f64,
    dot_gap: f64,
    pad_y: f64,
    pad_x: f64,
) -> BadgePlan {
    let content_h = (font * 1.2).max(dot);
    let h = content_h + 2.0 * pad_y;
    let dot_w = if dot > 0.0 { dot + dot_gap } else { 0.0 };
    let w = 2.0 * pad_x + dot_w + approx_text_width(text, font);
    BadgePlan {
        rect: Rect::new(x, y, x + w, y + h),
        text: text.to_string(),
        font_size: font,
        dot_size: dot,
        gap: dot_gap,
        pad_x,
    }
}

fn wrapped_lines(text: &str, font: f64, avail_w: f64, max_lines: u32) -> u32 {
    if avail_w <= 0.0 {
        return 1;
    }
    let est = (approx_text_width(text, font) / avail_w).ceil();
    (est.max(1.0) as u32).min(max_lines)
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::flags::FlagKey;
    use crate::model::{FooterSize, FooterStyle, HeaderAlignment, HeaderTone};

    fn display(days: Vec<DisplayDay>) -> DisplaySchedule {
        DisplaySchedule {
            days,
            show_header: true,
            header_title: "Weekly Schedule".into(),
            header_alignment: HeaderAlignment::Left,
            header_tone: HeaderTone::Bright,
            show_footer: true,
            footer_link: "twitch.tv/someone".into(),
            footer_style: FooterStyle::Solid,
            footer_size: FooterSize::Regular,
        }
    }

    fn day(id: &str, off: bool, streams: usize, slots: usize) -> DisplayDay {
        DisplayDay {
            id: id.into(),
            label: "Friday".into(),
            date_label: "16 Jan".into(),
            is_off: off,
            streams: (0..streams)
                .map(|i| DisplayStream {
                    id: format!("{id}-s{i}"),
                    title: "Co-op night".into(),
                    thumbnail: String::new(),
                    slots: (0..slots)
                        .map(|_| SlotDisplay {
                            label: "US (ET)".into(),
                            time_text: "2:30 PM".into(),
                            flag: FlagKey::Us,
                            emoji: String::new(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn canvas() -> Canvas {
        Canvas::new(1200, 675).unwrap()
    }

    #[test]
    fn tiles_fill_the_strip_in_order() {
        let days = vec![
            day("d0", false, 1, 2),
            day("d1", false, 1, 1),
            day("d2", false, 1, 0),
        ];
        let plan = plan(&display(days), canvas(), RenderMode::Export);
        let BodyPlan::Landscape(body) = &plan.body else {
            panic!("landscape body expected");
        };
        assert_eq!(body.tiles.len(), 3);
        assert!(body.add_left.is_none() && body.add_right.is_none());
        for pair in body.tiles.windows(2) {
            assert!(pair[0].rect.x1 < pair[1].rect.x0);
        }
        let last = body.tiles.last().unwrap();
        assert!((last.rect.x1 - body.content_rect.x1).abs() < 0.5);
    }

    #[test]
    fn off_days_get_narrower_tiles() {
        let days = vec![day("d0", false, 1, 1), day("d1", true, 0, 0)];
        let plan = plan(&display(days), canvas(), RenderMode::Export);
        let BodyPlan::Landscape(body) = &plan.body else {
            panic!("landscape body expected");
        };
        assert!(body.tiles[1].rect.width() < body.tiles[0].rect.width());
        assert!(matches!(body.tiles[1].kind, DayTileKind::Off { .. }));
    }

    #[test]
    fn edit_mode_adds_a_column_on_each_side() {
        let plan = plan(
            &display(vec![day("d0", false, 1, 1)]),
            canvas(),
            RenderMode::Edit,
        );
        let BodyPlan::Landscape(body) = &plan.body else {
            panic!("landscape body expected");
        };
        let left = body.add_left.as_ref().unwrap();
        let right = body.add_right.as_ref().unwrap();
        assert!(left.rect.x1 < body.tiles[0].rect.x0);
        assert!(right.rect.x0 > body.tiles[0].rect.x1);
        assert!((left.rect.width() - right.rect.width()).abs() < 0.01);
    }

    #[test]
    fn multi_stream_tiles_stack_equal_panels() {
        let plan = plan(
            &display(vec![day("d0", false, 3, 1)]),
            canvas(),
            RenderMode::Export,
        );
        let BodyPlan::Landscape(body) = &plan.body else {
            panic!("landscape body expected");
        };
        let DayTileKind::Multi { streams, .. } = &body.tiles[0].kind else {
            panic!("multi tile expected");
        };
        assert_eq!(streams.len(), 3);
        let h0 = streams[0].rect.height();
        for s in streams {
            assert!((s.rect.height() - h0).abs() < 0.01);
        }
        for pair in streams.windows(2) {
            assert!(pair[0].rect.y1 <= pair[1].rect.y0 + 0.01);
        }
    }

    #[test]
    fn seven_days_shrink_tile_chrome() {
        let four: Vec<_> = (0..4).map(|i| day(&format!("d{i}"), false, 1, 1)).collect();
        let seven: Vec<_> = (0..7).map(|i| day(&format!("d{i}"), false, 1, 1)).collect();
        let name_font = |days: Vec<DisplayDay>| {
            let p = plan(&display(days), canvas(), RenderMode::Export);
            let BodyPlan::Landscape(body) = p.body else {
                panic!("landscape body expected")
            };
            body.tiles[0].name.font_size
        };
        assert!(name_font(seven) < name_font(four));
    }

    #[test]
    fn empty_schedule_lays_out_the_empty_state() {
        let plan = plan(&display(vec![]), canvas(), RenderMode::Edit);
        let BodyPlan::Landscape(body) = &plan.body else {
            panic!("landscape body expected");
        };
        assert!(body.empty_state.is_some());
        assert!(body.empty_add.is_some());
        assert!(body.tiles.is_empty());
    }

    #[test]
    fn footer_sits_inside_the_bottom_padding() {
        let plan = plan(
            &display(vec![day("d0", false, 1, 1)]),
            canvas(),
            RenderMode::Export,
        );
        let footer = plan.footer.unwrap();
        // At the design size the unit scale is 1, so the padding is 28px.
        assert!(footer.rect.y1 <= 675.0 - PADDING + 0.5);
        // Centered horizontally.
        let mid = (footer.rect.x0 + footer.rect.x1) / 2.0;
        assert!((mid - 600.0).abs() < 0.5);
    }
}
