//! Portrait layout: a vertically centered list of full-width day cards
//! between an optional header and footer. The list shrinks as a whole
//! (`list_scale`) so seven dense days still fit the canvas.

use crate::{
    core::{Canvas, Orientation, Rect, clamp_f64},
    display::{DisplayDay, DisplaySchedule, DisplayStream, SlotDisplay},
    layout::{
        AddButtonPlan, BadgePlan, BodyPlan, DayCard, DayCardKind, EmptyStatePlan, FRAME_RADIUS,
        FooterPlan, HeaderPlan, LayoutPlan, PortraitBody, RenderMode, SlotPill, StreamBox,
        TextBlock,
        scale::{
            AxisScales, PORTRAIT_DESIGN_HEIGHT, PORTRAIT_DESIGN_WIDTH, approx_text_width,
            line_count, round2, shrink_to_fit,
        },
    },
    model::FooterSize,
};

const BASE_CONTENT_TOP: f64 = 150.0;
const BASE_CONTENT_BOTTOM: f64 = 120.0;
const CONTENT_PADDING_X: f64 = 64.0;
const HEADER_FONT_SIZE: f64 = 56.0;
const MIN_HEADER_FONT_SIZE: f64 = 28.0;
const HEADER_MAX_CHARS: f64 = 72.0;
const HEADER_CHARS_PER_LINE: f64 = 24.0;
const HEADER_GAP: f64 = 64.0;
const FOOTER_HEIGHT: f64 = 110.0;
const FOOTER_HEIGHT_COMPACT: f64 = 96.0;
const FOOTER_GAP: f64 = 40.0;
const DAY_CARD_HEIGHT: f64 = 250.0;
const OFF_DAY_CARD_HEIGHT: f64 = 140.0;
const DAY_CARD_THUMB_WIDTH: f64 = 260.0;
const OFF_DAY_THUMB_WIDTH: f64 = 220.0;
const ADD_BUTTON_HEIGHT: f64 = 76.0;
const EMPTY_STATE_HEIGHT: f64 = 110.0;
const LIST_GAP: f64 = 14.0;

const CARD_RADIUS: f64 = 28.0;
const STREAM_BOX_RADIUS: f64 = 16.0;
const EMPTY_TEXT: &str = "No days yet. Add your first day to get started.";
const UNTITLED_STREAM: &str = "Untitled stream";
const OFF_NOTE: &str = "No streams scheduled";

/// Scaled-length helpers with the list scale folded in. Lengths round to
/// two decimals and fonts to whole pixels so plans are reproducible.
struct Px {
    sx: f64,
    sy: f64,
    su: f64,
    sf: f64,
}

impl Px {
    fn x(&self, v: f64) -> f64 {
        round2(v * self.sx)
    }

    fn y(&self, v: f64) -> f64 {
        round2(v * self.sy)
    }

    fn u(&self, v: f64) -> f64 {
        round2(v * self.su)
    }

    fn font(&self, v: f64) -> f64 {
        (v * self.sf).round()
    }
}

pub(crate) fn plan(display: &DisplaySchedule, canvas: Canvas, mode: RenderMode) -> LayoutPlan {
    let w = canvas.width_f64();
    let h = canvas.height_f64();
    let axes = AxisScales::new(w, h, PORTRAIT_DESIGN_WIDTH, PORTRAIT_DESIGN_HEIGHT);
    let layout_scale = axes.unit();

    let day_count = display.days.len();
    let off_count = display.days.iter().filter(|d| d.is_off).count();
    let show_add = mode.shows_add_controls();
    let add_button_count = if show_add {
        if day_count == 0 { 1 } else { 2 }
    } else {
        0
    };
    let base_items = if day_count == 0 { 1 } else { day_count };
    let list_items = base_items + add_button_count;

    let day_card_h = DAY_CARD_HEIGHT * axes.y;
    let off_card_h = OFF_DAY_CARD_HEIGHT * axes.y;
    let add_h = ADD_BUTTON_HEIGHT * axes.y;
    let empty_h = EMPTY_STATE_HEIGHT * axes.y;
    let list_gap = LIST_GAP * axes.y;

    let base_list_height = if day_count == 0 {
        empty_h + add_h * add_button_count as f64 + list_gap * (list_items as f64 - 1.0)
    } else {
        (day_count - off_count) as f64 * day_card_h
            + off_count as f64 * off_card_h
            + add_h * add_button_count as f64
            + list_gap * (list_items as f64 - 1.0)
    };

    let density = day_count.max(1) as f64;
    let spacing_scale = clamp_f64(1.12 - (density - 2.0) * 0.05, 0.78, 1.18);

    // Header metrics use the layout scale directly; the list scale never
    // shrinks the header.
    let header_text = non_empty(&display.header_title, "Weekly Schedule");
    let header_len = header_text.trim().chars().count();
    let header_max_chars = 32.0_f64.max((HEADER_MAX_CHARS * axes.x).round()) as usize;
    let header_cpl = 14.0_f64.max((HEADER_CHARS_PER_LINE * axes.x).round()) as usize;
    let header_font = shrink_to_fit(
        HEADER_FONT_SIZE * layout_scale,
        MIN_HEADER_FONT_SIZE * layout_scale,
        header_len,
        header_max_chars,
    );
    let header_lines = line_count(header_len, header_cpl);
    let header_pad = (6.0 * layout_scale).max((header_font * 0.16).round());
    let header_height = header_font * 1.18 * header_lines as f64 + header_pad;

    let footer_min_h = match display.footer_size {
        FooterSize::Compact => FOOTER_HEIGHT_COMPACT,
        FooterSize::Regular => FOOTER_HEIGHT,
    } * axes.y;
    let (f_pad_x, f_pad_y, f_font, f_gap, f_dot, f_ring) = match display.footer_size {
        FooterSize::Compact => (40.0, 22.0, 32.0, 18.0, 14.0, 9.0),
        FooterSize::Regular => (52.0, 34.0, 38.0, 24.0, 18.0, 12.0),
    };
    let fs = layout_scale;

    let pad_top = BASE_CONTENT_TOP * axes.y * spacing_scale;
    let pad_bottom = BASE_CONTENT_BOTTOM * axes.y * spacing_scale;
    let pad_x = CONTENT_PADDING_X * axes.x;
    let header_gap = HEADER_GAP * axes.y * spacing_scale;
    let footer_gap = FOOTER_GAP * axes.y * spacing_scale;

    let reserved = pad_top
        + pad_bottom
        + if display.show_header {
            header_height + header_gap
        } else {
            0.0
        }
        + if display.show_footer {
            footer_min_h + footer_gap
        } else {
            0.0
        };
    let available = (h - reserved).max(0.0);

    let count_scale = if day_count <= 1 {
        1.24
    } else {
        1.16 - (day_count.min(7) as f64 - 2.0) * 0.08
    };
    let fit_scale = if base_list_height > 0.0 {
        available / base_list_height
    } else {
        1.0
    };
    let list_scale = 1.3_f64.min(count_scale).min(fit_scale);
    let list_height = base_list_height * list_scale;

    let px = Px {
        sx: axes.x * list_scale,
        sy: axes.y * list_scale,
        su: layout_scale * list_scale,
        sf: layout_scale * list_scale,
    };

    // Vertical centering of header + list + footer inside the padded area.
    let content_h = if display.show_header {
        header_height + header_gap
    } else {
        0.0
    } + list_height
        + if display.show_footer {
            footer_gap + footer_min_h
        } else {
            0.0
        };
    let inner_h = h - pad_top - pad_bottom;
    let y0 = pad_top + ((inner_h - content_h) / 2.0).max(0.0);
    let content_w = w - 2.0 * pad_x;

    let header = display.show_header.then(|| HeaderPlan {
        rect: Rect::new(pad_x, y0, pad_x + content_w, y0 + header_height),
        text: header_text.clone(),
        font_size: header_font,
        line_height: 1.18,
        max_lines: 3,
        pad_bottom: header_pad,
        alignment: display.header_alignment,
        tone: display.header_tone,
    });

    let list_top = y0
        + if display.show_header {
            header_height + header_gap
        } else {
            0.0
        };

    let gap = list_gap * list_scale;
    let add_height = add_h * list_scale;
    let mut cursor = list_top;
    let mut empty_state = None;
    let mut add_top = None;
    let mut add_bottom = None;
    let mut cards = Vec::with_capacity(day_count);

    let add_button = |y: f64, label: &str| AddButtonPlan {
        rect: Rect::new(pad_x, y, pad_x + content_w, y + add_height),
        radius: 24.0,
        label: label.to_string(),
        font_size: px.font(13.0),
        plus_font: px.font(22.0),
        enabled: day_count < crate::model::MAX_DAYS,
    };

    if day_count == 0 {
        let eh = empty_h * list_scale;
        empty_state = Some(EmptyStatePlan {
            rect: Rect::new(pad_x, cursor, pad_x + content_w, cursor + eh),
            radius: CARD_RADIUS,
            text: EMPTY_TEXT.to_string(),
            font_size: px.font(14.0),
        });
        cursor += eh + gap;
        if show_add {
            add_bottom = Some(add_button(cursor, "Add your first day"));
        }
    } else {
        if show_add {
            add_top = Some(add_button(cursor, "Add day (up to 7)"));
            cursor += add_height + gap;
        }
        for day in &display.days {
            let card_h = if day.is_off { off_card_h } else { day_card_h } * list_scale;
            let rect = Rect::new(pad_x, cursor, pad_x + content_w, cursor + card_h);
            cards.push(day_card(day, rect, &px, list_scale, &axes));
            cursor += card_h + gap;
        }
        if show_add {
            add_bottom = Some(add_button(cursor, "Add day (up to 7)"));
        }
    }

    let footer = display.show_footer.then(|| {
        let text = non_empty(&display.footer_link, "twitch.tv/yourname");
        let font = f_font * fs;
        let dot = f_dot * fs;
        let content_height = font.max(dot) + 2.0 * f_pad_y * fs;
        let height = content_height.max(footer_min_h);
        let width = 2.0 * f_pad_x * fs + dot + f_gap * fs + approx_text_width(&text, font);
        let x = (w - width) / 2.0;
        let y = list_top + list_height + footer_gap;
        FooterPlan {
            rect: Rect::new(x, y, x + width, y + height),
            text,
            font_size: font,
            dot_size: dot,
            dot_ring: f_ring * fs,
            gap: f_gap * fs,
            style: display.footer_style,
            size: display.footer_size,
        }
    });

    LayoutPlan {
        canvas,
        orientation: Orientation::Portrait,
        frame_radius: FRAME_RADIUS,
        header,
        footer,
        body: BodyPlan::Portrait(PortraitBody {
            content_rect: Rect::new(pad_x, list_top, pad_x + content_w, list_top + list_height),
            empty_state,
            add_top,
            add_bottom,
            cards,
        }),
    }
}

fn day_card(day: &DisplayDay, rect: Rect, px: &Px, list_scale: f64, axes: &AxisScales) -> DayCard {
    if day.is_off {
        return off_card(day, rect, px, list_scale, axes);
    }
    if day.streams.len() <= 1 {
        single_card(day, rect, px, list_scale, axes)
    } else {
        multi_card(day, rect, px)
    }
}

fn off_card(day: &DisplayDay, rect: Rect, px: &Px, list_scale: f64, axes: &AxisScales) -> DayCard {
    let pad_y = px.y(16.0);
    let pad_x = px.x(16.0);
    let col_gap = px.u(18.0);
    let thumb_w = OFF_DAY_THUMB_WIDTH * axes.x * list_scale;
    let thumb_h = (thumb_w * 9.0 / 16.0).min((rect.height() - 2.0 * pad_y).max(0.0));
    let thumb_y = rect.y0 + (rect.height() - thumb_h) / 2.0;
    let thumb = Rect::new(
        rect.x0 + pad_x,
        thumb_y,
        rect.x0 + pad_x + thumb_w,
        thumb_y + thumb_h,
    );

    let font = px.font(18.0);
    let col_x = thumb.x1 + col_gap;
    let col_w = (rect.x1 - pad_x - col_x).max(0.0);
    let row_gap = px.y(10.0);
    let block_h = 2.0 * font * 1.2 + row_gap;
    let y = rect.y0 + (rect.height() - block_h) / 2.0;

    let name = TextBlock {
        rect: Rect::new(col_x, y, col_x + col_w, y + font * 1.2),
        text: day.label.clone(),
        font_size: font,
        line_height: 1.2,
        max_lines: 1,
    };
    let note_y = y + font * 1.2 + row_gap;
    let note = TextBlock {
        rect: Rect::new(col_x, note_y, col_x + col_w, note_y + font * 1.2),
        text: OFF_NOTE.to_string(),
        font_size: font,
        line_height: 1.2,
        max_lines: 1,
    };

    DayCard {
        day_id: day.id.clone(),
        rect,
        radius: CARD_RADIUS,
        name,
        date: None,
        kind: DayCardKind::Off {
            thumb,
            thumb_radius: 18.0,
            note,
        },
    }
}

fn single_card(
    day: &DisplayDay,
    rect: Rect,
    px: &Px,
    list_scale: f64,
    axes: &AxisScales,
) -> DayCard {
    let empty = DisplayStream {
        id: String::new(),
        title: String::new(),
        thumbnail: String::new(),
        slots: Vec::new(),
    };
    let stream = day.streams.first().unwrap_or(&empty);

    let pad_y = px.y(20.0);
    let pad_x = px.x(20.0);
    let col_gap = px.u(20.0);
    let thumb_w = DAY_CARD_THUMB_WIDTH * axes.x * list_scale;
    let thumb_h = (thumb_w * 9.0 / 16.0).min((rect.height() - 2.0 * pad_y).max(0.0));
    let thumb_y = rect.y0 + (rect.height() - thumb_h) / 2.0;
    let thumb = Rect::new(
        rect.x0 + pad_x,
        thumb_y,
        rect.x0 + pad_x + thumb_w,
        thumb_y + thumb_h,
    );

    let live = badge(
        thumb.x0 + px.x(12.0),
        thumb.y0 + px.y(12.0),
        "Live",
        px.font(13.0),
        px.u(10.0),
        px.u(8.0),
        px.y(8.0),
        px.x(12.0),
    );

    let col_x = thumb.x1 + col_gap;
    let col_w = (rect.x1 - pad_x - col_x).max(0.0);

    let name_font = px.font(20.0);
    let date_badge = badge(
        0.0,
        0.0,
        &non_empty(&day.date_label, "TBD"),
        px.font(13.0),
        0.0,
        0.0,
        px.y(8.0),
        px.x(12.0),
    );
    let row_h = (name_font * 1.2).max(date_badge.rect.height());

    let title_font = px.font(38.0);
    let title_text = non_empty(&stream.title, UNTITLED_STREAM);
    let title_lines = wrapped_lines(&title_text, title_font, col_w, 2);
    let title_h = title_font * 1.24 * title_lines as f64 + px.y(8.0);

    let ts = clamp_f64(
        1.0 - (stream.slots.len() as f64 - 2.0).max(0.0) * 0.12,
        0.58,
        1.0,
    );
    let (_, pill_h) = pill_metrics(px, ts);

    let row_gap = 12.0;
    let block_h = row_h + row_gap + title_h + row_gap + pill_h;
    let mut y = rect.y0 + (rect.height() - block_h) / 2.0;

    let name = TextBlock {
        rect: Rect::new(
            col_x,
            y,
            col_x + approx_text_width(&day.label, name_font),
            y + name_font * 1.2,
        ),
        text: day.label.clone(),
        font_size: name_font,
        line_height: 1.2,
        max_lines: 1,
    };
    let date = place_badge(date_badge, name.rect.x1 + 12.0, y);
    y += row_h + row_gap;

    let title = TextBlock {
        rect: Rect::new(col_x, y, col_x + col_w, y + title_h),
        text: title_text,
        font_size: title_font,
        line_height: 1.24,
        max_lines: 2,
    };
    y += title_h + row_gap;

    let pills = slot_pills(&stream.slots, col_x, y, col_w, ts, px, false).0;

    DayCard {
        day_id: day.id.clone(),
        rect,
        radius: CARD_RADIUS,
        name,
        date: Some(date),
        kind: DayCardKind::Single {
            thumb,
            thumb_radius: 20.0,
            thumbnail: stream.thumbnail.clone(),
            live,
            title,
            pills,
        },
    }
}

fn multi_card(day: &DisplayDay, rect: Rect, px: &Px) -> DayCard {
    let pad_y = px.y(18.0);
    let pad_x = px.x(18.0);
    let gap = px.u(12.0);
    let inner_x = rect.x0 + pad_x;
    let inner_w = (rect.width() - 2.0 * pad_x).max(0.0);

    let name_font = px.font(20.0);
    let name = TextBlock {
        rect: Rect::new(
            inner_x,
            rect.y0 + pad_y,
            inner_x + approx_text_width(&day.label, name_font),
            rect.y0 + pad_y + name_font * 1.2,
        ),
        text: day.label.clone(),
        font_size: name_font,
        line_height: 1.2,
        max_lines: 1,
    };
    let date = place_badge(
        badge(
            0.0,
            0.0,
            &non_empty(&day.date_label, "TBD"),
            px.font(13.0),
            0.0,
            0.0,
            px.y(8.0),
            px.x(12.0),
        ),
        name.rect.x1 + 12.0,
        rect.y0 + pad_y,
    );
    let row_h = (name_font * 1.2).max(date.rect.height());

    let n = day.streams.len();
    let stream_scale = (1.0 - (n as f64 - 1.0) * 0.15).max(0.7);
    let stream_gap = px.u(12.0) * stream_scale;
    let area_y = rect.y0 + pad_y + row_h + gap;
    let area_h = (rect.y1 - pad_y - area_y).max(0.0);
    let col_w = ((inner_w - stream_gap * (n as f64 - 1.0)) / n as f64).max(0.0);

    let streams = day
        .streams
        .iter()
        .enumerate()
        .map(|(i, stream)| {
            let x = inner_x + i as f64 * (col_w + stream_gap);
            let srect = Rect::new(x, area_y, x + col_w, area_y + area_h);
            stream_box(stream, srect, px, stream_scale)
        })
        .collect();

    DayCard {
        day_id: day.id.clone(),
        rect,
        radius: CARD_RADIUS,
        name,
        date: Some(date),
        kind: DayCardKind::Multi { streams },
    }
}

fn stream_box(stream: &DisplayStream, rect: Rect, px: &Px, stream_scale: f64) -> StreamBox {
    let pad_y = px.y(12.0) * stream_scale;
    let pad_x = px.x(12.0) * stream_scale;
    let gap = px.u(8.0) * stream_scale;
    let inner_x = rect.x0 + pad_x;
    let inner_w = (rect.width() - 2.0 * pad_x).max(0.0);

    let title_font = 12.0_f64.max((px.font(30.0) * stream_scale).round());
    let title_text = non_empty(&stream.title, UNTITLED_STREAM);
    let title_lines = wrapped_lines(&title_text, title_font, inner_w, 2);
    let title_h = title_font * 1.12 * title_lines as f64;
    let title = TextBlock {
        rect: Rect::new(inner_x, rect.y0 + pad_y, inner_x + inner_w, rect.y0 + pad_y + title_h),
        text: title_text,
        font_size: title_font,
        line_height: 1.12,
        max_lines: 2,
    };

    let ts = clamp_f64(
        1.0 - (stream.slots.len() as f64 - 2.0).max(0.0) * 0.12,
        0.58,
        1.0,
    ) * stream_scale;
    let pills = slot_pills(
        &stream.slots,
        inner_x,
        title.rect.y1 + gap,
        inner_w,
        ts,
        px,
        true,
    )
    .0;

    StreamBox {
        rect,
        radius: STREAM_BOX_RADIUS,
        thumbnail: stream.thumbnail.clone(),
        title,
        pills,
    }
}

/// Per-pill sizing for a given time scale: (horizontal padding, height).
fn pill_metrics(px: &Px, ts: f64) -> (f64, f64) {
    let pad_y = px.y(12.0) * ts;
    let time_font = 10.0_f64.max((px.font(18.0) * ts).round());
    let flag_h = px.u(14.0) * ts;
    ((px.x(14.0) * ts), (time_font * 1.2).max(flag_h) + 2.0 * pad_y)
}

/// Lays out the time pills for one stream starting at (x0, y0). `wrap`
/// breaks rows at the available width; a non-wrapping row clips the last
/// pill instead. Returns the pills and the total height consumed.
fn slot_pills(
    slots: &[SlotDisplay],
    x0: f64,
    y0: f64,
    avail_w: f64,
    ts: f64,
    px: &Px,
    wrap: bool,
) -> (Vec<SlotPill>, f64) {
    let gap = px.u(10.0) * ts;
    let (pad_x, pill_h) = pill_metrics(px, ts);
    let time_font = 10.0_f64.max((px.font(18.0) * ts).round());
    let label_font = 9.0_f64.max((px.font(13.0) * ts).round());
    let flag_w = px.u(20.0) * ts;
    let flag_h = px.u(14.0) * ts;
    let emoji_font = 10.0_f64.max((flag_h * 1.25).round());

    if slots.is_empty() {
        let font = 9.0_f64.max((px.font(12.0) * ts).round());
        let w = (2.0 * pad_x + approx_text_width("Add time slot", font)).min(avail_w.max(0.0));
        let pill = SlotPill {
            rect: Rect::new(x0, y0, x0 + w, y0 + pill_h),
            radius: pill_h / 2.0,
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
            pad_x,
        };
        return (vec![pill], pill_h);
    }

    let mut pills = Vec::with_capacity(slots.len());
    let mut x = x0;
    let mut y = y0;
    for slot in slots {
        let natural = 2.0 * pad_x
            + flag_w
            + gap
            + approx_text_width(&slot.label, label_font)
            + gap
            + approx_text_width(&slot.time_text, time_font);
        if wrap && x > x0 && x + natural > x0 + avail_w {
            x = x0;
            y += pill_h + gap;
        }
        let w = natural.min((x0 + avail_w - x).max(0.0));
        if w <= 0.0 {
            break;
        }
        let has_emoji = !slot.emoji.is_empty();
        pills.push(SlotPill {
            rect: Rect::new(x, y, x + w, y + pill_h),
            radius: pill_h / 2.0,
            label: slot.label.clone(),
            label_font,
            time: slot.time_text.clone(),
            time_font,
            flag: (!has_emoji).then_some(slot.flag),
            emoji: has_emoji.then(|| slot.emoji.clone()),
            flag_width: flag_w,
            flag_height: flag_h,
            emoji_font,
            gap,
            pad_x,
        });
        x += w + gap;
    }
    (pills, y - y0 + pill_h)
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

fn place_badge(b: BadgePlan, x: f64, y: f64) -> BadgePlan {
    let w = b.rect.width();
    let h = b.rect.height();
    BadgePlan {
        rect: Rect::new(x, y, x + w, y + h),
        ..b
    }
}

/// Estimated wrapped line count for a text block, clamped.
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
    use crate::display::DisplayDay;
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

    fn day(id: &str, streams: usize, slots: usize) -> DisplayDay {
        DisplayDay {
            id: id.into(),
            label: "Monday".into(),
            date_label: "12 Jan".into(),
            is_off: false,
            streams: (0..streams)
                .map(|i| DisplayStream {
                    id: format!("{id}-s{i}"),
                    title: "Ranked grind".into(),
                    thumbnail: String::new(),
                    slots: (0..slots)
                        .map(|j| SlotDisplay {
                            label: format!("UK {j}"),
                            time_text: "8:30 PM".into(),
                            flag: crate::catalog::flags::FlagKey::Uk,
                            emoji: String::new(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn canvas() -> Canvas {
        Canvas::new(1080, 1920).unwrap()
    }

    #[test]
    fn empty_schedule_lays_out_empty_state_and_one_add_button() {
        let plan = plan(&display(vec![]), canvas(), RenderMode::Edit);
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        assert!(body.empty_state.is_some());
        assert!(body.add_top.is_none());
        assert!(body.add_bottom.is_some());
        assert!(body.cards.is_empty());
    }

    #[test]
    fn export_mode_drops_add_buttons() {
        let plan = plan(&display(vec![day("d1", 1, 2)]), canvas(), RenderMode::Export);
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        assert!(body.add_top.is_none());
        assert!(body.add_bottom.is_none());
        assert_eq!(body.cards.len(), 1);
    }

    #[test]
    fn seven_days_fit_the_available_height() {
        let days: Vec<_> = (0..7).map(|i| day(&format!("d{i}"), 3, 4)).collect();
        let plan = plan(&display(days), canvas(), RenderMode::Export);
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        assert_eq!(body.cards.len(), 7);
        let last = body.cards.last().unwrap();
        assert!(last.rect.y1 <= body.content_rect.y1 + 1.0);
        assert!(plan.footer.as_ref().unwrap().rect.y1 <= 1920.0 + 1.0);
    }

    #[test]
    fn list_scale_shrinks_cards_as_days_accumulate() {
        let one = plan(&display(vec![day("d0", 1, 1)]), canvas(), RenderMode::Export);
        let seven = plan(
            &display((0..7).map(|i| day(&format!("d{i}"), 1, 1)).collect()),
            canvas(),
            RenderMode::Export,
        );
        let h = |p: &LayoutPlan| {
            let BodyPlan::Portrait(b) = &p.body else {
                panic!("portrait body expected")
            };
            b.cards[0].rect.height()
        };
        assert!(h(&seven) < h(&one));
    }

    #[test]
    fn single_and_multi_stream_cards_take_different_shapes() {
        let plan = plan(
            &display(vec![day("d0", 1, 2), day("d1", 3, 1)]),
            canvas(),
            RenderMode::Export,
        );
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        assert!(matches!(body.cards[0].kind, DayCardKind::Single { .. }));
        let DayCardKind::Multi { streams } = &body.cards[1].kind else {
            panic!("multi card expected");
        };
        assert_eq!(streams.len(), 3);
        // Columns split the card width evenly.
        let w0 = streams[0].rect.width();
        for s in streams {
            assert!((s.rect.width() - w0).abs() < 0.01);
        }
    }

    #[test]
    fn off_day_uses_the_shorter_card() {
        let mut off = day("d0", 0, 0);
        off.is_off = true;
        let plan = plan(&display(vec![off, day("d1", 1, 0)]), canvas(), RenderMode::Export);
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        assert!(matches!(body.cards[0].kind, DayCardKind::Off { .. }));
        assert!(body.cards[0].rect.height() < body.cards[1].rect.height());
    }

    #[test]
    fn stream_with_no_slots_gets_a_placeholder_pill() {
        let plan = plan(&display(vec![day("d0", 1, 0)]), canvas(), RenderMode::Export);
        let BodyPlan::Portrait(body) = &plan.body else {
            panic!("portrait body expected");
        };
        let DayCardKind::Single { pills, .. } = &body.cards[0].kind else {
            panic!("single card expected");
        };
        assert_eq!(pills.len(), 1);
        assert_eq!(pills[0].label, "Add time slot");
        assert!(pills[0].flag.is_none());
    }

    #[test]
    fn hidden_header_and_footer_free_their_space() {
        let mut d = display(vec![day("d0", 1, 1)]);
        d.show_header = false;
        d.show_footer = false;
        let plan = plan(&d, canvas(), RenderMode::Export);
        assert!(plan.header.is_none());
        assert!(plan.footer.is_none());
    }

    #[test]
    fn long_header_shrinks_but_never_below_the_floor() {
        let mut d = display(vec![day("d0", 1, 1)]);
        d.header_title = "S".repeat(400);
        let plan = plan(&d, canvas(), RenderMode::Export);
        let header = plan.header.unwrap();
        assert_eq!(header.font_size, 28.0);
        assert_eq!(header.max_lines, 3);
    }
}
