//! Scene building: flattens a layout plan plus a resolved theme into an
//! ordered list of draw ops. Ops are renderer-agnostic; assets (thumbnails,
//! flags, fonts) are referenced by key and resolved at raster time.

use crate::{
    catalog::flags::FlagKey,
    catalog::themes::{Rgba, Theme},
    core::{Canvas, Orientation, Rect},
    layout::{
        AddButtonPlan, BadgePlan, BodyPlan, DayCard, DayCardKind, DayTile, DayTileKind,
        EmptyStatePlan, FooterPlan, HeaderPlan, LayoutPlan, SlotPill, TextBlock,
        scale::approx_text_width,
    },
    model::{FooterStyle, HeaderAlignment, HeaderTone},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontRole {
    Heading,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    SemiBold,
    Bold,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub weight: FontWeight,
    pub size: f64,
    pub line_height: f64,
    pub max_lines: u32,
    pub align: TextAlign,
    pub color: Rgba,
    /// Tracking as a fraction of the em size.
    pub letter_spacing: f64,
    pub uppercase: bool,
}

/// One drawing instruction. Coordinates are absolute canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Theme background: vertical base gradient plus the two radial glows.
    Background { rect: Rect },
    PushClip { rect: Rect, radius: f64 },
    PopClip,
    FillRound {
        rect: Rect,
        radius: f64,
        color: Rgba,
    },
    StrokeRound {
        rect: Rect,
        radius: f64,
        width: f64,
        color: Rgba,
        /// Dash length for dashed borders; `None` draws solid.
        dash: Option<f64>,
    },
    /// Cover-fit thumbnail with the theme overlay on top. An empty
    /// `reference` draws the placeholder gradient instead.
    Thumb {
        rect: Rect,
        radius: f64,
        reference: String,
        dim: bool,
    },
    Flag { rect: Rect, flag: FlagKey },
    Dot {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgba,
        ring_width: f64,
        ring_color: Rgba,
    },
    Text {
        rect: Rect,
        text: String,
        style: TextStyle,
    },
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub theme: Theme,
    pub ops: Vec<DrawOp>,
}

fn white(a: u8) -> Rgba {
    Rgba::new(255, 255, 255, a)
}

/// Flattens a plan into paint order: background, clipped body, frame border.
#[tracing::instrument(skip_all, fields(days = plan.day_cards()))]
pub fn build_scene(plan: &LayoutPlan, theme: &Theme) -> Scene {
    let mut b = SceneBuilder {
        theme: *theme,
        ops: Vec::new(),
        landscape: plan.orientation == Orientation::Landscape,
    };
    let full = Rect::new(0.0, 0.0, plan.canvas.width_f64(), plan.canvas.height_f64());
    let frame_radius = theme.border.frame_radius;

    b.ops.push(DrawOp::Background { rect: full });
    b.ops.push(DrawOp::PushClip {
        rect: full,
        radius: frame_radius,
    });

    if let Some(header) = &plan.header {
        b.header(header);
    }
    match &plan.body {
        BodyPlan::Portrait(body) => {
            if let Some(e) = &body.empty_state {
                b.empty_state(e);
            }
            for add in [&body.add_top, &body.add_bottom].into_iter().flatten() {
                b.add_button(add);
            }
            for card in &body.cards {
                b.portrait_card(card);
            }
        }
        BodyPlan::Landscape(body) => {
            if let Some(e) = &body.empty_state {
                b.empty_state(e);
            }
            for add in [&body.empty_add, &body.add_left, &body.add_right]
                .into_iter()
                .flatten()
            {
                b.add_button(add);
            }
            for tile in &body.tiles {
                b.landscape_tile(tile);
            }
        }
    }
    if let Some(footer) = &plan.footer {
        b.footer(footer);
    }

    b.ops.push(DrawOp::PopClip);
    b.ops.push(DrawOp::StrokeRound {
        rect: full,
        radius: frame_radius,
        width: theme.border_weight.frame_border_width,
        color: theme.palette.border,
        dash: None,
    });

    Scene {
        canvas: plan.canvas,
        theme: *theme,
        ops: b.ops,
    }
}

struct SceneBuilder {
    theme: Theme,
    ops: Vec<DrawOp>,
    landscape: bool,
}

impl SceneBuilder {
    fn header(&mut self, header: &HeaderPlan) {
        let color = match header.tone {
            HeaderTone::Bright => white(245),
            HeaderTone::Soft => white(199),
        };
        let align = match header.alignment {
            HeaderAlignment::Left => TextAlign::Left,
            HeaderAlignment::Center => TextAlign::Center,
        };
        self.ops.push(DrawOp::Text {
            rect: header.rect,
            text: header.text.clone(),
            style: TextStyle {
                role: FontRole::Heading,
                weight: FontWeight::Black,
                size: header.font_size,
                line_height: header.line_height,
                max_lines: header.max_lines,
                align,
                color,
                letter_spacing: -0.02,
                uppercase: false,
            },
        });
    }

    fn footer(&mut self, footer: &FooterPlan) {
        let (bg, border) = match footer.style {
            FooterStyle::Solid => (white(38), white(64)),
            FooterStyle::Glass => (white(13), white(38)),
        };
        let radius = footer.radius();
        self.ops.push(DrawOp::FillRound {
            rect: footer.rect,
            radius,
            color: bg,
        });
        self.ops.push(DrawOp::StrokeRound {
            rect: footer.rect,
            radius,
            width: 1.0,
            color: border,
            dash: None,
        });

        let text_w = approx_text_width(&footer.text, footer.font_size);
        let content_w = footer.dot_size + footer.gap + text_w;
        let x = footer.rect.x0 + (footer.rect.width() - content_w) / 2.0;
        let cy = (footer.rect.y0 + footer.rect.y1) / 2.0;
        self.ops.push(DrawOp::Dot {
            cx: x + footer.dot_size / 2.0,
            cy,
            radius: footer.dot_size / 2.0,
            color: self.theme.palette.live,
            ring_width: footer.dot_ring,
            ring_color: self.theme.palette.live_glow,
        });
        self.ops.push(DrawOp::Text {
            rect: Rect::new(
                x + footer.dot_size + footer.gap,
                cy - footer.font_size / 2.0,
                footer.rect.x1,
                cy + footer.font_size / 2.0,
            ),
            text: footer.text.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::Black,
                size: footer.font_size,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: white(242),
                letter_spacing: 0.02,
                uppercase: false,
            },
        });
    }

    fn empty_state(&mut self, e: &EmptyStatePlan) {
        self.ops.push(DrawOp::FillRound {
            rect: e.rect,
            radius: e.radius,
            color: white(13),
        });
        self.ops.push(DrawOp::StrokeRound {
            rect: e.rect,
            radius: e.radius,
            width: 1.0,
            color: white(51),
            dash: Some(6.0),
        });
        self.ops.push(DrawOp::Text {
            rect: e.rect,
            text: e.text.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::SemiBold,
                size: e.font_size,
                line_height: 1.4,
                max_lines: 2,
                align: TextAlign::Center,
                color: white(178),
                letter_spacing: 0.0,
                uppercase: false,
            },
        });
    }

    fn add_button(&mut self, add: &AddButtonPlan) {
        let text_color = if add.enabled { white(204) } else { white(102) };
        self.ops.push(DrawOp::FillRound {
            rect: add.rect,
            radius: add.radius,
            color: white(13),
        });
        self.ops.push(DrawOp::StrokeRound {
            rect: add.rect,
            radius: add.radius,
            width: 2.0,
            color: if add.enabled { white(77) } else { white(38) },
            dash: Some(8.0),
        });

        // The plus sign and the label sit centered as one row.
        let plus_w = approx_text_width("+", add.plus_font);
        let gap = add.font_size * 0.8;
        let label_w = approx_text_width(&add.label, add.font_size) * 1.24;
        let x = add.rect.x0 + (add.rect.width() - (plus_w + gap + label_w)) / 2.0;
        let cy = (add.rect.y0 + add.rect.y1) / 2.0;
        self.ops.push(DrawOp::Text {
            rect: Rect::new(x, cy - add.plus_font / 2.0, x + plus_w, cy + add.plus_font / 2.0),
            text: "+".to_string(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::Black,
                size: add.plus_font,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: text_color,
                letter_spacing: 0.0,
                uppercase: false,
            },
        });
        self.ops.push(DrawOp::Text {
            rect: Rect::new(
                x + plus_w + gap,
                cy - add.font_size / 2.0,
                add.rect.x1,
                cy + add.font_size / 2.0,
            ),
            text: add.label.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::SemiBold,
                size: add.font_size,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: text_color,
                letter_spacing: 0.24,
                uppercase: true,
            },
        });
    }

    fn portrait_card(&mut self, card: &DayCard) {
        let radius = self.theme.border.card_radius;
        let surface = self.theme.card_style.surface;
        match &card.kind {
            DayCardKind::Off { thumb, thumb_radius, note } => {
                self.ops.push(DrawOp::FillRound {
                    rect: card.rect,
                    radius,
                    color: surface.with_alpha(surface.a / 2),
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: card.rect,
                    radius,
                    width: 2.0,
                    color: white(77),
                    dash: Some(8.0),
                });
                self.ops.push(DrawOp::Thumb {
                    rect: *thumb,
                    radius: *thumb_radius,
                    reference: String::new(),
                    dim: false,
                });
                self.day_name(&card.name);
                self.text_block(note, FontWeight::SemiBold, white(178), 0.0, false);
            }
            DayCardKind::Single {
                thumb,
                thumb_radius,
                thumbnail,
                live,
                title,
                pills,
            } => {
                self.ops.push(DrawOp::FillRound {
                    rect: card.rect,
                    radius,
                    color: surface,
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: card.rect,
                    radius,
                    width: self.theme.border_weight.card_border_width,
                    color: self.theme.palette.border,
                    dash: None,
                });
                self.ops.push(DrawOp::Thumb {
                    rect: *thumb,
                    radius: *thumb_radius,
                    reference: thumbnail.clone(),
                    dim: false,
                });
                self.badge(live, white(230), Some(self.theme.palette.live));
                self.day_name(&card.name);
                if let Some(date) = &card.date {
                    self.badge(date, white(26), None);
                }
                self.text_block(title, FontWeight::Black, white(242), -0.02, false);
                for pill in pills {
                    self.pill(pill);
                }
            }
            DayCardKind::Multi { streams } => {
                self.ops.push(DrawOp::FillRound {
                    rect: card.rect,
                    radius,
                    color: surface,
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: card.rect,
                    radius,
                    width: self.theme.border_weight.card_border_width,
                    color: self.theme.palette.border,
                    dash: None,
                });
                self.day_name(&card.name);
                if let Some(date) = &card.date {
                    self.badge(date, white(26), None);
                }
                for s in streams {
                    self.ops.push(DrawOp::FillRound {
                        rect: s.rect,
                        radius: s.radius,
                        color: white(26),
                    });
                    self.ops.push(DrawOp::Thumb {
                        rect: s.rect,
                        radius: s.radius,
                        reference: s.thumbnail.clone(),
                        dim: true,
                    });
                    self.ops.push(DrawOp::StrokeRound {
                        rect: s.rect,
                        radius: s.radius,
                        width: 1.0,
                        color: white(38),
                        dash: None,
                    });
                    self.text_block(&s.title, FontWeight::Black, white(242), -0.02, false);
                    for pill in &s.pills {
                        self.pill(pill);
                    }
                }
            }
        }
    }

    fn landscape_tile(&mut self, tile: &DayTile) {
        let surface = self.theme.card_style.surface;
        match &tile.kind {
            DayTileKind::Off { note } => {
                self.ops.push(DrawOp::FillRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    color: surface.with_alpha(surface.a / 2),
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    width: 2.0,
                    color: white(51),
                    dash: Some(6.0),
                });
                self.day_name(&tile.name);
                self.text_block(note, FontWeight::SemiBold, white(166), 0.0, false);
            }
            DayTileKind::Single {
                thumbnail,
                live,
                date,
                title,
                pills,
            } => {
                self.ops.push(DrawOp::FillRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    color: surface,
                });
                self.ops.push(DrawOp::Thumb {
                    rect: tile.rect,
                    radius: tile.radius,
                    reference: thumbnail.clone(),
                    dim: true,
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    width: self.theme.border_weight.card_border_width,
                    color: white(51),
                    dash: None,
                });
                self.day_name(&tile.name);
                self.badge(live, white(242), Some(self.theme.palette.live));
                self.badge(date, white(51), None);
                self.text_block(title, FontWeight::Black, white(242), -0.01, false);
                for pill in pills {
                    self.pill(pill);
                }
            }
            DayTileKind::Multi { live, date, streams } => {
                self.ops.push(DrawOp::FillRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    color: surface,
                });
                self.ops.push(DrawOp::StrokeRound {
                    rect: tile.rect,
                    radius: tile.radius,
                    width: self.theme.border_weight.card_border_width,
                    color: white(51),
                    dash: None,
                });
                self.day_name(&tile.name);
                self.badge(live, white(242), Some(self.theme.palette.live));
                self.badge(date, white(51), None);
                for s in streams {
                    self.ops.push(DrawOp::FillRound {
                        rect: s.rect,
                        radius: s.radius,
                        color: white(26),
                    });
                    self.ops.push(DrawOp::Thumb {
                        rect: s.rect,
                        radius: s.radius,
                        reference: s.thumbnail.clone(),
                        dim: true,
                    });
                    self.ops.push(DrawOp::StrokeRound {
                        rect: s.rect,
                        radius: s.radius,
                        width: 1.0,
                        color: white(38),
                        dash: None,
                    });
                    self.text_block(&s.title, FontWeight::Black, white(242), -0.01, false);
                    for pill in &s.pills {
                        self.pill(pill);
                    }
                }
            }
        }
    }

    fn day_name(&mut self, name: &TextBlock) {
        let tracking = if self.landscape { 0.12 } else { 0.08 };
        self.text_block(name, FontWeight::Black, white(217), tracking, true);
    }

    fn text_block(
        &mut self,
        block: &TextBlock,
        weight: FontWeight,
        color: Rgba,
        letter_spacing: f64,
        uppercase: bool,
    ) {
        self.ops.push(DrawOp::Text {
            rect: block.rect,
            text: block.text.clone(),
            style: TextStyle {
                role: FontRole::Heading,
                weight,
                size: block.font_size,
                line_height: block.line_height,
                max_lines: block.max_lines,
                align: TextAlign::Left,
                color,
                letter_spacing,
                uppercase,
            },
        });
    }

    fn badge(&mut self, badge: &BadgePlan, bg: Rgba, dot: Option<Rgba>) {
        let radius = badge.radius();
        self.ops.push(DrawOp::FillRound {
            rect: badge.rect,
            radius,
            color: if dot.is_some() {
                Rgba::new(0, 0, 0, 153)
            } else {
                bg
            },
        });
        self.ops.push(DrawOp::StrokeRound {
            rect: badge.rect,
            radius,
            width: 1.0,
            color: white(61),
            dash: None,
        });
        let mut x = badge.rect.x0 + badge.pad_x;
        let cy = (badge.rect.y0 + badge.rect.y1) / 2.0;
        if let Some(color) = dot {
            self.ops.push(DrawOp::Dot {
                cx: x + badge.dot_size / 2.0,
                cy,
                radius: badge.dot_size / 2.0,
                color,
                ring_width: badge.dot_size * 0.6,
                ring_color: self.theme.palette.live_glow,
            });
            x += badge.dot_size + badge.gap;
        }
        self.ops.push(DrawOp::Text {
            rect: Rect::new(
                x,
                cy - badge.font_size / 2.0,
                badge.rect.x1,
                cy + badge.font_size / 2.0,
            ),
            text: badge.text.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::Black,
                size: badge.font_size,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: white(230),
                letter_spacing: 0.06,
                uppercase: true,
            },
        });
    }

    fn pill(&mut self, pill: &SlotPill) {
        let placeholder = pill.flag.is_none() && pill.emoji.is_none() && pill.time.is_empty();
        let bg = if placeholder { white(13) } else { white(26) };
        self.ops.push(DrawOp::FillRound {
            rect: pill.rect,
            radius: pill.radius,
            color: bg,
        });
        self.ops.push(DrawOp::StrokeRound {
            rect: pill.rect,
            radius: pill.radius,
            width: 1.0,
            color: white(56),
            dash: placeholder.then_some(5.0),
        });

        let cy = (pill.rect.y0 + pill.rect.y1) / 2.0;
        if placeholder {
            self.ops.push(DrawOp::Text {
                rect: Rect::new(
                    pill.rect.x0 + pill.pad_x,
                    cy - pill.label_font / 2.0,
                    pill.rect.x1 - pill.pad_x,
                    cy + pill.label_font / 2.0,
                ),
                text: pill.label.clone(),
                style: TextStyle {
                    role: FontRole::Body,
                    weight: FontWeight::SemiBold,
                    size: pill.label_font,
                    line_height: 1.0,
                    max_lines: 1,
                    align: TextAlign::Left,
                    color: white(178),
                    letter_spacing: 0.14,
                    uppercase: true,
                },
            });
            return;
        }

        let mut x = pill.rect.x0 + pill.pad_x;
        let flag_rect = Rect::new(
            x,
            cy - pill.flag_height / 2.0,
            x + pill.flag_width,
            cy + pill.flag_height / 2.0,
        );
        match (&pill.emoji, pill.flag) {
            (Some(emoji), _) => self.ops.push(DrawOp::Text {
                rect: flag_rect,
                text: emoji.clone(),
                style: TextStyle {
                    role: FontRole::Body,
                    weight: FontWeight::Regular,
                    size: pill.emoji_font,
                    line_height: 1.0,
                    max_lines: 1,
                    align: TextAlign::Center,
                    color: white(255),
                    letter_spacing: 0.0,
                    uppercase: false,
                },
            }),
            (None, Some(flag)) => self.ops.push(DrawOp::Flag {
                rect: flag_rect,
                flag,
            }),
            (None, None) => {}
        }
        x += pill.flag_width + pill.gap;

        let time_w = approx_text_width(&pill.time, pill.time_font);
        let label_end = if self.landscape {
            // Landscape pills right-align the time.
            pill.rect.x1 - pill.pad_x - time_w - pill.gap
        } else {
            x + approx_text_width(&pill.label, pill.label_font) * 1.1
        };
        self.ops.push(DrawOp::Text {
            rect: Rect::new(
                x,
                cy - pill.label_font / 2.0,
                label_end.max(x),
                cy + pill.label_font / 2.0,
            ),
            text: pill.label.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::Black,
                size: pill.label_font,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: white(204),
                letter_spacing: 0.08,
                uppercase: true,
            },
        });

        let time_x = if self.landscape {
            pill.rect.x1 - pill.pad_x - time_w
        } else {
            label_end.max(x) + pill.gap
        };
        self.ops.push(DrawOp::Text {
            rect: Rect::new(
                time_x,
                cy - pill.time_font / 2.0,
                pill.rect.x1,
                cy + pill.time_font / 2.0,
            ),
            text: pill.time.clone(),
            style: TextStyle {
                role: FontRole::Body,
                weight: FontWeight::Bold,
                size: pill.time_font,
                line_height: 1.0,
                max_lines: 1,
                align: TextAlign::Left,
                color: white(242),
                letter_spacing: 0.0,
                uppercase: false,
            },
        });
    }
}
