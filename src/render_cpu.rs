//! CPU rasterization of a [`Scene`] through `vello_cpu`. Text is shaped with
//! parley, flags are rasterized from their SVG trees with resvg, and the
//! theme background is synthesized into an image paint. All inputs are
//! prepared up front, so rendering is deterministic for a given scene.

use std::collections::HashMap;
use std::sync::Arc;

use parley::{FontContext, LayoutContext, StyleProperty, layout::PositionedLayoutItem};

use crate::{
    assets::{PreparedAssetStore, PreparedImage, PreparedSvg},
    catalog::flags::FlagKey,
    catalog::themes::{Rgba, Theme},
    core::{FrameRgba, Rect},
    error::{SlateError, SlateResult},
    layout::scale::{PORTRAIT_DESIGN_HEIGHT, PORTRAIT_DESIGN_WIDTH},
    scene::{DrawOp, FontRole, FontWeight, Scene, TextAlign, TextStyle},
};

pub struct CpuRenderer {
    font_cx: FontContext,
    layout_cx: LayoutContext<[u8; 4]>,
    glyph_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    image_paints: HashMap<String, vello_cpu::Image>,
    flag_paints: HashMap<(FlagKey, u32, u32), vello_cpu::Image>,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over [`CpuRenderer::render`].
pub fn render_scene(scene: &Scene, assets: &PreparedAssetStore) -> SlateResult<FrameRgba> {
    CpuRenderer::new().render(scene, assets)
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self {
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            glyph_fonts: HashMap::new(),
            image_paints: HashMap::new(),
            flag_paints: HashMap::new(),
        }
    }

    #[tracing::instrument(skip_all, fields(w = scene.canvas.width, h = scene.canvas.height, ops = scene.ops.len()))]
    pub fn render(&mut self, scene: &Scene, assets: &PreparedAssetStore) -> SlateResult<FrameRgba> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| SlateError::layout("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| SlateError::layout("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in &scene.ops {
            self.draw_op(&mut ctx, op, scene, assets)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRgba {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        scene: &Scene,
        assets: &PreparedAssetStore,
    ) -> SlateResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Background { rect } => {
                let paint =
                    background_paint(&scene.theme, scene.canvas.width, scene.canvas.height)?;
                ctx.set_paint(paint);
                ctx.fill_rect(&cpu_rect(*rect));
            }
            DrawOp::PushClip { rect, radius } => {
                ctx.push_clip_layer(&rounded_path(*rect, *radius));
            }
            DrawOp::PopClip => ctx.pop_layer(),
            DrawOp::FillRound {
                rect,
                radius,
                color,
            } => {
                ctx.set_paint(cpu_color(*color));
                ctx.fill_path(&rounded_path(*rect, *radius));
            }
            DrawOp::StrokeRound {
                rect,
                radius,
                width,
                color,
                dash,
            } => {
                let path = rounded_path(*rect, *radius);
                let path = match dash {
                    Some(len) => dashed(&path, *len),
                    None => path,
                };
                ctx.set_paint(cpu_color(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&path);
            }
            DrawOp::Thumb {
                rect,
                radius,
                reference,
                dim,
            } => self.draw_thumb(ctx, *rect, *radius, reference, *dim, &scene.theme, assets),
            DrawOp::Flag { rect, flag } => self.draw_flag(ctx, *rect, *flag, assets)?,
            DrawOp::Dot {
                cx,
                cy,
                radius,
                color,
                ring_width,
                ring_color,
            } => {
                use vello_cpu::kurbo::{Circle, Shape};
                let center = vello_cpu::kurbo::Point::new(*cx, *cy);
                if *ring_width > 0.0 {
                    ctx.set_paint(cpu_color(*ring_color));
                    ctx.fill_path(&Circle::new(center, radius + ring_width).to_path(0.1));
                }
                ctx.set_paint(cpu_color(*color));
                ctx.fill_path(&Circle::new(center, *radius).to_path(0.1));
            }
            DrawOp::Text { rect, text, style } => {
                self.draw_text(ctx, *rect, text, style, &scene.theme);
            }
        }
        Ok(())
    }

    fn draw_thumb(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        rect: Rect,
        radius: f64,
        reference: &str,
        dim: bool,
        theme: &Theme,
        assets: &PreparedAssetStore,
    ) {
        let clip = rounded_path(rect, radius);
        ctx.push_clip_layer(&clip);

        match assets.image(reference) {
            Some(prepared) => {
                let paint = self.image_paint(reference, prepared);
                let (iw, ih) = (f64::from(prepared.width), f64::from(prepared.height));
                // Cover fit: scale so the image fills the slot, centered.
                let scale = (rect.width() / iw).max(rect.height() / ih);
                let tx = rect.x0 - (iw * scale - rect.width()) / 2.0;
                let ty = rect.y0 - (ih * scale - rect.height()) / 2.0;
                ctx.set_transform(
                    vello_cpu::kurbo::Affine::translate((tx, ty))
                        * vello_cpu::kurbo::Affine::scale(scale),
                );
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            }
            None => {
                // Placeholder: the theme's thumbnail overlay over a dark base.
                let (top, bottom) = theme.background.thumb_overlay;
                ctx.set_paint(cpu_color(theme.background.base_bottom));
                ctx.fill_rect(&cpu_rect(rect));
                ctx.set_paint(cpu_color(top));
                ctx.fill_rect(&cpu_rect(rect));
                ctx.set_paint(cpu_color(bottom));
                ctx.fill_rect(&cpu_rect(rect));
            }
        }

        if dim {
            ctx.set_paint(cpu_color(Rgba::new(2, 6, 23, 96)));
            ctx.fill_rect(&cpu_rect(rect));
        }
        ctx.pop_layer();
    }

    fn draw_flag(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        rect: Rect,
        flag: FlagKey,
        assets: &PreparedAssetStore,
    ) -> SlateResult<()> {
        let Some(svg) = assets.flag(flag) else {
            // Flags are always preloaded by the store; a bare store (tests,
            // previews without assets) just skips the artwork.
            return Ok(());
        };
        let w = rect.width().ceil().max(1.0) as u32;
        let h = rect.height().ceil().max(1.0) as u32;
        let paint = match self.flag_paints.get(&(flag, w, h)) {
            Some(p) => p.clone(),
            None => {
                let pixmap = rasterize_svg(svg, w, h)?;
                let paint = pixmap_paint(&pixmap, w, h)?;
                self.flag_paints.insert((flag, w, h), paint.clone());
                paint
            }
        };

        let clip = rounded_path(rect, rect.height() * 0.18);
        ctx.push_clip_layer(&clip);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.pop_layer();
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        rect: Rect,
        text: &str,
        style: &TextStyle,
        theme: &Theme,
    ) {
        let shaped;
        let text = if style.uppercase {
            shaped = text.to_uppercase();
            shaped.as_str()
        } else {
            text
        };
        if text.is_empty() {
            return;
        }

        let stack = match style.role {
            FontRole::Heading => theme.fonts.heading,
            FontRole::Body => theme.fonts.body,
        };
        let weight = match style.weight {
            FontWeight::Regular => parley::FontWeight::NORMAL,
            FontWeight::SemiBold => parley::FontWeight::SEMI_BOLD,
            FontWeight::Bold => parley::FontWeight::BOLD,
            FontWeight::Black => parley::FontWeight::BLACK,
        };

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            std::borrow::Cow::Borrowed(stack),
        )));
        builder.push_default(StyleProperty::FontSize(style.size as f32));
        builder.push_default(StyleProperty::FontWeight(weight));
        builder.push_default(StyleProperty::LineHeight(
            parley::LineHeight::FontSizeRelative(style.line_height as f32),
        ));
        builder.push_default(StyleProperty::LetterSpacing(
            (style.letter_spacing * style.size) as f32,
        ));
        let mut layout = builder.build(text);

        let max_width = rect.width().max(0.0) as f32;
        layout.break_all_lines(Some(max_width));
        let alignment = match style.align {
            TextAlign::Left => parley::Alignment::Start,
            TextAlign::Center => parley::Alignment::Center,
        };
        layout.align(Some(max_width), alignment, parley::AlignmentOptions::default());

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));
        ctx.set_paint(cpu_color(style.color));

        for (index, line) in layout.lines().enumerate() {
            // max_lines is a hard clamp; overflow lines are dropped.
            if index >= style.max_lines as usize {
                break;
            }
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let font = self.glyph_font(glyph_run.run().font());
                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn image_paint(&mut self, reference: &str, prepared: &PreparedImage) -> vello_cpu::Image {
        if let Some(paint) = self.image_paints.get(reference) {
            return paint.clone();
        }
        let paint = pixmap_paint(
            prepared.rgba8_premul.as_slice(),
            prepared.width,
            prepared.height,
        )
        .unwrap_or_else(|_| solid_pixel_paint());
        self.image_paints.insert(reference.to_string(), paint.clone());
        paint
    }

    fn glyph_font(&mut self, font: &parley::FontData) -> vello_cpu::peniko::FontData {
        let key = (font.data.id(), font.index);
        if let Some(cached) = self.glyph_fonts.get(&key) {
            return cached.clone();
        }
        let blob = vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec());
        let converted = vello_cpu::peniko::FontData::new(blob, font.index);
        self.glyph_fonts.insert(key, converted.clone());
        converted
    }
}

fn cpu_rect(rect: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

fn cpu_color(color: Rgba) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn rounded_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::Shape;
    let radius = radius
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(0.0);
    vello_cpu::kurbo::RoundedRect::from_rect(cpu_rect(rect), radius).to_path(0.1)
}

fn dashed(path: &vello_cpu::kurbo::BezPath, len: f64) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::Shape;
    let len = len.max(0.5);
    vello_cpu::kurbo::dash(path.path_elements(0.1), 0.0, &[len, len]).collect()
}

fn pixmap_paint(rgba8_premul: &[u8], width: u32, height: u32) -> SlateResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlateError::layout("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlateError::layout("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SlateError::layout("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(
            vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities),
        )),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn solid_pixel_paint() -> vello_cpu::Image {
    let pixels = vec![vello_cpu::peniko::color::PremulRgba8 {
        r: 30,
        g: 41,
        b: 59,
        a: 255,
    }];
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(
            vello_cpu::Pixmap::from_parts_with_opacity(pixels, 1, 1, false),
        )),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn rasterize_svg(svg: &PreparedSvg, width: u32, height: u32) -> SlateResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SlateError::layout("flag raster size is zero"))?;
    let size = svg.tree.size();
    let transform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&svg.tree, transform, &mut pixmap.as_mut());
    // tiny-skia pixmaps are premultiplied RGBA8 already.
    Ok(pixmap.take())
}

/// Synthesizes the theme background (vertical base gradient plus radial
/// glows) into an image paint. Glow radii are authored against the portrait
/// design size and stretch with each canvas axis.
fn background_paint(theme: &Theme, width: u32, height: u32) -> SlateResult<vello_cpu::Image> {
    let bg = theme.background;
    let w = width as usize;
    let h = height as usize;
    let sx = f64::from(width) / PORTRAIT_DESIGN_WIDTH;
    let sy = f64::from(height) / PORTRAIT_DESIGN_HEIGHT;

    let mut rgba = Vec::with_capacity(w * h * 4);
    let denom = (h.saturating_sub(1)).max(1) as f64;
    for y in 0..h {
        let t = y as f64 / denom;
        let base = [
            lerp_u8(bg.base_top.r, bg.base_bottom.r, t),
            lerp_u8(bg.base_top.g, bg.base_bottom.g, t),
            lerp_u8(bg.base_top.b, bg.base_bottom.b, t),
        ];
        for x in 0..w {
            let mut px = base;
            for glow in &bg.glows {
                let cx = glow.cx * f64::from(width);
                let cy = glow.cy * f64::from(height);
                let nx = (x as f64 - cx) / (glow.rx * sx);
                let ny = (y as f64 - cy) / (glow.ry * sy);
                let d = (nx * nx + ny * ny).sqrt();
                if d >= glow.fade {
                    continue;
                }
                let strength = (1.0 - d / glow.fade) * f64::from(glow.color.a) / 255.0;
                px = [
                    lerp_u8(px[0], glow.color.r, strength),
                    lerp_u8(px[1], glow.color.g, strength),
                    lerp_u8(px[2], glow.color.b, strength),
                ];
            }
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
    }
    pixmap_paint(&rgba, width, height)
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}
