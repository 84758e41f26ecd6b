//! PNG export and clipboard copy. Each call resolves the document, prepares
//! a fresh asset store, lays out at the export size, and rasterizes; nothing
//! from the preview path is reused, so exports never depend on window state.

use std::io::Cursor;
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::{
    assets::{PreparedAssetStore, SessionThumbs},
    catalog::{sizes, themes::Theme},
    core::FrameRgba,
    display::DisplaySchedule,
    error::{SlateError, SlateResult},
    layout::{RenderMode, compute_layout_for},
    model::ScheduleDocument,
    render_cpu::CpuRenderer,
    scene::build_scene,
};

/// Where clipboard copies land. The default implementation shells out; tests
/// substitute a recording sink.
pub trait ClipboardSink {
    fn put_image_png(&mut self, png: &[u8]) -> SlateResult<()>;
}

/// Pipes PNG bytes to `wl-copy`, falling back to `xclip`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandClipboard;

impl ClipboardSink for CommandClipboard {
    fn put_image_png(&mut self, png: &[u8]) -> SlateResult<()> {
        const CANDIDATES: [(&str, &[&str]); 2] = [
            ("wl-copy", &["--type", "image/png"]),
            ("xclip", &["-selection", "clipboard", "-t", "image/png"]),
        ];
        for (program, args) in CANDIDATES {
            match pipe_to_command(program, args, png) {
                Ok(()) => return Ok(()),
                Err(err) => debug!(program, %err, "clipboard command unavailable"),
            }
        }
        Err(SlateError::export(
            "no clipboard command available (tried wl-copy, xclip)",
        ))
    }
}

fn pipe_to_command(program: &str, args: &[&str], bytes: &[u8]) -> SlateResult<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SlateError::export(format!("spawn {program}: {e}")))?;
    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(bytes)
            .map_err(|e| SlateError::export(format!("write to {program}: {e}")))?;
    }
    let status = child
        .wait()
        .map_err(|e| SlateError::export(format!("wait for {program}: {e}")))?;
    if !status.success() {
        return Err(SlateError::export(format!(
            "{program} exited with {status}"
        )));
    }
    Ok(())
}

/// Renders a document at its export size. The full pipeline: validate,
/// resolve display strings, prepare assets, lay out, build the scene,
/// rasterize.
#[tracing::instrument(skip_all, fields(name = %doc.schedule_name))]
pub fn render_document(
    doc: &ScheduleDocument,
    session: &SessionThumbs,
    base_dir: Option<&Path>,
) -> SlateResult<FrameRgba> {
    doc.validate()?;
    let choice = sizes::resolve_export_canvas(doc);
    let display = DisplaySchedule::resolve(doc);
    let assets = PreparedAssetStore::prepare(&display, session, base_dir)?;
    let plan = compute_layout_for(&display, choice.canvas, choice.orientation, RenderMode::Export);
    let theme = Theme::resolve(&doc.theme);
    let scene = build_scene(&plan, &theme);
    CpuRenderer::new().render(&scene, &assets)
}

/// Encodes a rendered frame as PNG, unpremultiplying back to straight alpha.
pub fn encode_png(frame: &FrameRgba) -> SlateResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| SlateError::export("frame byte length mismatch"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| SlateError::export(format!("png encode: {e}")))?;
    Ok(out)
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((u16::from(px[0]) * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((u16::from(px[1]) * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((u16::from(px[2]) * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Suggested file name for an export: schedule name and size label slugged,
/// with fallbacks when either is empty.
pub fn export_file_name(doc: &ScheduleDocument) -> String {
    let choice = sizes::resolve_export_canvas(doc);
    let name = slug_or(&doc.schedule_name, "schedule");
    let label = slug_or(choice.label, "export");
    format!("{name}-{label}.png")
}

fn slug_or(value: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

/// Drives file export and clipboard copy, refusing re-entry while a run is
/// in flight. One exporter lives per open document.
#[derive(Debug, Default)]
pub struct Exporter {
    exporting: bool,
    copying: bool,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn is_copying(&self) -> bool {
        self.copying
    }

    pub fn export_to_file(
        &mut self,
        doc: &ScheduleDocument,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
        out_path: &Path,
    ) -> SlateResult<()> {
        if self.exporting {
            return Err(SlateError::export("an export is already running"));
        }
        self.exporting = true;
        let result = self.run_export(doc, session, base_dir, out_path);
        self.exporting = false;
        result
    }

    fn run_export(
        &mut self,
        doc: &ScheduleDocument,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
        out_path: &Path,
    ) -> SlateResult<()> {
        let frame = render_document(doc, session, base_dir)?;
        let png = encode_png(&frame)?;
        std::fs::write(out_path, &png)
            .map_err(|e| SlateError::export(format!("write '{}': {e}", out_path.display())))?;
        info!(path = %out_path.display(), bytes = png.len(), "exported schedule");
        Ok(())
    }

    pub fn copy_to_clipboard(
        &mut self,
        doc: &ScheduleDocument,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
        sink: &mut dyn ClipboardSink,
    ) -> SlateResult<()> {
        if self.copying {
            return Err(SlateError::export("a clipboard copy is already running"));
        }
        self.copying = true;
        let result = render_document(doc, session, base_dir)
            .and_then(|frame| encode_png(&frame))
            .and_then(|png| sink.put_image_png(&png));
        self.copying = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, Stream};

    struct RecordingClipboard {
        payloads: Vec<Vec<u8>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn put_image_png(&mut self, png: &[u8]) -> SlateResult<()> {
            self.payloads.push(png.to_vec());
            Ok(())
        }
    }

    fn small_doc() -> ScheduleDocument {
        let mut doc = ScheduleDocument::default();
        doc.schedule_name = "My Week".into();
        // Tiny custom canvas keeps the raster cheap.
        doc.export_size_id = "custom-vertical".into();
        doc.custom_vertical_size.width = 108;
        doc.custom_vertical_size.height = 192;
        doc.days.push(Day {
            id: "day-1".into(),
            label: "Monday".into(),
            date_label: String::new(),
            is_off: false,
            streams: vec![Stream {
                id: "stream-1".into(),
                title: "Ranked".into(),
                thumbnail: String::new(),
                base_time: "20:00".into(),
                time_slots: Vec::new(),
            }],
        });
        doc
    }

    #[test]
    fn file_name_slugs_name_and_size_label() {
        let mut doc = ScheduleDocument::default();
        doc.schedule_name = "My Schedule!!".into();
        assert_eq!(export_file_name(&doc), "my-schedule-story.png");

        doc.schedule_name = "   ".into();
        assert_eq!(export_file_name(&doc), "schedule-story.png");

        doc.schedule_name = "Çédille Week".into();
        doc.export_size_id = "custom-horizontal".into();
        assert_eq!(export_file_name(&doc), "dille-week-custom-horizontal.png");
    }

    #[test]
    fn export_writes_a_decodable_png_at_the_export_size() {
        let doc = small_doc();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut exporter = Exporter::new();
        exporter
            .export_to_file(&doc, &SessionThumbs::new(), None, &path)
            .unwrap();
        assert!(!exporter.is_exporting());

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 108);
        assert_eq!(decoded.height(), 192);
    }

    #[test]
    fn exports_are_deterministic() {
        let doc = small_doc();
        let a = render_document(&doc, &SessionThumbs::new(), None).unwrap();
        let b = render_document(&doc, &SessionThumbs::new(), None).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn clipboard_copy_hands_the_sink_a_png() {
        let doc = small_doc();
        let mut sink = RecordingClipboard {
            payloads: Vec::new(),
        };
        Exporter::new()
            .copy_to_clipboard(&doc, &SessionThumbs::new(), None, &mut sink)
            .unwrap();
        assert_eq!(sink.payloads.len(), 1);
        assert_eq!(&sink.payloads[0][..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        let mut px = [64, 32, 16, 128];
        unpremultiply_in_place(&mut px);
        assert_eq!(px[3], 128);
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert!((px[1] as i32 - 64).abs() <= 1);
        assert!((px[2] as i32 - 32).abs() <= 1);
    }
}
