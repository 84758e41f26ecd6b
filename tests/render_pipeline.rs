use weekslate::{
    DisplaySchedule, RenderMode, ScheduleDocument, SessionThumbs, Theme, build_scene,
    compute_layout_for, encode_png, export_file_name, render_document,
    catalog::sizes,
    model::{Day, Stream, TimeSlot},
    scene::DrawOp,
};

fn week_doc() -> ScheduleDocument {
    let mut doc = ScheduleDocument::default();
    doc.schedule_name = "Pipeline Week".into();
    doc.show_header = true;
    doc.header_title = "This week".into();
    doc.export_size_id = "custom-vertical".into();
    doc.custom_vertical_size.width = 108;
    doc.custom_vertical_size.height = 192;

    doc.days.push(Day {
        id: "day-1".into(),
        label: "Monday".into(),
        date_label: "Jan 5".into(),
        is_off: false,
        streams: vec![Stream {
            id: "stream-1".into(),
            title: "Ranked climb".into(),
            thumbnail: String::new(),
            base_time: "20:30".into(),
            time_slots: vec![
                TimeSlot::new("slot-1".into(), "uk"),
                TimeSlot::new("slot-2".into(), "us-et"),
            ],
        }],
    });
    doc.days.push(Day {
        id: "day-2".into(),
        label: "Tuesday".into(),
        date_label: String::new(),
        is_off: true,
        streams: Vec::new(),
    });
    doc
}

#[test]
fn the_full_pipeline_rasterizes_at_the_export_size() {
    let doc = week_doc();
    let frame = render_document(&doc, &SessionThumbs::new(), None).unwrap();
    assert_eq!(frame.width, 108);
    assert_eq!(frame.height, 192);
    assert_eq!(frame.data.len(), 108 * 192 * 4);

    let png = encode_png(&frame).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 108);
    assert_eq!(decoded.height(), 192);
}

#[test]
fn custom_landscape_sizes_keep_their_stated_orientation() {
    let mut doc = week_doc();
    doc.export_size_id = "custom-horizontal".into();
    // Pixel sizes that look portrait still render through the landscape path.
    doc.custom_horizontal_size.width = 108;
    doc.custom_horizontal_size.height = 192;

    let choice = sizes::resolve_export_canvas(&doc);
    assert_eq!(choice.orientation, weekslate::Orientation::Landscape);

    let frame = render_document(&doc, &SessionThumbs::new(), None).unwrap();
    assert_eq!(frame.width, 108);
    assert_eq!(frame.height, 192);
}

#[test]
fn rendering_the_same_document_twice_is_byte_identical() {
    let doc = week_doc();
    let a = render_document(&doc, &SessionThumbs::new(), None).unwrap();
    let b = render_document(&doc, &SessionThumbs::new(), None).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn export_scenes_bracket_the_body_and_skip_edit_affordances() {
    let doc = week_doc();
    let choice = sizes::resolve_export_canvas(&doc);
    let display = DisplaySchedule::resolve(&doc);
    let plan = compute_layout_for(&display, choice.canvas, choice.orientation, RenderMode::Export);
    let scene = build_scene(&plan, &Theme::resolve(&doc.theme));

    assert!(matches!(scene.ops.first(), Some(DrawOp::Background { .. })));
    assert!(matches!(scene.ops.last(), Some(DrawOp::StrokeRound { .. })));

    let clips = scene
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::PushClip { .. }))
        .count();
    let pops = scene
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::PopClip))
        .count();
    assert_eq!(clips, pops);

    for op in &scene.ops {
        if let DrawOp::Text { text, .. } = op {
            assert!(!text.contains("Add day"), "edit affordance leaked: {text}");
            assert!(!text.contains("Add time slot"), "edit affordance leaked: {text}");
        }
    }
}

#[test]
fn suggested_file_names_follow_the_document() {
    let mut doc = week_doc();
    assert_eq!(export_file_name(&doc), "pipeline-week-custom-vertical.png");

    doc.export_size_id = "youtube".into();
    assert_eq!(export_file_name(&doc), "pipeline-week-youtube.png");
}
