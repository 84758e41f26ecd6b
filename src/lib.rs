#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod core;
pub mod display;
pub mod editor;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod render_cpu;
pub mod scene;
pub mod time;

pub use assets::{PreparedAssetStore, SessionThumbs};
pub use catalog::themes::Theme;
pub use core::{Canvas, FrameRgba, Orientation};
pub use display::DisplaySchedule;
pub use editor::Editor;
pub use error::{SlateError, SlateResult};
pub use export::{CommandClipboard, Exporter, encode_png, export_file_name, render_document};
pub use layout::{LayoutPlan, RenderMode, compute_layout, compute_layout_for, preview_scale};
pub use model::ScheduleDocument;
pub use render_cpu::{CpuRenderer, render_scene};
pub use scene::{DrawOp, Scene, build_scene};
