//! Prepared raster and vector assets. All decoding happens up front in
//! [`store::PreparedAssetStore`]; rendering only ever looks entries up.

pub mod decode;
pub mod store;
pub mod thumbs;

use std::sync::Arc;

pub use store::{PreparedAssetStore, ThumbnailRef};
pub use thumbs::{SESSION_PREFIX, SessionThumbs};

#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}
