//! Front-loaded asset preparation. Thumbnail fetching and decoding, and flag
//! SVG parsing, all happen here before any rendering starts; a failed
//! thumbnail degrades to the placeholder instead of failing the render.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use base64::Engine as _;
use tracing::warn;

use crate::{
    assets::{
        PreparedImage, PreparedSvg, decode,
        thumbs::{SESSION_PREFIX, SessionThumbs},
    },
    catalog::flags::{self, FlagKey},
    display::DisplaySchedule,
    error::{SlateError, SlateResult},
};

/// A parsed stream thumbnail reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailRef {
    Empty,
    /// Inline `data:` URI with a base64 payload.
    Data { mime: String, payload: String },
    /// Upload registered with the session thumbnail store.
    Session { key: String },
    Remote { url: String },
    /// Path relative to the document's directory. Absolute paths and paths
    /// that climb out of the directory are rejected at parse time.
    Local { path: PathBuf },
}

impl ThumbnailRef {
    pub fn parse(reference: &str) -> SlateResult<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(Self::Empty);
        }
        if let Some(rest) = reference.strip_prefix("data:") {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| SlateError::resolution("data URI has no payload"))?;
            let Some(mime) = meta.strip_suffix(";base64") else {
                return Err(SlateError::resolution("data URI must be base64 encoded"));
            };
            return Ok(Self::Data {
                mime: mime.to_string(),
                payload: payload.to_string(),
            });
        }
        if let Some(key) = reference.strip_prefix(SESSION_PREFIX) {
            return Ok(Self::Session {
                key: key.to_string(),
            });
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(Self::Remote {
                url: reference.to_string(),
            });
        }
        let path = Path::new(reference);
        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(SlateError::resolution(format!(
                "thumbnail path must stay inside the document directory: '{reference}'"
            )));
        }
        Ok(Self::Local {
            path: path.to_path_buf(),
        })
    }
}

/// Every asset a scene can reference, decoded and ready. Built once per
/// render; thumbnails are keyed by their raw reference string.
#[derive(Debug, Default)]
pub struct PreparedAssetStore {
    images: HashMap<String, PreparedImage>,
    flags: HashMap<FlagKey, PreparedSvg>,
}

impl PreparedAssetStore {
    /// Prepares everything the given schedule can draw. Flag artwork always
    /// loads; an unloadable thumbnail logs a warning and is left out, so the
    /// renderer falls back to the placeholder for it.
    #[tracing::instrument(skip_all, fields(days = schedule.day_count()))]
    pub fn prepare(
        schedule: &DisplaySchedule,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
    ) -> SlateResult<Self> {
        let mut store = Self::default();
        for key in FlagKey::ALL {
            store
                .flags
                .insert(key, decode::parse_svg(flags::flag_svg(key).as_bytes())?);
        }
        for day in &schedule.days {
            for stream in &day.streams {
                store.prepare_thumbnail(&stream.thumbnail, session, base_dir);
            }
        }
        Ok(store)
    }

    pub fn image(&self, reference: &str) -> Option<&PreparedImage> {
        self.images.get(reference)
    }

    pub fn flag(&self, key: FlagKey) -> Option<&PreparedSvg> {
        self.flags.get(&key)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn prepare_thumbnail(
        &mut self,
        reference: &str,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
    ) {
        if reference.trim().is_empty() || self.images.contains_key(reference) {
            return;
        }
        match self.load_thumbnail(reference, session, base_dir) {
            Ok(Some(image)) => {
                self.images.insert(reference.to_string(), image);
            }
            Ok(None) => {}
            Err(err) => warn!(reference, %err, "thumbnail unavailable, using placeholder"),
        }
    }

    fn load_thumbnail(
        &self,
        reference: &str,
        session: &SessionThumbs,
        base_dir: Option<&Path>,
    ) -> SlateResult<Option<PreparedImage>> {
        match ThumbnailRef::parse(reference)? {
            ThumbnailRef::Empty => Ok(None),
            ThumbnailRef::Data { payload, .. } => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(payload.as_bytes())
                    .map_err(|e| SlateError::resolution(format!("data URI payload: {e}")))?;
                decode::decode_image(&bytes).map(Some)
            }
            ThumbnailRef::Session { key } => match session.get(&key) {
                Some(entry) => decode::decode_image(&entry.bytes).map(Some),
                None => Err(SlateError::resolution(format!(
                    "session thumbnail '{key}' is no longer registered"
                ))),
            },
            ThumbnailRef::Remote { url } => {
                let response = reqwest::blocking::get(&url)
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| SlateError::resolution(format!("fetch '{url}': {e}")))?;
                let bytes = response
                    .bytes()
                    .map_err(|e| SlateError::resolution(format!("read '{url}': {e}")))?;
                decode::decode_image(&bytes).map(Some)
            }
            ThumbnailRef::Local { path } => {
                let dir = base_dir.ok_or_else(|| {
                    SlateError::resolution(format!(
                        "relative thumbnail '{}' needs a document directory",
                        path.display()
                    ))
                })?;
                let bytes = std::fs::read(dir.join(&path)).map_err(|e| {
                    SlateError::resolution(format!("read '{}': {e}", path.display()))
                })?;
                decode::decode_image(&bytes).map(Some)
            }
        }
    }
}
